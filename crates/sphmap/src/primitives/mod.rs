//! Layer 1: Primitives
//!
//! # Purpose
//!
//! This layer provides the data structures shared by every other layer:
//! pixel grids and frames, clipped pixel windows, and the crate error type.
//! It has zero internal dependencies within the crate.
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Shared error types.
pub mod errors;

/// Pixel grids and frame sizing.
pub mod grid;

/// Clipped per-source pixel windows.
pub mod window;
