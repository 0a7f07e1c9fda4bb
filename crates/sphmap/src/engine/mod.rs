//! Layer 5: Engine
//!
//! # Purpose
//!
//! This layer orchestrates a render: it validates inputs, selects sources,
//! runs the deposition pass (serial, or a pass injected by an extension
//! crate) and assembles the final image with its diagnostics.
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Execution engine for kernel deposition.
pub mod executor;

/// Validation utilities.
pub mod validator;

/// Output types for rendered images.
pub mod output;
