//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides the pure mathematical functions the deposition is built
//! from:
//! - The normalized 2-D cubic-spline smoothing kernel
//! - The physical-coordinate to pixel-index mapping
//!
//! Both are total functions with no allocation and no error paths.
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
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Cubic-spline smoothing kernel.
pub mod kernel;

/// Coordinate to pixel mapping.
pub mod pixel;
