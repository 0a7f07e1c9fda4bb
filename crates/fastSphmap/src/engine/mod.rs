//! Layer 5: Engine
//!
//! This layer provides the parallel deposition pass for kernel smoothing.
//! It splits the image into row bands and fills them across CPU cores.

// Parallel deposition engine using CPU threads
pub mod executor;
