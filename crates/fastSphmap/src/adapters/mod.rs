//! Layer 6: Adapters
//!
//! This layer provides user-facing APIs that adapt the engine layer for
//! different execution modes:
//!
//! - **Batch**: Whole source sets and particle preparation, parallel by default
//! - **Streaming**: Chunked deposition into one persistent image

// Batch adapter for kernel smoothing.
pub mod batch;

// Streaming adapter for chunked sources.
pub mod streaming;
