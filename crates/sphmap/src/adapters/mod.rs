//! Layer 6: Adapters
//!
//! # Purpose
//!
//! This layer provides user-facing processors that adapt the engine layer to
//! different execution modes:
//!
//! - **Batch**: Whole source sets (and multi-band renders) in memory
//! - **Streaming**: Source sets delivered in consecutive chunks
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters ← You are here
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// In-memory batch rendering.
pub mod batch;

/// Chunked rendering for large source sets.
pub mod streaming;
