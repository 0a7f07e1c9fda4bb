//! High-level API for kernel smoothing with parallel execution support.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point of `fastSphmap`.
//! It extends the `sphmap` API with adapters that use all available CPU cores.
//!
//! ## Design notes
//!
//! * **Fluent Integration**: Re-uses the base `sphmap` builder pattern.
//! * **Parallel-First**: Defaults to parallel execution for both adapters.
//! * **Transparent**: Marker types (Batch, Streaming) select the parallel builders.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`SmoothingBuilder`] via `Smoothing::new()`.
//! 2. Chain configuration methods (`.num_rhalfs()`, `.npixels()`, etc.).
//! 3. Select an adapter via `.adapter(Batch)` to get a parallel execution builder.

// Internal dependencies
use crate::adapters::batch::ParallelBatchSmoothingBuilder;
use crate::adapters::streaming::ParallelStreamingSmoothingBuilder;

// External dependencies
use num_traits::Float;

// Import base marker types for delegation
use sphmap::internals::api::Batch as BaseBatch;
use sphmap::internals::api::Streaming as BaseStreaming;

// Publicly re-exported types
pub use crate::adapters::batch::{ParallelBatchSmoothing, image_to_array};
pub use crate::adapters::streaming::ParallelStreamingSmoothing;
pub use crate::input::{PositionInput, SourceInput};
pub use sphmap::internals::algorithms::deposit::accumulate;
pub use sphmap::internals::algorithms::projection::{
    ParticleFrame, PreparedSources, Projection, wrap_periodic,
};
pub use sphmap::internals::api::{SmoothingAdapter, SmoothingBuilder};
pub use sphmap::internals::engine::output::{PixelUnits, SmoothedImage};
pub use sphmap::internals::evaluation::diagnostics::ImageDiagnostics;
pub use sphmap::internals::math::kernel::CubicSpline;
pub use sphmap::internals::math::pixel::rhalfs_to_pixels;
pub use sphmap::internals::primitives::errors::SmoothingError;
pub use sphmap::internals::primitives::grid::{Frame, FrameRequest, PixelGrid};

// ============================================================================
// Adapter Module
// ============================================================================

/// Adapter selection namespace.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::{Batch, Streaming};
}

// ============================================================================
// Adapter Marker Types
// ============================================================================

/// Marker for parallel in-memory batch processing.
#[derive(Debug, Clone, Copy)]
pub struct Batch;

impl<T: Float> SmoothingAdapter<T> for Batch {
    type Output = ParallelBatchSmoothingBuilder<T>;

    fn convert(builder: SmoothingBuilder<T>) -> Self::Output {
        // Determine parallel mode: user choice OR default to true for fastSphmap Batch
        let parallel = builder.parallel.unwrap_or(true);

        // Delegate to base implementation to create base builder
        let mut base = <BaseBatch as SmoothingAdapter<T>>::convert(builder);
        base = base.parallel(parallel);

        ParallelBatchSmoothingBuilder { base }
    }
}

/// Marker for parallel chunked streaming processing.
#[derive(Debug, Clone, Copy)]
pub struct Streaming;

impl<T: Float> SmoothingAdapter<T> for Streaming {
    type Output = ParallelStreamingSmoothingBuilder<T>;

    fn convert(builder: SmoothingBuilder<T>) -> Self::Output {
        let parallel = builder.parallel.unwrap_or(true);

        let mut base = <BaseStreaming as SmoothingAdapter<T>>::convert(builder);
        base = base.parallel(parallel);

        ParallelStreamingSmoothingBuilder { base }
    }
}
