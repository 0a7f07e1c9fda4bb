//! Streaming adapter for chunked kernel smoothing with parallel execution.
//!
//! ## Purpose
//!
//! This module provides the streaming execution adapter of `fastSphmap`:
//! source chunks are deposited into one persistent image, each chunk with the
//! parallel deposition pass.
//!
//! ## Design notes
//!
//! * **Delegation**: Chunk bookkeeping stays in the `sphmap` streaming processor.
//! * **Parallelism**: Adds parallel execution via `rayon` (fastSphmap extension).
//! * **Reproducibility**: The finalized image is bit-identical to a serial
//!   batch render of the concatenated chunks.
//!
//! ## Invariants
//!
//! * `chunk_size >= 1`.
//!
//! ## Non-goals
//!
//! * This adapter does not prepare particles.
//! * This adapter requires chunks to be provided in stream order.

// Feature-gated imports
#[cfg(feature = "cpu")]
use crate::engine::executor::deposit_pass_parallel;

// External dependencies
use ndarray::Array2;
use num_traits::Float;
use std::result::Result;

// Export dependencies from sphmap crate
use sphmap::internals::adapters::streaming::{StreamingSmoothing, StreamingSmoothingBuilder};
use sphmap::internals::engine::output::{PixelUnits, SmoothedImage};
use sphmap::internals::primitives::errors::SmoothingError;
use sphmap::internals::primitives::grid::{Frame, PixelGrid};

// Internal dependencies
use crate::adapters::batch::image_to_array;
use crate::input::SourceInput;

// ============================================================================
// Extended Streaming Smoothing Builder
// ============================================================================

/// Builder for the streaming processor with parallel support.
#[derive(Debug, Clone)]
pub struct ParallelStreamingSmoothingBuilder<T: Float> {
    /// Base builder from the sphmap crate
    pub base: StreamingSmoothingBuilder<T>,
}

impl<T: Float> Default for ParallelStreamingSmoothingBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> ParallelStreamingSmoothingBuilder<T> {
    /// Create a new streaming builder with default parameters.
    fn new() -> Self {
        let base = StreamingSmoothingBuilder::default().parallel(true);
        Self { base }
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.base = self.base.parallel(parallel);
        self
    }

    // ========================================================================
    // Shared Setters
    // ========================================================================

    /// Set the domain half-width.
    pub fn num_rhalfs(mut self, num_rhalfs: T) -> Self {
        self.base = self.base.num_rhalfs(num_rhalfs);
        self
    }

    /// Set the number of pixels per side.
    pub fn npixels(mut self, npixels: usize) -> Self {
        self.base = self.base.npixels(npixels);
        self
    }

    /// Take half-width and pixel count from a resolved frame.
    pub fn frame(mut self, frame: Frame<T>) -> Self {
        self.base = self.base.frame(frame);
        self
    }

    /// Set the units of the returned values.
    pub fn pixel_units(mut self, units: PixelUnits) -> Self {
        self.base = self.base.pixel_units(units);
        self
    }

    /// Enable or disable range culling.
    pub fn cull_out_of_range(mut self, enabled: bool) -> Self {
        self.base = self.base.cull_out_of_range(enabled);
        self
    }

    /// Enable returning diagnostics in the finalized image.
    pub fn return_diagnostics(mut self, enabled: bool) -> Self {
        self.base = self.base.return_diagnostics(enabled);
        self
    }

    // ========================================================================
    // Streaming-Specific Setters
    // ========================================================================

    /// Set the maximum number of sources deposited per pass.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.base = self.base.chunk_size(size);
        self
    }
}

impl<T: Float + Send + Sync + 'static> ParallelStreamingSmoothingBuilder<T> {
    /// Build the streaming processor.
    pub fn build(self) -> Result<ParallelStreamingSmoothing<T>, SmoothingError> {
        // Check for deferred errors from adapter conversion
        if let Some(ref err) = self.base.deferred_error {
            return Err(err.clone());
        }

        let mut builder = self.base;

        #[cfg(feature = "cpu")]
        {
            if builder.parallel.unwrap_or(true) {
                builder = builder.custom_deposit_pass(deposit_pass_parallel);
            } else {
                builder.custom_deposit_pass = None;
            }
        }
        #[cfg(not(feature = "cpu"))]
        {
            builder.custom_deposit_pass = None;
        }

        let processor = builder.build()?;

        Ok(ParallelStreamingSmoothing { processor })
    }
}

// ============================================================================
// Extended Streaming Smoothing Processor
// ============================================================================

/// Streaming processor with parallel support.
#[derive(Debug, Clone)]
pub struct ParallelStreamingSmoothing<T: Float> {
    processor: StreamingSmoothing<T>,
}

impl<T: Float + Send + Sync + 'static> ParallelStreamingSmoothing<T> {
    /// The pixel grid the image is rendered on.
    pub fn grid(&self) -> &PixelGrid<T> {
        self.processor.grid()
    }

    /// Number of chunks deposited since the last reset.
    pub fn chunks_processed(&self) -> usize {
        self.processor.chunks_processed()
    }

    /// Deposit one chunk of sources into the persistent image.
    pub fn process_chunk<I1, I2, I3>(
        &mut self,
        x: &I1,
        y: &I2,
        hsml: &I3,
        weights: Option<&[T]>,
    ) -> Result<(), SmoothingError>
    where
        I1: SourceInput<T> + ?Sized,
        I2: SourceInput<T> + ?Sized,
        I3: SourceInput<T> + ?Sized,
    {
        self.processor.process_chunk(
            x.as_source_slice()?,
            y.as_source_slice()?,
            hsml.as_source_slice()?,
            weights,
        )
    }

    /// Finish the image and reset the processor for the next one.
    pub fn finalize(&mut self) -> Result<SmoothedImage<T>, SmoothingError> {
        self.processor.finalize()
    }

    /// Finish the image and return it as an `(ny, nx)` array.
    pub fn finalize_array(&mut self) -> Result<Array2<T>, SmoothingError> {
        image_to_array(self.processor.finalize()?)
    }

    /// Discard everything deposited so far.
    pub fn reset(&mut self) {
        self.processor.reset();
    }
}
