//! Batch adapter for kernel smoothing with parallel execution.
//!
//! ## Purpose
//!
//! This module provides the batch execution adapter of `fastSphmap`. It wraps
//! the `sphmap` batch adapter, injects the parallel deposition and neighbour
//! passes, and accepts ndarray inputs and outputs.
//!
//! ## Design notes
//!
//! * **Delegation**: Validation and rendering stay in the `sphmap` batch processor.
//! * **Parallelism**: Adds parallel execution via `rayon` (fastSphmap extension),
//!   enabled by default.
//! * **Reproducibility**: Parallel renders are bit-identical to serial ones.
//! * **Generics**: Generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Pass injection**: `build()` sets the custom deposition and neighbour
//!   passes on the base builder before building it.
//! * **Image arrays**: Rendered images convert to `Array2` with shape `(ny, nx)`.
//!
//! ## Invariants
//!
//! * Source arrays have equal lengths and finite values.
//! * Position arrays have exactly three columns.
//!
//! ## Non-goals
//!
//! * This adapter does not handle chunked input (use the streaming adapter).

// Feature-gated imports
#[cfg(feature = "cpu")]
use crate::algorithms::neighbors::neighbor_pass_parallel;
#[cfg(feature = "cpu")]
use crate::engine::executor::deposit_pass_parallel;

// External dependencies
use ndarray::Array2;
use num_traits::Float;
use std::result::Result;

// Export dependencies from sphmap crate
use sphmap::internals::adapters::batch::{BatchSmoothing, BatchSmoothingBuilder};
use sphmap::internals::algorithms::projection::{ParticleFrame, PreparedSources};
use sphmap::internals::engine::output::{PixelUnits, SmoothedImage};
use sphmap::internals::primitives::errors::SmoothingError;
use sphmap::internals::primitives::grid::{Frame, PixelGrid};

// Internal dependencies
use crate::input::{PositionInput, SourceInput};

// ============================================================================
// Extended Batch Smoothing Builder
// ============================================================================

/// Builder for the batch processor with parallel support.
#[derive(Debug, Clone)]
pub struct ParallelBatchSmoothingBuilder<T: Float> {
    /// Base builder from the sphmap crate
    pub base: BatchSmoothingBuilder<T>,
}

impl<T: Float> Default for ParallelBatchSmoothingBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> ParallelBatchSmoothingBuilder<T> {
    /// Create a new batch builder with default parameters.
    ///
    /// # Defaults
    ///
    /// * All base parameters from sphmap BatchSmoothingBuilder
    /// * parallel: true (fastSphmap extension)
    fn new() -> Self {
        let base = BatchSmoothingBuilder::default().parallel(true);
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

    /// Enable returning diagnostics in the result.
    pub fn return_diagnostics(mut self, enabled: bool) -> Self {
        self.base = self.base.return_diagnostics(enabled);
        self
    }
}

impl<T: Float + Send + Sync + 'static> ParallelBatchSmoothingBuilder<T> {
    // ========================================================================
    // Build Method
    // ========================================================================

    /// Build the batch processor.
    pub fn build(self) -> Result<ParallelBatchSmoothing<T>, SmoothingError> {
        // Check for deferred errors from adapter conversion
        if let Some(ref err) = self.base.deferred_error {
            return Err(err.clone());
        }

        let mut builder = self.base;

        #[cfg(feature = "cpu")]
        {
            if builder.parallel.unwrap_or(true) {
                builder = builder
                    .custom_deposit_pass(deposit_pass_parallel)
                    .custom_neighbor_pass(neighbor_pass_parallel);
            } else {
                builder.custom_deposit_pass = None;
                builder.custom_neighbor_pass = None;
            }
        }
        #[cfg(not(feature = "cpu"))]
        {
            // Fallback to sequential if cpu feature is disabled
            builder.custom_deposit_pass = None;
            builder.custom_neighbor_pass = None;
        }

        // Delegate validation and construction to the base implementation
        let processor = builder.build()?;

        Ok(ParallelBatchSmoothing { processor })
    }
}

// ============================================================================
// Extended Batch Smoothing Processor
// ============================================================================

/// Batch processor with parallel support.
#[derive(Debug, Clone)]
pub struct ParallelBatchSmoothing<T: Float> {
    processor: BatchSmoothing<T>,
}

impl<T: Float + Send + Sync + 'static> ParallelBatchSmoothing<T> {
    /// The pixel grid images are rendered on.
    pub fn grid(&self) -> &PixelGrid<T> {
        self.processor.grid()
    }

    /// Render one image. Without `weights` every source has unit weight.
    pub fn render<I1, I2, I3>(
        &self,
        x: &I1,
        y: &I2,
        hsml: &I3,
        weights: Option<&[T]>,
    ) -> Result<SmoothedImage<T>, SmoothingError>
    where
        I1: SourceInput<T> + ?Sized,
        I2: SourceInput<T> + ?Sized,
        I3: SourceInput<T> + ?Sized,
    {
        self.processor.render(
            x.as_source_slice()?,
            y.as_source_slice()?,
            hsml.as_source_slice()?,
            weights,
        )
    }

    /// Render one image and return it as an `(ny, nx)` array.
    pub fn render_array<I1, I2, I3>(
        &self,
        x: &I1,
        y: &I2,
        hsml: &I3,
        weights: Option<&[T]>,
    ) -> Result<Array2<T>, SmoothingError>
    where
        I1: SourceInput<T> + ?Sized,
        I2: SourceInput<T> + ?Sized,
        I3: SourceInput<T> + ?Sized,
    {
        image_to_array(self.render(x, y, hsml, weights)?)
    }

    /// Render one image per weight set over the same sources.
    pub fn render_bands<I1, I2, I3>(
        &self,
        x: &I1,
        y: &I2,
        hsml: &I3,
        bands: &[&[T]],
    ) -> Result<Vec<SmoothedImage<T>>, SmoothingError>
    where
        I1: SourceInput<T> + ?Sized,
        I2: SourceInput<T> + ?Sized,
        I3: SourceInput<T> + ?Sized,
    {
        self.processor.render_bands(
            x.as_source_slice()?,
            y.as_source_slice()?,
            hsml.as_source_slice()?,
            bands,
        )
    }

    /// Distance from each particle to its `num_neighbors`-th nearest neighbour.
    pub fn smoothing_lengths<P>(
        &self,
        positions: &P,
        num_neighbors: usize,
    ) -> Result<Vec<T>, SmoothingError>
    where
        P: PositionInput<T> + ?Sized,
    {
        self.processor
            .smoothing_lengths(&positions.as_positions()?, num_neighbors)
    }

    /// Turn 3-D particles into image-plane sources.
    pub fn prepare<P>(
        &self,
        frame: &ParticleFrame<T>,
        positions: &P,
        num_neighbors: usize,
    ) -> Result<PreparedSources<T>, SmoothingError>
    where
        P: PositionInput<T> + ?Sized,
    {
        self.processor
            .prepare(frame, &positions.as_positions()?, num_neighbors)
    }

    /// Prepare particles and render one image.
    pub fn render_particles<P>(
        &self,
        frame: &ParticleFrame<T>,
        positions: &P,
        weights: Option<&[T]>,
        num_neighbors: usize,
    ) -> Result<SmoothedImage<T>, SmoothingError>
    where
        P: PositionInput<T> + ?Sized,
    {
        self.processor
            .render_particles(frame, &positions.as_positions()?, weights, num_neighbors)
    }
}

/// Reshape a rendered image into an `(ny, nx)` array; element `[i, j]` is cell `(i, j)`.
pub fn image_to_array<T: Float>(image: SmoothedImage<T>) -> Result<Array2<T>, SmoothingError> {
    let shape = (image.ny, image.nx);
    Array2::from_shape_vec(shape, image.values)
        .map_err(|e| SmoothingError::InvalidInput(format!("cannot reshape image: {}", e)))
}
