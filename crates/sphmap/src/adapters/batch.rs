//! Batch adapter for adaptive kernel smoothing.
//!
//! ## Purpose
//!
//! This module provides the batch execution adapter: a whole source set is
//! held in memory and rendered onto the grid in one call. It also runs the
//! particle preparation pipeline (wrap, scale, neighbour search, projection)
//! and multi-band renders that share sources and grid.
//!
//! ## Design notes
//!
//! * **Processing**: Validates, culls, deposits and converts units in a single pass.
//! * **Delegation**: Delegates computation to the execution engine.
//! * **Reusable**: Rendering borrows the processor, so one processor can
//!   render many images on the same grid.
//! * **Generics**: Generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Default weights**: Without weights every source carries unit weight
//!   and the image is a number density.
//! * **Bands**: One image per weight set over identical sources.
//!
//! ## Invariants
//!
//! * Source arrays have equal lengths.
//! * Coordinates and weights are finite; smoothing lengths are positive.
//!
//! ## Non-goals
//!
//! * This adapter does not handle chunked input (use the streaming adapter).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::projection::{ParticleFrame, PreparedSources};
use crate::engine::executor::{DepositPassFn, NeighborPassFn, SmoothingConfig, SmoothingExecutor};
use crate::engine::output::{PixelUnits, SmoothedImage};
use crate::engine::validator::Validator;
use crate::primitives::errors::SmoothingError;
use crate::primitives::grid::{Frame, PixelGrid};

// ============================================================================
// Batch Smoothing Builder
// ============================================================================

/// Builder for the batch processor.
#[derive(Debug, Clone)]
pub struct BatchSmoothingBuilder<T: Float> {
    /// Domain half-width
    pub num_rhalfs: T,

    /// Pixels per side
    pub npixels: usize,

    /// Units of the returned values
    pub units: PixelUnits,

    /// Whether to drop out-of-range sources before deposition
    pub cull_out_of_range: bool,

    /// Whether to compute diagnostics
    pub return_diagnostics: bool,

    /// Deferred error from adapter conversion
    pub deferred_error: Option<SmoothingError>,

    // ++++++++++++++++++++++++++++++++++++++
    // +               DEV                  +
    // ++++++++++++++++++++++++++++++++++++++
    /// Custom deposition pass.
    #[doc(hidden)]
    pub custom_deposit_pass: Option<DepositPassFn<T>>,

    /// Custom neighbour-search pass.
    #[doc(hidden)]
    pub custom_neighbor_pass: Option<NeighborPassFn<T>>,

    /// Parallel execution hint.
    #[doc(hidden)]
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub(crate) duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for BatchSmoothingBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> BatchSmoothingBuilder<T> {
    /// Create a new batch builder with default parameters.
    fn new() -> Self {
        let defaults = SmoothingConfig::default();
        Self {
            num_rhalfs: defaults.num_rhalfs,
            npixels: defaults.npixels,
            units: defaults.units,
            cull_out_of_range: defaults.cull_out_of_range,
            return_diagnostics: defaults.return_diagnostics,
            deferred_error: None,
            custom_deposit_pass: None,
            custom_neighbor_pass: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    // ========================================================================
    // Shared Setters
    // ========================================================================

    /// Set the domain half-width.
    pub fn num_rhalfs(mut self, num_rhalfs: T) -> Self {
        self.num_rhalfs = num_rhalfs;
        self
    }

    /// Set the number of pixels per side.
    pub fn npixels(mut self, npixels: usize) -> Self {
        self.npixels = npixels;
        self
    }

    /// Take half-width and pixel count from a resolved frame.
    pub fn frame(mut self, frame: Frame<T>) -> Self {
        self.num_rhalfs = frame.num_rhalfs;
        self.npixels = frame.npixels;
        self
    }

    /// Set the units of the returned values.
    pub fn pixel_units(mut self, units: PixelUnits) -> Self {
        self.units = units;
        self
    }

    /// Enable or disable range culling.
    pub fn cull_out_of_range(mut self, enabled: bool) -> Self {
        self.cull_out_of_range = enabled;
        self
    }

    /// Enable returning diagnostics in the result.
    pub fn return_diagnostics(mut self, enabled: bool) -> Self {
        self.return_diagnostics = enabled;
        self
    }

    // ++++++++++++++++++++++++++++++++++++++
    // +               DEV                  +
    // ++++++++++++++++++++++++++++++++++++++

    /// Set parallel execution hint.
    #[doc(hidden)]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Set a custom deposition pass.
    #[doc(hidden)]
    pub fn custom_deposit_pass(mut self, pass: DepositPassFn<T>) -> Self {
        self.custom_deposit_pass = Some(pass);
        self
    }

    /// Set a custom neighbour-search pass.
    #[doc(hidden)]
    pub fn custom_neighbor_pass(mut self, pass: NeighborPassFn<T>) -> Self {
        self.custom_neighbor_pass = Some(pass);
        self
    }

    // ========================================================================
    // Build Method
    // ========================================================================

    /// Build the batch processor.
    pub fn build(self) -> Result<BatchSmoothing<T>, SmoothingError> {
        if let Some(err) = self.deferred_error {
            return Err(err);
        }

        Validator::validate_no_duplicates(self.duplicate_param)?;
        Validator::validate_half_width(self.num_rhalfs)?;
        Validator::validate_pixel_count(self.npixels)?;

        let config = SmoothingConfig {
            num_rhalfs: self.num_rhalfs,
            npixels: self.npixels,
            units: self.units,
            cull_out_of_range: self.cull_out_of_range,
            return_diagnostics: self.return_diagnostics,
            // ++++++++++++++++++++++++++++++++++++++
            // +               DEV                  +
            // ++++++++++++++++++++++++++++++++++++++
            custom_deposit_pass: self.custom_deposit_pass,
            custom_neighbor_pass: self.custom_neighbor_pass,
            parallel: self.parallel.unwrap_or(false),
        };

        Ok(BatchSmoothing {
            executor: SmoothingExecutor::from_config(config)?,
        })
    }
}

// ============================================================================
// Batch Smoothing Processor
// ============================================================================

/// Batch processor bound to one pixel grid.
#[derive(Debug, Clone)]
pub struct BatchSmoothing<T: Float> {
    executor: SmoothingExecutor<T>,
}

impl<T: Float> BatchSmoothing<T> {
    /// The pixel grid images are rendered on.
    pub fn grid(&self) -> &PixelGrid<T> {
        self.executor.grid()
    }

    /// Render one image. Without `weights` every source has unit weight.
    pub fn render(
        &self,
        x: &[T],
        y: &[T],
        hsml: &[T],
        weights: Option<&[T]>,
    ) -> Result<SmoothedImage<T>, SmoothingError> {
        Validator::validate_sources(x, y, hsml, weights)?;
        Ok(self.executor.run(x, y, hsml, weights))
    }

    /// Render one image per weight set over the same sources.
    pub fn render_bands(
        &self,
        x: &[T],
        y: &[T],
        hsml: &[T],
        bands: &[&[T]],
    ) -> Result<Vec<SmoothedImage<T>>, SmoothingError> {
        Validator::validate_sources(x, y, hsml, None)?;
        for band in bands {
            Validator::validate_length("weights", x.len(), band.len())?;
            Validator::validate_weights(band)?;
        }

        tracing::debug!(bands = bands.len(), "rendering bands");
        Ok(bands
            .iter()
            .map(|&band| self.executor.run(x, y, hsml, Some(band)))
            .collect())
    }

    /// Smoothing lengths: the distance from each particle to its
    /// `num_neighbors`-th nearest neighbour in 3-D.
    pub fn smoothing_lengths(
        &self,
        positions: &[[T; 3]],
        num_neighbors: usize,
    ) -> Result<Vec<T>, SmoothingError> {
        Validator::validate_positions(positions)?;
        Validator::validate_neighbor_count(num_neighbors, positions.len())?;
        Ok(SmoothingExecutor::smoothing_lengths(
            self.executor.config(),
            positions,
            num_neighbors,
        ))
    }

    /// Turn 3-D particles into image-plane sources: wrap and scale about the
    /// frame centre, measure smoothing lengths in 3-D, apply the softening
    /// floor and project.
    pub fn prepare(
        &self,
        frame: &ParticleFrame<T>,
        positions: &[[T; 3]],
        num_neighbors: usize,
    ) -> Result<PreparedSources<T>, SmoothingError> {
        frame.validate()?;
        Validator::validate_positions(positions)?;
        Validator::validate_neighbor_count(num_neighbors, positions.len())?;

        let relative = frame.relative_positions(positions);
        let mut hsml =
            SmoothingExecutor::smoothing_lengths(self.executor.config(), &relative, num_neighbors);
        frame.apply_smoothing_floor(&mut hsml);
        let (x, y) = frame.project(&relative)?;

        tracing::debug!(
            particles = positions.len(),
            projection = frame.projection.name(),
            "particles prepared"
        );

        Ok(PreparedSources { x, y, hsml })
    }

    /// Prepare particles and render one image.
    pub fn render_particles(
        &self,
        frame: &ParticleFrame<T>,
        positions: &[[T; 3]],
        weights: Option<&[T]>,
        num_neighbors: usize,
    ) -> Result<SmoothedImage<T>, SmoothingError> {
        let sources = self.prepare(frame, positions, num_neighbors)?;
        self.render(&sources.x, &sources.y, &sources.hsml, weights)
    }
}
