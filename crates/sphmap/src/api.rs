//! High-level API for adaptive kernel smoothing.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements a
//! fluent builder for the image geometry and output options, and hands over
//! to an execution adapter (Batch or Streaming).
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Polymorphic**: Marker types select the adapter-specific builder.
//! * **Validated**: Parameters are validated when `.build()` is called on the adapter.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ## Key concepts
//!
//! * **Geometry**: Either `num_rhalfs` plus `npixels`, or a resolved [`Frame`].
//! * **Configuration Flow**: Builder pattern ending in `.adapter(Adapter::Type)`.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`SmoothingBuilder`] via `Smoothing::new()`.
//! 2. Chain configuration methods (`.num_rhalfs()`, `.npixels()`, etc.).
//! 3. Select an adapter via `.adapter(Adapter::Batch)` and call `.build()`.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::adapters::batch::BatchSmoothingBuilder;
use crate::adapters::streaming::StreamingSmoothingBuilder;
use crate::engine::executor::{DepositPassFn, NeighborPassFn};

// Publicly re-exported types
pub use crate::adapters::batch::BatchSmoothing;
pub use crate::adapters::streaming::StreamingSmoothing;
pub use crate::algorithms::deposit::accumulate;
pub use crate::algorithms::projection::{ParticleFrame, PreparedSources, Projection, wrap_periodic};
pub use crate::engine::output::{PixelUnits, SmoothedImage};
pub use crate::evaluation::diagnostics::ImageDiagnostics;
pub use crate::math::kernel::CubicSpline;
pub use crate::math::pixel::rhalfs_to_pixels;
pub use crate::primitives::errors::SmoothingError;
pub use crate::primitives::grid::{Frame, FrameRequest, PixelGrid};

/// Marker types for selecting execution adapters.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::{Batch, Streaming};
}

/// Fluent builder for configuring a render and its execution mode.
#[derive(Debug, Clone)]
pub struct SmoothingBuilder<T> {
    /// Domain half-width.
    pub num_rhalfs: Option<T>,

    /// Pixels per side.
    pub npixels: Option<usize>,

    /// Units of the returned values.
    pub pixel_units: Option<PixelUnits>,

    /// Drop out-of-range sources before deposition (default: true).
    pub cull_out_of_range: Option<bool>,

    /// Compute diagnostics for the finished image.
    pub return_diagnostics: Option<bool>,

    /// Sources deposited per pass (Streaming only).
    pub chunk_size: Option<usize>,

    // ======================================
    // DEV
    // ======================================
    /// Custom deposition pass.
    #[doc(hidden)]
    pub custom_deposit_pass: Option<DepositPassFn<T>>,

    /// Custom neighbour-search pass.
    #[doc(hidden)]
    pub custom_neighbor_pass: Option<NeighborPassFn<T>>,

    /// Parallel execution hint.
    #[doc(hidden)]
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for SmoothingBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> SmoothingBuilder<T> {
    /// Select an execution adapter to transition to an execution builder.
    pub fn adapter<A>(self, _adapter: A) -> A::Output
    where
        A: SmoothingAdapter<T>,
    {
        A::convert(self)
    }

    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            num_rhalfs: None,
            npixels: None,
            pixel_units: None,
            cull_out_of_range: None,
            return_diagnostics: None,
            chunk_size: None,
            custom_deposit_pass: None,
            custom_neighbor_pass: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    /// Set the domain half-width (default 7.5).
    pub fn num_rhalfs(mut self, num_rhalfs: T) -> Self {
        if self.num_rhalfs.is_some() {
            self.duplicate_param = Some("num_rhalfs");
        }
        self.num_rhalfs = Some(num_rhalfs);
        self
    }

    /// Set the number of pixels per side (default 256).
    pub fn npixels(mut self, npixels: usize) -> Self {
        if self.npixels.is_some() {
            self.duplicate_param = Some("npixels");
        }
        self.npixels = Some(npixels);
        self
    }

    /// Take half-width and pixel count from a resolved frame.
    pub fn frame(mut self, frame: Frame<T>) -> Self {
        if self.num_rhalfs.is_some() || self.npixels.is_some() {
            self.duplicate_param = Some("frame");
        }
        self.num_rhalfs = Some(frame.num_rhalfs);
        self.npixels = Some(frame.npixels);
        self
    }

    /// Set the units of the returned values.
    pub fn pixel_units(mut self, units: PixelUnits) -> Self {
        if self.pixel_units.is_some() {
            self.duplicate_param = Some("pixel_units");
        }
        self.pixel_units = Some(units);
        self
    }

    /// Enable or disable range culling.
    pub fn cull_out_of_range(mut self, enabled: bool) -> Self {
        if self.cull_out_of_range.is_some() {
            self.duplicate_param = Some("cull_out_of_range");
        }
        self.cull_out_of_range = Some(enabled);
        self
    }

    /// Set the number of sources deposited per pass (Streaming only).
    pub fn chunk_size(mut self, size: usize) -> Self {
        if self.chunk_size.is_some() {
            self.duplicate_param = Some("chunk_size");
        }
        self.chunk_size = Some(size);
        self
    }

    /// Include diagnostics in the output.
    pub fn return_diagnostics(mut self) -> Self {
        self.return_diagnostics = Some(true);
        self
    }

    // ==========================
    // Development Options
    // ==========================

    /// Set a custom deposition pass (only for dev)
    #[doc(hidden)]
    pub fn custom_deposit_pass(mut self, pass: DepositPassFn<T>) -> Self {
        self.custom_deposit_pass = Some(pass);
        self
    }

    /// Set a custom neighbour-search pass (only for dev)
    #[doc(hidden)]
    pub fn custom_neighbor_pass(mut self, pass: NeighborPassFn<T>) -> Self {
        self.custom_neighbor_pass = Some(pass);
        self
    }

    /// Set parallel execution hint (only for dev)
    #[doc(hidden)]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }
}

/// Trait for transitioning from a generic builder to an execution builder.
pub trait SmoothingAdapter<T: Float> {
    /// The output execution builder.
    type Output;

    /// Convert a generic [`SmoothingBuilder`] into a specialized execution builder.
    fn convert(builder: SmoothingBuilder<T>) -> Self::Output;
}

/// Marker for in-memory batch processing.
#[derive(Debug, Clone, Copy)]
pub struct Batch;

impl<T: Float> SmoothingAdapter<T> for Batch {
    type Output = BatchSmoothingBuilder<T>;

    fn convert(builder: SmoothingBuilder<T>) -> Self::Output {
        let mut result = BatchSmoothingBuilder::default();

        if let Some(r) = builder.num_rhalfs {
            result.num_rhalfs = r;
        }
        if let Some(n) = builder.npixels {
            result.npixels = n;
        }
        if let Some(units) = builder.pixel_units {
            result.units = units;
        }
        if let Some(cull) = builder.cull_out_of_range {
            result.cull_out_of_range = cull;
        }
        if let Some(rd) = builder.return_diagnostics {
            result.return_diagnostics = rd;
        }
        if builder.chunk_size.is_some() {
            result.deferred_error = Some(SmoothingError::UnsupportedFeature {
                adapter: "Batch",
                feature: "chunk_size",
            });
        }

        // ======================================
        // DEV
        // ======================================
        if let Some(dp) = builder.custom_deposit_pass {
            result.custom_deposit_pass = Some(dp);
        }
        if let Some(np) = builder.custom_neighbor_pass {
            result.custom_neighbor_pass = Some(np);
        }
        if let Some(p) = builder.parallel {
            result.parallel = Some(p);
        }

        result.duplicate_param = builder.duplicate_param;

        result
    }
}

/// Marker for chunked streaming processing.
#[derive(Debug, Clone, Copy)]
pub struct Streaming;

impl<T: Float> SmoothingAdapter<T> for Streaming {
    type Output = StreamingSmoothingBuilder<T>;

    fn convert(builder: SmoothingBuilder<T>) -> Self::Output {
        let mut result = StreamingSmoothingBuilder::default();

        if let Some(chunk_size) = builder.chunk_size {
            result.chunk_size = chunk_size;
        }
        if let Some(r) = builder.num_rhalfs {
            result.num_rhalfs = r;
        }
        if let Some(n) = builder.npixels {
            result.npixels = n;
        }
        if let Some(units) = builder.pixel_units {
            result.units = units;
        }
        if let Some(cull) = builder.cull_out_of_range {
            result.cull_out_of_range = cull;
        }
        if let Some(rd) = builder.return_diagnostics {
            result.return_diagnostics = rd;
        }

        // ======================================
        // DEV
        // ======================================
        if let Some(dp) = builder.custom_deposit_pass {
            result.custom_deposit_pass = Some(dp);
        }
        if let Some(p) = builder.parallel {
            result.parallel = Some(p);
        }
        result.duplicate_param = builder.duplicate_param;

        result
    }
}
