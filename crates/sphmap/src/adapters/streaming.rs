//! Streaming adapter for source sets delivered in chunks.
//!
//! ## Purpose
//!
//! This module renders one image from sources that arrive in consecutive
//! chunks, e.g. particles read file by file from a snapshot too large to hold
//! in memory at once.
//!
//! ## Design notes
//!
//! * **Persistent image**: Every chunk is deposited into the same buffer.
//! * **Order**: Chunks are deposited in the order they are given, each in
//!   source order, so the result is bit-identical to one batch render of the
//!   concatenated sources.
//! * **Chunk size**: Chunks longer than `chunk_size` are deposited in pieces
//!   of at most `chunk_size` sources, which bounds the per-pass working copy.
//!
//! ## Key concepts
//!
//! * **Finalize**: Units are applied and diagnostics computed once, after the
//!   last chunk; the processor then starts over with a blank image.
//!
//! ## Invariants
//!
//! * `chunk_size >= 1`.
//! * Each chunk's arrays have equal lengths.
//!
//! ## Non-goals
//!
//! * This adapter does not prepare particles (no neighbour search across chunks).
//! * This adapter does not reorder chunks.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::mem::replace;
use num_traits::Float;

// Internal dependencies
use crate::engine::executor::{DepositPassFn, SmoothingConfig, SmoothingExecutor};
use crate::engine::output::{PixelUnits, SmoothedImage};
use crate::engine::validator::Validator;
use crate::evaluation::diagnostics::SourceTally;
use crate::primitives::errors::SmoothingError;
use crate::primitives::grid::{Frame, PixelGrid};

/// Default number of sources deposited per pass.
pub const DEFAULT_CHUNK_SIZE: usize = 65_536;

// ============================================================================
// Streaming Smoothing Builder
// ============================================================================

/// Builder for the streaming processor.
#[derive(Debug, Clone)]
pub struct StreamingSmoothingBuilder<T: Float> {
    /// Maximum sources deposited per pass
    pub chunk_size: usize,

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

    /// Parallel execution hint.
    #[doc(hidden)]
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub(crate) duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for StreamingSmoothingBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> StreamingSmoothingBuilder<T> {
    /// Create a new streaming builder with default parameters.
    fn new() -> Self {
        let defaults = SmoothingConfig::default();
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            num_rhalfs: defaults.num_rhalfs,
            npixels: defaults.npixels,
            units: defaults.units,
            cull_out_of_range: defaults.cull_out_of_range,
            return_diagnostics: defaults.return_diagnostics,
            deferred_error: None,
            custom_deposit_pass: None,
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

    /// Enable returning diagnostics in the finalized image.
    pub fn return_diagnostics(mut self, enabled: bool) -> Self {
        self.return_diagnostics = enabled;
        self
    }

    // ========================================================================
    // Streaming-Specific Setters
    // ========================================================================

    /// Set the maximum number of sources deposited per pass.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
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

    // ========================================================================
    // Build Method
    // ========================================================================

    /// Build the streaming processor.
    pub fn build(self) -> Result<StreamingSmoothing<T>, SmoothingError> {
        if let Some(err) = self.deferred_error {
            return Err(err);
        }

        Validator::validate_no_duplicates(self.duplicate_param)?;
        Validator::validate_chunk_size(self.chunk_size, 1)?;
        Validator::validate_half_width(self.num_rhalfs)?;
        Validator::validate_pixel_count(self.npixels)?;

        let config = SmoothingConfig {
            num_rhalfs: self.num_rhalfs,
            npixels: self.npixels,
            units: self.units,
            cull_out_of_range: self.cull_out_of_range,
            return_diagnostics: self.return_diagnostics,
            custom_deposit_pass: self.custom_deposit_pass,
            custom_neighbor_pass: None,
            parallel: self.parallel.unwrap_or(false),
        };

        let executor = SmoothingExecutor::from_config(config)?;
        let image = executor.blank();

        Ok(StreamingSmoothing {
            executor,
            chunk_size: self.chunk_size,
            image,
            tally: SourceTally::new(),
            chunks: 0,
        })
    }
}

// ============================================================================
// Streaming Smoothing Processor
// ============================================================================

/// Streaming processor accumulating chunks into one image.
#[derive(Debug, Clone)]
pub struct StreamingSmoothing<T: Float> {
    executor: SmoothingExecutor<T>,
    chunk_size: usize,
    image: Vec<T>,
    tally: SourceTally<T>,
    chunks: usize,
}

impl<T: Float> StreamingSmoothing<T> {
    /// The pixel grid the image is rendered on.
    pub fn grid(&self) -> &PixelGrid<T> {
        self.executor.grid()
    }

    /// Number of chunks deposited since the last reset.
    pub fn chunks_processed(&self) -> usize {
        self.chunks
    }

    /// Number of sources offered since the last reset.
    pub fn sources_seen(&self) -> usize {
        self.tally.total
    }

    /// Deposit one chunk of sources into the persistent image.
    pub fn process_chunk(
        &mut self,
        x: &[T],
        y: &[T],
        hsml: &[T],
        weights: Option<&[T]>,
    ) -> Result<(), SmoothingError> {
        Validator::validate_sources(x, y, hsml, weights)?;

        let n = x.len();
        let mut start = 0;
        while start < n {
            let end = (start + self.chunk_size).min(n);
            let piece = self.executor.deposit(
                &mut self.image,
                &x[start..end],
                &y[start..end],
                &hsml[start..end],
                weights.map(|w| &w[start..end]),
            );
            self.tally.merge(&piece);
            start = end;
        }

        self.chunks += 1;
        tracing::trace!(
            chunk = self.chunks,
            sources = n,
            total = self.tally.total,
            "chunk processed"
        );
        Ok(())
    }

    /// Finish the image and reset the processor for the next one.
    pub fn finalize(&mut self) -> Result<SmoothedImage<T>, SmoothingError> {
        let values = replace(&mut self.image, self.executor.blank());
        let tally = replace(&mut self.tally, SourceTally::new());
        let chunks = replace(&mut self.chunks, 0);

        tracing::debug!(
            chunks,
            kept = tally.kept(),
            culled = tally.culled,
            "streamed image finalized"
        );

        Ok(self.executor.finish(values, tally))
    }

    /// Discard everything deposited so far.
    pub fn reset(&mut self) {
        self.image = self.executor.blank();
        self.tally = SourceTally::new();
        self.chunks = 0;
    }
}
