//! Diagnostics for deposited images.
//!
//! ## Purpose
//!
//! This module reports how much of the offered weight ended up on the grid,
//! how many sources were dropped or fell off the grid, and where the image
//! peaks. It is the first place to look when an image comes out too faint.
//!
//! ## Design notes
//!
//! * **Two parts**: [`SourceTally`] is gathered while sources are deposited
//!   (and merged across streaming chunks); [`ImageDiagnostics`] is computed
//!   once from the tally and the final pixel values.
//! * **Cell measure**: Deposited weight is `sum Z * measure`, where the
//!   measure is the pixel area for per-area images and `1` for per-pixel ones.
//!
//! ## Key concepts
//!
//! * **Conservation ratio**: `deposited / input`. It is close to 1 for sources
//!   well inside the domain with smoothing lengths spanning several pixels;
//!   edge losses and under-resolved kernels pull it away from 1.
//!
//! ## Invariants
//!
//! * `sources_culled + sources_outside <= sources_total`.
//! * `nonzero_pixels + non_finite_pixels <= pixel count`.
//!
//! ## Non-goals
//!
//! * This module does not correct the image for losses.

// External dependencies
use core::fmt::{Display, Formatter, Result};
use num_traits::Float;

// ============================================================================
// Source Tally
// ============================================================================

/// Running source bookkeeping for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceTally<T> {
    /// Sources offered.
    pub total: usize,

    /// Sources dropped by the range test.
    pub culled: usize,

    /// Kept sources whose pixel window was empty.
    pub outside: usize,

    /// Sum of the kept sources' weights.
    pub input_weight: T,
}

impl<T: Float> Default for SourceTally<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> SourceTally<T> {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self {
            total: 0,
            culled: 0,
            outside: 0,
            input_weight: T::zero(),
        }
    }

    /// Add another tally (e.g. from the next streaming chunk).
    pub fn merge(&mut self, other: &Self) {
        self.total += other.total;
        self.culled += other.culled;
        self.outside += other.outside;
        self.input_weight = self.input_weight + other.input_weight;
    }

    /// Number of sources that reached the deposition step.
    pub fn kept(&self) -> usize {
        self.total - self.culled
    }
}

// ============================================================================
// Image Diagnostics
// ============================================================================

/// Summary statistics for a deposited image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDiagnostics<T> {
    /// Sum of the kept sources' weights.
    pub input_weight: T,

    /// Weight recovered from the image.
    pub deposited_weight: T,

    /// `deposited_weight / input_weight` (NaN when no weight was offered).
    pub conservation_ratio: T,

    /// Sources offered.
    pub sources_total: usize,

    /// Sources dropped by the range test.
    pub sources_culled: usize,

    /// Kept sources whose pixel window was empty.
    pub sources_outside: usize,

    /// Largest pixel value.
    pub peak_value: T,

    /// Row and column of the first pixel holding the peak.
    pub peak_index: (usize, usize),

    /// Pixels with a non-zero value.
    pub nonzero_pixels: usize,

    /// Pixels holding NaN or infinity.
    pub non_finite_pixels: usize,
}

impl<T: Float> ImageDiagnostics<T> {
    /// Compute diagnostics from the final pixel values.
    ///
    /// `values` uses the stride-`ny` layout; `cell_measure` converts a pixel
    /// value into deposited weight.
    pub fn compute(values: &[T], ny: usize, cell_measure: T, tally: &SourceTally<T>) -> Self {
        let mut sum = T::zero();
        let mut peak_value = T::neg_infinity();
        let mut peak_at = 0;
        let mut nonzero_pixels = 0;
        let mut non_finite_pixels = 0;

        for (n, &v) in values.iter().enumerate() {
            if !v.is_finite() {
                non_finite_pixels += 1;
                continue;
            }
            if v != T::zero() {
                nonzero_pixels += 1;
            }
            if v > peak_value {
                peak_value = v;
                peak_at = n;
            }
            sum = sum + v;
        }

        // No finite pixel at all.
        if peak_value == T::neg_infinity() {
            peak_value = T::zero();
        }

        let deposited_weight = sum * cell_measure;
        let conservation_ratio = if tally.input_weight != T::zero() {
            deposited_weight / tally.input_weight
        } else {
            T::nan()
        };
        let stride = ny.max(1);

        Self {
            input_weight: tally.input_weight,
            deposited_weight,
            conservation_ratio,
            sources_total: tally.total,
            sources_culled: tally.culled,
            sources_outside: tally.outside,
            peak_value,
            peak_index: (peak_at / stride, peak_at % stride),
            nonzero_pixels,
            non_finite_pixels,
        }
    }

    /// True when every pixel is finite.
    pub fn is_finite(&self) -> bool {
        self.non_finite_pixels == 0
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl<T: Float + Display> Display for ImageDiagnostics<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Image Diagnostics:")?;
        writeln!(f, "  Input weight:     {:.6}", self.input_weight)?;
        writeln!(f, "  Deposited weight: {:.6}", self.deposited_weight)?;
        writeln!(f, "  Conservation:     {:.6}", self.conservation_ratio)?;
        writeln!(
            f,
            "  Sources:          {} total, {} culled, {} off-grid",
            self.sources_total, self.sources_culled, self.sources_outside
        )?;
        writeln!(
            f,
            "  Peak:             {:.6} at ({}, {})",
            self.peak_value, self.peak_index.0, self.peak_index.1
        )?;
        writeln!(f, "  Non-zero pixels:  {}", self.nonzero_pixels)?;

        if self.non_finite_pixels > 0 {
            writeln!(f, "  Non-finite:       {}", self.non_finite_pixels)?;
        }

        Ok(())
    }
}
