//! Output types for rendered images.
//!
//! ## Purpose
//!
//! This module defines [`SmoothedImage`], the result of a render, and the
//! [`PixelUnits`] it is expressed in.
//!
//! ## Design notes
//!
//! * **Layout**: `values` keeps the accumulator's stride-`ny` layout; for the
//!   square grids the adapters build this is plain row-major order.
//! * **Units**: The accumulator produces weight per unit area. Per-pixel
//!   images are that value times the pixel area, applied once at the end.
//! * **Ergonomics**: Implements `Display` for a quick look at an image.
//!
//! ## Invariants
//!
//! * `values.len() == nx * ny`.
//!
//! ## Non-goals
//!
//! * This module does not write image files.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::fmt::{Debug, Display, Formatter, Result};
use num_traits::Float;

// Internal dependencies
use crate::evaluation::diagnostics::ImageDiagnostics;

// ============================================================================
// Pixel Units
// ============================================================================

/// Units of the returned pixel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelUnits {
    /// Weight per unit area (squared scale lengths).
    #[default]
    PerArea,

    /// Weight per pixel (per-area value times the pixel area).
    PerPixel,
}

impl PixelUnits {
    /// Factor that turns an accumulator value into these units.
    #[inline]
    pub fn factor<T: Float>(&self, pixel_area: T) -> T {
        match self {
            PixelUnits::PerArea => T::one(),
            PixelUnits::PerPixel => pixel_area,
        }
    }

    /// Factor that turns a pixel value in these units into deposited weight.
    #[inline]
    pub fn cell_measure<T: Float>(&self, pixel_area: T) -> T {
        match self {
            PixelUnits::PerArea => pixel_area,
            PixelUnits::PerPixel => T::one(),
        }
    }

    /// Human-readable unit label.
    pub fn label(&self) -> &'static str {
        match self {
            PixelUnits::PerArea => "weight/area",
            PixelUnits::PerPixel => "weight/pixel",
        }
    }
}

// ============================================================================
// Result Structure
// ============================================================================

/// A rendered image.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedImage<T> {
    /// Pixel values, cell `(i, j)` at `i * ny + j`.
    pub values: Vec<T>,

    /// Number of columns.
    pub nx: usize,

    /// Number of rows.
    pub ny: usize,

    /// Domain half-width.
    pub num_rhalfs: T,

    /// Pixel side length in scale-length units.
    pub pixel_size: T,

    /// Units of `values`.
    pub units: PixelUnits,

    /// Sources that reached the deposition step.
    pub sources_used: usize,

    /// Diagnostics, when requested.
    pub diagnostics: Option<ImageDiagnostics<T>>,
}

impl<T: Float> SmoothedImage<T> {
    /// Value of cell `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.values[i * self.ny + j]
    }

    /// Cells of row `i`.
    pub fn row(&self, i: usize) -> &[T] {
        let start = i * self.ny;
        &self.values[start..start + self.nx]
    }

    /// Sum of all pixel values.
    pub fn total(&self) -> T {
        self.values.iter().fold(T::zero(), |acc, &v| acc + v)
    }

    /// Largest pixel value (zero for an image with no finite pixels).
    pub fn max(&self) -> T {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<T>, v| Some(acc.map_or(v, |m| m.max(v))))
            .unwrap_or_else(T::zero)
    }

    /// Total weight recovered from the image.
    pub fn deposited_weight(&self) -> T {
        let area = self.pixel_size * self.pixel_size;
        self.total() * self.units.cell_measure(area)
    }

    /// Check if diagnostics were computed.
    pub fn has_diagnostics(&self) -> bool {
        self.diagnostics.is_some()
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl<T: Float + Display + Debug> Display for SmoothedImage<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "  Pixels:      {} x {}", self.nx, self.ny)?;
        writeln!(f, "  Half-width:  {}", self.num_rhalfs)?;
        writeln!(f, "  Pixel size:  {}", self.pixel_size)?;
        writeln!(f, "  Units:       {}", self.units.label())?;
        writeln!(f, "  Sources:     {}", self.sources_used)?;
        writeln!(f)?;

        if let Some(diag) = &self.diagnostics {
            writeln!(f, "{}", diag)?;
        }

        // Corner of the image; large images only show the first 8x8 block.
        const SHOWN: usize = 8;
        let rows = self.ny.min(SHOWN);
        let cols = self.nx.min(SHOWN);

        writeln!(f, "Image ({}x{} shown):", rows, cols)?;
        for i in 0..rows {
            for j in 0..cols {
                write!(f, " {:>12.6}", self.get(i, j))?;
            }
            if cols < self.nx {
                write!(f, " ...")?;
            }
            writeln!(f)?;
        }
        if rows < self.ny {
            writeln!(f, "{:>13}", "...")?;
        }

        Ok(())
    }
}
