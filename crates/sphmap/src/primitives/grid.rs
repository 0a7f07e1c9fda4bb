//! Pixel grids and frame sizing.
//!
//! ## Purpose
//!
//! This module builds the sample-coordinate buffers (X, Y) that the
//! accumulator reads, and resolves how many pixels an image needs for a
//! requested physical extent.
//!
//! ## Design notes
//!
//! * **Layout**: Cell `(i, j)` (row `i` along y, column `j` along x) lives at
//!   linear index `i * ny + j`. The row stride is `ny`, not `nx`; this is the
//!   layout existing callers hand to the accumulator and it is kept verbatim.
//! * **Square grids**: The stride-`ny` layout aliases cells whenever
//!   `nx != ny`, so grids built here are always square.
//! * **Centers**: Pixel edges follow `linspace(-R, R, n + 1)` and samples sit
//!   at the midpoint of consecutive edges.
//!
//! ## Key concepts
//!
//! * **Half-width (`num_rhalfs`)**: The domain is `[-R, R]` on both axes, in the
//!   units of the source coordinates (typically stellar half-mass radii).
//! * **Frame**: A resolved `(num_rhalfs, npixels)` pair where `2 R` spans an
//!   integer number of pixels of the requested pixel scale.
//!
//! ## Invariants
//!
//! * `x().len() == y().len() == npixels * npixels`.
//! * Centers are strictly increasing along both axes.
//!
//! ## Non-goals
//!
//! * This module does not deposit anything; see the deposition algorithm.
//! * This module does not support adaptive or non-uniform grids.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::SmoothingError;

// ============================================================================
// Pixel Grid
// ============================================================================

/// Largest number of cells a grid may hold: one `f64` per cell must stay
/// within `isize::MAX` bytes.
pub const MAX_CELLS: usize = isize::MAX as usize / 8;

/// Number of cells in an `npixels` x `npixels` grid, or `None` when it is
/// empty or larger than [`MAX_CELLS`].
#[inline]
pub fn cell_count(npixels: usize) -> Option<usize> {
    npixels
        .checked_mul(npixels)
        .filter(|&cells| cells > 0 && cells <= MAX_CELLS)
}

/// Square pixel grid with meshed sample coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid<T> {
    npixels: usize,
    num_rhalfs: T,
    x_centers: Vec<T>,
    y_centers: Vec<T>,
    x: Vec<T>,
    y: Vec<T>,
}

impl<T: Float> PixelGrid<T> {
    /// Build an `npixels` x `npixels` grid covering `[-num_rhalfs, num_rhalfs]²`.
    pub fn new(npixels: usize, num_rhalfs: T) -> Result<Self, SmoothingError> {
        let Some(cells) = cell_count(npixels) else {
            return Err(SmoothingError::InvalidPixelCount(npixels));
        };
        if !num_rhalfs.is_finite() || num_rhalfs <= T::zero() {
            return Err(SmoothingError::InvalidHalfWidth(
                num_rhalfs.to_f64().unwrap_or(f64::NAN),
            ));
        }

        let edges = linspace(-num_rhalfs, num_rhalfs, npixels + 1);
        let centers = midpoints(&edges);

        let nx = npixels;
        let ny = npixels;
        let mut x = vec![T::zero(); cells];
        let mut y = vec![T::zero(); cells];
        for i in 0..ny {
            for j in 0..nx {
                let n = i * ny + j;
                x[n] = centers[j];
                y[n] = centers[i];
            }
        }

        Ok(Self {
            npixels,
            num_rhalfs,
            x_centers: centers.clone(),
            y_centers: centers,
            x,
            y,
        })
    }

    /// Build the grid described by a resolved frame.
    pub fn from_frame(frame: &Frame<T>) -> Result<Self, SmoothingError> {
        Self::new(frame.npixels, frame.num_rhalfs)
    }

    /// Number of columns (x-axis).
    #[inline]
    pub fn nx(&self) -> usize {
        self.npixels
    }

    /// Number of rows (y-axis).
    #[inline]
    pub fn ny(&self) -> usize {
        self.npixels
    }

    /// Domain half-width.
    #[inline]
    pub fn num_rhalfs(&self) -> T {
        self.num_rhalfs
    }

    /// Pixel side length in the units of the source coordinates.
    #[inline]
    pub fn pixel_size(&self) -> T {
        let two = T::one() + T::one();
        two * self.num_rhalfs / T::from(self.npixels).unwrap_or_else(T::one)
    }

    /// Pixel area in squared source units.
    #[inline]
    pub fn pixel_area(&self) -> T {
        let side = self.pixel_size();
        side * side
    }

    /// Pixel centers along the x-axis.
    pub fn x_centers(&self) -> &[T] {
        &self.x_centers
    }

    /// Pixel centers along the y-axis.
    pub fn y_centers(&self) -> &[T] {
        &self.y_centers
    }

    /// Meshed x sample coordinates (stride-`ny` layout).
    pub fn x(&self) -> &[T] {
        &self.x
    }

    /// Meshed y sample coordinates (stride-`ny` layout).
    pub fn y(&self) -> &[T] {
        &self.y
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Grids always hold at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Linear index of cell `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.ny() + j
    }

    /// A zeroed output buffer matching this grid.
    pub fn zeros(&self) -> Vec<T> {
        vec![T::zero(); self.len()]
    }
}

/// `n` evenly spaced samples over `[start, stop]`, endpoints included.
pub fn linspace<T: Float>(start: T, stop: T, n: usize) -> Vec<T> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / T::from(n - 1).unwrap_or_else(T::one);
            let mut out: Vec<T> = (0..n)
                .map(|k| start + T::from(k).unwrap_or_else(T::zero) * step)
                .collect();
            out[n - 1] = stop;
            out
        }
    }
}

/// Midpoints of consecutive edges.
pub fn midpoints<T: Float>(edges: &[T]) -> Vec<T> {
    let half = T::from(0.5).unwrap_or_else(T::zero);
    edges.windows(2).map(|w| half * (w[0] + w[1])).collect()
}

// ============================================================================
// Frame Sizing
// ============================================================================

/// How the image extent is requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameRequest<T> {
    /// Fixed number of pixels per side.
    Pixels(usize),

    /// Half-width in units of the reference scale length.
    HalfWidth(T),

    /// Half-width given directly in simulation units.
    PhysicalHalfWidth(T),
}

/// Resolved image extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<T> {
    /// Half-width in scale-length units; `2 * num_rhalfs` spans `npixels` pixels exactly.
    pub num_rhalfs: T,

    /// Pixels per side.
    pub npixels: usize,
}

impl<T: Float> Frame<T> {
    /// Frame with an explicit half-width and pixel count.
    pub fn new(num_rhalfs: T, npixels: usize) -> Self {
        Self {
            num_rhalfs,
            npixels,
        }
    }

    /// Resolve a size request against a reference scale length and a pixel
    /// scale (simulation units per pixel).
    ///
    /// The half-width is snapped so that `2 * num_rhalfs * scale_length` is
    /// exactly `npixels * pixel_scale`.
    pub fn resolve(
        request: FrameRequest<T>,
        scale_length: T,
        pixel_scale: T,
    ) -> Result<Self, SmoothingError> {
        if !scale_length.is_finite() || scale_length <= T::zero() {
            return Err(SmoothingError::InvalidScaleLength(
                scale_length.to_f64().unwrap_or(f64::NAN),
            ));
        }
        if !pixel_scale.is_finite() || pixel_scale <= T::zero() {
            return Err(SmoothingError::InvalidPixelScale(
                pixel_scale.to_f64().unwrap_or(f64::NAN),
            ));
        }

        let two = T::one() + T::one();
        let npixels = match request {
            FrameRequest::Pixels(n) => n,
            FrameRequest::HalfWidth(r) => {
                check_half_width(r)?;
                ceil_to_usize(two * r * scale_length / pixel_scale)
            }
            FrameRequest::PhysicalHalfWidth(l) => {
                check_half_width(l)?;
                ceil_to_usize(two * l / pixel_scale)
            }
        };

        if cell_count(npixels).is_none() {
            return Err(SmoothingError::InvalidPixelCount(npixels));
        }

        let count = T::from(npixels).unwrap_or_else(T::one);
        Ok(Self {
            num_rhalfs: count * pixel_scale / (two * scale_length),
            npixels,
        })
    }

    /// Pixel side length in scale-length units.
    pub fn pixel_size(&self) -> T {
        let two = T::one() + T::one();
        two * self.num_rhalfs / T::from(self.npixels).unwrap_or_else(T::one)
    }
}

fn check_half_width<T: Float>(r: T) -> Result<(), SmoothingError> {
    if !r.is_finite() || r <= T::zero() {
        return Err(SmoothingError::InvalidHalfWidth(
            r.to_f64().unwrap_or(f64::NAN),
        ));
    }
    Ok(())
}

fn ceil_to_usize<T: Float>(v: T) -> usize {
    v.ceil().to_usize().unwrap_or(0)
}
