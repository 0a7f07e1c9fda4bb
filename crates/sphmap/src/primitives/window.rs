//! Pixel windows for per-source deposition.
//!
//! A window is the inclusive rectangle of grid cells a single source may
//! touch, already clipped against the grid extents.

// Inclusive, clipped pixel bounds `[imin, imax] x [jmin, jmax]`.
//
// Rows (`i`) run along the y-axis and are bounded by `ny`; columns (`j`) run
// along the x-axis and are bounded by `nx`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelWindow {
    // First row (inclusive).
    pub imin: usize,

    // Last row (inclusive).
    pub imax: usize,

    // First column (inclusive).
    pub jmin: usize,

    // Last column (inclusive).
    pub jmax: usize,
}

impl PixelWindow {
    // Clip raw (unclipped) pixel bounds against an `nx` x `ny` grid.
    //
    // Returns `None` when nothing survives the clip.
    #[inline]
    pub fn clip(
        row_lo: i64,
        row_hi: i64,
        col_lo: i64,
        col_hi: i64,
        nx: usize,
        ny: usize,
    ) -> Option<Self> {
        if nx == 0 || ny == 0 {
            return None;
        }

        let last_row = (ny - 1) as i64;
        let last_col = (nx - 1) as i64;

        let imin = row_lo.max(0);
        let imax = row_hi.min(last_row);
        let jmin = col_lo.max(0);
        let jmax = col_hi.min(last_col);

        if imax < imin || jmax < jmin {
            return None;
        }

        Some(Self {
            imin: imin as usize,
            imax: imax as usize,
            jmin: jmin as usize,
            jmax: jmax as usize,
        })
    }

    // Number of rows covered.
    #[inline]
    pub fn rows(&self) -> usize {
        self.imax - self.imin + 1
    }

    // Number of columns covered.
    #[inline]
    pub fn cols(&self) -> usize {
        self.jmax - self.jmin + 1
    }

    // Number of cells visited by the deposition loop.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    // Smallest and largest linear index touched, using row stride `ny`.
    #[inline]
    pub fn linear_span(&self, ny: usize) -> (usize, usize) {
        (self.imin * ny + self.jmin, self.imax * ny + self.jmax)
    }
}
