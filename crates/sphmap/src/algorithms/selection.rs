//! Source selection before deposition.
//!
//! ## Purpose
//!
//! This module gathers the sources that take part in a render: it fills in
//! unit weights when none are given and drops sources far outside the domain.
//!
//! ## Design notes
//!
//! * **Loose test**: A source is kept when `|x| < R` **or** `|y| < R`. Sources
//!   beyond the domain along both axes are dropped even if their support would
//!   reach a corner pixel; this matches the imaging pipeline's behaviour.
//! * **Stable**: Kept sources retain their relative order, so deposition sums
//!   are unchanged by culling apart from the dropped terms.
//!
//! ## Non-goals
//!
//! * This module does not check input lengths or values; the validator does.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

/// Whether a source at `(x, y)` passes the range test for half-width `num_rhalfs`.
#[inline]
pub fn in_range<T: Float>(x: T, y: T, num_rhalfs: T) -> bool {
    x.abs() < num_rhalfs || y.abs() < num_rhalfs
}

/// Owned, culled copy of the sources for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedSources<T> {
    /// Source x-coordinates.
    pub x: Vec<T>,

    /// Source y-coordinates.
    pub y: Vec<T>,

    /// Smoothing lengths.
    pub hsml: Vec<T>,

    /// Weights (unit weights when none were supplied).
    pub weights: Vec<T>,

    /// Number of sources offered before culling.
    pub total: usize,

    /// Number of sources dropped by the range test.
    pub culled: usize,
}

impl<T: Float> SelectedSources<T> {
    /// Collect the sources that take part in a render.
    pub fn gather(
        x: &[T],
        y: &[T],
        hsml: &[T],
        weights: Option<&[T]>,
        num_rhalfs: T,
        cull: bool,
    ) -> Self {
        let total = x.len();
        let mut out = Self {
            x: Vec::with_capacity(total),
            y: Vec::with_capacity(total),
            hsml: Vec::with_capacity(total),
            weights: Vec::with_capacity(total),
            total,
            culled: 0,
        };

        for k in 0..total {
            if cull && !in_range(x[k], y[k], num_rhalfs) {
                out.culled += 1;
                continue;
            }
            out.x.push(x[k]);
            out.y.push(y[k]);
            out.hsml.push(hsml[k]);
            out.weights.push(weights.map_or(T::one(), |w| w[k]));
        }

        out
    }

    /// Number of kept sources.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when every source was culled (or none were given).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Sum of the kept weights.
    pub fn total_weight(&self) -> T {
        self.weights.iter().fold(T::zero(), |acc, &w| acc + w)
    }
}
