//! Physical coordinate to pixel index mapping.
//!
//! ## Purpose
//!
//! This module converts a coordinate along one axis (in the units of the
//! domain half-width) into an integer pixel index.
//!
//! ## Design notes
//!
//! * **Formula**: `floor(npix / 2 + r * npix / (2 * num_rhalfs))`, with
//!   `npix / 2` taken in real arithmetic so odd pixel counts get the
//!   half-pixel offset.
//! * **Unclipped**: Results outside `[0, npix - 1]` are returned as-is; the
//!   caller clips.
//! * **Axes**: x uses `nx`, y uses `ny`.
//!
//! ## Invariants
//!
//! * `index(0) = floor(npix / 2)`, `index(R) = npix`, `index(-R) = 0`.
//! * Monotone non-decreasing in `r`.
//!
//! ## Non-goals
//!
//! * This module does not clip indices against the grid.

// External dependencies
use num_traits::Float;

/// Map a coordinate `r` to an (unclipped) pixel index.
///
/// Values beyond the `i64` range saturate. NaN maps to `i64::MIN`, so a
/// window with a NaN bound clips to nothing.
#[inline]
pub fn rhalfs_to_pixels<T: Float>(r: T, npix: usize, num_rhalfs: T) -> i64 {
    let n = T::from(npix).unwrap_or_else(T::nan);
    let two = T::one() + T::one();
    let value = (n / two + r * n / (two * num_rhalfs)).floor();

    match value.to_i64() {
        Some(index) => index,
        None if value > T::zero() => i64::MAX,
        None => i64::MIN,
    }
}
