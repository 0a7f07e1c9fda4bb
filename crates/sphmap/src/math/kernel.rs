//! Smoothing kernel for 2-D adaptive deposition.
//!
//! ## Purpose
//!
//! This module provides the normalized, radially symmetric, compactly
//! supported cubic-spline kernel that spreads each source's weight over the
//! pixels within its support radius.
//!
//! ## Design notes
//!
//! * **Shape**: Monaghan (1992) cubic spline written over `[0, h]` as in
//!   Springel (2001), eq. (A.1).
//! * **Normalization**: The 2-D constant `40 / (7 pi)`; the 3-D constant
//!   `8 / pi` must never be substituted.
//! * **Reproducibility**: Every product is evaluated in the same order as the
//!   reference C routine so `f64` results match it bit for bit.
//!
//! ## Key concepts
//!
//! * **Support radius `h`**: The kernel is identically zero for `r > h`.
//! * **Smoothing length `hsml`**: Per-source length scale; `h = 2.8 * hsml`.
//!
//! ## Invariants
//!
//! * `W(r, h) >= 0` for `0 <= r`.
//! * `W` is continuous at `r = h/2` and `r = h`.
//! * `integral W(r, h) 2 pi r dr over [0, h] = 1`.
//!
//! ## Non-goals
//!
//! * Negative distances are not meaningful. The inner branch happens to be
//!   evaluated for them; no clamping or reflection is applied.
//! * This module does not choose smoothing lengths.

// External dependencies
use core::f64::consts::PI;
use num_traits::Float;

// ============================================================================
// Kernel Constants
// ============================================================================

/// Ratio between the compact-support radius and the supplied smoothing length.
pub const SUPPORT_FACTOR: f64 = 2.8;

/// 2-D normalization `40 / (7 pi)`: the value of `W(0, 1)`.
pub const NORMALIZATION_2D: f64 = 4.0 * 10.0 / (7.0 * PI);

// Breakpoint between the inner and outer polynomial pieces (in units of h).
const INNER_EDGE: f64 = 0.5;

// ============================================================================
// Cubic Spline Kernel
// ============================================================================

/// Normalized 2-D cubic-spline kernel.
///
/// With `x = r / h`:
///
/// ```text
/// W_raw(x) = 1 - 6x^2 + 6x^3      0 <= x <= 1/2
///          = 2 (1 - x)^3          1/2 < x <= 1
///          = 0                    x > 1
///
/// W(r, h)  = 40 / (7 pi h^2) * W_raw(r / h)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CubicSpline;

impl CubicSpline {
    /// Compact-support radius for a smoothing length: `2.8 * hsml`.
    #[inline]
    pub fn support_radius<T: Float>(hsml: T) -> T {
        constant::<T>(SUPPORT_FACTOR) * hsml
    }

    /// Unnormalized shape `W_raw(x)` at `x = r / h`.
    #[inline]
    pub fn shape<T: Float>(x: T) -> T {
        let one = T::one();
        if x <= constant(INNER_EDGE) {
            let six = constant::<T>(6.0);
            one - six * x * x + six * x * x * x
        } else if x <= one {
            let two = constant::<T>(2.0);
            two * (one - x) * (one - x) * (one - x)
        } else {
            T::zero()
        }
    }

    /// Evaluate `W(r, h)` for distance `r` and support radius `h`.
    #[inline]
    pub fn evaluate<T: Float>(r: T, h: T) -> T {
        let x = r / h;
        let retval = Self::shape(x);
        constant::<T>(4.0 * 10.0) / (constant::<T>(7.0) * constant::<T>(PI) * h * h) * retval
    }

    /// Evaluate the kernel for a smoothing length rather than a support radius.
    #[inline]
    pub fn evaluate_sml<T: Float>(r: T, hsml: T) -> T {
        Self::evaluate(r, Self::support_radius(hsml))
    }
}

#[inline]
fn constant<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}
