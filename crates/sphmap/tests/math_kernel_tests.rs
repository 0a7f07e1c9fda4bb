//! Tests for the 2-D cubic-spline kernel.
//!
//! These tests verify the kernel properties the accumulator relies on:
//! - Normalization of the 2-D kernel over its support disc
//! - Compact support and continuity at the branch points
//! - Scaling with the support radius
//!
//! ## Test Organization
//!
//! 1. **Reference Values** - Central value and breakpoints
//! 2. **Normalization** - Radial integral over the support
//! 3. **Shape** - Compact support, monotonicity, continuity
//! 4. **Scaling** - Dependence on the support radius

use approx::{assert_abs_diff_eq, assert_relative_eq};
use core::f64::consts::PI;

use sphmap::prelude::*;

// ============================================================================
// Reference Values
// ============================================================================

/// Test the central value of the kernel.
///
/// Verifies W(0, 1) = 40 / (7 pi), the 2-D normalization constant.
#[test]
fn test_kernel_central_value() {
    assert_relative_eq!(
        CubicSpline::evaluate(0.0_f64, 1.0),
        40.0 / (7.0 * PI),
        max_relative = 1e-14
    );
}

/// Test the value on the support boundary.
///
/// Verifies W(h, h) = 0.
#[test]
fn test_kernel_zero_at_support_radius() {
    assert_eq!(CubicSpline::evaluate(1.0_f64, 1.0), 0.0);
    assert_eq!(CubicSpline::evaluate(2.5_f64, 2.5), 0.0);
}

/// Test the breakpoint between the two polynomial pieces.
///
/// Verifies that both branches agree at r = h/2.
#[test]
fn test_kernel_breakpoint_branches_agree() {
    let x = 0.5_f64;
    let inner = 1.0 - 6.0 * x * x + 6.0 * x * x * x;
    let outer = 2.0 * (1.0 - x) * (1.0 - x) * (1.0 - x);
    assert_abs_diff_eq!(inner, outer, epsilon = 1e-12);

    let norm = 40.0 / (7.0 * PI);
    assert_abs_diff_eq!(CubicSpline::evaluate(0.5_f64, 1.0), norm * outer, epsilon = 1e-12);
}

/// Test the support radius derived from the smoothing length.
///
/// Verifies h = 2.8 * hsml.
#[test]
fn test_kernel_support_radius() {
    assert_relative_eq!(CubicSpline::support_radius(0.2_f64), 0.56, max_relative = 1e-14);
    assert_eq!(
        CubicSpline::evaluate_sml(0.1_f64, 0.2),
        CubicSpline::evaluate(0.1_f64, CubicSpline::support_radius(0.2))
    );
}

// ============================================================================
// Normalization Tests
// ============================================================================

/// Test that the kernel integrates to one over its support disc.
///
/// Integrates W(r, h) 2 pi r dr with composite Simpson's rule.
#[test]
fn test_kernel_normalization() {
    for &h in &[0.3_f64, 1.0, 4.0] {
        let n = 20_000;
        let dr = h / n as f64;
        let f = |r: f64| CubicSpline::evaluate(r, h) * 2.0 * PI * r;

        let mut sum = f(0.0) + f(h);
        for k in 1..n {
            let coeff = if k % 2 == 1 { 4.0 } else { 2.0 };
            sum += coeff * f(k as f64 * dr);
        }
        let integral = sum * dr / 3.0;

        assert_abs_diff_eq!(integral, 1.0, epsilon = 1e-9);
    }
}

// ============================================================================
// Shape Tests
// ============================================================================

/// Test compact support.
///
/// Verifies the kernel vanishes for every r > h.
#[test]
fn test_kernel_compact_support() {
    for &r in &[1.0000001_f64, 1.5, 3.0, 1e6] {
        assert_eq!(CubicSpline::evaluate(r, 1.0), 0.0);
    }
}

/// Test that the kernel is non-negative and non-increasing on [0, h].
#[test]
fn test_kernel_monotone_non_negative() {
    let mut previous = f64::INFINITY;
    for k in 0..=1000 {
        let r = k as f64 / 1000.0;
        let w = CubicSpline::evaluate(r, 1.0);
        assert!(w >= 0.0, "W({}) = {} is negative", r, w);
        assert!(w <= previous + 1e-15, "W is increasing at r = {}", r);
        previous = w;
    }
}

/// Test continuity at both branch points.
#[test]
fn test_kernel_continuity() {
    let eps = 1e-9;
    for &edge in &[0.5_f64, 1.0] {
        let below = CubicSpline::evaluate(edge - eps, 1.0);
        let above = CubicSpline::evaluate(edge + eps, 1.0);
        assert_abs_diff_eq!(below, above, epsilon = 1e-7);
    }
}

// ============================================================================
// Scaling Tests
// ============================================================================

/// Test scaling with the support radius.
///
/// Verifies W(s r, s h) = W(r, h) / s^2.
#[test]
fn test_kernel_scaling() {
    for &s in &[0.25_f64, 2.0, 10.0] {
        for &r in &[0.0_f64, 0.2, 0.5, 0.8] {
            assert_relative_eq!(
                CubicSpline::evaluate(s * r, s),
                CubicSpline::evaluate(r, 1.0) / (s * s),
                max_relative = 1e-12
            );
        }
    }
}

/// Test single-precision evaluation.
#[test]
fn test_kernel_f32() {
    let w = CubicSpline::evaluate(0.0_f32, 1.0_f32);
    assert_relative_eq!(w, (40.0 / (7.0 * PI)) as f32, max_relative = 1e-6);
}
