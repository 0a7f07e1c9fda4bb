//! Tests for the coordinate to pixel mapping.
//!
//! ## Test Organization
//!
//! 1. **Anchors** - Centre and domain edges
//! 2. **Ordering** - Monotonicity and unclipped results
//! 3. **Edge Cases** - Odd pixel counts, non-finite inputs

use sphmap::prelude::*;

// ============================================================================
// Anchor Tests
// ============================================================================

/// Test the centre of the domain.
///
/// Verifies index(0) = floor(n / 2) for even and odd pixel counts.
#[test]
fn test_pixel_index_center() {
    assert_eq!(rhalfs_to_pixels(0.0_f64, 256, 7.5), 128);
    assert_eq!(rhalfs_to_pixels(0.0_f64, 5, 1.0), 2);
    assert_eq!(rhalfs_to_pixels(0.0_f64, 1, 1.0), 0);
}

/// Test the domain edges.
///
/// Verifies index(R) = n and index(-R) = 0.
#[test]
fn test_pixel_index_edges() {
    for &n in &[4_usize, 5, 64, 255] {
        assert_eq!(rhalfs_to_pixels(1.0_f64, n, 1.0), n as i64);
        assert_eq!(rhalfs_to_pixels(-1.0_f64, n, 1.0), 0);
    }
    assert_eq!(rhalfs_to_pixels(7.5_f64, 256, 7.5), 256);
    assert_eq!(rhalfs_to_pixels(-7.5_f64, 256, 7.5), 0);
}

/// Test values at pixel boundaries inside the domain.
#[test]
fn test_pixel_index_interior() {
    // n = 4, R = 1: pixel edges at -1, -0.5, 0, 0.5, 1
    assert_eq!(rhalfs_to_pixels(-0.75_f64, 4, 1.0), 0);
    assert_eq!(rhalfs_to_pixels(-0.5_f64, 4, 1.0), 1);
    assert_eq!(rhalfs_to_pixels(0.25_f64, 4, 1.0), 2);
    assert_eq!(rhalfs_to_pixels(0.5_f64, 4, 1.0), 3);
}

// ============================================================================
// Ordering Tests
// ============================================================================

/// Test that the mapping is monotone non-decreasing.
#[test]
fn test_pixel_index_monotone() {
    let mut previous = i64::MIN;
    for k in -400..=400 {
        let r = k as f64 / 100.0;
        let idx = rhalfs_to_pixels(r, 37, 2.5);
        assert!(idx >= previous, "index decreased at r = {}", r);
        previous = idx;
    }
}

/// Test that results outside the grid are not clipped.
#[test]
fn test_pixel_index_unclipped() {
    assert_eq!(rhalfs_to_pixels(-2.0_f64, 4, 1.0), -2);
    assert_eq!(rhalfs_to_pixels(3.0_f64, 4, 1.0), 8);
}

// ============================================================================
// Edge Case Tests
// ============================================================================

/// Test that odd pixel counts keep the half-pixel offset.
///
/// With n = 5 and R = 1 the centre pixel spans [-0.2, 0.2).
#[test]
fn test_pixel_index_odd_count() {
    assert_eq!(rhalfs_to_pixels(-0.19_f64, 5, 1.0), 2);
    assert_eq!(rhalfs_to_pixels(0.19_f64, 5, 1.0), 2);
    assert_eq!(rhalfs_to_pixels(0.21_f64, 5, 1.0), 3);
    assert_eq!(rhalfs_to_pixels(-0.21_f64, 5, 1.0), 1);
}

/// Test non-finite coordinates.
///
/// NaN maps below every pixel and infinities saturate.
#[test]
fn test_pixel_index_non_finite() {
    assert_eq!(rhalfs_to_pixels(f64::NAN, 8, 1.0), i64::MIN);
    assert_eq!(rhalfs_to_pixels(f64::INFINITY, 8, 1.0), i64::MAX);
    assert_eq!(rhalfs_to_pixels(f64::NEG_INFINITY, 8, 1.0), i64::MIN);
}
