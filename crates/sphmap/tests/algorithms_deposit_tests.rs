//! Tests for the kernel accumulator.
//!
//! These tests drive `accumulate` directly on caller-built buffers, the way
//! existing image pipelines call it:
//! - Single sources on small grids with hand-checked windows
//! - Sources outside the domain and on its boundary
//! - Linearity in the weights and conservation of the deposited weight
//!
//! ## Test Organization
//!
//! 1. **Single Source** - Central source, symmetry, support
//! 2. **Domain Boundary** - Out-of-support and clipped sources
//! 3. **Linearity** - Weight scaling, superposition, empty inputs
//! 4. **Conservation** - Deposited weight on a fine grid

use approx::{assert_abs_diff_eq, assert_relative_eq};

use sphmap::prelude::*;

// Stride-ny meshed grid with caller-chosen pixel centers.
fn meshed(centers: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = centers.len();
    let mut x = vec![0.0; n * n];
    let mut y = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            x[i * n + j] = centers[j];
            y[i * n + j] = centers[i];
        }
    }
    (x, y)
}

// One source at (x0, y0) on a 5 x 5 grid with spacing 0.5 and R = 1.
fn single_source_on_unit_grid(x0: f64, y0: f64, weight: f64, hsml: f64) -> Vec<f64> {
    let (xg, yg) = meshed(&[-1.0, -0.5, 0.0, 0.5, 1.0]);
    let mut z = vec![0.0; 25];
    accumulate(&xg, &yg, &mut z, 5, 5, &[x0], &[y0], &[weight], &[hsml], 1.0);
    z
}

// ============================================================================
// Single Source Tests
// ============================================================================

/// Test a single source at the centre of a symmetric grid.
///
/// Verifies the central cell holds the kernel at r = 0, that axis-adjacent
/// cells are equal, that diagonal cells are equal and smaller, and that the
/// corners receive nothing.
#[test]
fn test_central_source_symmetry() {
    let z = single_source_on_unit_grid(0.0, 0.0, 1.0, 0.2);
    let h = 0.56_f64;

    let center = 1.0 * (40.0 / (7.0 * core::f64::consts::PI * h * h)) * 1.0;
    assert_relative_eq!(z[2 * 5 + 2], center, max_relative = 1e-14);
    assert_eq!(z[2 * 5 + 2], CubicSpline::evaluate(0.0, 2.8 * 0.2));

    // Axis-adjacent at r = 0.5 < h
    let axis = [z[5 + 2], z[3 * 5 + 2], z[2 * 5 + 1], z[2 * 5 + 3]];
    assert!(axis[0] > 0.0);
    for &v in &axis {
        assert_eq!(v, axis[0]);
    }

    // Diagonal at r = 0.707 > h
    let diagonal = [z[5 + 1], z[5 + 3], z[3 * 5 + 1], z[3 * 5 + 3]];
    for &v in &diagonal {
        assert_eq!(v, diagonal[0]);
        assert!(v < axis[0]);
    }

    // Corners are outside the window
    for &n in &[0, 4, 20, 24] {
        assert_eq!(z[n], 0.0);
    }
}

/// Test that only the window around the source is touched.
///
/// With h = 0.56 the window spans rows and columns 1..=3.
#[test]
fn test_window_extent() {
    let z = single_source_on_unit_grid(0.0, 0.0, 1.0, 0.2);
    for i in 0..5 {
        for j in 0..5 {
            let inside = (1..=3).contains(&i) && (1..=3).contains(&j);
            if !inside {
                assert_eq!(z[i * 5 + j], 0.0, "cell ({}, {}) was touched", i, j);
            }
        }
    }
}

/// Test that rows follow y and columns follow x.
#[test]
fn test_axis_pairing() {
    let grid = PixelGrid::new(8, 1.0_f64).unwrap();
    let mut z = grid.zeros();
    // Source in the upper-left quadrant: negative x, positive y
    accumulate(
        grid.x(),
        grid.y(),
        &mut z,
        8,
        8,
        &[-0.625],
        &[0.625],
        &[1.0],
        &[0.05],
        1.0,
    );

    // Column 1 (x = -0.625), row 6 (y = 0.625)
    let peak = z
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |acc, (n, &v)| if v > acc.1 { (n, v) } else { acc });
    assert_eq!(peak.0, grid.index(6, 1));
}

// ============================================================================
// Domain Boundary Tests
// ============================================================================

/// Test a source whose support lies outside the domain.
///
/// Verifies the image stays zero.
#[test]
fn test_out_of_support_source() {
    let z = single_source_on_unit_grid(5.0, 5.0, 1.0, 0.1);
    assert!(z.iter().all(|&v| v == 0.0));
}

/// Test sources with a NaN smoothing length or position.
///
/// Verifies their windows are empty, so no cell (including cell 0) is touched.
#[test]
fn test_nan_source_deposits_nothing() {
    let z = single_source_on_unit_grid(0.9, 0.9, 1.0, f64::NAN);
    assert!(z.iter().all(|&v| v == 0.0));

    let z = single_source_on_unit_grid(f64::NAN, 0.0, 1.0, 0.2);
    assert!(z.iter().all(|&v| v == 0.0));
}

/// Test clipping at the left edge of the domain.
///
/// Verifies that only column 0 can receive weight and that nothing panics.
#[test]
fn test_boundary_clipping() {
    let grid = PixelGrid::new(4, 1.0_f64).unwrap();
    let mut z = grid.zeros();
    accumulate(
        grid.x(),
        grid.y(),
        &mut z,
        4,
        4,
        &[-1.0],
        &[0.0],
        &[1.0],
        &[0.1],
        1.0,
    );

    for i in 0..4 {
        for j in 1..4 {
            assert_eq!(z[grid.index(i, j)], 0.0);
        }
    }
}

/// Test clipping with a support larger than the whole domain.
///
/// Verifies every cell is visited and none out of bounds.
#[test]
fn test_support_covers_domain() {
    let grid = PixelGrid::new(6, 1.0_f64).unwrap();
    let mut z = grid.zeros();
    accumulate(
        grid.x(),
        grid.y(),
        &mut z,
        6,
        6,
        &[0.0],
        &[0.0],
        &[1.0],
        &[2.0],
        1.0,
    );
    assert!(z.iter().all(|&v| v > 0.0));
}

// ============================================================================
// Linearity Tests
// ============================================================================

/// Test linearity in the weight.
///
/// Verifies doubling the weight doubles the image exactly.
#[test]
fn test_weight_linearity() {
    let once = single_source_on_unit_grid(0.0, 0.0, 1.0, 0.2);
    let twice = single_source_on_unit_grid(0.0, 0.0, 2.0, 0.2);
    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(*b, 2.0 * *a);
    }
}

/// Test that a zero weight leaves the image unchanged.
#[test]
fn test_zero_weight() {
    let z = single_source_on_unit_grid(0.0, 0.0, 0.0, 0.2);
    assert!(z.iter().all(|&v| v == 0.0));
}

/// Test that the accumulator adds into the existing buffer.
#[test]
fn test_accumulates_into_existing_values() {
    let (xg, yg) = meshed(&[-1.0, -0.5, 0.0, 0.5, 1.0]);
    let mut z = vec![1.5; 25];
    accumulate(&xg, &yg, &mut z, 5, 5, &[0.0], &[0.0], &[1.0], &[0.2], 1.0);

    let fresh = single_source_on_unit_grid(0.0, 0.0, 1.0, 0.2);
    for (a, b) in z.iter().zip(&fresh) {
        assert_eq!(*a, 1.5 + *b);
    }
}

/// Test superposition of two sources.
#[test]
fn test_superposition() {
    let (xg, yg) = meshed(&[-1.0, -0.5, 0.0, 0.5, 1.0]);
    let mut both = vec![0.0; 25];
    accumulate(
        &xg,
        &yg,
        &mut both,
        5,
        5,
        &[-0.5, 0.5],
        &[0.0, 0.25],
        &[1.0, 3.0],
        &[0.3, 0.2],
        1.0,
    );

    let a = single_source_on_unit_grid(-0.5, 0.0, 1.0, 0.3);
    let b = single_source_on_unit_grid(0.5, 0.25, 3.0, 0.2);
    for n in 0..25 {
        assert_abs_diff_eq!(both[n], a[n] + b[n], epsilon = 1e-12);
    }
}

/// Test an empty source list.
///
/// Verifies the buffer keeps its initial contents.
#[test]
fn test_empty_sources() {
    let (xg, yg) = meshed(&[-1.0, -0.5, 0.0, 0.5, 1.0]);
    let mut z = vec![0.0; 25];
    accumulate(&xg, &yg, &mut z, 5, 5, &[], &[], &[], &[], 1.0);
    assert!(z.iter().all(|&v| v == 0.0));

    let mut seeded = vec![7.0; 25];
    accumulate(&xg, &yg, &mut seeded, 5, 5, &[], &[], &[], &[], 1.0);
    assert!(seeded.iter().all(|&v| v == 7.0));
}

// ============================================================================
// Conservation Tests
// ============================================================================

/// Test conservation of the deposited weight.
///
/// A source well resolved by the grid and inside the domain deposits its
/// weight: sum(Z) * pixel_area is close to the source weight.
#[test]
fn test_weight_conservation() {
    let grid = PixelGrid::new(201, 1.0_f64).unwrap();
    let mut z = grid.zeros();
    accumulate(
        grid.x(),
        grid.y(),
        &mut z,
        201,
        201,
        &[0.1],
        &[-0.05],
        &[2.5],
        &[0.1],
        1.0,
    );

    let deposited: f64 = z.iter().sum::<f64>() * grid.pixel_area();
    assert_relative_eq!(deposited, 2.5, max_relative = 1e-2);
}

/// Test single-precision accumulation.
#[test]
fn test_accumulate_f32() {
    let grid = PixelGrid::new(16, 1.0_f32).unwrap();
    let mut z = grid.zeros();
    accumulate(
        grid.x(),
        grid.y(),
        &mut z,
        16,
        16,
        &[0.0_f32],
        &[0.0],
        &[1.0],
        &[0.1],
        1.0,
    );
    assert!(z.iter().all(|v| v.is_finite()));
    assert!(z.iter().any(|&v| v > 0.0));
}
