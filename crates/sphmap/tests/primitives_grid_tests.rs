//! Tests for pixel grids and frame sizing.
//!
//! ## Test Organization
//!
//! 1. **Grid Construction** - Centers, meshing, layout
//! 2. **Grid Validation** - Invalid pixel counts and half-widths
//! 3. **Frame Resolution** - Pixel-scale snapping for each request kind

use approx::assert_relative_eq;

use sphmap::prelude::*;

// ============================================================================
// Grid Construction Tests
// ============================================================================

/// Test pixel centers of a small grid.
///
/// Verifies centers sit halfway between the edges of linspace(-R, R, n + 1).
#[test]
fn test_grid_centers() {
    let grid = PixelGrid::new(4, 1.0_f64).unwrap();
    assert_eq!(grid.x_centers(), &[-0.75, -0.25, 0.25, 0.75]);
    assert_eq!(grid.y_centers(), grid.x_centers());
    assert_eq!(grid.nx(), 4);
    assert_eq!(grid.ny(), 4);
    assert_eq!(grid.len(), 16);
    assert!(!grid.is_empty());
}

/// Test the meshed sample coordinates.
///
/// Verifies X varies along columns and Y along rows with stride ny.
#[test]
fn test_grid_meshing() {
    let grid = PixelGrid::new(4, 1.0_f64).unwrap();
    let n = grid.index(1, 2);
    assert_eq!(n, 6);
    assert_eq!(grid.x()[n], 0.25);
    assert_eq!(grid.y()[n], -0.25);

    for i in 0..4 {
        for j in 0..4 {
            assert_eq!(grid.x()[grid.index(i, j)], grid.x_centers()[j]);
            assert_eq!(grid.y()[grid.index(i, j)], grid.y_centers()[i]);
        }
    }
}

/// Test pixel size and area.
#[test]
fn test_grid_pixel_size() {
    let grid = PixelGrid::new(300, 7.5_f64).unwrap();
    assert_relative_eq!(grid.pixel_size(), 0.05, max_relative = 1e-14);
    assert_relative_eq!(grid.pixel_area(), 0.0025, max_relative = 1e-14);
    assert_eq!(grid.num_rhalfs(), 7.5);
}

/// Test that centers are strictly increasing and centred on the domain.
#[test]
fn test_grid_centers_increasing() {
    let grid = PixelGrid::new(101, 2.0_f64).unwrap();
    let c = grid.x_centers();
    assert!(c.windows(2).all(|w| w[1] > w[0]));
    assert_relative_eq!(c[50], 0.0, epsilon = 1e-12);
    assert_relative_eq!(c[0], -c[100], epsilon = 1e-12);
}

/// Test the zeroed output buffer.
#[test]
fn test_grid_zeros() {
    let grid = PixelGrid::new(7, 1.0_f64).unwrap();
    let z = grid.zeros();
    assert_eq!(z.len(), 49);
    assert!(z.iter().all(|&v| v == 0.0));
}

/// Test the one-pixel grid.
#[test]
fn test_grid_single_pixel() {
    let grid = PixelGrid::new(1, 3.0_f64).unwrap();
    assert_eq!(grid.x_centers(), &[0.0]);
    assert_eq!(grid.pixel_size(), 6.0);
}

// ============================================================================
// Grid Validation Tests
// ============================================================================

/// Test rejection of an empty grid.
#[test]
fn test_grid_rejects_zero_pixels() {
    assert_eq!(
        PixelGrid::new(0, 1.0_f64).err(),
        Some(SmoothingError::InvalidPixelCount(0))
    );
}

/// Test rejection of pixel counts whose cell count cannot be addressed.
///
/// Verifies an error is returned instead of an overflow or allocation failure.
#[test]
fn test_grid_rejects_oversized_pixel_count() {
    let huge = 1_usize << (usize::BITS / 2);
    assert_eq!(
        PixelGrid::new(huge, 1.0_f64).err(),
        Some(SmoothingError::InvalidPixelCount(huge))
    );
    assert_eq!(
        PixelGrid::new(usize::MAX, 1.0_f64).err(),
        Some(SmoothingError::InvalidPixelCount(usize::MAX))
    );
    assert!(
        Frame::resolve(FrameRequest::HalfWidth(1.0e30_f64), 1.0, 1.0e-30).is_err()
    );
}

/// Test rejection of invalid half-widths.
#[test]
fn test_grid_rejects_bad_half_width() {
    assert_eq!(
        PixelGrid::new(4, -1.0_f64).err(),
        Some(SmoothingError::InvalidHalfWidth(-1.0))
    );
    assert_eq!(
        PixelGrid::new(4, 0.0_f64).err(),
        Some(SmoothingError::InvalidHalfWidth(0.0))
    );
    assert!(PixelGrid::new(4, f64::INFINITY).is_err());
}

// ============================================================================
// Frame Resolution Tests
// ============================================================================

/// Test a half-width request in scale-length units.
///
/// Verifies the pixel count is rounded up and the half-width snapped to it.
#[test]
fn test_frame_half_width_request() {
    let frame = Frame::resolve(FrameRequest::HalfWidth(7.5_f64), 1.0, 0.25).unwrap();
    assert_eq!(frame.npixels, 60);
    assert_eq!(frame.num_rhalfs, 7.5);

    let snapped = Frame::resolve(FrameRequest::HalfWidth(7.4_f64), 1.0, 0.25).unwrap();
    assert_eq!(snapped.npixels, 60);
    assert_relative_eq!(snapped.num_rhalfs, 7.5, max_relative = 1e-14);
}

/// Test a fixed pixel-count request.
#[test]
fn test_frame_pixels_request() {
    let frame = Frame::resolve(FrameRequest::Pixels(64), 2.0_f64, 0.5).unwrap();
    assert_eq!(frame.npixels, 64);
    assert_relative_eq!(frame.num_rhalfs, 8.0, max_relative = 1e-14);
    assert_relative_eq!(frame.pixel_size() * 2.0, 0.5, max_relative = 1e-14);
}

/// Test a physical half-width request.
#[test]
fn test_frame_physical_request() {
    let frame = Frame::resolve(FrameRequest::PhysicalHalfWidth(10.0_f64), 2.0, 0.5).unwrap();
    assert_eq!(frame.npixels, 40);
    assert_relative_eq!(frame.num_rhalfs, 5.0, max_relative = 1e-14);
}

/// Test invalid frame parameters.
#[test]
fn test_frame_rejects_invalid_parameters() {
    assert_eq!(
        Frame::resolve(FrameRequest::Pixels(64), 0.0_f64, 0.5).err(),
        Some(SmoothingError::InvalidScaleLength(0.0))
    );
    assert_eq!(
        Frame::resolve(FrameRequest::Pixels(64), 1.0_f64, -0.5).err(),
        Some(SmoothingError::InvalidPixelScale(-0.5))
    );
    assert_eq!(
        Frame::resolve(FrameRequest::Pixels(0), 1.0_f64, 0.5).err(),
        Some(SmoothingError::InvalidPixelCount(0))
    );
    assert_eq!(
        Frame::resolve(FrameRequest::HalfWidth(-1.0_f64), 1.0, 0.5).err(),
        Some(SmoothingError::InvalidHalfWidth(-1.0))
    );
}

/// Test building a grid from a resolved frame.
#[test]
fn test_grid_from_frame() {
    let frame = Frame::new(2.0_f64, 10);
    let grid = PixelGrid::from_frame(&frame).unwrap();
    assert_eq!(grid.nx(), 10);
    assert_eq!(grid.num_rhalfs(), 2.0);
    assert_relative_eq!(grid.pixel_size(), frame.pixel_size(), max_relative = 1e-14);
}
