//! Tests for the prelude module.
//!
//! These tests verify that the prelude is a one-stop import for building a
//! processor, rendering sources and preparing particles.

use sphmap::prelude::*;

// ============================================================================
// Import Verification Tests
// ============================================================================

/// Test that the builder, both adapters and the error type are reachable.
#[test]
fn test_prelude_imports() {
    let batch: Result<BatchSmoothing<f64>, SmoothingError> =
        Smoothing::new().npixels(16).adapter(Batch).build();
    assert!(batch.is_ok());

    let streaming: Result<StreamingSmoothing<f64>, SmoothingError> =
        Smoothing::new().npixels(16).adapter(Streaming).build();
    assert!(streaming.is_ok());
}

/// Test that unit and projection variants are usable unqualified.
#[test]
fn test_prelude_enums() {
    let _ = Smoothing::<f64>::new().pixel_units(PerArea);
    let _ = Smoothing::<f64>::new().pixel_units(PerPixel);
    let _ = ParticleFrame::new([0.0_f64; 3], 1.0).projection(Projection::EdgeOn([0.0, 1.0, 0.0]));
}

/// Test a complete workflow with prelude imports only.
#[test]
fn test_prelude_workflow() {
    let frame = Frame::resolve(FrameRequest::Pixels(16), 1.0_f64, 0.125).unwrap();
    let processor = Smoothing::new()
        .frame(frame)
        .return_diagnostics()
        .adapter(Batch)
        .build()
        .unwrap();

    let image = processor
        .render(&[0.0, 0.25], &[0.0, -0.25], &[0.1, 0.1], None)
        .unwrap();
    let diag: &ImageDiagnostics<f64> = image.diagnostics.as_ref().unwrap();
    assert_eq!(diag.sources_total, 2);
    assert!(image.max() <= CubicSpline::evaluate_sml(0.0, 0.1) * 2.0);
    assert_eq!(rhalfs_to_pixels(0.0, 16, frame.num_rhalfs), 8);
    assert!(wrap_periodic(0.75_f64, 1.0) < 0.0);
}
