//! Tests for the builder API and the execution adapters.
//!
//! These tests exercise the public surface end to end:
//! - Builder defaults, duplicate detection and adapter constraints
//! - Input validation on the checked render paths
//! - Units, diagnostics and multi-band renders
//! - Streaming against batch rendering
//! - Particle preparation and rendering
//!
//! ## Test Organization
//!
//! 1. **Builder** - Defaults, duplicates, adapter conversion
//! 2. **Validation** - Source arrays and parameters
//! 3. **Batch Rendering** - Units, culling, diagnostics, bands
//! 4. **Streaming** - Chunked rendering and resets
//! 5. **Particles** - Neighbour search and preparation
//! 6. **Logging** - Rendering under an installed subscriber

use approx::{assert_abs_diff_eq, assert_relative_eq};

use sphmap::prelude::*;

fn ring_sources(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    let mut hsml = Vec::with_capacity(n);
    let mut w = Vec::with_capacity(n);
    for k in 0..n {
        let t = k as f64 * 0.37;
        let r = 0.2 + 0.05 * (k % 13) as f64;
        x.push(r * t.cos());
        y.push(r * t.sin());
        hsml.push(0.02 + 0.01 * (k % 5) as f64);
        w.push(1.0 + (k % 3) as f64);
    }
    (x, y, hsml, w)
}

// ============================================================================
// Builder Tests
// ============================================================================

/// Test the default geometry.
///
/// Verifies a 256 x 256 grid over a half-width of 7.5.
#[test]
fn test_builder_defaults() {
    let processor = Smoothing::<f64>::new().adapter(Batch).build().unwrap();
    let grid = processor.grid();
    assert_eq!(grid.nx(), 256);
    assert_eq!(grid.ny(), 256);
    assert_eq!(grid.num_rhalfs(), 7.5);
}

/// Test duplicate parameter detection.
#[test]
fn test_builder_duplicate_parameter() {
    let result = Smoothing::new()
        .num_rhalfs(1.0_f64)
        .num_rhalfs(2.0)
        .adapter(Batch)
        .build();
    assert_eq!(
        result.err(),
        Some(SmoothingError::DuplicateParameter {
            parameter: "num_rhalfs"
        })
    );

    let result = Smoothing::new()
        .npixels(16)
        .frame(Frame::new(1.0_f64, 32))
        .adapter(Streaming)
        .build();
    assert_eq!(
        result.err(),
        Some(SmoothingError::DuplicateParameter { parameter: "frame" })
    );
}

/// Test that a frame sets both geometry parameters.
#[test]
fn test_builder_frame() {
    let frame = Frame::resolve(FrameRequest::HalfWidth(2.0_f64), 1.0, 0.1).unwrap();
    let processor = Smoothing::new().frame(frame).adapter(Batch).build().unwrap();
    assert_eq!(processor.grid().nx(), frame.npixels);
    assert_eq!(processor.grid().num_rhalfs(), frame.num_rhalfs);
}

/// Test that the batch adapter rejects a chunk size.
#[test]
fn test_batch_rejects_chunk_size() {
    let result = Smoothing::<f64>::new().chunk_size(10).adapter(Batch).build();
    assert_eq!(
        result.err(),
        Some(SmoothingError::UnsupportedFeature {
            adapter: "Batch",
            feature: "chunk_size"
        })
    );
}

/// Test invalid geometry parameters.
#[test]
fn test_builder_invalid_geometry() {
    assert_eq!(
        Smoothing::<f64>::new().npixels(0).adapter(Batch).build().err(),
        Some(SmoothingError::InvalidPixelCount(0))
    );
    let huge = 1_usize << (usize::BITS / 2);
    assert_eq!(
        Smoothing::<f64>::new().npixels(huge).adapter(Batch).build().err(),
        Some(SmoothingError::InvalidPixelCount(huge))
    );
    assert_eq!(
        Smoothing::<f64>::new()
            .npixels(usize::MAX)
            .adapter(Streaming)
            .build()
            .err(),
        Some(SmoothingError::InvalidPixelCount(usize::MAX))
    );
    assert_eq!(
        Smoothing::new()
            .num_rhalfs(-1.0_f64)
            .adapter(Batch)
            .build()
            .err(),
        Some(SmoothingError::InvalidHalfWidth(-1.0))
    );
    assert_eq!(
        Smoothing::<f64>::new()
            .chunk_size(0)
            .adapter(Streaming)
            .build()
            .err(),
        Some(SmoothingError::InvalidChunkSize { got: 0, min: 1 })
    );
}

// ============================================================================
// Validation Tests
// ============================================================================

fn small_processor() -> BatchSmoothing<f64> {
    Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(8)
        .adapter(Batch)
        .build()
        .unwrap()
}

/// Test mismatched source arrays.
#[test]
fn test_render_mismatched_inputs() {
    let p = small_processor();
    assert_eq!(
        p.render(&[0.0, 0.1, 0.2], &[0.0, 0.1], &[0.1; 3], None).err(),
        Some(SmoothingError::MismatchedInputs {
            name: "y",
            expected: 3,
            got: 2
        })
    );
    assert_eq!(
        p.render(&[0.0], &[0.0], &[0.1], Some(&[1.0, 2.0][..])).err(),
        Some(SmoothingError::MismatchedInputs {
            name: "weights",
            expected: 1,
            got: 2
        })
    );
}

/// Test non-finite values and invalid smoothing lengths.
#[test]
fn test_render_invalid_values() {
    let p = small_processor();
    assert!(matches!(
        p.render(&[f64::NAN], &[0.0], &[0.1], None),
        Err(SmoothingError::InvalidNumericValue(_))
    ));
    assert!(matches!(
        p.render(&[0.0], &[0.0], &[0.1], Some(&[f64::INFINITY][..])),
        Err(SmoothingError::InvalidNumericValue(_))
    ));
    assert_eq!(
        p.render(&[0.0, 0.0], &[0.0, 0.0], &[0.1, 0.0], None).err(),
        Some(SmoothingError::InvalidSmoothingLength {
            index: 1,
            value: 0.0
        })
    );
    assert!(matches!(
        p.render(&[0.0], &[0.0], &[-0.1], None),
        Err(SmoothingError::InvalidSmoothingLength { index: 0, .. })
    ));
}

/// Test that an empty source set renders a zero image.
#[test]
fn test_render_empty_sources() {
    let p = small_processor();
    let image = p.render(&[], &[], &[], None).unwrap();
    assert_eq!(image.values.len(), 64);
    assert!(image.values.iter().all(|&v| v == 0.0));
    assert_eq!(image.sources_used, 0);
}

// ============================================================================
// Batch Rendering Tests
// ============================================================================

/// Test that the checked render matches the raw accumulator.
#[test]
fn test_render_matches_accumulate() {
    let (x, y, hsml, w) = ring_sources(50);
    let p = Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(32)
        .cull_out_of_range(false)
        .adapter(Batch)
        .build()
        .unwrap();
    let image = p.render(&x, &y, &hsml, Some(&w[..])).unwrap();

    let grid = PixelGrid::new(32, 1.0).unwrap();
    let mut z = grid.zeros();
    accumulate(grid.x(), grid.y(), &mut z, 32, 32, &x, &y, &w, &hsml, 1.0);

    assert_eq!(image.values, z);
    assert_eq!(image.sources_used, 50);
    assert_eq!(image.units, PerArea);
}

/// Test that unit weights are used when none are supplied.
#[test]
fn test_render_default_weights() {
    let (x, y, hsml, _) = ring_sources(20);
    let p = small_processor();
    let unweighted = p.render(&x, &y, &hsml, None).unwrap();
    let ones = vec![1.0; 20];
    let weighted = p.render(&x, &y, &hsml, Some(&ones[..])).unwrap();
    assert_eq!(unweighted.values, weighted.values);
}

/// Test per-pixel units.
///
/// Verifies per-pixel values are per-area values times the pixel area.
#[test]
fn test_render_per_pixel_units() {
    let (x, y, hsml, w) = ring_sources(30);
    let build = |units| {
        Smoothing::new()
            .num_rhalfs(1.0)
            .npixels(16)
            .pixel_units(units)
            .adapter(Batch)
            .build()
            .unwrap()
    };

    let per_area = build(PerArea).render(&x, &y, &hsml, Some(&w[..])).unwrap();
    let per_pixel = build(PerPixel).render(&x, &y, &hsml, Some(&w[..])).unwrap();
    let area = per_area.pixel_size * per_area.pixel_size;

    for (a, p) in per_area.values.iter().zip(&per_pixel.values) {
        assert_relative_eq!(*p, *a * area, max_relative = 1e-14);
    }
    assert_relative_eq!(
        per_area.deposited_weight(),
        per_pixel.deposited_weight(),
        max_relative = 1e-12
    );
}

/// Test culling of out-of-range sources.
///
/// A source with both coordinates outside the domain is dropped unless
/// culling is disabled.
#[test]
fn test_render_culling() {
    let x = [0.0, 1.05];
    let y = [0.0, 1.05];
    let hsml = [0.1, 0.2];

    let culling = Smoothing::new()
        .num_rhalfs(1.0_f64)
        .npixels(20)
        .return_diagnostics()
        .adapter(Batch)
        .build()
        .unwrap();
    let kept_all = Smoothing::new()
        .num_rhalfs(1.0_f64)
        .npixels(20)
        .cull_out_of_range(false)
        .return_diagnostics()
        .adapter(Batch)
        .build()
        .unwrap();

    let a = culling.render(&x, &y, &hsml, None).unwrap();
    let b = kept_all.render(&x, &y, &hsml, None).unwrap();

    assert_eq!(a.sources_used, 1);
    assert_eq!(b.sources_used, 2);
    assert_eq!(a.diagnostics.as_ref().unwrap().sources_culled, 1);
    assert!(b.total() > a.total());
    // The culled source still overlaps the corner of the domain.
    assert!(b.get(19, 19) > 0.0);
    assert_eq!(a.get(19, 19), 0.0);
}

/// Test the diagnostics of a well-resolved render.
#[test]
fn test_render_diagnostics() {
    let p = Smoothing::new()
        .num_rhalfs(1.0_f64)
        .npixels(128)
        .return_diagnostics()
        .adapter(Batch)
        .build()
        .unwrap();
    let image = p.render(&[0.0, 5.0], &[0.0, 5.0], &[0.1, 0.1], Some(&[3.0, 1.0][..])).unwrap();

    assert!(image.has_diagnostics());
    let diag = image.diagnostics.as_ref().unwrap();
    assert_eq!(diag.sources_total, 2);
    assert_eq!(diag.sources_culled, 1);
    assert_eq!(diag.sources_outside, 0);
    assert_eq!(diag.input_weight, 3.0);
    assert_relative_eq!(diag.conservation_ratio, 1.0, max_relative = 2e-2);
    assert_eq!(diag.peak_value, image.max());
    assert_eq!(diag.non_finite_pixels, 0);
    assert!(diag.is_finite());
    assert!(diag.nonzero_pixels > 0);

    let (pi, pj) = diag.peak_index;
    assert!((63..=64).contains(&pi) && (63..=64).contains(&pj));
}

/// Test that diagnostics are off by default.
#[test]
fn test_render_without_diagnostics() {
    let image = small_processor()
        .render(&[0.0], &[0.0], &[0.1], None)
        .unwrap();
    assert!(!image.has_diagnostics());
}

/// Test multi-band rendering.
///
/// Verifies each band equals a separate render with its own weights.
#[test]
fn test_render_bands() {
    let (x, y, hsml, w) = ring_sources(40);
    let v: Vec<f64> = w.iter().map(|wi| 2.0 * wi + 0.5).collect();
    let p = Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(24)
        .adapter(Batch)
        .build()
        .unwrap();

    let bands = p.render_bands(&x, &y, &hsml, &[&w[..], &v[..]]).unwrap();
    assert_eq!(bands.len(), 2);
    assert_eq!(bands[0].values, p.render(&x, &y, &hsml, Some(&w[..])).unwrap().values);
    assert_eq!(bands[1].values, p.render(&x, &y, &hsml, Some(&v[..])).unwrap().values);

    let short = vec![1.0; 3];
    assert!(matches!(
        p.render_bands(&x, &y, &hsml, &[&w[..], &short[..]]),
        Err(SmoothingError::MismatchedInputs { name: "weights", .. })
    ));
}

/// Test image accessors.
#[test]
fn test_image_accessors() {
    let image = small_processor()
        .render(&[-0.375], &[0.625], &[0.05], None)
        .unwrap();
    assert_eq!(image.nx, 8);
    assert_eq!(image.ny, 8);
    assert_eq!(image.row(6).len(), 8);
    assert_eq!(image.row(6)[2], image.get(6, 2));
    assert_eq!(image.max(), image.get(6, 2));
    assert_abs_diff_eq!(image.pixel_size, 0.25, epsilon = 1e-15);

    let text = format!("{}", image);
    assert!(text.contains("Summary"));
}

// ============================================================================
// Streaming Tests
// ============================================================================

/// Test that streaming equals batch rendering bit for bit.
#[test]
fn test_streaming_matches_batch() {
    let (x, y, hsml, w) = ring_sources(101);
    let batch = Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(40)
        .pixel_units(PerPixel)
        .adapter(Batch)
        .build()
        .unwrap()
        .render(&x, &y, &hsml, Some(&w[..]))
        .unwrap();

    let mut stream = Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(40)
        .pixel_units(PerPixel)
        .chunk_size(7)
        .adapter(Streaming)
        .build()
        .unwrap();

    for start in (0..101).step_by(30) {
        let end = (start + 30).min(101);
        stream
            .process_chunk(&x[start..end], &y[start..end], &hsml[start..end], Some(&w[start..end]))
            .unwrap();
    }
    assert_eq!(stream.chunks_processed(), 4);
    assert_eq!(stream.sources_seen(), 101);

    let streamed = stream.finalize().unwrap();
    assert_eq!(streamed.values, batch.values);
    assert_eq!(streamed.sources_used, batch.sources_used);
}

/// Test that finalize starts a new image.
#[test]
fn test_streaming_finalize_resets() {
    let mut stream = Smoothing::new()
        .num_rhalfs(1.0_f64)
        .npixels(8)
        .adapter(Streaming)
        .build()
        .unwrap();

    stream.process_chunk(&[0.0], &[0.0], &[0.1], None).unwrap();
    let first = stream.finalize().unwrap();
    assert!(first.total() > 0.0);
    assert_eq!(stream.chunks_processed(), 0);

    let empty = stream.finalize().unwrap();
    assert!(empty.values.iter().all(|&v| v == 0.0));
}

/// Test discarding a partial image.
#[test]
fn test_streaming_reset() {
    let mut stream = Smoothing::new()
        .num_rhalfs(1.0_f64)
        .npixels(8)
        .return_diagnostics()
        .adapter(Streaming)
        .build()
        .unwrap();

    stream.process_chunk(&[0.0], &[0.0], &[0.1], None).unwrap();
    stream.reset();
    assert_eq!(stream.sources_seen(), 0);

    let image = stream.finalize().unwrap();
    assert_eq!(image.total(), 0.0);
    assert_eq!(image.diagnostics.unwrap().sources_total, 0);
}

/// Test validation of streamed chunks.
#[test]
fn test_streaming_rejects_invalid_chunk() {
    let mut stream = Smoothing::new()
        .num_rhalfs(1.0_f64)
        .npixels(8)
        .adapter(Streaming)
        .build()
        .unwrap();
    assert!(matches!(
        stream.process_chunk(&[0.0, 1.0], &[0.0], &[0.1, 0.1], None),
        Err(SmoothingError::MismatchedInputs { name: "y", .. })
    ));
    assert_eq!(stream.chunks_processed(), 0);
}

// ============================================================================
// Particle Tests
// ============================================================================

fn cube_lattice(side: usize, spacing: f64) -> Vec<[f64; 3]> {
    let mut out = Vec::with_capacity(side * side * side);
    for i in 0..side {
        for j in 0..side {
            for k in 0..side {
                out.push([i as f64 * spacing, j as f64 * spacing, k as f64 * spacing]);
            }
        }
    }
    out
}

/// Test neighbour-search parameter validation.
#[test]
fn test_smoothing_lengths_validation() {
    let p = small_processor();
    let positions = cube_lattice(2, 1.0);

    assert_eq!(
        p.smoothing_lengths(&positions, 8).err(),
        Some(SmoothingError::InvalidNeighborCount {
            got: 8,
            available: 8
        })
    );
    assert_eq!(
        p.smoothing_lengths(&positions, 0).err(),
        Some(SmoothingError::InvalidNeighborCount {
            got: 0,
            available: 8
        })
    );
    assert_eq!(p.smoothing_lengths(&[], 1).err(), Some(SmoothingError::EmptyInput));
    assert!(matches!(
        p.smoothing_lengths(&[[0.0, f64::NAN, 0.0], [1.0, 1.0, 1.0]], 1),
        Err(SmoothingError::InvalidNumericValue(_))
    ));
}

/// Test smoothing lengths on a cubic lattice.
///
/// Every corner of a 2 x 2 x 2 cube has three edge neighbours, three face
/// diagonals and one body diagonal.
#[test]
fn test_smoothing_lengths_lattice() {
    let p = small_processor();
    let positions = cube_lattice(2, 1.0);

    let nearest = p.smoothing_lengths(&positions, 3).unwrap();
    assert!(nearest.iter().all(|&h| h == 1.0));

    let face = p.smoothing_lengths(&positions, 6).unwrap();
    for &h in &face {
        assert_relative_eq!(h, 2.0_f64.sqrt(), max_relative = 1e-14);
    }

    let body = p.smoothing_lengths(&positions, 7).unwrap();
    for &h in &body {
        assert_relative_eq!(h, 3.0_f64.sqrt(), max_relative = 1e-14);
    }
}

/// Test particle preparation.
///
/// Verifies the chain wrap, scale, neighbour search and projection.
#[test]
fn test_prepare_particles() {
    let p = small_processor();
    let positions = cube_lattice(3, 1.0);
    let frame = ParticleFrame::new([1.0, 1.0, 1.0], 2.0).projection(Projection::Yz);

    let prepared = p.prepare(&frame, &positions, 6).unwrap();
    assert_eq!(prepared.len(), 27);

    // Particle (i, j, k) = (0, 1, 2) sits at relative (-0.5, 0, 0.5)
    let idx = 1 * 3 + 2;
    assert_eq!(prepared.x[idx], 0.0);
    assert_eq!(prepared.y[idx], 0.5);

    // The central particle has six neighbours at 1.0, i.e. 0.5 scale lengths
    assert_eq!(prepared.hsml[13], 0.5);
}

/// Test the softening floor during preparation.
#[test]
fn test_prepare_applies_softening_floor() {
    let p = small_processor();
    let positions = cube_lattice(2, 0.01);
    let frame = ParticleFrame::new([0.0; 3], 1.0).softening(0.1);

    let prepared = p.prepare(&frame, &positions, 3).unwrap();
    for &h in &prepared.hsml {
        assert_relative_eq!(h, 0.28, max_relative = 1e-14);
    }
}

/// Test rendering prepared particles.
#[test]
fn test_render_particles() {
    let p = Smoothing::new()
        .num_rhalfs(4.0)
        .npixels(32)
        .return_diagnostics()
        .adapter(Batch)
        .build()
        .unwrap();
    let positions = cube_lattice(4, 0.5);
    let frame = ParticleFrame::new([0.75, 0.75, 0.75], 1.0).periodic(50.0);

    let image = p.render_particles(&frame, &positions, None, 8).unwrap();
    assert_eq!(image.sources_used, 64);
    assert!(image.total() > 0.0);
    assert_relative_eq!(
        image.diagnostics.unwrap().conservation_ratio,
        1.0,
        max_relative = 0.1
    );

    let degenerate = frame.projection(Projection::FaceOn([0.0, 0.0, 1.0]));
    assert_eq!(
        p.render_particles(&degenerate, &positions, None, 8).err(),
        Some(SmoothingError::DegenerateProjection("faceon"))
    );
}

// ============================================================================
// Logging Tests
// ============================================================================

/// Test that rendering works under an installed subscriber at trace level.
///
/// Exercises the debug and trace statements on the batch and streaming paths.
#[test]
fn test_render_with_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let (x, y, hsml, w) = ring_sources(50);
    let batch = Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(32)
        .return_diagnostics()
        .adapter(Batch)
        .build()
        .unwrap()
        .render(&x, &y, &hsml, Some(&w[..]))
        .unwrap();

    let mut stream = Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(32)
        .chunk_size(16)
        .return_diagnostics()
        .adapter(Streaming)
        .build()
        .unwrap();
    stream.process_chunk(&x, &y, &hsml, Some(&w[..])).unwrap();
    let streamed = stream.finalize().unwrap();

    assert_eq!(batch.values, streamed.values);
    assert!(batch.diagnostics.unwrap().is_finite());
}
