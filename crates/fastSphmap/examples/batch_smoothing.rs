//! Batch Kernel Smoothing Examples
//!
//! This example demonstrates the batch adapter:
//! - Rendering image-plane sources with and without weights
//! - Per-area versus per-pixel units
//! - Several weight bands over one set of sources
//! - Rendering simulation particles through a projection
//! - Parallel versus sequential execution

use fastSphmap::prelude::*;
use ndarray::Array2;
use std::time::Instant;

fn main() -> Result<(), SmoothingError> {
    println!("{}", "=".repeat(80));
    println!("Adaptive Kernel Smoothing - Batch Examples");
    println!("{}", "=".repeat(80));
    println!();

    example_1_basic_render()?;
    example_2_pixel_units()?;
    example_3_bands()?;
    example_4_particles()?;
    example_5_parallel_comparison()?;

    Ok(())
}

/// Sources on a noisy spiral inside the unit disc.
fn spiral(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    let mut hsml = Vec::with_capacity(n);
    for k in 0..n {
        let t = k as f64 / n as f64 * 6.0 * std::f64::consts::PI;
        let r = 0.1 + 0.8 * k as f64 / n as f64 + 0.02 * (13.0 * t).sin();
        x.push(r * t.cos());
        y.push(r * t.sin());
        hsml.push(0.02 + 0.03 * r);
    }
    (x, y, hsml)
}

/// Example 1: Basic Render
/// Unit weights give the surface number density of the sources.
fn example_1_basic_render() -> Result<(), SmoothingError> {
    println!("Example 1: Basic Render");
    println!("{}", "-".repeat(80));

    let (x, y, hsml) = spiral(2_000);
    let model = Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(128)
        .return_diagnostics()
        .adapter(Batch)
        .build()?;

    let image = model.render(&x, &y, &hsml, None)?;
    println!("{}", image);
    println!();
    Ok(())
}

/// Example 2: Pixel Units
/// Per-pixel values sum to the deposited weight; per-area values are densities.
fn example_2_pixel_units() -> Result<(), SmoothingError> {
    println!("Example 2: Pixel Units");
    println!("{}", "-".repeat(80));

    let (x, y, hsml) = spiral(2_000);
    let mass: Vec<f64> = (0..x.len()).map(|k| 1.0 + (k % 5) as f64).collect();

    for units in [PerArea, PerPixel] {
        let image = Smoothing::new()
            .num_rhalfs(1.0)
            .npixels(128)
            .pixel_units(units)
            .adapter(Batch)
            .build()?
            .render(&x, &y, &hsml, Some(&mass[..]))?;
        println!(
            "{:>10}: sum of pixels = {:12.4}, deposited weight = {:10.4}",
            units.label(),
            image.total(),
            image.deposited_weight()
        );
    }
    println!();
    Ok(())
}

/// Example 3: Bands
/// One render per weight set (e.g. one per photometric filter).
fn example_3_bands() -> Result<(), SmoothingError> {
    println!("Example 3: Bands");
    println!("{}", "-".repeat(80));

    let (x, y, hsml) = spiral(2_000);
    let blue: Vec<f64> = x.iter().zip(&y).map(|(a, b)| (-(a * a + b * b)).exp()).collect();
    let red: Vec<f64> = x.iter().zip(&y).map(|(a, b)| (a * a + b * b).sqrt()).collect();

    let model = Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(64)
        .pixel_units(PerPixel)
        .adapter(Batch)
        .build()?;

    let images = model.render_bands(&x, &y, &hsml, &[&blue[..], &red[..]])?;
    for (name, image) in ["blue", "red"].iter().zip(&images) {
        println!("{:>5}: peak = {:.4}, total = {:.4}", name, image.max(), image.total());
    }
    println!();
    Ok(())
}

/// Example 4: Particles
/// Simulation particles are centred, scaled, given neighbour-based smoothing
/// lengths and projected edge-on before smoothing.
fn example_4_particles() -> Result<(), SmoothingError> {
    println!("Example 4: Particles");
    println!("{}", "-".repeat(80));

    let n = 3_000;
    let positions = Array2::from_shape_fn((n, 3), |(k, c)| {
        let t = k as f64 * 0.173;
        let r = 2.0 * (k as f64 / n as f64).sqrt();
        match c {
            0 => 50.0 + r * t.cos(),
            1 => 50.0 + r * t.sin(),
            _ => 50.0 + 0.1 * (7.0 * t).sin(),
        }
    });

    let frame = ParticleFrame::new([50.0, 50.0, 50.0], 1.0)
        .periodic(100.0)
        .softening(0.01)
        .projection(Projection::EdgeOn([0.0, 0.2, 1.0]));

    let model = Smoothing::new()
        .num_rhalfs(3.0)
        .npixels(96)
        .return_diagnostics()
        .adapter(Batch)
        .build()?;

    let image = model.render_particles(&frame, &positions, None, 16)?;
    println!("{}", image);
    println!();
    Ok(())
}

/// Example 5: Parallel Comparison
/// Parallel and sequential renders are bit-identical.
fn example_5_parallel_comparison() -> Result<(), SmoothingError> {
    println!("Example 5: Parallel Comparison");
    println!("{}", "-".repeat(80));

    let (x, y, hsml) = spiral(200_000);

    let mut images = Vec::new();
    for parallel in [false, true] {
        let model = Smoothing::new()
            .num_rhalfs(1.0)
            .npixels(512)
            .adapter(Batch)
            .parallel(parallel)
            .build()?;

        let start = Instant::now();
        let image = model.render(&x, &y, &hsml, None)?;
        println!(
            "{:>10}: {:8.2} ms",
            if parallel { "parallel" } else { "sequential" },
            start.elapsed().as_secs_f64() * 1e3
        );
        images.push(image);
    }
    println!("Identical: {}", images[0].values == images[1].values);
    println!();
    Ok(())
}
