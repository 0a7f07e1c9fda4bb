//! Streaming Kernel Smoothing Examples
//!
//! This example demonstrates the streaming adapter:
//! - Depositing sources chunk by chunk into one image
//! - Agreement with a batch render of the same sources
//! - Reusing a processor for several images
//!
//! The Streaming adapter is designed for source sets that arrive in pieces,
//! e.g. one simulation file at a time.

use fastSphmap::prelude::*;

fn main() -> Result<(), SmoothingError> {
    println!("{}", "=".repeat(80));
    println!("Adaptive Kernel Smoothing - Streaming Examples");
    println!("{}", "=".repeat(80));
    println!();

    example_1_chunked_render()?;
    example_2_reuse()?;

    Ok(())
}

/// Sources of one "file": a ring of clumps.
fn file_sources(file: usize, n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let centre = file as f64 * 0.9;
    let (cx, cy) = (0.5 * centre.cos(), 0.5 * centre.sin());
    let x = (0..n).map(|k| cx + 0.1 * (k as f64 * 0.7).sin()).collect();
    let y = (0..n).map(|k| cy + 0.1 * (k as f64 * 1.3).cos()).collect();
    let hsml = vec![0.03; n];
    (x, y, hsml)
}

/// Example 1: Chunked Render
/// Streaming the files gives exactly the batch image.
fn example_1_chunked_render() -> Result<(), SmoothingError> {
    println!("Example 1: Chunked Render");
    println!("{}", "-".repeat(80));

    let mut stream = Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(128)
        .chunk_size(1_000)
        .return_diagnostics()
        .adapter(Streaming)
        .build()?;

    let (mut all_x, mut all_y, mut all_h) = (Vec::new(), Vec::new(), Vec::new());
    for file in 0..7 {
        let (x, y, hsml) = file_sources(file, 2_500);
        stream.process_chunk(&x, &y, &hsml, None)?;
        all_x.extend(x);
        all_y.extend(y);
        all_h.extend(hsml);
    }
    println!("Chunks processed: {}", stream.chunks_processed());

    let streamed = stream.finalize()?;
    println!("{}", streamed);

    let batch = Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(128)
        .adapter(Batch)
        .build()?
        .render(&all_x, &all_y, &all_h, None)?;
    println!("Identical to batch: {}", streamed.values == batch.values);
    println!();
    Ok(())
}

/// Example 2: Reuse
/// Finalizing resets the processor, so one processor renders many images.
fn example_2_reuse() -> Result<(), SmoothingError> {
    println!("Example 2: Reuse");
    println!("{}", "-".repeat(80));

    let mut stream = Smoothing::new()
        .num_rhalfs(1.0)
        .npixels(64)
        .pixel_units(PerPixel)
        .adapter(Streaming)
        .build()?;

    for file in 0..3 {
        let (x, y, hsml) = file_sources(file, 500);
        stream.process_chunk(&x, &y, &hsml, None)?;
        let image = stream.finalize_array()?;
        println!(
            "Image {}: shape = {:?}, total = {:.3}",
            file,
            image.dim(),
            image.sum()
        );
    }
    println!();
    Ok(())
}
