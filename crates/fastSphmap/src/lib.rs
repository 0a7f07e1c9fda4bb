//! # fastSphmap: parallel adaptive kernel smoothing
//!
//! Multi-core extension of [`sphmap`]. Deposits point sources onto a regular
//! 2-D pixel grid with the normalized cubic-spline SPH kernel, using all
//! available CPU cores, and accepts `ndarray` inputs and outputs.
//!
//! Parallel renders are bit-identical to the serial `sphmap` renders: the image
//! is split into disjoint bands of rows and every band sees the sources in
//! input order, so each pixel sums its contributions in the same order.
//!
//! ## Quick Start
//!
//! ```rust
//! use fastSphmap::prelude::*;
//! use ndarray::Array1;
//!
//! let x = Array1::from_vec(vec![0.0, 0.4, -0.3]);
//! let y = Array1::from_vec(vec![0.0, 0.1, -0.2]);
//! let hsml = Array1::from_vec(vec![0.2, 0.3, 0.25]);
//!
//! // Parallel by default
//! let model = Smoothing::new()
//!     .num_rhalfs(1.0)
//!     .npixels(32)
//!     .adapter(Batch)
//!     .build()?;
//!
//! let image = model.render_array(&x, &y, &hsml, None)?;
//! assert_eq!(image.shape(), &[32, 32]);
//! # Result::<(), SmoothingError>::Ok(())
//! ```
//!
//! ### Particles
//!
//! ```rust
//! use fastSphmap::prelude::*;
//! use ndarray::Array2;
//!
//! let positions = Array2::from_shape_fn((50, 3), |(k, c)| {
//!     let t = k as f64 * 0.41;
//!     match c {
//!         0 => t.cos(),
//!         1 => t.sin(),
//!         _ => 0.02 * k as f64,
//!     }
//! });
//!
//! let frame = ParticleFrame::new([0.0, 0.0, 0.0], 1.0).projection(Projection::Xy);
//!
//! let model = Smoothing::new()
//!     .num_rhalfs(2.0)
//!     .npixels(64)
//!     .pixel_units(PerPixel)
//!     .adapter(Batch)
//!     .build()?;
//!
//! let image = model.render_particles(&frame, &positions, None, 16)?;
//! assert!(image.total() > 0.0);
//! # Result::<(), SmoothingError>::Ok(())
//! ```
//!
//! ### Streaming
//!
//! ```rust
//! use fastSphmap::prelude::*;
//!
//! let mut stream = Smoothing::new()
//!     .npixels(64)
//!     .num_rhalfs(1.0)
//!     .chunk_size(1000)
//!     .adapter(Streaming)
//!     .build()?;
//!
//! stream.process_chunk(&vec![0.0, 0.1], &vec![0.0, -0.1], &vec![0.1, 0.1], None)?;
//! stream.process_chunk(&vec![-0.2], &vec![0.3], &vec![0.2], None)?;
//!
//! let image = stream.finalize_array()?;
//! assert_eq!(image.dim(), (64, 64));
//! # Result::<(), SmoothingError>::Ok(())
//! ```
//!
//! ## Features
//!
//! - `cpu` (default): parallel execution via `rayon`. Without it every
//!   adapter runs the serial `sphmap` passes.
//! - `dev`: exposes internal modules for testing.

#![allow(non_snake_case)]

// Layer 3: Algorithms - parallel neighbour search.
mod algorithms;

// Layer 5: Engine - parallel deposition.
mod engine;

// Layer 6: Adapters - execution mode adapters.
mod adapters;

// High-level fluent API for smoothing.
mod api;

// Input data handling.
mod input;

// Standard fastSphmap prelude.
pub mod prelude {
    pub use crate::api::{
        Adapter::{Batch, Streaming},
        CubicSpline, Frame, FrameRequest, ImageDiagnostics, ParallelBatchSmoothing,
        ParallelStreamingSmoothing, ParticleFrame, PixelGrid,
        PixelUnits::{PerArea, PerPixel},
        PositionInput, PreparedSources, Projection, SmoothedImage,
        SmoothingBuilder as Smoothing, SmoothingError, SourceInput, accumulate, image_to_array,
        rhalfs_to_pixels, wrap_periodic,
    };
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod adapters {
        pub use crate::adapters::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
    pub mod input {
        pub use crate::input::*;
    }
}
