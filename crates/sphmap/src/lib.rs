//! # sphmap: adaptive kernel smoothing of particles onto pixel grids
//!
//! Deposits point sources (simulation particles) onto a regular 2-D pixel
//! grid with the normalized cubic-spline SPH kernel, each source spread over
//! its own adaptive smoothing length. The result is a surface density (or a
//! per-pixel quantity) sampled at the pixel centres, the way synthetic images
//! of simulated galaxies are made.
//!
//! ## How it works
//!
//! For every source at `(x0, y0)` with weight `w` and smoothing length
//! `hsml`, the support radius is `h = 2.8 * hsml`. The source's bounding box
//! `[x0 - h, x0 + h] x [y0 - h, y0 + h]` is mapped to pixel indices with
//! `floor(n / 2 + r * n / (2 R))`, clipped to the grid, and every cell in the
//! box receives `w * W(r, h)` where
//!
//! ```text
//! W(r, h) = 40 / (7 pi h^2) * { 1 - 6x^2 + 6x^3   0 <= x <= 1/2
//!                             { 2 (1 - x)^3        1/2 < x <= 1
//!                             { 0                  x > 1,        x = r / h
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use sphmap::prelude::*;
//!
//! let x = vec![0.0, 0.4, -0.3];
//! let y = vec![0.0, 0.1, -0.2];
//! let hsml = vec![0.2, 0.3, 0.25];
//! let mass = vec![1.0, 0.5, 2.0];
//!
//! // 32 x 32 pixels over [-1, 1]^2
//! let model = Smoothing::new()
//!     .num_rhalfs(1.0)
//!     .npixels(32)
//!     .return_diagnostics()
//!     .adapter(Batch)
//!     .build()?;
//!
//! let image = model.render(&x, &y, &hsml, Some(&mass[..]))?;
//! assert_eq!(image.values.len(), 32 * 32);
//!
//! println!("{}", image);
//! # Result::<(), SmoothingError>::Ok(())
//! ```
//!
//! ### From simulation particles
//!
//! ```rust
//! use sphmap::prelude::*;
//!
//! let positions: Vec<[f64; 3]> = (0..40)
//!     .map(|k| {
//!         let t = k as f64 * 0.37;
//!         [10.0 + 0.5 * t.cos(), 20.0 + 0.5 * t.sin(), 30.0 + 0.01 * k as f64]
//!     })
//!     .collect();
//!
//! // Centre on the first particle, express lengths in units of 0.5.
//! let frame = ParticleFrame::new(positions[0], 0.5)
//!     .periodic(100.0)
//!     .projection(Projection::EdgeOn([0.0, 1.0, 0.0]));
//!
//! let model = Smoothing::new()
//!     .num_rhalfs(4.0)
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
//! ### Raw accumulator
//!
//! The unchecked core is available for callers that manage their own grids:
//!
//! ```rust
//! use sphmap::prelude::*;
//!
//! let grid = PixelGrid::new(5, 1.0)?;
//! let mut z = grid.zeros();
//! accumulate(grid.x(), grid.y(), &mut z, 5, 5, &[0.0], &[0.0], &[1.0], &[0.2], 1.0);
//!
//! let h = CubicSpline::support_radius(0.2);
//! assert_eq!(z[grid.index(2, 2)], CubicSpline::evaluate(0.0, h));
//! # Result::<(), SmoothingError>::Ok(())
//! ```
//!
//! ## Minimal Usage (no_std / Embedded)
//!
//! Disable default features to remove the standard library dependency:
//!
//! ```toml
//! [dependencies]
//! sphmap = { version = "0.3", default-features = false }
//! ```
//!
//! ## References
//!
//! - Monaghan, J. J. (1992). "Smoothed Particle Hydrodynamics"
//! - Springel, V. (2001). "GADGET: a code for collisionless and gasdynamical cosmological simulations"
//! - Torrey, P. et al. (2015). "Synthetic galaxy images and spectra from the Illustris simulation"

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// Layer 1: Primitives - data structures and basic utilities.
mod primitives;

// Layer 2: Math - pure mathematical functions.
mod math;

// Layer 3: Algorithms - deposition and particle preparation.
mod algorithms;

// Layer 4: Evaluation - post-processing and diagnostics.
mod evaluation;

// Layer 5: Engine - orchestration and execution control.
mod engine;

// Layer 6: Adapters - execution mode adapters.
mod adapters;

// High-level fluent API for smoothing.
mod api;

// Standard sphmap prelude.
pub mod prelude {
    pub use crate::api::{
        Adapter::{Batch, Streaming},
        BatchSmoothing, CubicSpline, Frame, FrameRequest, ImageDiagnostics, ParticleFrame,
        PixelGrid,
        PixelUnits::{PerArea, PerPixel},
        PreparedSources, Projection, SmoothedImage, SmoothingBuilder as Smoothing,
        SmoothingError, StreamingSmoothing, accumulate, rhalfs_to_pixels, wrap_periodic,
    };
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod math {
        pub use crate::math::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    pub mod adapters {
        pub use crate::adapters::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
