//! Reproducible particle clouds for the fastSphmap benchmarks.
//!
//! Every generator takes a seed and returns the same data on every run.

use rand::prelude::*;
use rand_distr::{Gamma, LogNormal, Normal, Uniform};
use std::f64::consts::PI;

/// Image-plane sources: positions, smoothing lengths and weights.
pub struct Sources {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub hsml: Vec<f64>,
    pub weights: Vec<f64>,
}

/// Exponential disc seen face-on, radii in units of the half-mass radius.
///
/// Smoothing lengths are log-normal and grow with radius, as they do for
/// simulated stellar particles.
pub fn exponential_disc(size: usize, seed: u64) -> Sources {
    let mut rng = StdRng::seed_from_u64(seed);
    // Half-mass radius of an exponential disc is 1.68 scale lengths.
    let radius = Gamma::new(2.0, 1.0 / 1.68).unwrap();
    let angle = Uniform::new(0.0, 2.0 * PI).unwrap();
    let spread = LogNormal::new(-3.0, 0.5).unwrap();
    let mass = LogNormal::new(0.0, 0.3).unwrap();

    let mut sources = Sources {
        x: Vec::with_capacity(size),
        y: Vec::with_capacity(size),
        hsml: Vec::with_capacity(size),
        weights: Vec::with_capacity(size),
    };
    for _ in 0..size {
        let r: f64 = radius.sample(&mut rng);
        let t: f64 = angle.sample(&mut rng);
        sources.x.push(r * t.cos());
        sources.y.push(r * t.sin());
        sources.hsml.push(spread.sample(&mut rng) * (1.0 + r));
        sources.weights.push(mass.sample(&mut rng));
    }
    sources
}

/// Every source piled on the centre with a wide kernel.
pub fn dense_core(size: usize, seed: u64) -> Sources {
    let mut rng = StdRng::seed_from_u64(seed);
    let offset = Normal::new(0.0, 0.05).unwrap();

    Sources {
        x: (0..size).map(|_| offset.sample(&mut rng)).collect(),
        y: (0..size).map(|_| offset.sample(&mut rng)).collect(),
        hsml: vec![0.5; size],
        weights: vec![1.0; size],
    }
}

/// Sources scattered far outside a domain of half-width `num_rhalfs`.
pub fn out_of_range(size: usize, num_rhalfs: f64, seed: u64) -> Sources {
    let mut rng = StdRng::seed_from_u64(seed);
    let far = Uniform::new(2.0 * num_rhalfs, 10.0 * num_rhalfs).unwrap();

    Sources {
        x: (0..size).map(|_| far.sample(&mut rng)).collect(),
        y: (0..size).map(|_| -far.sample(&mut rng)).collect(),
        hsml: vec![0.1; size],
        weights: vec![1.0; size],
    }
}

/// Plummer sphere of 3-D particle positions with unit scale radius.
pub fn plummer_sphere(size: usize, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size)
        .map(|_| {
            let m: f64 = rng.random_range(0.01..0.99);
            let r = 1.0 / (m.powf(-2.0 / 3.0) - 1.0).sqrt();
            let cos_theta: f64 = rng.random_range(-1.0..1.0);
            let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
            let phi: f64 = rng.random_range(0.0..2.0 * PI);
            [
                r * sin_theta * phi.cos(),
                r * sin_theta * phi.sin(),
                r * cos_theta,
            ]
        })
        .collect()
}
