//! Parallel neighbour search for smoothing lengths.
//!
//! ## Purpose
//!
//! This module provides the neighbour-search pass injected into `sphmap`'s
//! executor: the distance from every particle to its k-th nearest neighbour,
//! computed for all particles concurrently.
//!
//! ## Design notes
//!
//! * **Implementation**: Same signature as the serial pass (`NeighborPassFn`).
//! * **Shared index**: The cell list is built once and queried from every worker.
//! * **Buffer Reuse**: Each worker keeps one scratch buffer of squared
//!   distances for all the particles it handles.
//! * **Determinism**: Queries are independent, so results equal the serial
//!   pass exactly and come back in input order.

// Feature-gated imports
#[cfg(feature = "cpu")]
use num_traits::Float;
#[cfg(feature = "cpu")]
use rayon::prelude::*;
#[cfg(feature = "cpu")]
use sphmap::internals::algorithms::neighbors::NeighborGrid;

/// Smoothing lengths for every particle, computed in parallel.
#[cfg(feature = "cpu")]
pub fn neighbor_pass_parallel<T>(positions: &[[T; 3]], num_neighbors: usize) -> Vec<T>
where
    T: Float + Send + Sync,
{
    let n = positions.len();
    let grid = NeighborGrid::build(positions, num_neighbors);
    tracing::debug!(
        particles = n,
        num_neighbors,
        cells = ?grid.dims(),
        "parallel neighbour search"
    );

    (0..n)
        .into_par_iter()
        .map_init(Vec::new, |scratch, idx| {
            grid.kth_distance(positions, idx, num_neighbors, scratch)
        })
        .collect()
}
