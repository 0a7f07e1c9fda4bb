//! Layer 3: Algorithms
//!
//! This layer provides parallel versions of the per-particle algorithms used
//! while preparing sources:
//!
//! - **Neighbours**: k-th nearest neighbour distances in 3-D

// Parallel neighbour search for smoothing lengths.
pub mod neighbors;
