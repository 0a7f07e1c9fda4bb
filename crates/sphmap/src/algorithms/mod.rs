//! Layer 3: Algorithms
//!
//! This layer implements kernel deposition onto the pixel grid together with
//! the particle preparation steps that feed it: projection, neighbour-based
//! smoothing lengths and source culling. It is orchestrated by the engine layer.

// Kernel deposition of sources onto the grid.
pub mod deposit;

// Nearest-neighbour smoothing lengths.
pub mod neighbors;

// Periodic wrapping, scaling and 2-D projection.
pub mod projection;

// Range culling and default weights.
pub mod selection;
