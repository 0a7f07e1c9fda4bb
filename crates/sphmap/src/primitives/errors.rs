//! Error types for smoothing operations.
//!
//! ## Purpose
//!
//! This module defines the error conditions reported by the checked layers of
//! the crate: input validation, frame and grid configuration, particle
//! preparation and adapter constraints.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors carry the offending values (index, length, value).
//! * **Deferred**: Builder misconfiguration is stored and reported by `build()`.
//! * **No-std**: Supports `no_std` environments by using `alloc` for messages.
//! * **Trait Implementation**: Implements `Display` and `std::error::Error` (when `std` is enabled).
//!
//! ## Key concepts
//!
//! 1. **Input validation**: Empty or mismatched source arrays, non-finite values.
//! 2. **Geometry validation**: Half-width, pixel count, pixel scale, box size.
//! 3. **Preparation**: Neighbour counts and degenerate projection axes.
//! 4. **Adapter constraints**: Chunk sizes and unsupported features.
//!
//! ## Invariants
//!
//! * The raw accumulator, kernel and coordinate mapper never produce these errors.
//! * Numeric values in errors are reported as `f64` regardless of the working precision.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.
//! * This module does not provide error recovery.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::error::Error;
#[cfg(feature = "std")]
use std::string::String;

// External dependencies
use core::fmt::{Display, Formatter, Result};

// ============================================================================
// Error Type
// ============================================================================

/// Error type for smoothing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SmoothingError {
    /// No sources (or no particles) were supplied where at least one is required.
    EmptyInput,

    /// Generic invalid input error with a descriptive message.
    InvalidInput(String),

    /// A per-source array does not have the same length as the positions.
    MismatchedInputs {
        /// Name of the offending array.
        name: &'static str,
        /// Expected number of elements.
        expected: usize,
        /// Actual number of elements.
        got: usize,
    },

    /// Input data contains NaN or infinite values.
    InvalidNumericValue(String),

    /// Smoothing lengths must be strictly positive and finite.
    InvalidSmoothingLength {
        /// Source index.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// Domain half-width (`num_rhalfs`) must be positive and finite.
    InvalidHalfWidth(f64),

    /// Grids need at least one pixel per side.
    InvalidPixelCount(usize),

    /// Pixel scale must be positive and finite.
    InvalidPixelScale(f64),

    /// Reference scale length must be positive and finite.
    InvalidScaleLength(f64),

    /// Periodic box size must be positive and finite.
    InvalidBoxSize(f64),

    /// Neighbour search needs `1 <= num_neighbors < available`.
    InvalidNeighborCount {
        /// Requested neighbour rank.
        got: usize,
        /// Number of particles available.
        available: usize,
    },

    /// The requested projection axes cannot be built from the given vector.
    DegenerateProjection(&'static str),

    /// Chunk size is below the minimum accepted by the streaming adapter.
    InvalidChunkSize {
        /// The chunk size provided.
        got: usize,
        /// Minimum accepted chunk size.
        min: usize,
    },

    /// Selected adapter does not support the requested feature.
    UnsupportedFeature {
        /// Name of the adapter (e.g., "Streaming").
        adapter: &'static str,
        /// Name of the unsupported feature.
        feature: &'static str,
    },

    /// Parameter was set multiple times in the builder.
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for SmoothingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::EmptyInput => write!(f, "Input arrays are empty"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::MismatchedInputs {
                name,
                expected,
                got,
            } => {
                write!(f, "Length mismatch: {name} has {got} elements, expected {expected}")
            }
            Self::InvalidNumericValue(s) => write!(f, "Invalid numeric value: {s}"),
            Self::InvalidSmoothingLength { index, value } => {
                write!(f, "Invalid smoothing length: hsml[{index}]={value} (must be > 0)")
            }
            Self::InvalidHalfWidth(r) => {
                write!(f, "Invalid half-width: {r} (must be > 0 and finite)")
            }
            Self::InvalidPixelCount(n) => write!(f, "Invalid pixel count: {n} (must be >= 1 with npixels^2 cells addressable)"),
            Self::InvalidPixelScale(s) => {
                write!(f, "Invalid pixel scale: {s} (must be > 0 and finite)")
            }
            Self::InvalidScaleLength(s) => {
                write!(f, "Invalid scale length: {s} (must be > 0 and finite)")
            }
            Self::InvalidBoxSize(s) => write!(f, "Invalid box size: {s} (must be > 0 and finite)"),
            Self::InvalidNeighborCount { got, available } => {
                write!(
                    f,
                    "Invalid neighbour count: {got} (must be >= 1 and below the {available} particles available)"
                )
            }
            Self::DegenerateProjection(reason) => write!(f, "Degenerate projection: {reason}"),
            Self::InvalidChunkSize { got, min } => {
                write!(f, "Invalid chunk_size: {got} (must be at least {min})")
            }
            Self::UnsupportedFeature { adapter, feature } => {
                write!(f, "Adapter '{adapter}' does not support feature: {feature}")
            }
            Self::DuplicateParameter { parameter } => {
                write!(
                    f,
                    "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
                )
            }
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

#[cfg(feature = "std")]
impl Error for SmoothingError {}
