//! Input validation for smoothing configuration and data.
//!
//! ## Purpose
//!
//! This module checks everything the raw accumulator takes on trust: source
//! array lengths, finite coordinates and weights, strictly positive smoothing
//! lengths, and the geometry and adapter parameters.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Length checks run before the per-element scans.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Empty source sets are valid**: Rendering zero sources yields a zero
//!   image. Only the neighbour search requires particles.
//! * **Weights may be negative**: Only finiteness is checked.
//!
//! ## Invariants
//!
//! * A validated source set satisfies every precondition of the accumulator.
//!
//! ## Non-goals
//!
//! * This module does not cull, reorder or repair inputs.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::SmoothingError;
use crate::primitives::grid::cell_count;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for smoothing configuration and input data.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Source Validation
    // ========================================================================

    /// Validate a set of point sources.
    pub fn validate_sources<T: Float>(
        x: &[T],
        y: &[T],
        hsml: &[T],
        weights: Option<&[T]>,
    ) -> Result<(), SmoothingError> {
        let n = x.len();
        Self::validate_length("y", n, y.len())?;
        Self::validate_length("hsml", n, hsml.len())?;
        if let Some(w) = weights {
            Self::validate_length("weights", n, w.len())?;
        }

        for i in 0..n {
            if !x[i].is_finite() {
                return Err(Self::non_finite("x", i, x[i]));
            }
            if !y[i].is_finite() {
                return Err(Self::non_finite("y", i, y[i]));
            }
            if !hsml[i].is_finite() || hsml[i] <= T::zero() {
                return Err(SmoothingError::InvalidSmoothingLength {
                    index: i,
                    value: hsml[i].to_f64().unwrap_or(f64::NAN),
                });
            }
        }

        if let Some(w) = weights {
            Self::validate_weights(w)?;
        }

        Ok(())
    }

    /// Validate one weight set (e.g. one photometric band).
    pub fn validate_weights<T: Float>(weights: &[T]) -> Result<(), SmoothingError> {
        for (i, &w) in weights.iter().enumerate() {
            if !w.is_finite() {
                return Err(Self::non_finite("weights", i, w));
            }
        }
        Ok(())
    }

    /// Validate 3-D particle positions for the neighbour search.
    pub fn validate_positions<T: Float>(positions: &[[T; 3]]) -> Result<(), SmoothingError> {
        if positions.is_empty() {
            return Err(SmoothingError::EmptyInput);
        }
        for (i, p) in positions.iter().enumerate() {
            if p.iter().any(|c| !c.is_finite()) {
                return Err(SmoothingError::InvalidNumericValue(format!(
                    "positions[{}] is not finite",
                    i
                )));
            }
        }
        Ok(())
    }

    /// Validate that an array has the expected number of elements.
    pub fn validate_length(
        name: &'static str,
        expected: usize,
        got: usize,
    ) -> Result<(), SmoothingError> {
        if expected != got {
            return Err(SmoothingError::MismatchedInputs {
                name,
                expected,
                got,
            });
        }
        Ok(())
    }

    fn non_finite<T: Float>(name: &str, index: usize, value: T) -> SmoothingError {
        SmoothingError::InvalidNumericValue(format!(
            "{}[{}]={}",
            name,
            index,
            value.to_f64().unwrap_or(f64::NAN)
        ))
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate the domain half-width.
    pub fn validate_half_width<T: Float>(num_rhalfs: T) -> Result<(), SmoothingError> {
        if !num_rhalfs.is_finite() || num_rhalfs <= T::zero() {
            return Err(SmoothingError::InvalidHalfWidth(
                num_rhalfs.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate the number of pixels per side.
    pub fn validate_pixel_count(npixels: usize) -> Result<(), SmoothingError> {
        if cell_count(npixels).is_none() {
            return Err(SmoothingError::InvalidPixelCount(npixels));
        }
        Ok(())
    }

    /// Validate the neighbour rank against the number of particles.
    pub fn validate_neighbor_count(
        num_neighbors: usize,
        available: usize,
    ) -> Result<(), SmoothingError> {
        if num_neighbors == 0 || num_neighbors >= available {
            return Err(SmoothingError::InvalidNeighborCount {
                got: num_neighbors,
                available,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Adapter-Specific Validation
    // ========================================================================

    /// Validate the chunk size for streaming mode.
    pub fn validate_chunk_size(chunk_size: usize, min: usize) -> Result<(), SmoothingError> {
        if chunk_size < min {
            return Err(SmoothingError::InvalidChunkSize {
                got: chunk_size,
                min,
            });
        }
        Ok(())
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(
        duplicate_param: Option<&'static str>,
    ) -> Result<(), SmoothingError> {
        if let Some(param) = duplicate_param {
            return Err(SmoothingError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}
