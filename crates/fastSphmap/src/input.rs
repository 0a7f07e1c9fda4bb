//! Input abstractions for kernel smoothing.
//!
//! ## Purpose
//!
//! This module lets the render methods accept source arrays and particle
//! positions in several containers (slices, vectors, ndarray) through a single
//! interface.
//!
//! ## Design notes
//!
//! * **Zero-copy where possible**: Contiguous 1-D inputs are borrowed directly.
//! * **Positions**: `n x 3` arrays are read row by row into `[x, y, z]`
//!   triples; slices of triples are borrowed as they are.
//! * **Fail-fast validation**: Non-contiguous 1-D arrays and position arrays
//!   without exactly three columns are rejected before any work.
//!
//! ## Invariants
//!
//! * Returned slices cover every element of the input container.
//!
//! ## Non-goals
//!
//! * This module does not clean, reorder or impute data.

// External dependencies
use ndarray::{ArrayBase, Data, Ix1, Ix2};
use num_traits::Float;
use std::borrow::Cow;

// Export dependencies from sphmap crate
use sphmap::internals::primitives::errors::SmoothingError;

// ============================================================================
// Per-Source Arrays
// ============================================================================

/// Trait for types that can supply one per-source array (x, y, hsml, weights).
pub trait SourceInput<T: Float> {
    /// Convert the input to a contiguous slice.
    fn as_source_slice(&self) -> Result<&[T], SmoothingError>;
}

impl<T: Float> SourceInput<T> for [T] {
    fn as_source_slice(&self) -> Result<&[T], SmoothingError> {
        Ok(self)
    }
}

impl<T: Float> SourceInput<T> for Vec<T> {
    fn as_source_slice(&self) -> Result<&[T], SmoothingError> {
        Ok(self.as_slice())
    }
}

impl<T: Float, S> SourceInput<T> for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
{
    fn as_source_slice(&self) -> Result<&[T], SmoothingError> {
        self.as_slice().ok_or_else(|| {
            SmoothingError::InvalidInput("ndarray input must be contiguous in memory".to_string())
        })
    }
}

// ============================================================================
// Particle Positions
// ============================================================================

/// Trait for types that can supply 3-D particle positions.
pub trait PositionInput<T: Float> {
    /// View the input as `[x, y, z]` triples.
    fn as_positions(&self) -> Result<Cow<'_, [[T; 3]]>, SmoothingError>;
}

impl<T: Float> PositionInput<T> for [[T; 3]] {
    fn as_positions(&self) -> Result<Cow<'_, [[T; 3]]>, SmoothingError> {
        Ok(Cow::Borrowed(self))
    }
}

impl<T: Float> PositionInput<T> for Vec<[T; 3]> {
    fn as_positions(&self) -> Result<Cow<'_, [[T; 3]]>, SmoothingError> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

impl<T: Float, S> PositionInput<T> for ArrayBase<S, Ix2>
where
    S: Data<Elem = T>,
{
    fn as_positions(&self) -> Result<Cow<'_, [[T; 3]]>, SmoothingError> {
        if self.ncols() != 3 {
            return Err(SmoothingError::InvalidInput(format!(
                "positions must have 3 columns, got {}",
                self.ncols()
            )));
        }
        Ok(Cow::Owned(
            self.rows()
                .into_iter()
                .map(|row| [row[0], row[1], row[2]])
                .collect(),
        ))
    }
}
