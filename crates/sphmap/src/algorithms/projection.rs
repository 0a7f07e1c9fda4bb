//! Particle preparation: periodic wrapping, scaling and 2-D projection.
//!
//! ## Purpose
//!
//! This module turns 3-D simulation positions into the 2-D source coordinates
//! the accumulator consumes, expressed in units of a reference scale length
//! (typically the stellar half-mass radius).
//!
//! ## Design notes
//!
//! * **Order**: Positions are wrapped about the centre, divided by the scale
//!   length and only then projected. Smoothing lengths are measured in 3-D on
//!   the scaled positions, before projection.
//! * **Basis**: Each projection is a pair of basis vectors `(e1, e2)`; the
//!   image coordinates are `(p . e1, p . e2)`.
//! * **Edge-on and face-on**: The first basis vector is `e2 x z` (or
//!   `e3 x z`) and is not renormalized, so an angular momentum vector tilted
//!   away from the plane shrinks the image x-axis exactly as the imaging
//!   pipeline does. A vector parallel to z leaves no x-axis at all and is
//!   rejected as degenerate.
//!
//! ## Key concepts
//!
//! * **Periodic wrap**: Offsets longer than half the box are folded back by
//!   one box length.
//! * **Softening floor**: Smoothing lengths are raised to at least
//!   `2.8 * softening / scale_length`.
//!
//! ## Invariants
//!
//! * Wrapped offsets satisfy `|dx| <= box_size / 2`.
//! * Output order matches input order.
//!
//! ## Non-goals
//!
//! * This module does not choose the centre or the angular momentum vector.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::format;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::kernel::CubicSpline;
use crate::primitives::errors::SmoothingError;

// ============================================================================
// Periodic Boundaries
// ============================================================================

/// Fold an offset back into `[-box_size / 2, box_size / 2]`.
#[inline]
pub fn wrap_periodic<T: Float>(dx: T, box_size: T) -> T {
    let half = box_size / (T::one() + T::one());
    if dx.abs() > half {
        dx - box_size.abs() * dx.signum()
    } else {
        dx
    }
}

// ============================================================================
// Projections
// ============================================================================

/// Viewing direction for the 2-D image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection<T> {
    /// Image axes are simulation x and y.
    Xy,

    /// Image axes are simulation y and z.
    Yz,

    /// Image axes are simulation z and x.
    Zx,

    /// Image y-axis is the angular momentum vector projected onto the xy-plane.
    Planar([T; 3]),

    /// Image y-axis is the angular momentum vector (disc seen edge-on).
    EdgeOn([T; 3]),

    /// Line of sight is the angular momentum vector (disc seen face-on).
    FaceOn([T; 3]),
}

impl<T: Float> Default for Projection<T> {
    fn default() -> Self {
        Projection::Xy
    }
}

impl<T: Float> Projection<T> {
    /// Short name used in logs and directory names.
    pub fn name(&self) -> &'static str {
        match self {
            Projection::Xy => "xy",
            Projection::Yz => "yz",
            Projection::Zx => "zx",
            Projection::Planar(_) => "planar",
            Projection::EdgeOn(_) => "edgeon",
            Projection::FaceOn(_) => "faceon",
        }
    }

    /// Basis vectors `(e1, e2)` spanning the image plane.
    pub fn basis(&self) -> Result<([T; 3], [T; 3]), SmoothingError> {
        let o = T::zero();
        let l = T::one();
        let z_hat = [o, o, l];

        match *self {
            Projection::Xy => Ok(([l, o, o], [o, l, o])),
            Projection::Yz => Ok(([o, l, o], [o, o, l])),
            Projection::Zx => Ok(([o, o, l], [l, o, o])),
            Projection::Planar(j) => {
                let e2 = normalized([j[0], j[1], o], "planar")?;
                Ok((cross(e2, z_hat), e2))
            }
            Projection::EdgeOn(j) => {
                let e2 = normalized(j, "edgeon")?;
                let e1 = nonzero(cross(e2, z_hat), "edgeon")?;
                Ok((e1, e2))
            }
            Projection::FaceOn(j) => {
                let e3 = normalized(j, "faceon")?;
                let e1 = nonzero(cross(e3, z_hat), "faceon")?;
                Ok((e1, cross(e3, e1)))
            }
        }
    }
}

#[inline]
fn dot<T: Float>(a: [T; 3], b: [T; 3]) -> T {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn cross<T: Float>(a: [T; 3], b: [T; 3]) -> [T; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalized<T: Float>(v: [T; 3], kind: &'static str) -> Result<[T; 3], SmoothingError> {
    let norm = dot(v, v).sqrt();
    if !norm.is_finite() || norm <= T::zero() {
        return Err(SmoothingError::DegenerateProjection(kind));
    }
    Ok([v[0] / norm, v[1] / norm, v[2] / norm])
}

// A vector parallel to z has no component left after `x z`.
fn nonzero<T: Float>(v: [T; 3], kind: &'static str) -> Result<[T; 3], SmoothingError> {
    if dot(v, v) <= T::zero() {
        return Err(SmoothingError::DegenerateProjection(kind));
    }
    Ok(v)
}

// ============================================================================
// Particle Frame
// ============================================================================

/// Reference frame that maps simulation particles onto image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame<T> {
    /// Position the image is centred on (simulation units).
    pub center: [T; 3],

    /// Periodic box length, if the simulation volume is periodic.
    pub box_size: Option<T>,

    /// Length that image coordinates are expressed in (e.g. half-mass radius).
    pub scale_length: T,

    /// Viewing direction.
    pub projection: Projection<T>,

    /// Gravitational softening length used as a smoothing-length floor.
    pub softening_length: Option<T>,
}

impl<T: Float> ParticleFrame<T> {
    /// Frame centred on `center` with no periodic box, no softening floor and
    /// an xy projection.
    pub fn new(center: [T; 3], scale_length: T) -> Self {
        Self {
            center,
            box_size: None,
            scale_length,
            projection: Projection::Xy,
            softening_length: None,
        }
    }

    /// Wrap offsets through a periodic box of the given length.
    pub fn periodic(mut self, box_size: T) -> Self {
        self.box_size = Some(box_size);
        self
    }

    /// Select the viewing direction.
    pub fn projection(mut self, projection: Projection<T>) -> Self {
        self.projection = projection;
        self
    }

    /// Floor smoothing lengths at `2.8` softening lengths.
    pub fn softening(mut self, softening_length: T) -> Self {
        self.softening_length = Some(softening_length);
        self
    }

    /// Check the frame parameters.
    pub fn validate(&self) -> Result<(), SmoothingError> {
        if !self.scale_length.is_finite() || self.scale_length <= T::zero() {
            return Err(SmoothingError::InvalidScaleLength(
                self.scale_length.to_f64().unwrap_or(f64::NAN),
            ));
        }
        if let Some(box_size) = self.box_size {
            if !box_size.is_finite() || box_size <= T::zero() {
                return Err(SmoothingError::InvalidBoxSize(
                    box_size.to_f64().unwrap_or(f64::NAN),
                ));
            }
        }
        if let Some(eps) = self.softening_length {
            if !eps.is_finite() || eps < T::zero() {
                return Err(SmoothingError::InvalidNumericValue(format!(
                    "softening length must be finite and non-negative, got {}",
                    eps.to_f64().unwrap_or(f64::NAN)
                )));
            }
        }
        if self.center.iter().any(|c| !c.is_finite()) {
            return Err(SmoothingError::InvalidNumericValue(
                "frame center must be finite".into(),
            ));
        }
        self.projection.basis().map(|_| ())
    }

    /// Offsets from the centre, periodically wrapped and in scale-length units.
    pub fn relative_positions(&self, positions: &[[T; 3]]) -> Vec<[T; 3]> {
        positions
            .iter()
            .map(|p| {
                let mut d = [
                    p[0] - self.center[0],
                    p[1] - self.center[1],
                    p[2] - self.center[2],
                ];
                if let Some(box_size) = self.box_size {
                    for c in d.iter_mut() {
                        *c = wrap_periodic(*c, box_size);
                    }
                }
                [
                    d[0] / self.scale_length,
                    d[1] / self.scale_length,
                    d[2] / self.scale_length,
                ]
            })
            .collect()
    }

    /// Project relative positions onto the image plane.
    pub fn project(&self, relative: &[[T; 3]]) -> Result<(Vec<T>, Vec<T>), SmoothingError> {
        let (e1, e2) = self.projection.basis()?;
        Ok(relative.iter().map(|&p| (dot(p, e1), dot(p, e2))).unzip())
    }

    /// Smallest smoothing length allowed, in scale-length units.
    pub fn smoothing_floor(&self) -> T {
        match self.softening_length {
            Some(eps) => CubicSpline::support_radius(eps) / self.scale_length,
            None => T::zero(),
        }
    }

    /// Raise smoothing lengths (already in scale-length units) to the floor.
    pub fn apply_smoothing_floor(&self, hsml: &mut [T]) {
        let floor = self.smoothing_floor();
        for h in hsml.iter_mut() {
            if h.is_nan() || *h < floor {
                *h = floor;
            }
        }
    }

    /// Convert smoothing lengths from simulation units to scale-length units
    /// and apply the softening floor.
    pub fn scale_lengths(&self, hsml: &[T]) -> Vec<T> {
        let mut out: Vec<T> = hsml.iter().map(|&h| h / self.scale_length).collect();
        self.apply_smoothing_floor(&mut out);
        out
    }
}

// ============================================================================
// Prepared Sources
// ============================================================================

/// Projected source coordinates and smoothing lengths, in scale-length units.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSources<T> {
    /// Image-plane x-coordinates.
    pub x: Vec<T>,

    /// Image-plane y-coordinates.
    pub y: Vec<T>,

    /// Smoothing lengths (3-D neighbour distances, floored).
    pub hsml: Vec<T>,
}

impl<T> PreparedSources<T> {
    /// Number of sources.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when there are no sources.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
