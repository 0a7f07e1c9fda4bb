//! Python bindings for fastSphmap.

#![allow(non_snake_case)]

use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::fmt::Display;

use ::fastSphmap::internals::algorithms::neighbors::neighbor_pass_parallel;
use ::fastSphmap::internals::api::PixelUnits;
use ::fastSphmap::prelude::{
    Batch, CubicSpline, ImageDiagnostics, ParticleFrame, PerArea, PerPixel, Projection,
    PositionInput, SmoothedImage, Smoothing, image_to_array,
    rhalfs_to_pixels as coordinate_to_pixel,
};
use ::sphmap::internals::algorithms::neighbors::smoothing_lengths as neighbor_pass;
use ::sphmap::internals::engine::validator::Validator;

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a SmoothingError to a PyErr
fn to_py_error(e: impl Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Parse pixel units from string
fn parse_pixel_units(name: &str) -> PyResult<PixelUnits> {
    match name.to_lowercase().as_str() {
        "per_area" | "area" | "density" => Ok(PerArea),
        "per_pixel" | "pixel" | "sum" => Ok(PerPixel),
        _ => Err(PyValueError::new_err(format!(
            "Unknown pixel units: {}. Valid options: per_area, per_pixel",
            name
        ))),
    }
}

/// Parse projection from string
fn parse_projection(name: &str, jvec: Option<[f64; 3]>) -> PyResult<Projection<f64>> {
    let needs_jvec = || {
        jvec.ok_or_else(|| {
            PyValueError::new_err(format!("Projection '{}' requires jvec", name))
        })
    };
    match name.to_lowercase().as_str() {
        "xy" => Ok(Projection::Xy),
        "yz" => Ok(Projection::Yz),
        "zx" => Ok(Projection::Zx),
        "planar" => Ok(Projection::Planar(needs_jvec()?)),
        "edgeon" | "edge_on" => Ok(Projection::EdgeOn(needs_jvec()?)),
        "faceon" | "face_on" => Ok(Projection::FaceOn(needs_jvec()?)),
        _ => Err(PyValueError::new_err(format!(
            "Unknown projection: {}. Valid options: xy, yz, zx, planar, edgeon, faceon",
            name
        ))),
    }
}

// ============================================================================
// Python Classes
// ============================================================================

/// Summary statistics for a rendered image.
#[pyclass(name = "Diagnostics")]
#[derive(Clone)]
pub struct PyDiagnostics {
    /// Sum of the kept sources' weights
    #[pyo3(get)]
    pub input_weight: f64,

    /// Weight recovered from the image
    #[pyo3(get)]
    pub deposited_weight: f64,

    /// deposited_weight / input_weight
    #[pyo3(get)]
    pub conservation_ratio: f64,

    /// Sources offered
    #[pyo3(get)]
    pub sources_total: usize,

    /// Sources dropped by the range test
    #[pyo3(get)]
    pub sources_culled: usize,

    /// Kept sources that touched no pixel
    #[pyo3(get)]
    pub sources_outside: usize,

    /// Largest pixel value
    #[pyo3(get)]
    pub peak_value: f64,

    /// (row, column) of the peak
    #[pyo3(get)]
    pub peak_index: (usize, usize),

    /// Pixels holding NaN or infinity
    #[pyo3(get)]
    pub non_finite_pixels: usize,
}

impl From<&ImageDiagnostics<f64>> for PyDiagnostics {
    fn from(d: &ImageDiagnostics<f64>) -> Self {
        PyDiagnostics {
            input_weight: d.input_weight,
            deposited_weight: d.deposited_weight,
            conservation_ratio: d.conservation_ratio,
            sources_total: d.sources_total,
            sources_culled: d.sources_culled,
            sources_outside: d.sources_outside,
            peak_value: d.peak_value,
            peak_index: d.peak_index,
            non_finite_pixels: d.non_finite_pixels,
        }
    }
}

#[pymethods]
impl PyDiagnostics {
    fn __repr__(&self) -> String {
        format!(
            "Diagnostics(conservation_ratio={:.6}, sources_total={}, sources_culled={})",
            self.conservation_ratio, self.sources_total, self.sources_culled
        )
    }
}

/// Image rendered from particles.
#[pyclass(name = "SmoothedImage")]
pub struct PySmoothedImage {
    inner: SmoothedImage<f64>,
}

#[pymethods]
impl PySmoothedImage {
    /// Pixel values as an (ny, nx) array
    #[getter]
    fn values<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let array = image_to_array(self.inner.clone()).map_err(to_py_error)?;
        Ok(array.into_pyarray(py))
    }

    /// Number of columns
    #[getter]
    fn nx(&self) -> usize {
        self.inner.nx
    }

    /// Number of rows
    #[getter]
    fn ny(&self) -> usize {
        self.inner.ny
    }

    /// Pixel side length in scale-length units
    #[getter]
    fn pixel_size(&self) -> f64 {
        self.inner.pixel_size
    }

    /// Domain half-width
    #[getter]
    fn num_rhalfs(&self) -> f64 {
        self.inner.num_rhalfs
    }

    /// Sources that reached the deposition step
    #[getter]
    fn sources_used(&self) -> usize {
        self.inner.sources_used
    }

    /// Units of the pixel values
    #[getter]
    fn units(&self) -> &'static str {
        self.inner.units.label()
    }

    /// Diagnostics (if computed)
    #[getter]
    fn diagnostics(&self) -> Option<PyDiagnostics> {
        self.inner.diagnostics.as_ref().map(PyDiagnostics::from)
    }

    /// Sum of all pixel values
    fn total(&self) -> f64 {
        self.inner.total()
    }

    /// Total weight recovered from the image
    fn deposited_weight(&self) -> f64 {
        self.inner.deposited_weight()
    }

    fn __repr__(&self) -> String {
        format!(
            "SmoothedImage(nx={}, ny={}, units={}, sources_used={})",
            self.inner.nx,
            self.inner.ny,
            self.inner.units.label(),
            self.inner.sources_used
        )
    }
}

// ============================================================================
// Python Functions
// ============================================================================

/// Adaptive kernel smoothing of point sources onto a square pixel grid.
///
/// Parameters
/// ----------
/// x : array_like
///     x-coordinates of the sources, in units of the scale length.
/// y : array_like
///     y-coordinates of the sources.
/// hsml : array_like
///     Smoothing lengths (same units as x and y).
/// num_rhalfs : float, optional
///     Half-width of the image; coordinates span (-num_rhalfs, num_rhalfs) (default: 7.5).
/// npixels : int, optional
///     Pixels per side (default: 256).
/// weights : array_like, optional
///     Source weights, e.g. masses or fluxes. Unit weights when omitted.
/// pixel_units : str, optional
///     "per_area" (surface density) or "per_pixel" (default: "per_area").
/// cull_out_of_range : bool, optional
///     Drop sources outside the domain before deposition (default: True).
/// parallel : bool, optional
///     Use all CPU cores (default: True).
///
/// Returns
/// -------
/// ndarray
///     A (npixels, npixels) array with the value at each pixel centre.
#[pyfunction]
#[pyo3(signature = (
    x, y, hsml,
    num_rhalfs=7.5,
    npixels=256,
    weights=None,
    pixel_units="per_area",
    cull_out_of_range=true,
    parallel=true
))]
#[allow(clippy::too_many_arguments)]
fn adaptive_smoothing<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<'py, f64>,
    y: PyReadonlyArray1<'py, f64>,
    hsml: PyReadonlyArray1<'py, f64>,
    num_rhalfs: f64,
    npixels: usize,
    weights: Option<PyReadonlyArray1<'py, f64>>,
    pixel_units: &str,
    cull_out_of_range: bool,
    parallel: bool,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let x_slice = x.as_slice().map_err(to_py_error)?;
    let y_slice = y.as_slice().map_err(to_py_error)?;
    let hsml_slice = hsml.as_slice().map_err(to_py_error)?;
    let weights_slice = match weights.as_ref() {
        Some(w) => Some(w.as_slice().map_err(to_py_error)?),
        None => None,
    };

    let units = parse_pixel_units(pixel_units)?;

    let image = Smoothing::new()
        .num_rhalfs(num_rhalfs)
        .npixels(npixels)
        .pixel_units(units)
        .cull_out_of_range(cull_out_of_range)
        .adapter(Batch)
        .parallel(parallel)
        .build()
        .map_err(to_py_error)?
        .render_array(x_slice, y_slice, hsml_slice, weights_slice)
        .map_err(to_py_error)?;

    Ok(image.into_pyarray(py))
}

/// Distance from each particle to its num_neighbors-th nearest neighbour.
///
/// Parameters
/// ----------
/// pos : array_like
///     (n, 3) array of particle positions.
/// num_neighbors : int, optional
///     Neighbour rank (default: 16).
/// parallel : bool, optional
///     Use all CPU cores (default: True).
#[pyfunction]
#[pyo3(signature = (pos, num_neighbors=16, parallel=true))]
fn smoothing_lengths<'py>(
    py: Python<'py>,
    pos: PyReadonlyArray2<'py, f64>,
    num_neighbors: usize,
    parallel: bool,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let view = pos.as_array();
    let positions = view.as_positions().map_err(to_py_error)?;
    Validator::validate_positions(&positions).map_err(to_py_error)?;
    Validator::validate_neighbor_count(num_neighbors, positions.len()).map_err(to_py_error)?;

    let lengths = if parallel {
        neighbor_pass_parallel(&positions, num_neighbors)
    } else {
        neighbor_pass(&positions, num_neighbors)
    };

    Ok(PyArray1::from_vec(py, lengths))
}

/// Render simulation particles: centre, scale, project and smooth.
///
/// Parameters
/// ----------
/// pos : array_like
///     (n, 3) array of particle positions.
/// center : sequence of 3 floats
///     Image centre in simulation units.
/// scale_length : float
///     Length unit of the image (e.g. the stellar half-mass radius).
/// num_rhalfs : float, optional
///     Half-width of the image in scale lengths (default: 7.5).
/// npixels : int, optional
///     Pixels per side (default: 256).
/// weights : array_like, optional
///     Particle weights. Unit weights when omitted.
/// projection : str, optional
///     "xy", "yz", "zx", "planar", "edgeon" or "faceon" (default: "xy").
/// jvec : sequence of 3 floats, optional
///     Angular momentum vector for the planar, edgeon and faceon projections.
/// box_size : float, optional
///     Periodic box size; positions are wrapped about the centre.
/// softening : float, optional
///     Softening length; smoothing lengths are floored at 2.8 softenings.
/// num_neighbors : int, optional
///     Neighbour rank for the smoothing lengths (default: 16).
/// pixel_units : str, optional
///     "per_area" or "per_pixel" (default: "per_area").
/// return_diagnostics : bool, optional
///     Whether to compute image diagnostics.
/// parallel : bool, optional
///     Use all CPU cores (default: True).
#[pyfunction]
#[pyo3(signature = (
    pos, center, scale_length,
    num_rhalfs=7.5,
    npixels=256,
    weights=None,
    projection="xy",
    jvec=None,
    box_size=None,
    softening=None,
    num_neighbors=16,
    pixel_units="per_area",
    return_diagnostics=false,
    parallel=true
))]
#[allow(clippy::too_many_arguments)]
fn render_particles<'py>(
    pos: PyReadonlyArray2<'py, f64>,
    center: [f64; 3],
    scale_length: f64,
    num_rhalfs: f64,
    npixels: usize,
    weights: Option<PyReadonlyArray1<'py, f64>>,
    projection: &str,
    jvec: Option<[f64; 3]>,
    box_size: Option<f64>,
    softening: Option<f64>,
    num_neighbors: usize,
    pixel_units: &str,
    return_diagnostics: bool,
    parallel: bool,
) -> PyResult<PySmoothedImage> {
    let positions = pos.as_array();
    let weights_slice = match weights.as_ref() {
        Some(w) => Some(w.as_slice().map_err(to_py_error)?),
        None => None,
    };

    let mut frame =
        ParticleFrame::new(center, scale_length).projection(parse_projection(projection, jvec)?);
    if let Some(size) = box_size {
        frame = frame.periodic(size);
    }
    if let Some(eps) = softening {
        frame = frame.softening(eps);
    }

    let mut builder = Smoothing::new()
        .num_rhalfs(num_rhalfs)
        .npixels(npixels)
        .pixel_units(parse_pixel_units(pixel_units)?);
    if return_diagnostics {
        builder = builder.return_diagnostics();
    }

    let image = builder
        .adapter(Batch)
        .parallel(parallel)
        .build()
        .map_err(to_py_error)?
        .render_particles(&frame, &positions, weights_slice, num_neighbors)
        .map_err(to_py_error)?;

    Ok(PySmoothedImage { inner: image })
}

/// Normalized 2-D cubic-spline kernel W(r, h) for support radius h.
#[pyfunction]
fn sph_kernel(r: f64, h: f64) -> f64 {
    CubicSpline::evaluate(r, h)
}

/// Pixel index of coordinate r on an npix-pixel axis spanning (-num_rhalfs, num_rhalfs).
#[pyfunction]
fn rhalfs_to_pixels(r: f64, npix: usize, num_rhalfs: f64) -> i64 {
    coordinate_to_pixel(r, npix, num_rhalfs)
}

// ============================================================================
// Module Registration
// ============================================================================

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySmoothedImage>()?;
    m.add_class::<PyDiagnostics>()?;
    m.add_function(wrap_pyfunction!(adaptive_smoothing, m)?)?;
    m.add_function(wrap_pyfunction!(smoothing_lengths, m)?)?;
    m.add_function(wrap_pyfunction!(render_particles, m)?)?;
    m.add_function(wrap_pyfunction!(sph_kernel, m)?)?;
    m.add_function(wrap_pyfunction!(rhalfs_to_pixels, m)?)?;
    Ok(())
}
