//! C bindings for sphmap.
//!
//! The library builds as `libadaptive_smoothing`, so existing ctypes callers
//! that load it by that name and call `add` keep working unchanged. The
//! checked entry points (`sphmap_*`) validate their inputs and report errors
//! through a status code and an error string.

#![allow(non_snake_case)]
#![allow(unsafe_op_in_unsafe_fn)]

use std::ffi::CString;
use std::os::raw::{c_char, c_double, c_int, c_ulong};
use std::ptr;
use std::slice;

use fastSphmap::internals::algorithms::neighbors::neighbor_pass_parallel;
use fastSphmap::internals::engine::executor::deposit_pass_parallel;
use fastSphmap::prelude::{Batch, PerArea, PerPixel, Smoothing, SmoothedImage};
use sphmap::internals::algorithms::neighbors::smoothing_lengths;
use sphmap::internals::engine::validator::Validator;
use sphmap::prelude::{CubicSpline, accumulate};

/// Status returned by the checked entry points on success.
pub const SPHMAP_OK: c_int = 0;

/// Status returned by the checked entry points on failure.
pub const SPHMAP_ERROR: c_int = -1;

/// Rendered image passed across the FFI boundary.
/// `values` is allocated by Rust and must be released with `sphmap_free_image`.
#[repr(C)]
pub struct SphmapImage {
    /// Pixel values, cell `(i, j)` at `i * ny + j` (NULL on error)
    pub values: *mut c_double,
    /// Number of columns
    pub nx: c_ulong,
    /// Number of rows
    pub ny: c_ulong,
    /// Pixel side length in scale-length units
    pub pixel_size: c_double,
    /// Sources that reached the deposition step
    pub sources_used: c_ulong,
    /// `SPHMAP_OK` or `SPHMAP_ERROR`
    pub status: c_int,
    /// Error message (NULL if no error)
    pub error: *mut c_char,
}

impl Default for SphmapImage {
    fn default() -> Self {
        SphmapImage {
            values: ptr::null_mut(),
            nx: 0,
            ny: 0,
            pixel_size: f64::NAN,
            sources_used: 0,
            status: SPHMAP_OK,
            error: ptr::null_mut(),
        }
    }
}

/// Smoothing lengths passed across the FFI boundary.
/// `values` is allocated by Rust and must be released with `sphmap_free_lengths`.
#[repr(C)]
pub struct SphmapLengths {
    /// One length per particle, in input order (NULL on error)
    pub values: *mut c_double,
    /// Number of values
    pub len: c_ulong,
    /// `SPHMAP_OK` or `SPHMAP_ERROR`
    pub status: c_int,
    /// Error message (NULL if no error)
    pub error: *mut c_char,
}

impl Default for SphmapLengths {
    fn default() -> Self {
        SphmapLengths {
            values: ptr::null_mut(),
            len: 0,
            status: SPHMAP_OK,
            error: ptr::null_mut(),
        }
    }
}

/// Convert a Vec<f64> to a raw pointer.
fn vec_to_ptr(v: Vec<f64>) -> *mut c_double {
    let boxed = v.into_boxed_slice();
    Box::into_raw(boxed) as *mut c_double
}

/// Copy a message into a C string owned by the caller.
fn error_string(msg: &str) -> *mut c_char {
    CString::new(msg).unwrap_or_default().into_raw()
}

/// Create an error image with the given message.
fn error_image(msg: &str) -> SphmapImage {
    SphmapImage {
        status: SPHMAP_ERROR,
        error: error_string(msg),
        ..SphmapImage::default()
    }
}

/// Convert a rendered image to its FFI form.
fn image_to_c(image: SmoothedImage<f64>) -> SphmapImage {
    SphmapImage {
        nx: image.nx as c_ulong,
        ny: image.ny as c_ulong,
        pixel_size: image.pixel_size,
        sources_used: image.sources_used as c_ulong,
        values: vec_to_ptr(image.values),
        status: SPHMAP_OK,
        error: ptr::null_mut(),
    }
}

/// Borrow `n` values, treating a NULL pointer with `n == 0` as empty.
unsafe fn borrow<'a>(p: *const c_double, n: usize) -> Option<&'a [f64]> {
    if n == 0 {
        Some(&[])
    } else if p.is_null() {
        None
    } else {
        Some(slice::from_raw_parts(p, n))
    }
}

// ============================================================================
// Raw Accumulator
// ============================================================================

/// Grid shapes whose `i * ny + j` stride stays inside `nx * ny` cells.
fn stride_fits(nx: usize, ny: usize) -> bool {
    ny == 0 || (ny - 1) * ny + nx <= nx * ny
}

/// Deposit `npoints` sources onto the grid, adding into `Z`.
///
/// `X`, `Y` and `Z` hold `nx * ny` cells with cell `(i, j)` at `i * ny + j`.
/// Grids whose stride would run past `nx * ny` cells are left untouched.
///
/// # Safety
/// `X`, `Y` and `Z` must be valid for `nx * ny` doubles; `x0`, `y0`,
/// `weights` and `hsml` must be valid for `npoints` doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn add(
    X: *const c_double,
    Y: *const c_double,
    Z: *mut c_double,
    nx: c_int,
    ny: c_int,
    x0: *const c_double,
    y0: *const c_double,
    weights: *const c_double,
    hsml: *const c_double,
    npoints: c_int,
    num_rhalfs: c_double,
) {
    deposit(
        X, Y, Z, nx, ny, x0, y0, weights, hsml, npoints, num_rhalfs, false,
    );
}

/// Same as [`add`], spread over all CPU cores; the result is bit-identical.
///
/// # Safety
/// Same requirements as [`add`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn add_parallel(
    X: *const c_double,
    Y: *const c_double,
    Z: *mut c_double,
    nx: c_int,
    ny: c_int,
    x0: *const c_double,
    y0: *const c_double,
    weights: *const c_double,
    hsml: *const c_double,
    npoints: c_int,
    num_rhalfs: c_double,
) {
    deposit(
        X, Y, Z, nx, ny, x0, y0, weights, hsml, npoints, num_rhalfs, true,
    );
}

#[allow(clippy::too_many_arguments)]
unsafe fn deposit(
    X: *const c_double,
    Y: *const c_double,
    Z: *mut c_double,
    nx: c_int,
    ny: c_int,
    x0: *const c_double,
    y0: *const c_double,
    weights: *const c_double,
    hsml: *const c_double,
    npoints: c_int,
    num_rhalfs: c_double,
    parallel: bool,
) {
    if nx <= 0 || ny <= 0 || npoints <= 0 {
        return;
    }
    if X.is_null() || Y.is_null() || Z.is_null() {
        return;
    }
    let (nx, ny, n) = (nx as usize, ny as usize, npoints as usize);
    if !stride_fits(nx, ny) {
        return;
    }

    let (Some(x0), Some(y0), Some(w), Some(h)) = (
        borrow(x0, n),
        borrow(y0, n),
        borrow(weights, n),
        borrow(hsml, n),
    ) else {
        return;
    };

    let cells = nx * ny;
    let x_grid = slice::from_raw_parts(X, cells);
    let y_grid = slice::from_raw_parts(Y, cells);
    let z = slice::from_raw_parts_mut(Z, cells);

    if parallel {
        deposit_pass_parallel(x_grid, y_grid, z, nx, ny, x0, y0, w, h, num_rhalfs);
    } else {
        accumulate(x_grid, y_grid, z, nx, ny, x0, y0, w, h, num_rhalfs);
    }
}

/// Normalized cubic-spline kernel `W(r, h)` for support radius `h`.
#[unsafe(no_mangle)]
pub extern "C" fn sph_kernel(r: c_double, h: c_double) -> c_double {
    CubicSpline::evaluate(r, h)
}

/// Pixel index of coordinate `r` on an `npix`-pixel axis spanning `[-R, R]`.
#[unsafe(no_mangle)]
pub extern "C" fn rhalfs_to_pixels(r: c_double, npix: c_int, num_rhalfs: c_double) -> c_int {
    let npix = npix.max(0) as usize;
    let index = sphmap::prelude::rhalfs_to_pixels(r, npix, num_rhalfs);
    index.clamp(c_int::MIN as i64, c_int::MAX as i64) as c_int
}

// ============================================================================
// Checked Entry Points
// ============================================================================

/// Render sources onto an `npixels x npixels` grid over `[-num_rhalfs, num_rhalfs]^2`.
///
/// `weights` may be NULL for unit weights. Out-of-range sources are culled.
///
/// # Safety
/// `x0`, `y0`, `hsml` and (when not NULL) `weights` must be valid for
/// `npoints` doubles.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sphmap_render(
    x0: *const c_double,
    y0: *const c_double,
    hsml: *const c_double,
    weights: *const c_double,
    npoints: c_ulong,
    npixels: c_ulong,
    num_rhalfs: c_double,
    per_pixel: c_int,
    parallel: c_int,
) -> SphmapImage {
    let n = npoints as usize;
    let (Some(x), Some(y), Some(h)) = (borrow(x0, n), borrow(y0, n), borrow(hsml, n)) else {
        return error_image("Source arrays must not be null");
    };
    let w = if weights.is_null() {
        None
    } else {
        borrow(weights, n)
    };

    let units = if per_pixel != 0 { PerPixel } else { PerArea };
    let result = Smoothing::new()
        .num_rhalfs(num_rhalfs)
        .npixels(npixels as usize)
        .pixel_units(units)
        .adapter(Batch)
        .parallel(parallel != 0)
        .build()
        .and_then(|model| model.render(x, y, h, w));

    match result {
        Ok(image) => image_to_c(image),
        Err(e) => error_image(&e.to_string()),
    }
}

/// Distance from each of `n` particles to its `num_neighbors`-th nearest
/// neighbour in 3-D.
///
/// # Safety
/// `positions` must be valid for `3 * n` doubles (`x, y, z` per particle).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sphmap_smoothing_lengths(
    positions: *const c_double,
    n: c_ulong,
    num_neighbors: c_ulong,
    parallel: c_int,
) -> SphmapLengths {
    let n = n as usize;
    let Some(flat) = borrow(positions, n.saturating_mul(3)) else {
        return SphmapLengths {
            status: SPHMAP_ERROR,
            error: error_string("Position array must not be null"),
            ..SphmapLengths::default()
        };
    };
    let triples: Vec<[f64; 3]> = flat.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect();
    let k = num_neighbors as usize;

    let checked = Validator::validate_positions(&triples)
        .and_then(|_| Validator::validate_neighbor_count(k, triples.len()));
    if let Err(e) = checked {
        return SphmapLengths {
            status: SPHMAP_ERROR,
            error: error_string(&e.to_string()),
            ..SphmapLengths::default()
        };
    }

    let lengths = if parallel != 0 {
        neighbor_pass_parallel(&triples, k)
    } else {
        smoothing_lengths(&triples, k)
    };
    SphmapLengths {
        len: lengths.len() as c_ulong,
        values: vec_to_ptr(lengths),
        status: SPHMAP_OK,
        error: ptr::null_mut(),
    }
}

/// Release the memory held by an image.
///
/// # Safety
/// `image` must point to an image returned by `sphmap_render` that has not
/// been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sphmap_free_image(image: *mut SphmapImage) {
    if image.is_null() {
        return;
    }
    let image = &mut *image;

    if !image.values.is_null() {
        let len = (image.nx * image.ny) as usize;
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(image.values, len)));
        image.values = ptr::null_mut();
    }
    if !image.error.is_null() {
        drop(CString::from_raw(image.error));
        image.error = ptr::null_mut();
    }
}

/// Release the memory held by a set of smoothing lengths.
///
/// # Safety
/// `lengths` must point to a value returned by `sphmap_smoothing_lengths`
/// that has not been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sphmap_free_lengths(lengths: *mut SphmapLengths) {
    if lengths.is_null() {
        return;
    }
    let lengths = &mut *lengths;

    if !lengths.values.is_null() {
        let len = lengths.len as usize;
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(lengths.values, len)));
        lengths.values = ptr::null_mut();
    }
    if !lengths.error.is_null() {
        drop(CString::from_raw(lengths.error));
        lengths.error = ptr::null_mut();
    }
}
