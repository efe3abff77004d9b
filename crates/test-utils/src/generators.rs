//! Synthetic centroid generators.
//!
//! These generators create predictable, verifiable coordinate patterns
//! that can be used across the test suite.

use ndarray::{Array1, Array2};

/// Creates a grid with predictable values.
///
/// Each cell value is `row * 100 + col`, which makes it easy to spot
/// transposed or shifted output.
///
/// # Example
///
/// ```
/// use test_utils::ramp;
///
/// let grid = ramp(3, 4);
/// assert_eq!(grid[[0, 1]], 1.0);
/// assert_eq!(grid[[2, 3]], 203.0);
/// ```
pub fn ramp(rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(i, j)| (i * 100 + j) as f64)
}

/// Centroids of a regular projected grid, laid out like an image: `x`
/// increases along columns and `y` decreases down the rows.
///
/// Returns `(x, y)`, each of shape `(rows, cols)`.
pub fn affine_centroids(
    rows: usize,
    cols: usize,
    origin: (f64, f64),
    step: (f64, f64),
) -> (Array2<f64>, Array2<f64>) {
    let (x0, y0) = origin;
    let (dx, dy) = step;
    let x = Array2::from_shape_fn((rows, cols), |(_, j)| x0 + j as f64 * dx);
    let y = Array2::from_shape_fn((rows, cols), |(i, _)| y0 - i as f64 * dy);
    (x, y)
}

/// Centroids of a sheared projected grid, where every row is offset by
/// `shear` along x.
pub fn sheared_centroids(
    rows: usize,
    cols: usize,
    step: f64,
    shear: f64,
) -> (Array2<f64>, Array2<f64>) {
    let x = Array2::from_shape_fn((rows, cols), |(i, j)| j as f64 * step + i as f64 * shear);
    let y = Array2::from_shape_fn((rows, cols), |(i, _)| -(i as f64) * step);
    (x, y)
}

/// Longitude/latitude centroids of a descending satellite swath.
///
/// Scan lines run along rows. Latitude decreases by `step` degrees per scan
/// line starting at `start_lat`; longitude spans `cols` footprints of `step`
/// degrees centred on `center_lon`, drifting west by `drift` degrees per
/// scan line.
pub fn lonlat_swath(
    rows: usize,
    cols: usize,
    center_lon: f64,
    start_lat: f64,
    step: f64,
    drift: f64,
) -> (Array2<f64>, Array2<f64>) {
    let half = (cols as f64 - 1.0) / 2.0;
    let lons = Array2::from_shape_fn((rows, cols), |(i, j)| {
        center_lon + (j as f64 - half) * step - i as f64 * drift
    });
    let lats = Array2::from_shape_fn((rows, cols), |(i, _)| start_lat - i as f64 * step);
    (lons, lats)
}

/// Evenly spaced 1D axis of `len` values starting at `start`.
pub fn regular_axis(len: usize, start: f64, step: f64) -> Array1<f64> {
    Array1::from_shape_fn(len, |k| start + k as f64 * step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affine_centroids_layout() {
        let (x, y) = affine_centroids(2, 3, (100.0, 50.0), (10.0, 5.0));
        assert_eq!(x.row(0).to_vec(), vec![100.0, 110.0, 120.0]);
        assert_eq!(y.column(0).to_vec(), vec![50.0, 45.0]);
    }

    #[test]
    fn test_lonlat_swath_is_centred() {
        let (lons, lats) = lonlat_swath(4, 5, 20.0, 60.0, 1.0, 0.5);
        assert_eq!(lons[[0, 2]], 20.0);
        assert_eq!(lons[[2, 2]], 19.0);
        assert_eq!(lats[[3, 0]], 57.0);
    }

    #[test]
    fn test_regular_axis() {
        assert_eq!(regular_axis(3, -5.0, 2.5).to_vec(), vec![-5.0, -2.5, 0.0]);
    }
}
