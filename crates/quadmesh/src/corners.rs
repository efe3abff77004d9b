//! Corner extrapolation from cell centroids and its inverse.
//!
//! # Paths
//!
//! ```text
//! (x, y) centroids
//!      │
//!      ▼
//! classify_centroids
//!      │
//!      ├─► Axes1d       ─► interval breaks per axis, meshgrid
//!      │
//!      ├─► SingleRow    ─┐
//!      ├─► SingleColumn ─┴► breaks along the track, offset across it
//!      │
//!      └─► Grid2d       ─► pad by extrapolation, average 2×2 blocks
//!                           (lon/lat: in geocentric space)
//! ```

use chunked_array::CoordArray;
use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geocentric::{geocentric_to_geographic, geographic_to_geocentric};
use crate::interval::infer_interval_breaks;
use crate::layout::{check_ndim, classify_centroids, CentroidLayout};
use crate::swath::{lonlat_track_corners, projection_track_corners, Track};

/// A pair of corner grids, `(x, y)` or `(lon, lat)`.
pub type CornerPair = (CoordArray, CoordArray);

/// Extend `array` by one element at each end of `axis`, extrapolating the
/// first and last spacing linearly.
fn pad_by_extrapolation(array: &CoordArray, axis: usize) -> Result<CoordArray> {
    let n = array.len_of(axis);
    let first = array.slice_axis(axis, 0, 1)?;
    let second = array.slice_axis(axis, 1, 2)?;
    let last = array.slice_axis(axis, n - 1, n)?;
    let before_last = array.slice_axis(axis, n - 2, n - 1)?;

    let head = CoordArray::weighted_sum(&[(&first, 2.0), (&second, -1.0)])?;
    let tail = CoordArray::weighted_sum(&[(&last, 2.0), (&before_last, -1.0)])?;
    Ok(CoordArray::concatenate(
        axis,
        &[head, array.clone(), tail],
    )?)
}

/// Mean of every 2×2 block of a 2D array. Output is one smaller along both
/// axes.
fn block_means(array: &CoordArray) -> Result<CoordArray> {
    let (rows, cols) = (array.len_of(0), array.len_of(1));
    let top = array.slice_axis(0, 0, rows - 1)?;
    let bottom = array.slice_axis(0, 1, rows)?;

    let top_left = top.slice_axis(1, 0, cols - 1)?;
    let top_right = top.slice_axis(1, 1, cols)?;
    let bottom_left = bottom.slice_axis(1, 0, cols - 1)?;
    let bottom_right = bottom.slice_axis(1, 1, cols)?;

    Ok(CoordArray::weighted_sum(&[
        (&top_left, 0.25),
        (&top_right, 0.25),
        (&bottom_left, 0.25),
        (&bottom_right, 0.25),
    ])?)
}

/// Require a 2D array with at least two elements along both axes.
fn check_grid(array: &CoordArray, what: &str) -> Result<()> {
    check_ndim(array, 2, "2")?;
    if array.len_of(0) < 2 || array.len_of(1) < 2 {
        return Err(GeometryError::degenerate(format!(
            "{what} of shape {:?} needs at least 2 rows and 2 columns",
            array.shape()
        )));
    }
    Ok(())
}

/// Corner grid `(R + 1, C + 1)` of a centroid grid `(R, C)`.
///
/// The grid is padded by one linearly extrapolated row and column on every
/// side, then each corner is the mean of the four surrounding values. The
/// result is exact for affine fields.
pub fn get_corners_from_centroids(centroids: &CoordArray) -> Result<CoordArray> {
    check_grid(centroids, "centroid grid")?;
    let padded = pad_by_extrapolation(&pad_by_extrapolation(centroids, 1)?, 0)?;
    block_means(&padded)
}

/// Centroid grid `(R, C)` of a corner grid `(R + 1, C + 1)`: the mean of
/// every 2×2 block of corners.
pub fn get_centroids_from_corners(corners: &CoordArray) -> Result<CoordArray> {
    check_grid(corners, "corner grid")?;
    block_means(corners)
}

/// Corner grids of projected centroids.
///
/// Accepts two 2D grids of the same shape, including single-row and
/// single-column swaths, or two 1D axes (see
/// [`get_projection_corners_from_1d_centroids`]).
pub fn get_projection_corners_from_centroids(x: &CoordArray, y: &CoordArray) -> Result<CornerPair> {
    let layout = classify_centroids(x, y)?;
    debug!(?layout, backend = %x.backend(), "Projection corners");
    match layout {
        CentroidLayout::Axes1d { .. } => get_projection_corners_from_1d_centroids(x, y),
        CentroidLayout::SingleRow { .. } => projection_track_corners(x, y, Track::Row),
        CentroidLayout::SingleColumn { .. } => projection_track_corners(x, y, Track::Column),
        CentroidLayout::Grid2d { .. } => Ok((
            get_corners_from_centroids(x)?,
            get_corners_from_centroids(y)?,
        )),
    }
}

/// Corner grids of a regular grid given by its 1D axes.
///
/// Returns two `(len(y) + 1, len(x) + 1)` grids. Row 0 holds the break past
/// the last `y` sample, so ascending `y` puts the largest value on top. An
/// axis with a single sample spans half the first step of the other axis on
/// each side.
pub fn get_projection_corners_from_1d_centroids(
    x: &CoordArray,
    y: &CoordArray,
) -> Result<CornerPair> {
    match classify_centroids(x, y)? {
        CentroidLayout::Axes1d { nx, ny } => {
            let x_breaks = axis_breaks(x, y)?;
            let y_breaks = axis_breaks(y, x)?;
            let x_corners = x_breaks.broadcast_axis(0, ny + 1)?;
            let y_corners = y_breaks.reverse_axis(0)?.broadcast_axis(1, nx + 1)?;
            Ok((x_corners, y_corners))
        }
        _ => Err(GeometryError::unsupported_dimensionality("1", x.ndim())),
    }
}

/// Breaks of a 1D axis. A singleton axis borrows half the first step of
/// `other` as its half-width.
fn axis_breaks(axis: &CoordArray, other: &CoordArray) -> Result<CoordArray> {
    if axis.len_of(0) >= 2 {
        return infer_interval_breaks(axis, 0);
    }
    let step = other.slice_axis(0, 1, 2)?.sub(&other.slice_axis(0, 0, 1)?)?;
    let half_width = step.map(|d| d.abs() / 2.0);
    let lower = axis.sub(&half_width)?;
    let upper = axis.add(&half_width)?;
    Ok(CoordArray::concatenate(0, &[lower, upper])?)
}

/// Corner grids of longitude/latitude centroids (degrees).
///
/// 2D grids are averaged in WGS84 geocentric space, so corners stay
/// consistent near the poles; heights are discarded on the way back. 1D axes
/// are treated as a regular lon/lat grid and handled in degrees.
pub fn get_lonlat_corners_from_centroids(lon: &CoordArray, lat: &CoordArray) -> Result<CornerPair> {
    let layout = classify_centroids(lon, lat)?;
    debug!(?layout, backend = %lon.backend(), "Lon/lat corners");
    match layout {
        CentroidLayout::Axes1d { .. } => get_projection_corners_from_1d_centroids(lon, lat),
        CentroidLayout::SingleRow { .. } => lonlat_track_corners(lon, lat, Track::Row),
        CentroidLayout::SingleColumn { .. } => lonlat_track_corners(lon, lat, Track::Column),
        CentroidLayout::Grid2d { .. } => {
            let [x, y, z] = geographic_to_geocentric(lon, lat, None)?;
            let corners = [
                get_corners_from_centroids(&x)?,
                get_corners_from_centroids(&y)?,
                get_corners_from_centroids(&z)?,
            ];
            let [lon, lat, _] = geocentric_to_geographic(&corners[0], &corners[1], &corners[2])?;
            Ok((lon, lat))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};
    use test_utils::{assert_allclose, fixtures::projected, fixtures::wgs84};

    #[test]
    fn test_corners_from_centroids() {
        let corners = get_corners_from_centroids(&projected::centroids().into()).unwrap();
        assert_allclose!(corners.to_array2().unwrap(), projected::corners());
    }

    #[test]
    fn test_centroids_from_corners() {
        let corners = CoordArray::from(array![[0.0, 10.0, 20.0], [10.0, 20.0, 30.0], [20.0, 30.0, 40.0]]);
        let centroids = get_centroids_from_corners(&corners).unwrap();
        assert_allclose!(centroids.to_array2().unwrap(), array![[10.0, 20.0], [20.0, 30.0]]);
    }

    #[test]
    fn test_affine_roundtrip() {
        let field = Array2::from_shape_fn((4, 5), |(i, j)| 3.0 * i as f64 - 2.0 * j as f64 + 7.0);
        let coords = CoordArray::from(field.clone());
        let back = get_centroids_from_corners(&get_corners_from_centroids(&coords).unwrap()).unwrap();
        assert_allclose!(back.to_array2().unwrap(), field, 1e-12);
    }

    #[test]
    fn test_corners_reject_thin_grids() {
        let row = CoordArray::from(array![[0.0, 1.0, 2.0]]);
        assert_eq!(get_corners_from_centroids(&row).unwrap_err().kind(), "degenerate_input");
        let flat = CoordArray::from_vec(vec![0.0, 1.0]);
        assert_eq!(
            get_corners_from_centroids(&flat).unwrap_err().kind(),
            "unsupported_dimensionality"
        );
    }

    #[test]
    fn test_projection_corners_2d() {
        let x = CoordArray::from(projected::centroids());
        let (xc, yc) = get_projection_corners_from_centroids(&x, &x).unwrap();
        assert_allclose!(xc.to_array2().unwrap(), projected::corners());
        assert_allclose!(yc.to_array2().unwrap(), projected::corners());
    }

    #[test]
    fn test_projection_corners_from_1d() {
        let x = CoordArray::from_vec(vec![0.0, 10.0, 20.0]);
        let y = CoordArray::from_vec(vec![0.0, 10.0]);
        let (xc, yc) = get_projection_corners_from_1d_centroids(&x, &y).unwrap();
        assert_allclose!(
            xc.to_array2().unwrap(),
            array![
                [-5.0, 5.0, 15.0, 25.0],
                [-5.0, 5.0, 15.0, 25.0],
                [-5.0, 5.0, 15.0, 25.0]
            ]
        );
        assert_allclose!(
            yc.to_array2().unwrap(),
            array![
                [15.0, 15.0, 15.0, 15.0],
                [5.0, 5.0, 5.0, 5.0],
                [-5.0, -5.0, -5.0, -5.0]
            ]
        );
    }

    #[test]
    fn test_projection_corners_from_1d_singleton_y() {
        let x = CoordArray::from_vec(vec![0.0, 10.0, 20.0]);
        let y = CoordArray::from_vec(vec![0.0]);
        let (xc, yc) = get_projection_corners_from_1d_centroids(&x, &y).unwrap();
        assert_eq!(xc.shape(), vec![2, 4]);
        assert_allclose!(
            yc.to_array2().unwrap(),
            array![[5.0, 5.0, 5.0, 5.0], [-5.0, -5.0, -5.0, -5.0]]
        );
    }

    #[test]
    fn test_projection_corners_from_1d_singleton_x() {
        let x = CoordArray::from_vec(vec![0.0]);
        let y = CoordArray::from_vec(vec![0.0, 10.0, 20.0]);
        let (xc, yc) = get_projection_corners_from_centroids(&x, &y).unwrap();
        assert_allclose!(
            xc.to_array2().unwrap(),
            array![[-5.0, 5.0], [-5.0, 5.0], [-5.0, 5.0], [-5.0, 5.0]]
        );
        assert_allclose!(
            yc.to_array2().unwrap(),
            array![[25.0, 25.0], [15.0, 15.0], [5.0, 5.0], [-5.0, -5.0]]
        );
    }

    #[test]
    fn test_projection_corners_from_single_point() {
        let p = CoordArray::from_vec(vec![0.0]);
        let err = get_projection_corners_from_1d_centroids(&p, &p).unwrap_err();
        assert_eq!(err.kind(), "degenerate_input");
    }

    #[test]
    fn test_projection_corners_errors() {
        let x = CoordArray::from(array![[0.0, 1.0], [2.0, 3.0]]);
        let y3 = CoordArray::from(array![[0.0, 1.0, 2.0], [2.0, 3.0, 4.0]]);
        assert_eq!(
            get_projection_corners_from_centroids(&x, &y3).unwrap_err().kind(),
            "shape_mismatch"
        );

        let y1 = CoordArray::from_vec(vec![0.0, 1.0]);
        assert!(matches!(
            get_projection_corners_from_centroids(&x, &y1),
            Err(GeometryError::DimensionalityMismatch { .. })
        ));

        let lazy = CoordArray::lazy(array![[0.0, 1.0], [2.0, 3.0]], &[1, 1]).unwrap();
        assert_eq!(
            get_projection_corners_from_centroids(&x, &lazy).unwrap_err().kind(),
            "backend_mismatch"
        );
    }

    #[test]
    fn test_lonlat_corners() {
        let (lon, lat) = get_lonlat_corners_from_centroids(
            &wgs84::lons().into(),
            &wgs84::lats().into(),
        )
        .unwrap();
        assert_allclose!(lon.to_array2().unwrap(), wgs84::lon_corners(), wgs84::TOLERANCE);
        assert_allclose!(lat.to_array2().unwrap(), wgs84::lat_corners(), wgs84::TOLERANCE);
    }

    #[test]
    fn test_lonlat_corners_lazy() {
        let lon = CoordArray::lazy(wgs84::lons(), &[1, 1]).unwrap();
        let lat = CoordArray::lazy(wgs84::lats(), &[1, 1]).unwrap();
        let (lon_c, lat_c) = get_lonlat_corners_from_centroids(&lon, &lat).unwrap();
        assert!(lon_c.is_lazy() && lat_c.is_lazy());
        assert_allclose!(lon_c.to_array2().unwrap(), wgs84::lon_corners(), wgs84::TOLERANCE);
        assert_allclose!(lat_c.to_array2().unwrap(), wgs84::lat_corners(), wgs84::TOLERANCE);
    }

    #[test]
    fn test_lonlat_corners_regular_axes() {
        let lon = CoordArray::from_vec(vec![-10.0, 0.0, 10.0]);
        let lat = CoordArray::from_vec(vec![40.0, 50.0]);
        let (lon_c, lat_c) = get_lonlat_corners_from_centroids(&lon, &lat).unwrap();
        assert_allclose!(lon_c.to_array2().unwrap().row(0), array![-15.0, -5.0, 5.0, 15.0]);
        assert_allclose!(lat_c.to_array2().unwrap().column(0), array![55.0, 45.0, 35.0]);
    }
}
