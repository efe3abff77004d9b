//! End-to-end pipelines from centroids to quadmesh vertices.

use chunked_array::CoordArray;
use swath_common::VertexOrder;
use tracing::{debug, warn};

use crate::assembly::get_quadmesh_from_corners;
use crate::corners::{get_lonlat_corners_from_centroids, get_projection_corners_from_centroids};
use crate::error::Result;
use crate::validity::antimeridian_mask;

/// `(R, C, 4, 2)` vertices of projected centroids.
pub fn get_projection_quadmesh_vertices(
    x: &CoordArray,
    y: &CoordArray,
    order: VertexOrder,
) -> Result<CoordArray> {
    let (x_corners, y_corners) = get_projection_corners_from_centroids(x, y)?;
    get_quadmesh_from_corners(&x_corners, &y_corners, order)
}

/// `(R, C, 4, 2)` vertices of longitude/latitude centroids, with `(lon,
/// lat)` on the last axis.
///
/// Cells that cross the antimeridian are not split or unwrapped. Their
/// vertices span the globe; for eager 2D input the number of such cells is
/// logged as a warning.
pub fn get_lonlat_quadmesh_vertices(
    lon: &CoordArray,
    lat: &CoordArray,
    order: VertexOrder,
) -> Result<CoordArray> {
    let (lon_corners, lat_corners) = get_lonlat_corners_from_centroids(lon, lat)?;

    if !lon.is_lazy() && lon.ndim() == 2 {
        let crossing = antimeridian_mask(lon, false)?
            .iter()
            .filter(|&&flagged| flagged)
            .count();
        if crossing > 0 {
            warn!(
                cells = crossing,
                "Centroids cross the antimeridian; vertices of these cells are not unwrapped"
            );
        }
    }

    debug!(shape = ?lon_corners.shape(), %order, "Lon/lat quadmesh");
    get_quadmesh_from_corners(&lon_corners, &lat_corners, order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, s};
    use test_utils::{assert_allclose, fixtures::projected, fixtures::wgs84};

    #[test]
    fn test_projection_vertices() {
        let x = CoordArray::from(projected::centroids());
        let vertices = get_projection_quadmesh_vertices(&x, &x, VertexOrder::CounterClockwise)
            .unwrap()
            .to_array4()
            .unwrap();
        assert_eq!(vertices.shape(), &[2, 2, 4, 2]);
        assert_allclose!(vertices.slice(s![0, 0, .., 0]), array![-10.0, 0.0, 10.0, 0.0]);
        assert_allclose!(vertices.slice(s![0, 0, .., 1]), array![-10.0, 0.0, 10.0, 0.0]);
    }

    #[test]
    fn test_lonlat_vertices_counterclockwise() {
        let vertices = get_lonlat_quadmesh_vertices(
            &wgs84::lons().into(),
            &wgs84::lats().into(),
            VertexOrder::CounterClockwise,
        )
        .unwrap()
        .to_array4()
        .unwrap();
        assert_allclose!(
            vertices.slice(s![0, 0, .., 0]),
            array![-14.27407497, 5.19757839, 15.08698583, -4.80531025],
            wgs84::TOLERANCE
        );
        assert_allclose!(
            vertices.slice(s![0, 0, .., 1]),
            array![11.79157893, 2.51977904, 7.6452206, 16.74949943],
            wgs84::TOLERANCE
        );
    }

    #[test]
    fn test_lonlat_vertices_clockwise() {
        let vertices = get_lonlat_quadmesh_vertices(
            &wgs84::lons().into(),
            &wgs84::lats().into(),
            VertexOrder::Clockwise,
        )
        .unwrap()
        .to_array4()
        .unwrap();
        assert_allclose!(
            vertices.slice(s![0, 0, .., 0]),
            array![-14.27407497, -4.80531025, 15.08698583, 5.19757839],
            wgs84::TOLERANCE
        );
        assert_allclose!(
            vertices.slice(s![0, 0, .., 1]),
            array![11.79157893, 16.74949943, 7.6452206, 2.51977904],
            wgs84::TOLERANCE
        );
    }

    #[test]
    fn test_lonlat_vertices_lazy() {
        let lon = CoordArray::lazy(wgs84::lons(), &[1, 2]).unwrap();
        let lat = CoordArray::lazy(wgs84::lats(), &[1, 2]).unwrap();
        let vertices = get_lonlat_quadmesh_vertices(&lon, &lat, VertexOrder::Clockwise).unwrap();
        assert!(vertices.is_lazy());
        assert_eq!(vertices.shape(), vec![2, 2, 4, 2]);
    }

    #[test]
    fn test_lonlat_vertices_across_antimeridian() {
        let lon = CoordArray::from(array![[-175.0, 175.0], [-175.0, 175.0]]);
        let lat = CoordArray::from(array![[10.0, 10.0], [-10.0, -10.0]]);
        assert!(antimeridian_mask(&lon, false).unwrap().iter().all(|&f| f));

        let vertices =
            get_lonlat_quadmesh_vertices(&lon, &lat, VertexOrder::CounterClockwise).unwrap();
        assert_eq!(vertices.shape(), vec![2, 2, 4, 2]);

        let lazy_lon = CoordArray::lazy(lon.to_array2().unwrap(), &[1, 1]).unwrap();
        let lazy_lat = CoordArray::lazy(lat.to_array2().unwrap(), &[1, 1]).unwrap();
        let lazy = get_lonlat_quadmesh_vertices(&lazy_lon, &lazy_lat, VertexOrder::CounterClockwise)
            .unwrap();
        assert_allclose!(lazy.compute(), vertices.compute(), 1e-9);
    }

    #[test]
    fn test_vertices_reject_mixed_backends() {
        let eager = CoordArray::from(wgs84::lons());
        let lazy = CoordArray::lazy(wgs84::lats(), &[1, 1]).unwrap();
        let err = get_lonlat_quadmesh_vertices(&eager, &lazy, VertexOrder::Clockwise).unwrap_err();
        assert_eq!(err.kind(), "backend_mismatch");
    }
}
