//! Round-trip properties of the corner and quadmesh conversions.

use chunked_array::CoordArray;
use ndarray::{Array1, Array2};
use proptest::prelude::*;
use quadmesh::{
    from_bounds_to_corners, from_corners_to_bounds, geocentric_to_geographic,
    geographic_to_geocentric, get_centroids_from_corners, get_corners_from_centroids,
    get_corners_from_quadmesh, get_quadmesh_from_corners, infer_interval_breaks, VertexOrder,
};
use test_utils::assert_allclose;

fn order() -> impl Strategy<Value = VertexOrder> {
    prop_oneof![Just(VertexOrder::Clockwise), Just(VertexOrder::CounterClockwise)]
}

fn grid(rows: usize, cols: usize) -> impl Strategy<Value = Array2<f64>> {
    prop::collection::vec(-1e6..1e6f64, rows * cols)
        .prop_map(move |values| Array2::from_shape_vec((rows, cols), values).unwrap())
}

fn sized_grid() -> impl Strategy<Value = Array2<f64>> {
    (2usize..7, 2usize..7).prop_flat_map(|(rows, cols)| grid(rows, cols))
}

proptest! {
    #[test]
    fn prop_bounds_roundtrip(corners in sized_grid(), order in order()) {
        let bounds = from_corners_to_bounds(&corners.clone().into(), order).unwrap();
        let back = from_bounds_to_corners(&bounds, order).unwrap();
        prop_assert_eq!(back.to_array2().unwrap(), corners);
    }

    #[test]
    fn prop_quadmesh_roundtrip(
        (x, y) in (2usize..6, 2usize..6).prop_flat_map(|(r, c)| (grid(r, c), grid(r, c))),
        order in order(),
    ) {
        let mesh = get_quadmesh_from_corners(&x.clone().into(), &y.clone().into(), order).unwrap();
        let (xc, yc) = get_corners_from_quadmesh(&mesh, order).unwrap();
        prop_assert_eq!(xc.to_array2().unwrap(), x);
        prop_assert_eq!(yc.to_array2().unwrap(), y);
    }

    #[test]
    fn prop_affine_corner_roundtrip(
        rows in 2usize..8,
        cols in 2usize..8,
        a in -100.0..100.0f64,
        b in -100.0..100.0f64,
        c in -1000.0..1000.0f64,
    ) {
        let field = Array2::from_shape_fn((rows, cols), |(i, j)| a * i as f64 + b * j as f64 + c);
        let corners = get_corners_from_centroids(&field.clone().into()).unwrap();
        prop_assert_eq!(corners.shape(), vec![rows + 1, cols + 1]);
        let back = get_centroids_from_corners(&corners).unwrap();
        assert_allclose!(back.to_array2().unwrap(), field, 1e-9);
    }

    #[test]
    fn prop_interval_breaks_midpoints(
        start in -1e3..1e3f64,
        steps in prop::collection::vec(0.1..100.0f64, 1..20),
    ) {
        let mut values = vec![start];
        for step in &steps {
            let next = values[values.len() - 1] + step;
            values.push(next);
        }
        let n = values.len();
        let breaks = infer_interval_breaks(&Array1::from(values.clone()).into(), 0)
            .unwrap()
            .to_array1()
            .unwrap();
        prop_assert_eq!(breaks.len(), n + 1);
        for i in 1..n {
            prop_assert!((breaks[i] - (values[i - 1] + values[i]) / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn prop_geocentric_roundtrip(
        lon in -179.9..179.9f64,
        lat in -89.9..89.9f64,
        height in -500.0..10_000.0f64,
    ) {
        let lon_a = CoordArray::from_vec(vec![lon]);
        let lat_a = CoordArray::from_vec(vec![lat]);
        let h_a = CoordArray::from_vec(vec![height]);
        let [x, y, z] = geographic_to_geocentric(&lon_a, &lat_a, Some(&h_a)).unwrap();
        let [lon2, lat2, h2] = geocentric_to_geographic(&x, &y, &z).unwrap();
        prop_assert!((lon2.to_array1().unwrap()[0] - lon).abs() < 1e-9);
        prop_assert!((lat2.to_array1().unwrap()[0] - lat).abs() < 1e-9);
        prop_assert!((h2.to_array1().unwrap()[0] - height).abs() < 1e-5);
    }
}
