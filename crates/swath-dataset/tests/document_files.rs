//! Reading dataset documents from disk and deriving quadmeshes.

use std::io::Write;

use chunked_array::ChunkConfig;
use ndarray::array;
use swath_common::{BoundingBox, VertexOrder};
use swath_dataset::{DatasetDocument, DatasetError, SpatialLayout};
use tempfile::NamedTempFile;
use test_utils::{assert_allclose, fixtures};

#[test]
fn test_projected_grid_from_file() {
    let file = fixtures::write_document(&fixtures::projected_grid_document());
    let dataset = DatasetDocument::from_path(file.path())
        .unwrap()
        .into_dataset()
        .unwrap();
    assert_eq!(dataset.layout().unwrap(), SpatialLayout::Grid);

    let (x, y) = dataset.quadmesh_corners().unwrap();
    assert_allclose!(
        x.to_array2().unwrap(),
        array![[-5.0, 5.0, 15.0, 25.0], [-5.0, 5.0, 15.0, 25.0], [-5.0, 5.0, 15.0, 25.0]]
    );
    assert_allclose!(
        y.to_array2().unwrap(),
        array![[15.0, 15.0, 15.0, 15.0], [5.0, 5.0, 5.0, 5.0], [-5.0, -5.0, -5.0, -5.0]]
    );
    assert_eq!(
        dataset.extent().unwrap(),
        Some(BoundingBox::new(-5.0, -5.0, 25.0, 15.0))
    );
}

#[test]
fn test_swath_polygons_lazy_and_eager_agree() {
    let file = fixtures::write_document(&fixtures::lonlat_swath_document());
    let dataset = DatasetDocument::from_path(file.path())
        .unwrap()
        .into_dataset()
        .unwrap();
    assert_eq!(dataset.layout().unwrap(), SpatialLayout::Orbit);

    let eager = dataset.quadmesh_polygons(VertexOrder::Clockwise).unwrap();
    let lazy = dataset
        .into_lazy(&ChunkConfig::with_chunk_size(1))
        .unwrap()
        .quadmesh_polygons(VertexOrder::Clockwise)
        .unwrap();
    assert_eq!(eager.len(), 4);
    for (a, b) in eager.iter().zip(&lazy) {
        assert_eq!(a[0], a[4]);
        for (p, q) in a.iter().zip(b) {
            assert!((p[0] - q[0]).abs() < 1e-9 && (p[1] - q[1]).abs() < 1e-9);
        }
    }
}

#[test]
fn test_missing_file() {
    let err = DatasetDocument::from_path("/nonexistent/swath.json").unwrap_err();
    assert!(matches!(err, DatasetError::IoError(_)));
}

#[test]
fn test_malformed_json() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{\"crs\": ").unwrap();
    let err = DatasetDocument::from_path(file.path()).unwrap_err();
    assert!(matches!(err, DatasetError::JsonError(_)));
}
