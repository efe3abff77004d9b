//! Spatial extent of quadmesh vertices.

use chunked_array::CoordArray;
use swath_common::BoundingBox;

use crate::assembly::check_quadmesh;
use crate::error::Result;

/// Bounding box of every finite vertex, or `None` when no vertex is finite.
/// Forces evaluation of lazy input.
pub fn quadmesh_extent(vertices: &CoordArray) -> Result<Option<BoundingBox>> {
    check_quadmesh(vertices)?;
    let mesh = vertices.to_array4()?;
    let points = mesh
        .lanes(ndarray::Axis(3))
        .into_iter()
        .map(|p| (p[0], p[1]));
    Ok(BoundingBox::from_points(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn test_extent() {
        let mut data = Array4::<f64>::zeros((1, 2, 4, 2));
        data[[0, 1, 2, 0]] = 12.5;
        data[[0, 0, 3, 1]] = -3.0;
        data[[0, 1, 1, 0]] = f64::NAN;
        let bbox = quadmesh_extent(&data.into()).unwrap().unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, -3.0, 12.5, 0.0));
    }

    #[test]
    fn test_extent_all_nan() {
        let data = Array4::<f64>::from_elem((1, 1, 4, 2), f64::NAN);
        assert!(quadmesh_extent(&data.into()).unwrap().is_none());
    }
}
