//! Quadmesh assembly from corner grids and its inverse.

use chunked_array::CoordArray;
use swath_common::VertexOrder;
use tracing::debug;

use crate::bounds::{from_bounds_to_corners, from_corners_to_bounds};
use crate::corners::CornerPair;
use crate::error::{GeometryError, Result};
use crate::layout::{check_ndim, check_same_shape};

/// Assemble `(R, C, 4, 2)` vertices from `x` and `y` corner grids of shape
/// `(R + 1, C + 1)`.
///
/// The last axis holds `(x, y)`; the vertex axis follows `order`.
pub fn get_quadmesh_from_corners(
    x_corners: &CoordArray,
    y_corners: &CoordArray,
    order: VertexOrder,
) -> Result<CoordArray> {
    check_same_shape(x_corners, y_corners)?;
    debug!(shape = ?x_corners.shape(), %order, "Assembling quadmesh");
    let x = from_corners_to_bounds(x_corners, order)?;
    let y = from_corners_to_bounds(y_corners, order)?;
    Ok(CoordArray::stack(&[x, y])?)
}

/// Recover the `x` and `y` corner grids from quadmesh vertices assembled in
/// `order`.
pub fn get_corners_from_quadmesh(quadmesh: &CoordArray, order: VertexOrder) -> Result<CornerPair> {
    check_quadmesh(quadmesh)?;
    let x = from_bounds_to_corners(&quadmesh.index_axis(3, 0)?, order)?;
    let y = from_bounds_to_corners(&quadmesh.index_axis(3, 1)?, order)?;
    Ok((x, y))
}

/// Require an `(R, C, 4, 2)` array.
pub(crate) fn check_quadmesh(quadmesh: &CoordArray) -> Result<()> {
    check_ndim(quadmesh, 4, "4")?;
    let shape = quadmesh.shape();
    if shape[2] != 4 || shape[3] != 2 {
        return Err(GeometryError::shape_mismatch(
            &[shape[0], shape[1], 4, 2],
            &shape,
        ));
    }
    Ok(())
}
