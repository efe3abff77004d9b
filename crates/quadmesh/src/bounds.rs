//! Conversion between shared corner grids and per-cell bounds.

use chunked_array::CoordArray;
use swath_common::VertexOrder;

use crate::error::{GeometryError, Result};
use crate::layout::check_ndim;

/// Per-cell bounds `(R, C, 4)` of a corner grid `(R + 1, C + 1)`.
///
/// Vertex `k` of cell `(i, j)` is the corner at `(i, j) + offset[k]`, with
/// offsets from [`VertexOrder::corner_offsets`].
pub fn from_corners_to_bounds(corners: &CoordArray, order: VertexOrder) -> Result<CoordArray> {
    check_ndim(corners, 2, "2")?;
    let (rows, cols) = (corners.len_of(0), corners.len_of(1));
    if rows < 2 || cols < 2 {
        return Err(GeometryError::degenerate(format!(
            "corner grid of shape {:?} has no cells",
            corners.shape()
        )));
    }

    let vertices = order
        .corner_offsets()
        .iter()
        .map(|&(di, dj)| -> Result<CoordArray> {
            Ok(corners
                .slice_axis(0, di, di + rows - 1)?
                .slice_axis(1, dj, dj + cols - 1)?)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CoordArray::stack(&vertices)?)
}

/// Corner grid `(R + 1, C + 1)` of per-cell bounds `(R, C, 4)` written in
/// `order`.
///
/// Every cell contributes its top-left vertex; the last row and column of
/// cells also contribute their bottom and right vertices.
pub fn from_bounds_to_corners(bounds: &CoordArray, order: VertexOrder) -> Result<CoordArray> {
    check_ndim(bounds, 3, "3")?;
    let (rows, cols, n) = (bounds.len_of(0), bounds.len_of(1), bounds.len_of(2));
    if n != 4 {
        return Err(GeometryError::shape_mismatch(&[rows, cols, 4], &bounds.shape()));
    }
    if rows == 0 || cols == 0 {
        return Err(GeometryError::degenerate(format!(
            "bounds of shape {:?} have no cells",
            bounds.shape()
        )));
    }

    let vertex = |offset| bounds.index_axis(2, order.position_of(offset));
    let top_left = vertex((0, 0))?;
    let top_right = vertex((0, 1))?;
    let bottom_left = vertex((1, 0))?;
    let bottom_right = vertex((1, 1))?;

    let upper = CoordArray::concatenate(
        1,
        &[top_left, top_right.slice_axis(1, cols - 1, cols)?],
    )?;
    let last_row = CoordArray::concatenate(
        1,
        &[
            bottom_left.slice_axis(0, rows - 1, rows)?,
            bottom_right
                .slice_axis(0, rows - 1, rows)?
                .slice_axis(1, cols - 1, cols)?,
        ],
    )?;
    Ok(CoordArray::concatenate(0, &[upper, last_row])?)
}
