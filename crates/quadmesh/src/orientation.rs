//! Polygon winding checks and quadmesh winding normalisation.

use chunked_array::CoordArray;
use ndarray::{ArrayBase, ArrayD, ArrayViewD, Data, Ix2};
use num_traits::Float;
use swath_common::VertexOrder;
use tracing::debug;

use crate::assembly::check_quadmesh;
use crate::error::Result;

/// Signed area of a closed polygon (shoelace formula). Positive for
/// counterclockwise traversal in an x-right, y-up frame.
pub fn signed_area<T: Float>(points: &[[T; 2]]) -> T {
    let n = points.len();
    let two = T::one() + T::one();
    (0..n)
        .map(|k| {
            let [x0, y0] = points[k];
            let [x1, y1] = points[(k + 1) % n];
            x0 * y1 - x1 * y0
        })
        .fold(T::zero(), |acc, term| acc + term)
        / two
}

/// True when the polygon is wound clockwise.
///
/// Zero-area and self-intersecting polygons report whatever sign the
/// shoelace sum yields.
///
/// ```
/// use quadmesh::is_clockwise;
///
/// let square = [[0.5, 3.5], [0.5, 4.5], [1.5, 4.5], [1.5, 3.5]];
/// assert!(is_clockwise(&square));
/// ```
pub fn is_clockwise<T: Float>(points: &[[T; 2]]) -> bool {
    signed_area(points) < T::zero()
}

/// Cell counts by winding direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindingCounts {
    pub clockwise: usize,
    pub counterclockwise: usize,
    /// Cells with zero or non-finite area
    pub degenerate: usize,
}

fn cell_points<S: Data<Elem = f64>>(cell: &ArrayBase<S, Ix2>) -> [[f64; 2]; 4] {
    let mut points = [[0.0; 2]; 4];
    for (k, point) in points.iter_mut().enumerate() {
        *point = [cell[[k, 0]], cell[[k, 1]]];
    }
    points
}

/// Reverse the traversal of every cell wound against `order`, keeping each
/// cell's first vertex. Zero-area cells are left untouched.
pub fn orient_quadmesh(vertices: &CoordArray, order: VertexOrder) -> Result<CoordArray> {
    check_quadmesh(vertices)?;
    debug!(shape = ?vertices.shape(), %order, "Orienting quadmesh");
    let want_clockwise = order.is_clockwise();
    Ok(vertices.map_blocks(&[2, 3], move |block: ArrayViewD<'_, f64>| {
        orient_block(block, want_clockwise)
    })?)
}

fn orient_block(block: ArrayViewD<'_, f64>, want_clockwise: bool) -> ArrayD<f64> {
    let mut out = block.to_owned();
    for mut row in out.outer_iter_mut() {
        for cell in row.outer_iter_mut() {
            let Ok(mut cell) = cell.into_dimensionality::<Ix2>() else {
                continue;
            };
            let area = signed_area(&cell_points(&cell));
            if area == 0.0 || !area.is_finite() || (area < 0.0) == want_clockwise {
                continue;
            }
            for axis in 0..2 {
                let (v1, v3) = (cell[[1, axis]], cell[[3, axis]]);
                cell[[1, axis]] = v3;
                cell[[3, axis]] = v1;
            }
        }
    }
    out
}

/// Count cells by winding direction. Forces evaluation of lazy input.
pub fn quadmesh_winding_counts(vertices: &CoordArray) -> Result<WindingCounts> {
    check_quadmesh(vertices)?;
    let mesh = vertices.to_array4()?;
    let mut counts = WindingCounts::default();
    for row in mesh.outer_iter() {
        for cell in row.outer_iter() {
            let area = signed_area(&cell_points(&cell));
            if area == 0.0 || !area.is_finite() {
                counts.degenerate += 1;
            } else if area < 0.0 {
                counts.clockwise += 1;
            } else {
                counts.counterclockwise += 1;
            }
        }
    }
    Ok(counts)
}
