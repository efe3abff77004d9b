//! Classification of centroid inputs into corner-derivation paths.
//!
//! The path is chosen by a single ordered precondition table. Each row is
//! checked in turn and the first match wins:
//!
//! | # | Condition                          | Outcome                     |
//! |---|------------------------------------|-----------------------------|
//! | 1 | `x.ndim != y.ndim`                 | `DimensionalityMismatch`    |
//! | 2 | `x.backend != y.backend`           | `BackendMismatch`           |
//! | 3 | ndim not 1 or 2                    | `UnsupportedDimensionality` |
//! | 4 | 1D, either axis empty              | `DegenerateInput`           |
//! | 5 | 1D, both axes of length 1          | `DegenerateInput`           |
//! | 6 | 1D otherwise                       | [`CentroidLayout::Axes1d`]  |
//! | 7 | 2D, shapes differ                  | `ShapeMismatch`             |
//! | 8 | 2D, shape (1, 1) or any axis empty | `DegenerateInput`           |
//! | 9 | 2D, shape (1, N)                   | [`CentroidLayout::SingleRow`] |
//! | 10 | 2D, shape (N, 1)                  | [`CentroidLayout::SingleColumn`] |
//! | 11 | 2D otherwise                      | [`CentroidLayout::Grid2d`]  |

use chunked_array::CoordArray;

use crate::error::{GeometryError, Result};

/// Shape class of a pair of centroid arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CentroidLayout {
    /// Two 1D axes of lengths `nx` and `ny`.
    Axes1d { nx: usize, ny: usize },
    /// A 2D grid with a single row of `len` cells.
    SingleRow { len: usize },
    /// A 2D grid with a single column of `len` cells.
    SingleColumn { len: usize },
    /// A 2D grid with at least two rows and two columns.
    Grid2d { rows: usize, cols: usize },
}

/// Classify a pair of centroid arrays, rejecting invalid combinations.
pub fn classify_centroids(x: &CoordArray, y: &CoordArray) -> Result<CentroidLayout> {
    check_pairing(x, y)?;

    match x.ndim() {
        1 => {
            let (nx, ny) = (x.len_of(0), y.len_of(0));
            if nx == 0 || ny == 0 {
                return Err(GeometryError::degenerate(format!(
                    "empty centroid axis (x: {nx}, y: {ny})"
                )));
            }
            if nx == 1 && ny == 1 {
                return Err(GeometryError::degenerate(
                    "a single centroid has no defined cell",
                ));
            }
            Ok(CentroidLayout::Axes1d { nx, ny })
        }
        2 => {
            if x.shape() != y.shape() {
                return Err(GeometryError::shape_mismatch(&x.shape(), &y.shape()));
            }
            match (x.len_of(0), x.len_of(1)) {
                (0, _) | (_, 0) | (1, 1) => Err(GeometryError::degenerate(format!(
                    "centroid grid of shape {:?} has no defined cell",
                    x.shape()
                ))),
                (1, len) => Ok(CentroidLayout::SingleRow { len }),
                (len, 1) => Ok(CentroidLayout::SingleColumn { len }),
                (rows, cols) => Ok(CentroidLayout::Grid2d { rows, cols }),
            }
        }
        ndim => Err(GeometryError::unsupported_dimensionality("1 or 2", ndim)),
    }
}

/// Reject arrays that cannot be combined: different dimensionality first,
/// then different backends.
pub(crate) fn check_pairing(x: &CoordArray, y: &CoordArray) -> Result<()> {
    if x.ndim() != y.ndim() {
        return Err(GeometryError::DimensionalityMismatch {
            left: x.ndim(),
            right: y.ndim(),
        });
    }
    if x.backend() != y.backend() {
        return Err(GeometryError::BackendMismatch {
            left: x.backend(),
            right: y.backend(),
        });
    }
    Ok(())
}

/// [`check_pairing`] followed by an exact shape comparison.
pub(crate) fn check_same_shape(x: &CoordArray, y: &CoordArray) -> Result<()> {
    check_pairing(x, y)?;
    if x.shape() != y.shape() {
        return Err(GeometryError::shape_mismatch(&x.shape(), &y.shape()));
    }
    Ok(())
}

/// Require exactly `ndim` dimensions.
pub(crate) fn check_ndim(array: &CoordArray, ndim: usize, expected: &'static str) -> Result<()> {
    if array.ndim() != ndim {
        return Err(GeometryError::unsupported_dimensionality(
            expected,
            array.ndim(),
        ));
    }
    Ok(())
}
