//! Error types for array operations.

use thiserror::Error;

/// Errors that can occur while building or combining arrays.
#[derive(Error, Debug)]
pub enum ArrayError {
    /// Two arrays that must have the same shape do not.
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    /// The chunk layout does not fit the array.
    #[error("invalid chunk shape {chunks:?} for array of shape {shape:?}")]
    InvalidChunkShape {
        shape: Vec<usize>,
        chunks: Vec<usize>,
    },

    /// Chunk sizes along an axis are malformed.
    #[error("invalid chunks along axis {axis}: {chunks:?}")]
    InvalidChunks { axis: usize, chunks: Vec<usize> },

    /// An axis index is not valid for the array.
    #[error("axis {axis} out of range for array with {ndim} dimensions")]
    AxisOutOfRange { axis: usize, ndim: usize },

    /// A slice or index falls outside an axis.
    #[error("range {start}..{end} out of bounds for axis {axis} of length {len}")]
    OutOfBounds {
        axis: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    /// An operation that combines arrays received none.
    #[error("cannot combine an empty list of arrays")]
    EmptyInput,

    /// Error reported by ndarray.
    #[error("ndarray shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl ArrayError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(left: &[usize], right: &[usize]) -> Self {
        Self::ShapeMismatch {
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }

    /// Create an AxisOutOfRange error.
    pub fn axis_out_of_range(axis: usize, ndim: usize) -> Self {
        Self::AxisOutOfRange { axis, ndim }
    }

    /// Create an OutOfBounds error.
    pub fn out_of_bounds(axis: usize, start: usize, end: usize, len: usize) -> Self {
        Self::OutOfBounds {
            axis,
            start,
            end,
            len,
        }
    }
}

/// Result type for array operations.
pub type Result<T> = std::result::Result<T, ArrayError>;
