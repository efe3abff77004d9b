//! Error types for mesh geometry.

use chunked_array::ArrayError;
use swath_common::Backend;
use thiserror::Error;

/// Errors that can occur while deriving corners or vertices.
#[derive(Error, Debug)]
pub enum GeometryError {
    /// Coordinate arrays that must agree in shape do not.
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    /// Too few samples to infer cell boundaries.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Coordinate arrays have different numbers of dimensions.
    #[error("dimensionality mismatch: {left}D vs {right}D")]
    DimensionalityMismatch { left: usize, right: usize },

    /// Coordinate arrays live on different backends.
    #[error("backend mismatch: {left} vs {right}")]
    BackendMismatch { left: Backend, right: Backend },

    /// The operation does not support arrays of this dimensionality.
    #[error("unsupported dimensionality: expected {expected}, got {actual}D")]
    UnsupportedDimensionality { expected: &'static str, actual: usize },

    /// Unknown vertex order name.
    #[error("invalid vertex order: {0}")]
    InvalidOrder(String),

    /// Coordinates outside their valid range.
    #[error("{count} invalid coordinate(s): {message}")]
    InvalidCoordinates { count: usize, message: String },

    /// Error from the underlying array backend.
    #[error(transparent)]
    Array(#[from] ArrayError),
}

impl GeometryError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(left: &[usize], right: &[usize]) -> Self {
        Self::ShapeMismatch {
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }

    /// Create a DegenerateInput error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    /// Create an UnsupportedDimensionality error.
    pub fn unsupported_dimensionality(expected: &'static str, actual: usize) -> Self {
        Self::UnsupportedDimensionality { expected, actual }
    }

    /// Taxonomy class of the error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ShapeMismatch { .. } => "shape_mismatch",
            Self::DegenerateInput(_) => "degenerate_input",
            Self::DimensionalityMismatch { .. } => "dimensionality_mismatch",
            Self::BackendMismatch { .. } => "backend_mismatch",
            Self::UnsupportedDimensionality { .. } => "unsupported_dimensionality",
            Self::InvalidOrder(_) => "invalid_order",
            Self::InvalidCoordinates { .. } => "invalid_coordinates",
            Self::Array(ArrayError::ShapeMismatch { .. }) => "shape_mismatch",
            Self::Array(_) => "array",
        }
    }
}

impl From<swath_common::OrderParseError> for GeometryError {
    fn from(err: swath_common::OrderParseError) -> Self {
        Self::InvalidOrder(err.to_string())
    }
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;
