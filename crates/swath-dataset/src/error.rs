//! Error types for dataset operations.

use chunked_array::ArrayError;
use quadmesh::GeometryError;
use swath_common::CrsParseError;
use thiserror::Error;

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Error types for labeled datasets.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed JSON document
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Missing coordinate variable
    #[error("Missing coordinate: {0}")]
    MissingCoordinate(String),

    /// Dimension names do not fit the data
    #[error("Coordinate '{name}' has dims {dims:?} but {ndim}-dimensional data")]
    DimensionMismatch {
        name: String,
        dims: Vec<String>,
        ndim: usize,
    },

    /// Dimension names that are neither an orbit nor a grid
    #[error("Cannot classify dims {0:?} as orbit or grid")]
    UnknownLayout(Vec<String>),

    /// Invalid document contents
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Coordinates outside their valid range
    #[error("{0} coordinate value(s) outside the valid lon/lat range")]
    InvalidCoordinates(usize),

    /// Unsupported CRS string
    #[error(transparent)]
    Crs(#[from] CrsParseError),

    /// Geometry failure
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Array backend failure
    #[error(transparent)]
    Array(#[from] ArrayError),
}
