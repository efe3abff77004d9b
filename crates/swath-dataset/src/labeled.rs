//! Coordinate arrays with named dimensions.

use chunked_array::{ChunkConfig, CoordArray};
use serde_json::{Map, Value};

use crate::error::{DatasetError, DatasetResult};

/// A coordinate array whose axes carry dimension names.
#[derive(Debug, Clone)]
pub struct LabeledArray {
    dims: Vec<String>,
    data: CoordArray,
    /// Free-form metadata (units, long names, ...)
    pub attrs: Map<String, Value>,
}

impl LabeledArray {
    /// Label `data` with `dims`; the number of names must match the number
    /// of axes.
    pub fn new<S: Into<String>>(
        name: &str,
        dims: impl IntoIterator<Item = S>,
        data: CoordArray,
    ) -> DatasetResult<Self> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != data.ndim() {
            return Err(DatasetError::DimensionMismatch {
                name: name.to_string(),
                dims,
                ndim: data.ndim(),
            });
        }
        Ok(Self {
            dims,
            data,
            attrs: Map::new(),
        })
    }

    pub fn with_attrs(mut self, attrs: Map<String, Value>) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn data(&self) -> &CoordArray {
        &self.data
    }

    pub fn shape(&self) -> Vec<usize> {
        self.data.shape()
    }

    /// Length of the dimension called `dim`.
    pub fn dim_len(&self, dim: &str) -> Option<usize> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .map(|axis| self.data.len_of(axis))
    }

    /// The same labels over different data of the same dimensionality.
    pub(crate) fn with_data(&self, data: CoordArray) -> Self {
        Self {
            dims: self.dims.clone(),
            data,
            attrs: self.attrs.clone(),
        }
    }

    /// This array on the lazy backend, chunked per `config`.
    pub fn into_lazy(self, config: &ChunkConfig) -> DatasetResult<Self> {
        let data = self.data.into_lazy(config)?;
        Ok(Self { data, ..self })
    }
}
