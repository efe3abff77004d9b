//! JSON documents describing a dataset's coordinates.
//!
//! ```json
//! {
//!   "crs": "EPSG:4326",
//!   "dims": ["along_track", "cross_track"],
//!   "coords": {
//!     "lon": {"dims": ["along_track", "cross_track"], "values": [[0.0, 10.0]]},
//!     "lat": {"dims": ["along_track", "cross_track"], "values": [[5.0, null]]}
//!   },
//!   "attrs": {}
//! }
//! ```
//!
//! `values` are nested arrays, one level per dimension; `null` reads as NaN
//! and NaN is written back as `null`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use chunked_array::CoordArray;
use ndarray::{ArrayD, ArrayViewD, Axis};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, info};

use crate::dataset::SwathDataset;
use crate::error::{DatasetError, DatasetResult};
use crate::labeled::LabeledArray;

/// One coordinate variable in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordDocument {
    pub dims: Vec<String>,
    pub values: Value,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Map<String, Value>,
}

/// Serialized form of a [`SwathDataset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDocument {
    pub crs: String,
    pub dims: Vec<String>,
    pub coords: BTreeMap<String, CoordDocument>,
    #[serde(default)]
    pub attrs: Map<String, Value>,
}

impl FromStr for DatasetDocument {
    type Err = DatasetError;

    fn from_str(s: &str) -> DatasetResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl DatasetDocument {
    pub fn from_reader<R: Read>(reader: R) -> DatasetResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read a document from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Reading dataset document");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Build the dataset, validating every coordinate against its dims.
    pub fn into_dataset(self) -> DatasetResult<SwathDataset> {
        let mut dataset = SwathDataset::new(&self.crs, self.dims)?;
        dataset.attrs = self.attrs;
        for (name, coord) in self.coords {
            let data = array_from_values(&name, &coord.values)?;
            debug!(name = %name, shape = ?data.shape(), "Parsed coordinate");
            let labeled = LabeledArray::new(&name, coord.dims, CoordArray::from(data))?
                .with_attrs(coord.attrs);
            dataset = dataset.with_coord(&name, labeled)?;
        }
        Ok(dataset)
    }

    /// Serialize a dataset. Lazy coordinates are computed.
    pub fn from_dataset(dataset: &SwathDataset) -> Self {
        let coords = dataset
            .coords()
            .iter()
            .map(|(name, coord)| {
                let doc = CoordDocument {
                    dims: coord.dims().to_vec(),
                    values: nested_values(&coord.data().compute().view()),
                    attrs: coord.attrs.clone(),
                };
                (name.clone(), doc)
            })
            .collect();
        Self {
            crs: dataset.crs().to_string(),
            dims: dataset.dims().to_vec(),
            coords,
            attrs: dataset.attrs.clone(),
        }
    }
}

/// Nested JSON arrays of `array`, NaN as `null`.
pub fn nested_values(array: &ArrayViewD<'_, f64>) -> Value {
    if array.ndim() == 0 {
        return array
            .first()
            .and_then(|&v| Number::from_f64(v))
            .map_or(Value::Null, Value::Number);
    }
    Value::Array(
        array
            .axis_iter(Axis(0))
            .map(|sub| nested_values(&sub))
            .collect(),
    )
}

/// Parse nested arrays into an n-dimensional array. Every level must be
/// rectangular.
fn array_from_values(name: &str, values: &Value) -> DatasetResult<ArrayD<f64>> {
    let shape = infer_shape(values);
    if shape.is_empty() {
        return Err(DatasetError::InvalidFormat(format!(
            "coordinate '{name}' values must be an array"
        )));
    }
    let mut flat = Vec::with_capacity(shape.iter().product());
    flatten_into(name, values, &shape, &mut flat)?;
    ArrayD::from_shape_vec(shape, flat)
        .map_err(|e| DatasetError::InvalidFormat(format!("coordinate '{name}': {e}")))
}

/// Shape implied by following the first element at every level.
fn infer_shape(values: &Value) -> Vec<usize> {
    let mut shape = Vec::new();
    let mut current = values;
    while let Value::Array(items) = current {
        shape.push(items.len());
        match items.first() {
            Some(first) => current = first,
            None => break,
        }
    }
    shape
}

fn flatten_into(name: &str, values: &Value, shape: &[usize], out: &mut Vec<f64>) -> DatasetResult<()> {
    match (values, shape.split_first()) {
        (Value::Array(items), Some((&len, rest))) if items.len() == len => {
            for item in items {
                flatten_into(name, item, rest, out)?;
            }
            Ok(())
        }
        (Value::Number(n), None) => {
            out.push(n.as_f64().unwrap_or(f64::NAN));
            Ok(())
        }
        (Value::Null, None) => {
            out.push(f64::NAN);
            Ok(())
        }
        _ => Err(DatasetError::InvalidFormat(format!(
            "coordinate '{name}' values are not a rectangular numeric array"
        ))),
    }
}
