//! Labeled coordinate datasets for satellite swaths and map grids.
//!
//! A [`SwathDataset`] holds named coordinate variables with dimension names
//! and a CRS. Its accessors pick the lon/lat or projected quadmesh pipeline
//! from the CRS and return corners, `(R, C, 4, 2)` vertices, closed polygon
//! rings or the extent of the mesh.
//!
//! Datasets are read from and written to JSON via [`DatasetDocument`].
//!
//! # Example
//!
//! ```
//! use swath_dataset::{DatasetDocument, SpatialLayout};
//! use swath_common::VertexOrder;
//!
//! let doc: DatasetDocument = r#"{
//!     "crs": "EPSG:32633",
//!     "dims": ["y", "x"],
//!     "coords": {
//!         "x": {"dims": ["x"], "values": [0.0, 10.0]},
//!         "y": {"dims": ["y"], "values": [0.0, 10.0]}
//!     }
//! }"#.parse().unwrap();
//! let dataset = doc.into_dataset().unwrap();
//! assert_eq!(dataset.layout().unwrap(), SpatialLayout::Grid);
//!
//! let vertices = dataset.quadmesh_vertices(VertexOrder::CounterClockwise).unwrap();
//! assert_eq!(vertices.shape(), vec![2, 2, 4, 2]);
//! ```

pub mod dataset;
pub mod document;
pub mod error;
pub mod labeled;

pub use dataset::{polygon_rings, Ring, SpatialLayout, SwathDataset, ORBIT_DIMS};
pub use document::{nested_values, CoordDocument, DatasetDocument};
pub use error::{DatasetError, DatasetResult};
pub use labeled::LabeledArray;
