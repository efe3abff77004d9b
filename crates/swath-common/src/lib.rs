//! Common types shared across the swath-mesh crates.

pub mod backend;
pub mod bbox;
pub mod crs;
pub mod order;

pub use backend::Backend;
pub use bbox::BoundingBox;
pub use crs::{CoordinateSystem, CrsParseError};
pub use order::{OrderParseError, VertexOrder};
