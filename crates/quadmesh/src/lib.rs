//! Quadmesh geometry for satellite swaths and projected grids.
//!
//! Derives cell corners and quadrilateral vertices from cell centroids so
//! curvilinear swath data can be drawn as polygons. Every operation accepts
//! eager or lazy [`CoordArray`]s and returns results on the same backend.
//!
//! # Pipeline
//!
//! ```text
//! centroids (x, y) or (lon, lat)
//!      │
//!      ├─► lon/lat only: geographic_to_geocentric
//!      │
//!      ├─► corner extrapolation ─► (R + 1, C + 1) corner grids
//!      │
//!      ├─► lon/lat only: geocentric_to_geographic
//!      │
//!      └─► get_quadmesh_from_corners ─► (R, C, 4, 2) vertices
//! ```
//!
//! # Example
//!
//! ```
//! use chunked_array::CoordArray;
//! use ndarray::array;
//! use quadmesh::{get_projection_quadmesh_vertices, VertexOrder};
//!
//! let x = CoordArray::from(array![[0.0, 10.0], [0.0, 10.0]]);
//! let y = CoordArray::from(array![[10.0, 10.0], [0.0, 0.0]]);
//! let vertices = get_projection_quadmesh_vertices(&x, &y, VertexOrder::CounterClockwise).unwrap();
//! assert_eq!(vertices.shape(), vec![2, 2, 4, 2]);
//! ```
//!
//! Cells crossing the antimeridian are not unwrapped.

pub mod assembly;
pub mod bounds;
pub mod corners;
pub mod ellipsoid;
pub mod error;
pub mod extent;
pub mod geocentric;
pub mod geodesic;
pub mod interval;
pub mod layout;
pub mod orientation;
mod swath;
pub mod validity;
pub mod vertices;

// Re-export commonly used types at crate root
pub use assembly::{get_corners_from_quadmesh, get_quadmesh_from_corners};
pub use bounds::{from_bounds_to_corners, from_corners_to_bounds};
pub use chunked_array::CoordArray;
pub use corners::{
    get_centroids_from_corners, get_corners_from_centroids, get_lonlat_corners_from_centroids,
    get_projection_corners_from_1d_centroids, get_projection_corners_from_centroids, CornerPair,
};
pub use ellipsoid::Ellipsoid;
pub use error::{GeometryError, Result};
pub use extent::quadmesh_extent;
pub use geocentric::{geocentric_to_geographic, geographic_to_geocentric};
pub use geodesic::GeodesicInverse;
pub use interval::infer_interval_breaks;
pub use layout::{classify_centroids, CentroidLayout};
pub use orientation::{
    is_clockwise, orient_quadmesh, quadmesh_winding_counts, signed_area, WindingCounts,
};
pub use swath_common::VertexOrder;
pub use validity::{
    antimeridian_mask, count_invalid_coords, count_out_of_range, mask_invalid_coords,
    mask_out_of_range, LAT_RANGE, LON_RANGE,
};
pub use vertices::{get_lonlat_quadmesh_vertices, get_projection_quadmesh_vertices};
