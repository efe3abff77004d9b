//! Common test fixtures for swath-mesh tests.
//!
//! This module provides small reference grids whose corner values are known
//! exactly, plus helpers that write dataset documents to temporary files.

use std::io::Write;

use ndarray::{array, Array2};
use serde_json::{json, Value};
use tempfile::NamedTempFile;

/// A 2×2 projected grid of centroids spaced 10 units apart.
pub mod projected {
    use super::*;

    /// x and y centroids, both `[[0, 10], [10, 20]]`.
    pub fn centroids() -> Array2<f64> {
        array![[0.0, 10.0], [10.0, 20.0]]
    }

    /// Linearly extrapolated corners of [`centroids`].
    pub fn corners() -> Array2<f64> {
        array![[-10.0, 0.0, 10.0], [0.0, 10.0, 20.0], [10.0, 20.0, 30.0]]
    }
}

/// A 2×2 lon/lat grid whose corners are computed on the WGS84 ellipsoid.
pub mod wgs84 {
    use super::*;

    /// Tolerance used when comparing against the reference corners.
    pub const TOLERANCE: f64 = 1e-4;

    pub fn lons() -> Array2<f64> {
        array![[0.0, 10.0], [20.0, 30.0]]
    }

    pub fn lats() -> Array2<f64> {
        array![[10.0, 15.0], [0.0, 5.0]]
    }

    /// Longitude corners of [`lons`]/[`lats`].
    pub fn lon_corners() -> Array2<f64> {
        array![
            [-14.27407497, -4.80531025, 5.16026436],
            [5.19757839, 15.08698583, 25.20197428],
            [24.37604115, 34.12946232, 43.835406]
        ]
    }

    /// Latitude corners of [`lons`]/[`lats`].
    pub fn lat_corners() -> Array2<f64> {
        array![
            [11.79157893, 16.74949943, 21.25738649],
            [2.51977904, 7.6452206, 12.53485936],
            [-7.03008533, -2.33548415, 2.43539233]
        ]
    }
}

/// Document for a projected 2×3 grid using `x`/`y` dims.
pub fn projected_grid_document() -> Value {
    json!({
        "crs": "EPSG:32633",
        "dims": ["y", "x"],
        "coords": {
            "x": {"dims": ["y", "x"], "values": [[0.0, 10.0, 20.0], [0.0, 10.0, 20.0]]},
            "y": {"dims": ["y", "x"], "values": [[10.0, 10.0, 10.0], [0.0, 0.0, 0.0]]}
        },
        "attrs": {"source": "fixture"}
    })
}

/// Document for a lon/lat swath using `along_track`/`cross_track` dims.
pub fn lonlat_swath_document() -> Value {
    json!({
        "crs": "EPSG:4326",
        "dims": ["along_track", "cross_track"],
        "coords": {
            "lon": {"dims": ["along_track", "cross_track"], "values": [[0.0, 10.0], [20.0, 30.0]]},
            "lat": {"dims": ["along_track", "cross_track"], "values": [[10.0, 15.0], [0.0, 5.0]]}
        },
        "attrs": {}
    })
}

/// Write `document` as JSON to a temporary file that is removed on drop.
pub fn write_document(document: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    serde_json::to_writer_pretty(&mut file, document).expect("Failed to write document");
    file.flush().expect("Failed to flush document");
    file
}
