//! Coordinate system classification for centroid grids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of coordinate system a pair of coordinate arrays lives in.
///
/// The distinction decides how cell corners are derived: geographic
/// coordinates are averaged in a geocentric Cartesian frame, projected
/// coordinates directly in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    /// Longitude/latitude in degrees on the WGS84 ellipsoid.
    #[default]
    Geographic,
    /// Planar x/y coordinates (meters or any linear unit).
    Projected,
}

impl CoordinateSystem {
    /// Parse a CRS string.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326", "CRS:84", "EPSG:4269" (geographic)
    /// - "lonlat", "geographic"
    /// - "projected", "xy", or any other "EPSG:<code>" (projected)
    pub fn from_crs_string(s: &str) -> Result<Self, CrsParseError> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "EPSG:4326" | "CRS:84" | "EPSG:4269" | "LONLAT" | "GEOGRAPHIC" => {
                Ok(CoordinateSystem::Geographic)
            }
            "PROJECTED" | "XY" => Ok(CoordinateSystem::Projected),
            other => match other.strip_prefix("EPSG:") {
                Some(code) if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) => {
                    Ok(CoordinateSystem::Projected)
                }
                _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
            },
        }
    }

    /// Check if this is a geographic (lon/lat) coordinate system.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CoordinateSystem::Geographic)
    }

    /// Conventional names of the (x, y) coordinate variables.
    pub fn coordinate_names(&self) -> (&'static str, &'static str) {
        match self {
            CoordinateSystem::Geographic => ("lon", "lat"),
            CoordinateSystem::Projected => ("x", "y"),
        }
    }
}

impl FromStr for CoordinateSystem {
    type Err = CrsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_crs_string(s)
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateSystem::Geographic => write!(f, "geographic"),
            CoordinateSystem::Projected => write!(f, "projected"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
