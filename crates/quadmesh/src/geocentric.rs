//! Geographic ↔ geocentric conversion of coordinate arrays.
//!
//! Both directions work elementwise on eager and lazy arrays alike; lazy
//! inputs produce lazy outputs that share one evaluation per block.

use chunked_array::CoordArray;
use nalgebra::Vector3;
use tracing::debug;

use crate::ellipsoid::Ellipsoid;
use crate::error::Result;
use crate::layout::check_same_shape;

/// Earth-centered Cartesian components `[x, y, z]` (meters).
pub type Geocentric = [CoordArray; 3];

/// Convert longitude/latitude (degrees) and optional height (meters, default
/// 0) to WGS84 geocentric `[x, y, z]`.
pub fn geographic_to_geocentric(
    lon: &CoordArray,
    lat: &CoordArray,
    height: Option<&CoordArray>,
) -> Result<Geocentric> {
    geographic_to_geocentric_on(Ellipsoid::WGS84, lon, lat, height)
}

/// [`geographic_to_geocentric`] on an arbitrary ellipsoid.
pub fn geographic_to_geocentric_on(
    ellipsoid: Ellipsoid,
    lon: &CoordArray,
    lat: &CoordArray,
    height: Option<&CoordArray>,
) -> Result<Geocentric> {
    check_same_shape(lon, lat)?;
    let height = match height {
        Some(h) => {
            check_same_shape(lon, h)?;
            h.clone()
        }
        None => lon.map(|_| 0.0),
    };
    debug!(shape = ?lon.shape(), backend = %lon.backend(), "Geographic to geocentric");

    Ok(CoordArray::map3(lon, lat, &height, move |lon, lat, h| {
        let p = ellipsoid.to_geocentric(lon, lat, h);
        (p.x, p.y, p.z)
    })?)
}

/// Convert WGS84 geocentric `x, y, z` (meters) to `[lon, lat, height]`
/// (degrees, degrees, meters).
pub fn geocentric_to_geographic(
    x: &CoordArray,
    y: &CoordArray,
    z: &CoordArray,
) -> Result<[CoordArray; 3]> {
    geocentric_to_geographic_on(Ellipsoid::WGS84, x, y, z)
}

/// [`geocentric_to_geographic`] on an arbitrary ellipsoid.
pub fn geocentric_to_geographic_on(
    ellipsoid: Ellipsoid,
    x: &CoordArray,
    y: &CoordArray,
    z: &CoordArray,
) -> Result<[CoordArray; 3]> {
    check_same_shape(x, y)?;
    check_same_shape(x, z)?;
    debug!(shape = ?x.shape(), backend = %x.backend(), "Geocentric to geographic");

    Ok(CoordArray::map3(x, y, z, move |x, y, z| {
        ellipsoid.to_geographic(&Vector3::new(x, y, z))
    })?)
}
