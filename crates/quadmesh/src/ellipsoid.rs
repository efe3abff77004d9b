//! Reference ellipsoid and point-wise geodetic conversions.

use nalgebra::Vector3;

/// Maximum number of fixed-point iterations for the geodetic latitude.
const MAX_ITERATIONS: usize = 10;

/// Convergence threshold on the latitude update (radians).
const LATITUDE_EPSILON: f64 = 1e-14;

/// Distance from the polar axis (meters) below which a point is treated as
/// lying on it.
const POLAR_AXIS_EPSILON: f64 = 1e-9;

/// An oblate reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Equatorial radius (meters)
    pub semi_major_axis: f64,
    /// Flattening `(a - b) / a`
    pub flattening: f64,
}

impl Ellipsoid {
    /// World Geodetic System 1984.
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis: 6378137.0,
        flattening: 1.0 / 298.257223563,
    };

    pub fn new(semi_major_axis: f64, flattening: f64) -> Self {
        Self {
            semi_major_axis,
            flattening,
        }
    }

    /// Polar radius (meters).
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening)
    }

    /// First eccentricity squared.
    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Radius of curvature in the prime vertical at geodetic latitude `lat`
    /// (radians).
    #[inline]
    pub fn prime_vertical_radius(&self, lat: f64) -> f64 {
        let sin_lat = lat.sin();
        self.semi_major_axis / (1.0 - self.eccentricity_squared() * sin_lat * sin_lat).sqrt()
    }

    /// Geodetic longitude/latitude (degrees) and height (meters) to an
    /// earth-centered Cartesian position (meters).
    pub fn to_geocentric(&self, lon: f64, lat: f64, height: f64) -> Vector3<f64> {
        let (lon, lat) = (lon.to_radians(), lat.to_radians());
        let n = self.prime_vertical_radius(lat);
        let e2 = self.eccentricity_squared();
        Vector3::new(
            (n + height) * lat.cos() * lon.cos(),
            (n + height) * lat.cos() * lon.sin(),
            (n * (1.0 - e2) + height) * lat.sin(),
        )
    }

    /// Earth-centered Cartesian position to geodetic longitude/latitude
    /// (degrees) and height (meters).
    ///
    /// Latitude is found by fixed-point iteration; points on the polar axis
    /// map to longitude 0 and latitude ±90.
    pub fn to_geographic(&self, position: &Vector3<f64>) -> (f64, f64, f64) {
        let (x, y, z) = (position.x, position.y, position.z);
        let e2 = self.eccentricity_squared();
        let p = x.hypot(y);

        if p < POLAR_AXIS_EPSILON {
            let lat = if z < 0.0 { -90.0 } else { 90.0 };
            return (0.0, lat, z.abs() - self.semi_minor_axis());
        }

        let lon = y.atan2(x);
        let mut lat = z.atan2(p * (1.0 - e2));
        for _ in 0..MAX_ITERATIONS {
            let n = self.prime_vertical_radius(lat);
            let height = p / lat.cos() - n;
            let next = z.atan2(p * (1.0 - e2 * n / (n + height)));
            let converged = (next - lat).abs() < LATITUDE_EPSILON;
            lat = next;
            if converged {
                break;
            }
        }
        let height = p / lat.cos() - self.prime_vertical_radius(lat);

        (lon.to_degrees(), lat.to_degrees(), height)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}
