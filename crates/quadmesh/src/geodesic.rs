//! Geodesics on the reference ellipsoid (Vincenty's formulae).

use crate::ellipsoid::Ellipsoid;

/// Maximum number of iterations of the inverse and direct solutions.
const MAX_ITERATIONS: usize = 200;

/// Convergence threshold on the auxiliary sphere (radians).
const CONVERGENCE_EPSILON: f64 = 1e-12;

/// Result of the inverse geodesic problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicInverse {
    /// Length of the geodesic (meters)
    pub distance: f64,
    /// Azimuth at the first point (degrees clockwise from north)
    pub initial_azimuth: f64,
    /// Azimuth at the second point, continuing the line (degrees)
    pub final_azimuth: f64,
}

/// Series coefficients `A` and `B` of the geodesic distance for `u²`.
fn distance_coefficients(u2: f64) -> (f64, f64) {
    let a = 1.0 + u2 / 16384.0 * (4096.0 + u2 * (-768.0 + u2 * (320.0 - 175.0 * u2)));
    let b = u2 / 1024.0 * (256.0 + u2 * (-128.0 + u2 * (74.0 - 47.0 * u2)));
    (a, b)
}

/// Correction `Δσ` of the arc length on the auxiliary sphere.
fn delta_sigma(b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sm: f64) -> f64 {
    b * sin_sigma
        * (cos_2sm
            + b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)
                    - b / 6.0
                        * cos_2sm
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sm * cos_2sm)))
}

impl Ellipsoid {
    fn second_eccentricity_squared(&self) -> f64 {
        let (a, b) = (self.semi_major_axis, self.semi_minor_axis());
        (a * a - b * b) / (b * b)
    }

    /// Reduced latitude `(sin U, cos U)` of geodetic latitude `lat` (degrees).
    fn reduced_latitude(&self, lat: f64) -> (f64, f64) {
        let u = ((1.0 - self.flattening) * lat.to_radians().tan()).atan();
        u.sin_cos()
    }

    /// Shortest geodesic between two points given in degrees. Nearly
    /// antipodal points may not converge; the last iterate is returned.
    pub fn geodesic_inverse(&self, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> GeodesicInverse {
        let f = self.flattening;
        let l = (lon2 - lon1).to_radians();
        let (sin_u1, cos_u1) = self.reduced_latitude(lat1);
        let (sin_u2, cos_u2) = self.reduced_latitude(lat2);

        let mut lambda = l;
        let mut state = (0.0, 1.0, 0.0, 0.0, 1.0, 0.0);
        for _ in 0..MAX_ITERATIONS {
            let (sin_l, cos_l) = lambda.sin_cos();
            let sin_sigma =
                (cos_u2 * sin_l).hypot(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_l);
            if sin_sigma == 0.0 {
                return GeodesicInverse {
                    distance: 0.0,
                    initial_azimuth: 0.0,
                    final_azimuth: 0.0,
                };
            }
            let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_l;
            let sigma = sin_sigma.atan2(cos_sigma);
            let sin_alpha = cos_u1 * cos_u2 * sin_l / sin_sigma;
            let cos2_alpha = 1.0 - sin_alpha * sin_alpha;
            // Equatorial lines have cos²α = 0
            let cos_2sm = if cos2_alpha == 0.0 {
                0.0
            } else {
                cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha
            };
            let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
            let previous = lambda;
            lambda = l
                + (1.0 - c)
                    * f
                    * sin_alpha
                    * (sigma
                        + c * sin_sigma * (cos_2sm + c * cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)));
            state = (sin_sigma, cos_sigma, sigma, cos2_alpha, cos_2sm, lambda);
            if (lambda - previous).abs() < CONVERGENCE_EPSILON {
                break;
            }
        }

        let (sin_sigma, cos_sigma, sigma, cos2_alpha, cos_2sm, lambda) = state;
        let (a, b) = distance_coefficients(cos2_alpha * self.second_eccentricity_squared());
        let distance = self.semi_minor_axis()
            * a
            * (sigma - delta_sigma(b, sin_sigma, cos_sigma, cos_2sm));

        let (sin_l, cos_l) = lambda.sin_cos();
        let initial = (cos_u2 * sin_l).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_l);
        let end = (cos_u1 * sin_l).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_l);
        GeodesicInverse {
            distance,
            initial_azimuth: initial.to_degrees(),
            final_azimuth: end.to_degrees(),
        }
    }

    /// Point reached from `(lon, lat)` (degrees) after `distance` meters
    /// along `azimuth` (degrees clockwise from north). Longitude is not
    /// wrapped.
    pub fn geodesic_direct(&self, lon: f64, lat: f64, azimuth: f64, distance: f64) -> (f64, f64) {
        let f = self.flattening;
        let (sin_a1, cos_a1) = azimuth.to_radians().sin_cos();
        let (sin_u1, cos_u1) = self.reduced_latitude(lat);
        let sigma1 = sin_u1.atan2(cos_u1 * cos_a1);
        let sin_alpha = cos_u1 * sin_a1;
        let cos2_alpha = 1.0 - sin_alpha * sin_alpha;
        let (a, b) = distance_coefficients(cos2_alpha * self.second_eccentricity_squared());

        let base = distance / (self.semi_minor_axis() * a);
        let mut sigma = base;
        for _ in 0..MAX_ITERATIONS {
            let cos_2sm = (2.0 * sigma1 + sigma).cos();
            let (sin_sigma, cos_sigma) = sigma.sin_cos();
            let next = base + delta_sigma(b, sin_sigma, cos_sigma, cos_2sm);
            let converged = (next - sigma).abs() < CONVERGENCE_EPSILON;
            sigma = next;
            if converged {
                break;
            }
        }

        let cos_2sm = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let x = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_a1;
        let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_a1)
            .atan2((1.0 - f) * sin_alpha.hypot(x));
        let lambda = (sin_sigma * sin_a1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_a1);
        let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
        let l = lambda
            - (1.0 - c)
                * f
                * sin_alpha
                * (sigma + c * sin_sigma * (cos_2sm + c * cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)));

        (lon + l.to_degrees(), lat2.to_degrees())
    }
}
