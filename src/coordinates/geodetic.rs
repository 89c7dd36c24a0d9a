//! # Geodetic Coordinate Module
//!
//! Positions on or above the WGS84 reference ellipsoid, expressed as geodetic
//! latitude, longitude and ellipsoidal height, and their conversion into
//! Earth-centered Earth-fixed (ECEF) Cartesian coordinates.
//!
//! ## Conventions
//!
//! - Latitude and longitude are stored in degrees, matching the units the
//!   WMM reference tables are published in
//! - Height is in meters above the ellipsoid (not above the geoid)
//! - ECEF output is in meters, with X toward (0°, 0°), Z toward the north pole
//!
//! ## Examples
//!
//! ```rust
//! use geomag_testgen::coordinates::geodetic::Geodetic;
//!
//! let equator = Geodetic::new(0.0, 0.0, 0.0);
//! let ecef = equator.to_ecef();
//! assert_eq!(ecef.x, 6_378_137.0);
//! ```

use nalgebra::Vector3;

use crate::constants::{WGS84_A, WGS84_E2};

/// A geodetic position relative to the WGS84 ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    /// Geodetic latitude in degrees, positive north
    pub lat_deg: f64,
    /// Longitude in degrees, positive east
    pub lon_deg: f64,
    /// Height above the ellipsoid in meters
    pub height_m: f64,
}

impl Geodetic {
    /// Creates a new geodetic position
    ///
    /// # Arguments
    ///
    /// * `lat_deg` - Geodetic latitude in degrees
    /// * `lon_deg` - Longitude in degrees
    /// * `height_m` - Height above the WGS84 ellipsoid in meters
    pub fn new(lat_deg: f64, lon_deg: f64, height_m: f64) -> Self {
        Geodetic {
            lat_deg,
            lon_deg,
            height_m,
        }
    }

    /// Prime vertical radius of curvature at this latitude, in meters
    ///
    /// `N = a / sqrt(1 - e² sin²φ)`
    pub fn prime_vertical_radius(&self) -> f64 {
        let sin_lat = self.lat_deg.to_radians().sin();
        WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt()
    }

    /// Converts to ECEF Cartesian coordinates in meters
    ///
    /// # Mathematical Conversion
    ///
    /// - `x = (N + h) cos(φ) cos(λ)`
    /// - `y = (N + h) cos(φ) sin(λ)`
    /// - `z = (N (1 - e²) + h) sin(φ)`
    pub fn to_ecef(&self) -> Vector3<f64> {
        let (sin_lat, cos_lat) = self.lat_deg.to_radians().sin_cos();
        let (sin_lon, cos_lon) = self.lon_deg.to_radians().sin_cos();
        let n = self.prime_vertical_radius();

        Vector3::new(
            (n + self.height_m) * cos_lat * cos_lon,
            (n + self.height_m) * cos_lat * sin_lon,
            (n * (1.0 - WGS84_E2) + self.height_m) * sin_lat,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::WGS84_B;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_equator_prime_meridian() {
        let ecef = Geodetic::new(0.0, 0.0, 0.0).to_ecef();
        assert_relative_eq!(ecef.x, WGS84_A);
        assert_relative_eq!(ecef.y, 0.0);
        assert_relative_eq!(ecef.z, 0.0);
    }

    #[test]
    fn test_north_pole_is_semi_minor_axis() {
        let ecef = Geodetic::new(90.0, 0.0, 0.0).to_ecef();
        assert!(ecef.x.abs() < 1e-6);
        assert_relative_eq!(ecef.z, WGS84_B, epsilon = 1e-6);
    }

    #[test]
    fn test_height_moves_along_normal() {
        let ground = Geodetic::new(45.0, 30.0, 0.0).to_ecef();
        let raised = Geodetic::new(45.0, 30.0, 1000.0).to_ecef();
        assert_relative_eq!((raised - ground).norm(), 1000.0, epsilon = 1e-6);
    }

    // Reference values for the WMM2020 test points
    #[rstest]
    #[case(80.0, 0.0, 0.0, [1_111_164.870_810_012_6, 0.0, 6_259_542.961_028_692])]
    #[case(0.0, 120.0, 0.0, [-3_189_068.5, 5_523_628.670_817_468, 0.0])]
    #[case(-80.0, 240.0, 0.0, [-555_582.435_405_006_7, -962_297.005_914_324_5, -6_259_542.961_028_692])]
    #[case(80.0, 0.0, 100_000.0, [1_128_529.688_576_705_8, 0.0, 6_358_023.736_329_913])]
    fn test_wmm_reference_positions(
        #[case] lat: f64,
        #[case] lon: f64,
        #[case] height: f64,
        #[case] expected: [f64; 3],
    ) {
        let ecef = Geodetic::new(lat, lon, height).to_ecef();
        for k in 0..3 {
            assert!(
                (ecef[k] - expected[k]).abs() < 1e-6,
                "component {} was {}, expected {}",
                k,
                ecef[k],
                expected[k]
            );
        }
    }
}
