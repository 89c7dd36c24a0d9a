//! Constants module for geodetic and magnetic unit conversions

// WGS84 ellipsoid
/// WGS84 semi-major axis in meters
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 inverse flattening
pub const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;
/// WGS84 flattening
pub const WGS84_F: f64 = 1.0 / WGS84_INVERSE_FLATTENING;
/// WGS84 semi-minor axis in meters
pub const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);
/// WGS84 first eccentricity squared: e² = 2f - f²
pub const WGS84_E2: f64 = 2.0 * WGS84_F - WGS84_F * WGS84_F;

// Units
/// Meters in a kilometer
pub const KM_TO_M: f64 = 1_000.0;
/// Nanotesla to tesla conversion factor
pub const NT_TO_T: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wgs84_derived_constants() {
        assert_relative_eq!(WGS84_B, 6_356_752.314_245, epsilon = 1e-6);
        assert_relative_eq!(WGS84_E2, 0.006_694_379_990_14, epsilon = 1e-14);
    }
}
