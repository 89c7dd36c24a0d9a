//! Local tangent-plane frames (East/North/Up and North/East/Down)
//!
//! The WMM tables give the field in the local North/East/Down frame at the
//! test point. The library under test works in ECEF, so field vectors are
//! rotated (not translated) into ECEF axes.

use nalgebra::{Matrix3, Vector3};

/// Rotation taking East/North/Up components to ECEF components
///
/// The columns are the East, North and Up unit vectors expressed in ECEF:
///
/// - East  = (-sin λ, cos λ, 0)
/// - North = (-sin φ cos λ, -sin φ sin λ, cos φ)
/// - Up    = (cos φ cos λ, cos φ sin λ, sin φ)
pub fn enu_to_ecef_rotation(lat_deg: f64, lon_deg: f64) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();

    #[rustfmt::skip]
    let m = Matrix3::new(
        -sin_lon, -sin_lat * cos_lon, cos_lat * cos_lon,
         cos_lon, -sin_lat * sin_lon, cos_lat * sin_lon,
         0.0,      cos_lat,           sin_lat,
    );
    m
}

/// Rotates a local East/North/Up vector into ECEF (U, V, W) axes
pub fn enu_to_uvw(enu: &Vector3<f64>, lat_deg: f64, lon_deg: f64) -> Vector3<f64> {
    enu_to_ecef_rotation(lat_deg, lon_deg) * enu
}

/// Rotates a local North/East/Down vector into ECEF (U, V, W) axes
pub fn ned_to_uvw(ned: &Vector3<f64>, lat_deg: f64, lon_deg: f64) -> Vector3<f64> {
    let enu = Vector3::new(ned.y, ned.x, -ned.z);
    enu_to_uvw(&enu, lat_deg, lon_deg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_is_orthonormal() {
        let r = enu_to_ecef_rotation(37.5, -122.0);
        let identity = r.transpose() * r;
        assert_relative_eq!(identity, Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_up_at_origin_is_x_axis() {
        let up = enu_to_uvw(&Vector3::new(0.0, 0.0, 1.0), 0.0, 0.0);
        assert_relative_eq!(up, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn test_north_at_equator_is_z_axis() {
        let north = enu_to_uvw(&Vector3::new(0.0, 1.0, 0.0), 0.0, 90.0);
        assert_relative_eq!(north, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-15);
    }

    #[test]
    fn test_down_is_negative_up() {
        let down = ned_to_uvw(&Vector3::new(0.0, 0.0, 1.0), 45.0, 45.0);
        let up = enu_to_uvw(&Vector3::new(0.0, 0.0, 1.0), 45.0, 45.0);
        assert_relative_eq!(down, -up);
    }

    #[test]
    fn test_wmm_reference_field() {
        // First WMM2020 point: 80N 0E, X/Y/Z = 6570.4, -146.3, 54606.0 nT
        let ned = Vector3::new(6570.4e-9, -146.3e-9, 54606.0e-9);
        let uvw = ned_to_uvw(&ned, 80.0, 0.0);
        assert_relative_eq!(uvw.x, -1.595_281_325_007_181_7e-5, epsilon = 1e-18);
        assert_relative_eq!(uvw.y, -1.463e-7, epsilon = 1e-18);
        assert_relative_eq!(uvw.z, -5.263_547_417_444_184e-5, epsilon = 1e-18);
    }
}
