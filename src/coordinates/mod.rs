pub mod geodetic;
pub mod local;

pub use geodetic::Geodetic;
pub use local::{enu_to_ecef_rotation, enu_to_uvw, ned_to_uvw};

use nalgebra::Vector3;

/// A test point fully expressed in the frame the library under test uses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EcefCase {
    /// Position of the case in the generated file
    pub index: usize,
    /// Decimal year passed to the field routine
    pub date: f64,
    /// ECEF (ITRF) position in meters
    pub position_m: Vector3<f64>,
    /// Expected field in ECEF axes, in tesla
    pub field_t: Vector3<f64>,
}
