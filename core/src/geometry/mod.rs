//! Measurement and mesh output shared by every kernel.

use nalgebra as na;

pub type Point3 = na::Point3<f64>;
pub type Vector3 = na::Vector3<f64>;

pub const EPSILON: f64 = 1e-6;

pub mod measure;
pub use measure::MassProperties;

pub mod stl;
pub use stl::write_ascii_stl;

/// Relative comparison used for measured quantities (volumes, areas).
pub fn relative_eq(actual: f64, expected: f64, rel_tolerance: f64) -> bool {
    let scale = expected.abs().max(actual.abs()).max(EPSILON);
    (actual - expected).abs() <= rel_tolerance * scale
}
