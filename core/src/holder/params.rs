//! Dimension parameters of the HEPA filter holder.
//!
//! All lengths are millimetres. The feature rotation turns a +Z cylinder
//! so that its axis runs along +Y, through the frame's depth.

use crate::error::{HolderError, HolderResult};
use crate::geometry::{Point3, Vector3};
use crate::kernel::{Point3D, Rotation, Vector3D};
use nalgebra::{Rotation3, Unit};
use serde::{Deserialize, Serialize};

/// Tolerance for containment and symmetry checks.
const DIMENSION_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxExtents {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BoxExtents {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }

    fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderSize {
    pub radius: f64,
    pub height: f64,
}

impl CylinderSize {
    pub const fn new(radius: f64, height: f64) -> Self {
        Self { radius, height }
    }

    pub fn cross_section_area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    pub fn volume(&self) -> f64 {
        self.cross_section_area() * self.height
    }
}

/// Left/right placements of a mirrored feature pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeaturePair {
    pub left: Vector3D,
    pub right: Vector3D,
}

impl FeaturePair {
    pub fn both(&self) -> [Vector3D; 2] {
        [self.left, self.right]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HolderParams {
    /// Outer frame block, anchored at the origin.
    pub outer: BoxExtents,
    /// Cavity block cut out of the frame.
    pub inner: BoxExtents,
    pub inner_offset: Vector3D,
    /// Magnet boss cylinders fused onto the frame's X ends.
    pub boss: CylinderSize,
    /// Magnet bores cut into the bosses.
    pub bore: CylinderSize,
    /// Applied to every boss and bore before translation.
    pub feature_rotation: Rotation,
    pub boss_positions: FeaturePair,
    pub bore_positions: FeaturePair,
}

impl HolderParams {
    /// The production dimensions of the HEPA filter holder.
    pub fn hepa() -> Self {
        Self {
            outer: BoxExtents::new(118.50, 20.00, 82.20),
            inner: BoxExtents::new(108.88, 20.00, 72.20),
            inner_offset: Vector3D::new(4.81, 0.00, 5.00),
            boss: CylinderSize::new(13.10, 10.00),
            bore: CylinderSize::new(10.30, 10.00),
            feature_rotation: Rotation::about_x(-90.0),
            boss_positions: FeaturePair {
                left: Vector3D::new(-10.30, 10.00, 41.10),
                right: Vector3D::new(128.80, 10.00, 41.10),
            },
            // Bores sit 1.00 lower on Y than the bosses.
            bore_positions: FeaturePair {
                left: Vector3D::new(-10.30, 9.00, 41.10),
                right: Vector3D::new(128.80, 9.00, 41.10),
            },
        }
    }

    /// Unit direction of a boss/bore axis after the feature rotation.
    pub fn feature_axis(&self) -> Vector3 {
        self.rotate_about_feature_origin(&Vector3::z())
    }

    /// Centre of the base disk of a boss/bore placed at `position`.
    pub fn feature_base(&self, position: &Vector3D) -> Point3 {
        let r = &self.feature_rotation;
        let origin = Point3::new(r.origin.x, r.origin.y, r.origin.z);
        // The unrotated base centre is the world origin.
        let base = origin + self.rotate_about_feature_origin(&(Point3::origin() - origin));
        base + Vector3::new(position.x, position.y, position.z)
    }

    fn rotate_about_feature_origin(&self, v: &Vector3) -> Vector3 {
        let r = &self.feature_rotation;
        let axis = Unit::new_normalize(Vector3::new(r.axis.x, r.axis.y, r.axis.z));
        Rotation3::from_axis_angle(&axis, r.angle_degrees.to_radians()) * v
    }

    /// Start and end of a feature along the feature axis.
    pub fn axial_span(&self, position: &Vector3D, height: f64) -> (f64, f64) {
        let start = self.feature_axis().dot(&self.feature_base(position).coords);
        (start, start + height)
    }

    /// Material left between the end of each bore and the far face of its boss.
    pub fn cap_thickness(&self) -> f64 {
        self.boss_positions
            .both()
            .iter()
            .zip(self.bore_positions.both().iter())
            .map(|(boss, bore)| {
                let (_, boss_end) = self.axial_span(boss, self.boss.height);
                let (_, bore_end) = self.axial_span(bore, self.bore.height);
                boss_end - bore_end
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// Distance of the boss pair's mid-point from the frame's X mid-plane.
    ///
    /// Zero when the bosses mirror each other across the frame.
    pub fn mirror_offset(&self) -> f64 {
        let mid = (self.boss_positions.left.x + self.boss_positions.right.x) / 2.0;
        mid - self.outer.x / 2.0
    }

    pub fn is_symmetric(&self) -> bool {
        let bore_mid = (self.bore_positions.left.x + self.bore_positions.right.x) / 2.0;
        self.mirror_offset().abs() < DIMENSION_EPSILON
            && (bore_mid - self.outer.x / 2.0).abs() < DIMENSION_EPSILON
    }

    /// Check every invariant the build sequence relies on.
    pub fn validate(&self) -> HolderResult<()> {
        for (what, value) in [
            ("outer.x", self.outer.x),
            ("outer.y", self.outer.y),
            ("outer.z", self.outer.z),
            ("inner.x", self.inner.x),
            ("inner.y", self.inner.y),
            ("inner.z", self.inner.z),
            ("boss.radius", self.boss.radius),
            ("boss.height", self.boss.height),
            ("bore.radius", self.bore.radius),
            ("bore.height", self.bore.height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{} must be positive and finite, got {}", what, value)));
            }
        }

        let positions = [
            self.inner_offset,
            self.boss_positions.left,
            self.boss_positions.right,
            self.bore_positions.left,
            self.bore_positions.right,
        ];
        if positions.iter().any(|p| !p.is_finite()) {
            return Err(invalid("placements must be finite".into()));
        }
        if !self.feature_rotation.is_well_formed() {
            return Err(invalid("feature rotation must have a finite angle and non-zero axis".into()));
        }

        self.check_cavity_enclosed()?;

        if self.bore.radius >= self.boss.radius {
            return Err(invalid(format!(
                "bore radius {} must be smaller than boss radius {}",
                self.bore.radius, self.boss.radius
            )));
        }

        let axis = self.feature_axis();
        for (side, boss, bore) in [
            ("left", &self.boss_positions.left, &self.bore_positions.left),
            ("right", &self.boss_positions.right, &self.bore_positions.right),
        ] {
            let offset = self.feature_base(bore) - self.feature_base(boss);
            let lateral = offset - axis * offset.dot(&axis);
            if lateral.norm() > DIMENSION_EPSILON {
                return Err(invalid(format!("{} bore is not coaxial with its boss", side)));
            }

            let (boss_start, _) = self.axial_span(boss, self.boss.height);
            let (bore_start, _) = self.axial_span(bore, self.bore.height);
            if bore_start >= boss_start {
                return Err(invalid(format!(
                    "{} bore must start before its boss ({} >= {})",
                    side, bore_start, boss_start
                )));
            }
        }

        let cap = self.cap_thickness();
        if cap <= DIMENSION_EPSILON {
            return Err(invalid(format!("bore cap thickness must be positive, got {}", cap)));
        }

        Ok(())
    }

    fn check_cavity_enclosed(&self) -> HolderResult<()> {
        let outer = self.outer.as_array();
        let inner = self.inner.as_array();
        let offset = self.inner_offset.to_array();
        for (axis, name) in ["x", "y", "z"].iter().enumerate() {
            let start = offset[axis];
            let end = offset[axis] + inner[axis];
            if start < -DIMENSION_EPSILON || end > outer[axis] + DIMENSION_EPSILON {
                return Err(invalid(format!(
                    "cavity spans [{}, {}] on {} but the frame is [0, {}]",
                    start, end, name, outer[axis]
                )));
            }
        }
        Ok(())
    }

    /// World-space base centre of every boss and bore, for logging.
    pub fn feature_bases(&self) -> Vec<Point3D> {
        self.boss_positions
            .both()
            .iter()
            .chain(self.bore_positions.both().iter())
            .map(|p| {
                let b = self.feature_base(p);
                Point3D::new(b.x, b.y, b.z)
            })
            .collect()
    }
}

impl Default for HolderParams {
    fn default() -> Self {
        Self::hepa()
    }
}

fn invalid(message: String) -> HolderError {
    HolderError::InvalidParameters(message)
}
