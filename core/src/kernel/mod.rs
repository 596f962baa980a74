//! Kernel abstraction layer for CAD geometry operations.
//!
//! This module provides a trait-based abstraction over the underlying CAD kernel,
//! allowing the holder builder to run against a B-rep kernel (Truck) or the
//! csgrs polygon kernel without changing the build sequence.

pub mod types;
mod mesh;
mod truck;

#[cfg(test)]
mod tests_mesh;

pub use mesh::{MeshKernel, MeshSolid};
pub use truck::TruckKernel;
pub use types::*;

use crate::geometry::MassProperties;
use thiserror::Error;

/// Errors that can occur during kernel operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelOpError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Tessellation failed: {0}")]
    TessellationFailed(String),
}

/// Result type for kernel operations.
pub type KernelResult<T> = Result<T, KernelOpError>;

/// Abstract interface for CAD kernel geometry operations.
///
/// Solids are values: every operation borrows its inputs and returns a new
/// solid, so a superseded handle is simply dropped by the caller.
pub trait GeometryKernel: Send + Sync {
    /// The kernel's internal solid representation.
    type Solid: Clone;

    /// Human readable kernel name for logs.
    fn name(&self) -> &'static str;

    /// Create a box spanning (0,0,0) to (width, height, depth).
    fn create_box(&self, width: f64, height: f64, depth: f64) -> KernelResult<Self::Solid>;

    /// Create a cylinder with its base centred at the origin and its axis along +Z.
    fn create_cylinder(&self, radius: f64, height: f64) -> KernelResult<Self::Solid>;

    fn translate(&self, solid: &Self::Solid, offset: Vector3D) -> KernelResult<Self::Solid>;

    fn rotate(&self, solid: &Self::Solid, rotation: &Rotation) -> KernelResult<Self::Solid>;

    /// Apply a placement: rotation first, then translation.
    fn place(&self, solid: &Self::Solid, placement: &Placement) -> KernelResult<Self::Solid> {
        let rotated = match &placement.rotation {
            Some(rotation) => self.rotate(solid, rotation)?,
            None => solid.clone(),
        };
        if placement.translation == Vector3D::zero() {
            Ok(rotated)
        } else {
            self.translate(&rotated, placement.translation)
        }
    }

    // === Boolean Operations ===

    /// Compute the union of two solids (A ∪ B).
    fn boolean_union(&self, solid_a: &Self::Solid, solid_b: &Self::Solid) -> KernelResult<Self::Solid>;

    /// Compute the intersection of two solids (A ∩ B).
    fn boolean_intersect(&self, solid_a: &Self::Solid, solid_b: &Self::Solid) -> KernelResult<Self::Solid>;

    /// Compute the difference of two solids (A - B).
    fn boolean_subtract(&self, solid_a: &Self::Solid, solid_b: &Self::Solid) -> KernelResult<Self::Solid>;

    // === Output ===

    /// Convert a solid to a triangle mesh.
    fn tessellate(&self, solid: &Self::Solid) -> KernelResult<TriangleMesh>;

    /// Volume, surface area and bounds of a solid, measured on its tessellation.
    fn measure(&self, solid: &Self::Solid) -> KernelResult<MassProperties> {
        let mesh = self.tessellate(solid)?;
        Ok(MassProperties::from_mesh(&mesh))
    }

    /// Export a solid to STEP format and return as a string.
    fn export_step(&self, solid: &Self::Solid) -> KernelResult<String>;
}

/// Get the default kernel implementation.
pub fn default_kernel() -> MeshKernel {
    MeshKernel::default()
}

pub(crate) fn check_extent(what: &str, value: f64) -> KernelResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(KernelOpError::InvalidGeometry(format!(
            "{} must be positive and finite, got {}",
            what, value
        )))
    }
}

pub(crate) fn check_offset(offset: &Vector3D) -> KernelResult<()> {
    if offset.is_finite() {
        Ok(())
    } else {
        Err(KernelOpError::InvalidGeometry(format!(
            "Translation must be finite, got {:?}",
            offset
        )))
    }
}

pub(crate) fn check_rotation(rotation: &Rotation) -> KernelResult<()> {
    if rotation.is_well_formed() {
        Ok(())
    } else {
        Err(KernelOpError::InvalidGeometry(format!(
            "Rotation needs a finite origin, angle and non-zero axis, got {:?}",
            rotation
        )))
    }
}
