//! Polygon mesh implementation of the geometry kernel, on top of csgrs.
//!
//! csgrs keeps solids as soups of convex polygons and runs booleans through
//! a BSP tree, so coincident faces (flush cuts, flush bosses) stay well
//! defined where a B-rep kernel may give up.

use super::types::*;
use super::{check_extent, check_offset, check_rotation, truck, GeometryKernel, KernelOpError, KernelResult};
use csgrs::mesh::Mesh;
use csgrs::traits::*;
use nalgebra::{Rotation3, Translation3, Unit, Vector3};

/// Corners closer than this (mm) are merged when facets are stitched for STEP.
const STEP_WELD: f64 = 1e-7;

/// Polygon-soup solid owned by [`MeshKernel`].
#[derive(Debug, Clone)]
pub struct MeshSolid {
    mesh: Mesh<()>,
}

impl MeshSolid {
    fn new(mesh: Mesh<()>) -> Self {
        Self { mesh }
    }

    pub fn polygon_count(&self) -> usize {
        self.mesh.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.polygons.is_empty()
    }

    /// Corner loops of every polygon, in csgrs winding order.
    fn facets(&self) -> Vec<Vec<Point3D>> {
        self.mesh
            .polygons
            .iter()
            .map(|polygon| {
                polygon
                    .vertices
                    .iter()
                    .map(|v| Point3D::new(v.pos.x, v.pos.y, v.pos.z))
                    .collect()
            })
            .collect()
    }
}

impl Default for MeshSolid {
    fn default() -> Self {
        Self::new(Mesh::new())
    }
}

/// Polygon mesh kernel backed by csgrs.
pub struct MeshKernel {
    /// Number of facets used to approximate a full circle.
    pub segments: usize,
}

impl MeshKernel {
    pub fn new() -> Self {
        Self { segments: 128 }
    }

    pub fn with_segments(segments: usize) -> Self {
        Self { segments }
    }
}

impl Default for MeshKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryKernel for MeshKernel {
    type Solid = MeshSolid;

    fn name(&self) -> &'static str {
        "csgrs"
    }

    fn create_box(&self, width: f64, height: f64, depth: f64) -> KernelResult<Self::Solid> {
        check_extent("Box width", width)?;
        check_extent("Box height", height)?;
        check_extent("Box depth", depth)?;
        Ok(MeshSolid::new(Mesh::cuboid(width, height, depth, None)))
    }

    fn create_cylinder(&self, radius: f64, height: f64) -> KernelResult<Self::Solid> {
        check_extent("Cylinder radius", radius)?;
        check_extent("Cylinder height", height)?;
        if self.segments < 3 {
            return Err(KernelOpError::InvalidGeometry(format!(
                "Cylinder needs at least 3 segments, got {}",
                self.segments
            )));
        }
        Ok(MeshSolid::new(Mesh::cylinder(radius, height, self.segments, None)))
    }

    fn translate(&self, solid: &Self::Solid, offset: Vector3D) -> KernelResult<Self::Solid> {
        check_offset(&offset)?;
        Ok(MeshSolid::new(solid.mesh.translate(offset.x, offset.y, offset.z)))
    }

    fn rotate(&self, solid: &Self::Solid, rotation: &Rotation) -> KernelResult<Self::Solid> {
        check_rotation(rotation)?;
        let axis = Unit::new_normalize(Vector3::new(rotation.axis.x, rotation.axis.y, rotation.axis.z));
        let origin = Vector3::new(rotation.origin.x, rotation.origin.y, rotation.origin.z);
        // Move the origin to zero, turn, move back.
        let about_origin = Translation3::from(origin)
            * Rotation3::from_axis_angle(&axis, rotation.angle_degrees.to_radians())
            * Translation3::from(-origin);
        Ok(MeshSolid::new(solid.mesh.transform(&about_origin.to_homogeneous())))
    }

    // === Boolean Operations ===

    fn boolean_union(&self, solid_a: &Self::Solid, solid_b: &Self::Solid) -> KernelResult<Self::Solid> {
        Ok(MeshSolid::new(solid_a.mesh.union(&solid_b.mesh)))
    }

    fn boolean_intersect(&self, solid_a: &Self::Solid, solid_b: &Self::Solid) -> KernelResult<Self::Solid> {
        Ok(MeshSolid::new(solid_a.mesh.intersection(&solid_b.mesh)))
    }

    fn boolean_subtract(&self, solid_a: &Self::Solid, solid_b: &Self::Solid) -> KernelResult<Self::Solid> {
        Ok(MeshSolid::new(solid_a.mesh.difference(&solid_b.mesh)))
    }

    // === Output ===

    fn tessellate(&self, solid: &Self::Solid) -> KernelResult<TriangleMesh> {
        let facets = solid.facets();
        let mut mesh = TriangleMesh::with_capacity(facets.len() * 4, facets.len() * 2);
        for (face_id, corners) in facets.iter().enumerate() {
            if corners.len() < 3 {
                continue;
            }
            // csgrs polygons are convex, so a fan covers them.
            let indices: Vec<u32> = corners.iter().map(|p| mesh.add_vertex(*p)).collect();
            for pair in indices[1..].windows(2) {
                mesh.add_triangle_with_face(indices[0], pair[0], pair[1], face_id as u32);
            }
        }
        Ok(mesh)
    }

    fn export_step(&self, solid: &Self::Solid) -> KernelResult<String> {
        if solid.is_empty() {
            return Err(KernelOpError::InvalidGeometry("cannot write an empty solid as STEP".into()));
        }
        truck::faceted_step(&solid.facets(), STEP_WELD)
    }
}
