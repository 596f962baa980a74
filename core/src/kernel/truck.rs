//! B-rep geometry kernel on top of the Truck crates.
//!
//! Truck keeps exact cylinders and can write STEP, but its boolean operations
//! give up on coincident faces. Such failures come back as
//! [`KernelOpError::OperationFailed`].
//!
//! Polygon solids from other kernels reach STEP through [`faceted_step`],
//! which rebuilds them as planar truck faces.

use super::types::*;
use super::{check_extent, check_offset, check_rotation, GeometryKernel, KernelOpError, KernelResult};
use std::collections::HashMap;
use tracing::{debug, warn};

// cgmath64 types as re-exported by truck-modeling
use truck_meshalgo::tessellation::MeshableShape;
use truck_modeling::{
    builder, Edge, InnerSpace, Point3, Rad, Shell, ShellCondition, Solid, Vector3, Vertex, VertexID, Wire,
};
use truck_polymesh::PolygonMesh;
use truck_stepio::out::{CompleteStepDisplay, StepHeaderDescriptor, StepModels};

const STEP_FILE_NAME: &str = "hepa_filter_holder.step";

/// Sweep angle that closes a revolved wire; truck needs more than 2π.
const FULL_TURN: f64 = 7.0;

pub struct TruckKernel {
    /// Boolean and tessellation tolerance in millimetres.
    pub tolerance: f64,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self::with_tolerance(0.01)
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    fn shapeop(&self, result: Option<Solid>, op: &str) -> KernelResult<Solid> {
        result.ok_or_else(|| {
            KernelOpError::OperationFailed(format!(
                "truck {} gave no result (tolerance {})",
                op, self.tolerance
            ))
        })
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

fn to_vector(v: &Vector3D) -> Vector3 {
    Vector3::new(v.x, v.y, v.z)
}

fn to_point(p: &Point3D) -> Point3 {
    Point3::new(p.x, p.y, p.z)
}

/// Copy one face's triangles into `mesh`, tagging them with `face_id`.
fn append_face_mesh(mesh: &mut TriangleMesh, face_mesh: &PolygonMesh, face_id: u32) {
    let base = mesh.positions.len() as u32;
    for p in face_mesh.positions() {
        mesh.add_vertex(Point3D::new(p.x, p.y, p.z));
    }
    for [a, b, c] in face_mesh.tri_faces() {
        mesh.add_triangle_with_face(base + a.pos as u32, base + b.pos as u32, base + c.pos as u32, face_id);
    }
}

impl GeometryKernel for TruckKernel {
    type Solid = Solid;

    fn name(&self) -> &'static str {
        "truck"
    }

    fn create_box(&self, width: f64, height: f64, depth: f64) -> KernelResult<Self::Solid> {
        check_extent("Box width", width)?;
        check_extent("Box height", height)?;
        check_extent("Box depth", depth)?;

        // Point -> edge along X -> face along Y -> solid along Z.
        let corner = builder::vertex(Point3::new(0.0, 0.0, 0.0));
        let edge = builder::tsweep(&corner, Vector3::unit_x() * width);
        let face = builder::tsweep(&edge, Vector3::unit_y() * height);
        Ok(builder::tsweep(&face, Vector3::unit_z() * depth))
    }

    fn create_cylinder(&self, radius: f64, height: f64) -> KernelResult<Self::Solid> {
        check_extent("Cylinder radius", radius)?;
        check_extent("Cylinder height", height)?;

        let rim = builder::vertex(Point3::new(radius, 0.0, 0.0));
        let circle: Wire = builder::rsweep(&rim, Point3::new(0.0, 0.0, 0.0), Vector3::unit_z(), Rad(FULL_TURN));
        let disk = builder::try_attach_plane(&[circle])
            .map_err(|e| KernelOpError::OperationFailed(format!("could not cap cylinder: {:?}", e)))?;
        Ok(builder::tsweep(&disk, Vector3::unit_z() * height))
    }

    fn translate(&self, solid: &Self::Solid, offset: Vector3D) -> KernelResult<Self::Solid> {
        check_offset(&offset)?;
        Ok(builder::translated(solid, to_vector(&offset)))
    }

    fn rotate(&self, solid: &Self::Solid, rotation: &Rotation) -> KernelResult<Self::Solid> {
        check_rotation(rotation)?;
        Ok(builder::rotated(
            solid,
            to_point(&rotation.origin),
            to_vector(&rotation.axis).normalize(),
            Rad(rotation.angle_degrees.to_radians()),
        ))
    }

    fn boolean_union(&self, solid_a: &Self::Solid, solid_b: &Self::Solid) -> KernelResult<Self::Solid> {
        self.shapeop(truck_shapeops::or(solid_a, solid_b, self.tolerance), "union")
    }

    fn boolean_intersect(&self, solid_a: &Self::Solid, solid_b: &Self::Solid) -> KernelResult<Self::Solid> {
        self.shapeop(truck_shapeops::and(solid_a, solid_b, self.tolerance), "intersection")
    }

    fn boolean_subtract(&self, solid_a: &Self::Solid, solid_b: &Self::Solid) -> KernelResult<Self::Solid> {
        // A − B = A ∩ ¬B; not() flips the solid in place.
        let mut outside_b = solid_b.clone();
        outside_b.not();
        self.shapeop(truck_shapeops::and(solid_a, &outside_b, self.tolerance), "subtraction")
    }

    fn tessellate(&self, solid: &Self::Solid) -> KernelResult<TriangleMesh> {
        // Faces of the triangulated solid carry Option<PolygonMesh>.
        let meshed = solid.triangulation(self.tolerance);

        let mut mesh = TriangleMesh::new();
        let faces = meshed.boundaries().iter().flat_map(|shell| shell.face_iter());
        for (face_id, face) in faces.enumerate() {
            // Face ids count topological faces, meshed or not.
            match face.surface() {
                Some(face_mesh) => append_face_mesh(&mut mesh, &face_mesh, face_id as u32),
                None => warn!(face_id, "truck could not triangulate face, skipping"),
            }
        }

        if mesh.is_empty() {
            return Err(KernelOpError::TessellationFailed("solid produced no triangles".into()));
        }
        Ok(mesh)
    }

    fn export_step(&self, solid: &Self::Solid) -> KernelResult<String> {
        Ok(solid_step(solid))
    }
}

fn step_header() -> StepHeaderDescriptor {
    StepHeaderDescriptor {
        file_name: STEP_FILE_NAME.to_string(),
        time_stamp: "2024-01-01T00:00:00".to_string(),
        authors: vec!["hepa-holder".to_string()],
        organization: Vec::new(),
        organization_system: "truck".to_string(),
        authorization: String::new(),
    }
}

fn solid_step(solid: &Solid) -> String {
    let compressed = solid.compress();
    let models: StepModels<_, _, _> = std::iter::once(&compressed).collect();
    CompleteStepDisplay::new(models, step_header()).to_string()
}

fn shell_step(shell: &Shell) -> String {
    let compressed = shell.compress();
    let models: StepModels<_, _, _> = std::iter::once(&compressed).collect();
    CompleteStepDisplay::new(models, step_header()).to_string()
}

/// Snaps corners onto one shared truck vertex per `weld`-sized cell.
struct Welder {
    weld: f64,
    vertices: HashMap<[i64; 3], Vertex>,
    edges: HashMap<(VertexID, VertexID), Edge>,
}

impl Welder {
    fn new(weld: f64) -> Self {
        Self { weld, vertices: HashMap::new(), edges: HashMap::new() }
    }

    fn vertex(&mut self, p: &Point3D) -> Vertex {
        let key = [p.x, p.y, p.z].map(|c| (c / self.weld).round() as i64);
        self.vertices.entry(key).or_insert_with(|| builder::vertex(to_point(p))).clone()
    }

    /// The edge from `a` to `b`, reusing the opposite edge of a neighbour.
    fn edge(&mut self, a: &Vertex, b: &Vertex) -> Edge {
        if let Some(edge) = self.edges.get(&(b.id(), a.id())) {
            return edge.inverse();
        }
        self.edges.entry((a.id(), b.id())).or_insert_with(|| builder::line(a, b)).clone()
    }

    /// Welded corner loop of one facet, or `None` once it collapses below a triangle.
    fn corners(&mut self, facet: &[Point3D]) -> Option<Vec<Vertex>> {
        let mut corners: Vec<Vertex> = Vec::with_capacity(facet.len());
        for p in facet {
            let v = self.vertex(p);
            if corners.last().map_or(true, |last| last.id() != v.id()) {
                corners.push(v);
            }
        }
        while corners.len() > 1 && corners[0].id() == corners[corners.len() - 1].id() {
            corners.pop();
        }
        (corners.len() >= 3).then_some(corners)
    }
}

/// Rebuild a polygon soup as a shell of planar truck faces.
///
/// Each facet is a convex loop of corners, counter-clockwise seen from
/// outside. Corners closer than `weld` become one vertex, so neighbouring
/// facets share their edges. Facets that collapse or that truck cannot fill
/// are skipped with a warning.
pub(crate) fn faceted_shell(facets: &[Vec<Point3D>], weld: f64) -> KernelResult<Shell> {
    check_extent("Weld distance", weld)?;

    let mut welder = Welder::new(weld);
    let mut faces = Vec::with_capacity(facets.len());
    for (index, facet) in facets.iter().enumerate() {
        let corners = match welder.corners(facet) {
            Some(corners) => corners,
            None => {
                debug!(facet = index, "facet collapsed while welding, skipping");
                continue;
            }
        };
        let wire: Wire = (0..corners.len())
            .map(|i| welder.edge(&corners[i], &corners[(i + 1) % corners.len()]))
            .collect();
        match builder::try_attach_plane(&[wire]) {
            Ok(face) => faces.push(face),
            Err(e) => warn!(facet = index, "truck could not fill facet, skipping: {:?}", e),
        }
    }

    if faces.is_empty() {
        return Err(KernelOpError::OperationFailed("no facet could be converted to a truck face".into()));
    }
    Ok(faces.into_iter().collect())
}

/// STEP text for a polygon soup.
///
/// A watertight soup is written as a solid, anything else as an open shell.
pub(crate) fn faceted_step(facets: &[Vec<Point3D>], weld: f64) -> KernelResult<String> {
    let shell = faceted_shell(facets, weld)?;
    if shell.shell_condition() == ShellCondition::Closed {
        if let Ok(solid) = Solid::try_new(vec![shell.clone()]) {
            debug!(faces = shell.len(), "writing faceted solid");
            return Ok(solid_step(&solid));
        }
    }
    warn!(faces = shell.len(), "faceted shell is not closed, writing it as a surface model");
    Ok(shell_step(&shell))
}
