//! Common geometry types for the kernel abstraction layer.
//!
//! These types are kernel-agnostic and used to communicate between
//! the holder builder and the kernel implementation.

use serde::{Deserialize, Serialize};

/// A 3D point in world space (millimetres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn from_array(arr: [f64; 3]) -> Self {
        Self { x: arr[0], y: arr[1], z: arr[2] }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A 3D vector/direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn unit_x() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub fn from_array(arr: [f64; 3]) -> Self {
        Self { x: arr[0], y: arr[1], z: arr[2] }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Axis-angle rotation about a line through `origin`.
///
/// Positive angles follow the right-hand rule around `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub origin: Point3D,
    pub axis: Vector3D,
    pub angle_degrees: f64,
}

impl Rotation {
    pub fn new(origin: Point3D, axis: Vector3D, angle_degrees: f64) -> Self {
        Self { origin, axis, angle_degrees }
    }

    /// Rotation about the global X axis through the origin.
    pub fn about_x(angle_degrees: f64) -> Self {
        Self::new(Point3D::origin(), Vector3D::unit_x(), angle_degrees)
    }

    pub fn is_well_formed(&self) -> bool {
        self.origin.is_finite()
            && self.axis.is_finite()
            && self.angle_degrees.is_finite()
            && self.axis.length() > 1e-10
    }
}

/// Rigid placement of a primitive: optional rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub rotation: Option<Rotation>,
    pub translation: Vector3D,
}

impl Placement {
    pub fn identity() -> Self {
        Self { rotation: None, translation: Vector3D::zero() }
    }

    pub fn translation(offset: Vector3D) -> Self {
        Self { rotation: None, translation: offset }
    }

    pub fn rotated_then_translated(rotation: Rotation, offset: Vector3D) -> Self {
        Self { rotation: Some(rotation), translation: offset }
    }

    pub fn is_identity(&self) -> bool {
        self.rotation.is_none() && self.translation == Vector3D::zero()
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3D,
    pub max: Point3D,
}

impl BoundingBox {
    pub fn new(min: Point3D, max: Point3D) -> Self {
        Self { min, max }
    }

    /// An inverted box that any point expands.
    pub fn empty() -> Self {
        Self {
            min: Point3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3D::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand(&mut self, p: Point3D) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        if !other.is_empty() {
            out.expand(other.min);
            out.expand(other.max);
        }
        out
    }

    /// Component-wise comparison of both corners within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        let a = [self.min.to_array(), self.max.to_array()];
        let b = [other.min.to_array(), other.max.to_array()];
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .all(|(u, v)| (u - v).abs() <= tolerance)
    }
}

/// Output triangle mesh from tessellation.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub positions: Vec<Point3D>,
    /// Triangle indices (each triple refers to positions).
    pub triangles: Vec<(u32, u32, u32)>,
    /// Optional per-triangle topological face ID.
    /// When present, triangles with the same face_id belong to the same kernel face.
    pub face_ids: Vec<u32>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
            face_ids: Vec::with_capacity(triangles),
        }
    }

    pub fn add_vertex(&mut self, pos: Point3D) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(pos);
        idx
    }

    /// Add a triangle with an associated topological face ID.
    pub fn add_triangle_with_face(&mut self, i0: u32, i1: u32, i2: u32, face_id: u32) {
        self.triangles.push((i0, i1, i2));
        self.face_ids.push(face_id);
    }

    /// Check if this mesh has face ID information.
    pub fn has_face_ids(&self) -> bool {
        !self.face_ids.is_empty() && self.face_ids.len() == self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Iterate triangles as position triples.
    pub fn triangle_positions(&self) -> impl Iterator<Item = [Point3D; 3]> + '_ {
        self.triangles.iter().map(move |&(a, b, c)| {
            [
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            ]
        })
    }
}
