//! Measurement of tessellated solids.
//!
//! Volume uses the divergence theorem over the triangle soup, so it is
//! exact for any closed, consistently oriented surface regardless of
//! T-junctions or unshared seam vertices.

use crate::kernel::{BoundingBox, TriangleMesh};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub volume: f64,
    pub surface_area: f64,
    pub bounds: BoundingBox,
    pub triangle_count: usize,
}

impl MassProperties {
    pub fn from_mesh(mesh: &TriangleMesh) -> Self {
        let mut six_volume = 0.0;
        let mut double_area = 0.0;

        for [a, b, c] in mesh.triangle_positions() {
            // a · (b × c)
            let cross = [
                b.y * c.z - b.z * c.y,
                b.z * c.x - b.x * c.z,
                b.x * c.y - b.y * c.x,
            ];
            six_volume += a.x * cross[0] + a.y * cross[1] + a.z * cross[2];

            let u = [b.x - a.x, b.y - a.y, b.z - a.z];
            let v = [c.x - a.x, c.y - a.y, c.z - a.z];
            let n = [
                u[1] * v[2] - u[2] * v[1],
                u[2] * v[0] - u[0] * v[2],
                u[0] * v[1] - u[1] * v[0],
            ];
            double_area += (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        }

        let mut bounds = BoundingBox::empty();
        for &(i0, i1, i2) in &mesh.triangles {
            for idx in [i0, i1, i2] {
                bounds.expand(mesh.positions[idx as usize]);
            }
        }

        Self {
            volume: (six_volume / 6.0).abs(),
            surface_area: double_area / 2.0,
            bounds,
            triangle_count: mesh.triangles.len(),
        }
    }

    /// True when the measured solid encloses no material.
    pub fn is_degenerate(&self, min_volume: f64) -> bool {
        self.triangle_count == 0 || self.volume <= min_volume
    }
}
