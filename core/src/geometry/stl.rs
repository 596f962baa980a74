//! ASCII STL writer for tessellated solids.

use crate::kernel::TriangleMesh;
use std::fmt::Write;

/// Convert a triangle mesh to an ASCII STL string with the given solid `name`.
///
/// Facet normals are computed from the triangle winding.
pub fn write_ascii_stl(name: &str, mesh: &TriangleMesh) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "solid {}", name);

    for [a, b, c] in mesh.triangle_positions() {
        let u = [b.x - a.x, b.y - a.y, b.z - a.z];
        let v = [c.x - a.x, c.y - a.y, c.z - a.z];
        let mut n = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        if len > 1e-12 {
            n = [n[0] / len, n[1] / len, n[2] / len];
        }

        let _ = writeln!(out, "  facet normal {:.6} {:.6} {:.6}", n[0], n[1], n[2]);
        out.push_str("    outer loop\n");
        for p in [a, b, c] {
            let _ = writeln!(out, "      vertex {:.6} {:.6} {:.6}", p.x, p.y, p.z);
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    let _ = writeln!(out, "endsolid {}", name);
    out
}
