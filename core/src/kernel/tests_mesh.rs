// Checks for the csgrs polygon kernel: primitives, placements and booleans,
// including the flush (coplanar) cases the holder relies on.

use super::*;
use crate::geometry::relative_eq;
use std::f64::consts::TAU;

fn volume(kernel: &MeshKernel, solid: &MeshSolid) -> f64 {
    kernel.measure(solid).unwrap().volume
}

fn unit_cube_at(kernel: &MeshKernel, x: f64, y: f64, z: f64, size: f64) -> MeshSolid {
    let cube = kernel.create_box(size, size, size).unwrap();
    kernel.translate(&cube, Vector3D::new(x, y, z)).unwrap()
}

/// Exact volume of the N-gon prism the kernel uses for a cylinder.
fn prism_volume(segments: usize, radius: f64, height: f64) -> f64 {
    let n = segments as f64;
    n / 2.0 * radius * radius * (TAU / n).sin() * height
}

#[test]
fn test_box_volume_and_bounds() {
    let kernel = MeshKernel::new();
    let solid = kernel.create_box(2.0, 3.0, 4.0).unwrap();
    assert_eq!(solid.polygon_count(), 6);

    let props = kernel.measure(&solid).unwrap();
    assert!((props.volume - 24.0).abs() < 1e-9);
    assert!((props.surface_area - 52.0).abs() < 1e-9);
    let expected = BoundingBox::new(Point3D::origin(), Point3D::new(2.0, 3.0, 4.0));
    assert!(props.bounds.approx_eq(&expected, 1e-12));
}

#[test]
fn test_cylinder_matches_prism_volume() {
    let kernel = MeshKernel::with_segments(64);
    let solid = kernel.create_cylinder(13.1, 10.0).unwrap();
    assert!(solid.polygon_count() >= 66, "polygons {}", solid.polygon_count());

    let v = volume(&kernel, &solid);
    assert!((v - prism_volume(64, 13.1, 10.0)).abs() < 1e-6, "volume {}", v);

    let bounds = kernel.measure(&solid).unwrap().bounds;
    let expected = BoundingBox::new(Point3D::new(-13.1, -13.1, 0.0), Point3D::new(13.1, 13.1, 10.0));
    assert!(bounds.approx_eq(&expected, 1e-9), "bounds {:?}", bounds);
}

#[test]
fn test_rotation_about_x_turns_axis_to_y() {
    let kernel = MeshKernel::new();
    let cylinder = kernel.create_cylinder(2.0, 5.0).unwrap();
    let rotated = kernel.rotate(&cylinder, &Rotation::about_x(-90.0)).unwrap();

    let bounds = kernel.measure(&rotated).unwrap().bounds;
    let expected = BoundingBox::new(Point3D::new(-2.0, 0.0, -2.0), Point3D::new(2.0, 5.0, 2.0));
    assert!(bounds.approx_eq(&expected, 1e-9), "bounds {:?}", bounds);
    assert!((volume(&kernel, &rotated) - volume(&kernel, &cylinder)).abs() < 1e-9);
}

#[test]
fn test_place_rotates_before_translating() {
    let kernel = MeshKernel::new();
    let cylinder = kernel.create_cylinder(10.3, 10.0).unwrap();
    let placement = Placement::rotated_then_translated(
        Rotation::about_x(-90.0),
        Vector3D::new(-10.3, 9.0, 41.1),
    );
    let placed = kernel.place(&cylinder, &placement).unwrap();

    let bounds = kernel.measure(&placed).unwrap().bounds;
    let expected = BoundingBox::new(Point3D::new(-20.6, 9.0, 30.8), Point3D::new(0.0, 19.0, 51.4));
    assert!(bounds.approx_eq(&expected, 1e-9), "bounds {:?}", bounds);
}

#[test]
fn test_transforms_leave_input_untouched() {
    let kernel = MeshKernel::new();
    let cube = kernel.create_box(1.0, 1.0, 1.0).unwrap();
    let _moved = kernel.translate(&cube, Vector3D::new(5.0, 0.0, 0.0)).unwrap();

    let bounds = kernel.measure(&cube).unwrap().bounds;
    assert!(bounds.approx_eq(&BoundingBox::new(Point3D::origin(), Point3D::new(1.0, 1.0, 1.0)), 1e-12));
}

#[test]
fn test_overlapping_boxes_booleans() {
    let kernel = MeshKernel::new();
    let a = unit_cube_at(&kernel, 0.0, 0.0, 0.0, 2.0);
    let b = unit_cube_at(&kernel, 1.0, 1.0, 1.0, 2.0);

    let union = kernel.boolean_union(&a, &b).unwrap();
    let difference = kernel.boolean_subtract(&a, &b).unwrap();
    let intersection = kernel.boolean_intersect(&a, &b).unwrap();

    assert!((volume(&kernel, &union) - 15.0).abs() < 1e-9);
    assert!((volume(&kernel, &difference) - 7.0).abs() < 1e-9);
    assert!((volume(&kernel, &intersection) - 1.0).abs() < 1e-9);
}

#[test]
fn test_union_of_face_sharing_boxes() {
    let kernel = MeshKernel::new();
    let a = unit_cube_at(&kernel, 0.0, 0.0, 0.0, 1.0);
    let b = unit_cube_at(&kernel, 1.0, 0.0, 0.0, 1.0);

    let union = kernel.boolean_union(&a, &b).unwrap();
    let props = kernel.measure(&union).unwrap();
    assert!((props.volume - 2.0).abs() < 1e-9);
    // The shared face is interior and must not survive.
    assert!((props.surface_area - 10.0).abs() < 1e-9, "area {}", props.surface_area);
}

#[test]
fn test_flush_through_cut() {
    let kernel = MeshKernel::new();
    let outer = kernel.create_box(118.5, 20.0, 82.2).unwrap();
    let inner = kernel.create_box(108.88, 20.0, 72.2).unwrap();
    let inner = kernel.translate(&inner, Vector3D::new(4.81, 0.0, 5.0)).unwrap();

    let frame = kernel.boolean_subtract(&outer, &inner).unwrap();
    let props = kernel.measure(&frame).unwrap();
    let expected = 118.5 * 20.0 * 82.2 - 108.88 * 20.0 * 72.2;
    assert!(relative_eq(props.volume, expected, 1e-7), "volume {}", props.volume);
    assert!((expected - 37_591.28).abs() < 1e-6);

    let bounds = BoundingBox::new(Point3D::origin(), Point3D::new(118.5, 20.0, 82.2));
    assert!(props.bounds.approx_eq(&bounds, 1e-9));
}

#[test]
fn test_blind_bore_leaves_cap() {
    let kernel = MeshKernel::with_segments(32);
    let boss = kernel.create_cylinder(13.1, 10.0).unwrap();
    let boss = kernel.translate(&boss, Vector3D::new(0.0, 0.0, 10.0)).unwrap();
    let bore = kernel.create_cylinder(10.3, 10.0).unwrap();
    let bore = kernel.translate(&bore, Vector3D::new(0.0, 0.0, 9.0)).unwrap();

    let drilled = kernel.boolean_subtract(&boss, &bore).unwrap();
    let expected = prism_volume(32, 13.1, 10.0) - prism_volume(32, 10.3, 9.0);
    assert!((volume(&kernel, &drilled) - expected).abs() < 1e-6);
}

#[test]
fn test_disjoint_intersection_is_empty() {
    let kernel = MeshKernel::new();
    let a = unit_cube_at(&kernel, 0.0, 0.0, 0.0, 1.0);
    let b = unit_cube_at(&kernel, 5.0, 5.0, 5.0, 1.0);

    let intersection = kernel.boolean_intersect(&a, &b).unwrap();
    assert!(kernel.measure(&intersection).unwrap().is_degenerate(1e-9));

    // Subtracting something far away changes nothing.
    let difference = kernel.boolean_subtract(&a, &b).unwrap();
    assert!((volume(&kernel, &difference) - 1.0).abs() < 1e-9);
}

#[test]
fn test_tessellation_tags_faces() {
    let kernel = MeshKernel::new();
    let cube = kernel.create_box(1.0, 1.0, 1.0).unwrap();
    let mesh = kernel.tessellate(&cube).unwrap();
    assert_eq!(mesh.triangles.len(), 12);
    assert!(mesh.has_face_ids());
    assert_eq!(mesh.face_ids.iter().max(), Some(&5));
}

#[test]
fn test_invalid_primitives_are_rejected() {
    let kernel = MeshKernel::new();
    assert!(matches!(kernel.create_box(0.0, 1.0, 1.0), Err(KernelOpError::InvalidGeometry(_))));
    assert!(matches!(kernel.create_box(1.0, f64::NAN, 1.0), Err(KernelOpError::InvalidGeometry(_))));
    assert!(matches!(kernel.create_cylinder(-1.0, 1.0), Err(KernelOpError::InvalidGeometry(_))));
    assert!(matches!(
        MeshKernel::with_segments(2).create_cylinder(1.0, 1.0),
        Err(KernelOpError::InvalidGeometry(_))
    ));

    let cube = kernel.create_box(1.0, 1.0, 1.0).unwrap();
    let bad = Rotation::new(Point3D::origin(), Vector3D::zero(), 90.0);
    assert!(matches!(kernel.rotate(&cube, &bad), Err(KernelOpError::InvalidGeometry(_))));
    assert!(matches!(
        kernel.translate(&cube, Vector3D::new(f64::INFINITY, 0.0, 0.0)),
        Err(KernelOpError::InvalidGeometry(_))
    ));
}

fn count(text: &str, entity: &str) -> usize {
    text.matches(entity).count()
}

#[test]
fn test_box_step_is_a_closed_solid() {
    let kernel = MeshKernel::new();
    let cube = kernel.create_box(1.0, 2.0, 3.0).unwrap();
    let step = kernel.export_step(&cube).unwrap();

    assert!(step.contains("ISO-10303-21"));
    assert!(step.contains("MANIFOLD_SOLID_BREP"));
    assert!(step.contains("CLOSED_SHELL"));
    assert_eq!(count(&step, "FACE_SURFACE("), 6);
    // Shared corners are written once.
    assert_eq!(count(&step, "VERTEX_POINT("), 8);
}

#[test]
fn test_holder_step_has_a_face_per_facet() {
    let kernel = MeshKernel::with_segments(32);
    let holder = crate::holder::build_holder(&kernel).unwrap();
    let step = kernel.export_step(&holder).unwrap();

    assert!(step.contains("ISO-10303-21"));
    assert!(step.contains("hepa_filter_holder.step"));
    let faces = count(&step, "FACE_SURFACE(");
    assert!(faces > 0 && faces <= holder.polygon_count(), "{} faces for {} polygons", faces, holder.polygon_count());
}

#[test]
fn test_empty_solid_has_no_step() {
    let kernel = MeshKernel::new();
    let err = kernel.export_step(&MeshSolid::default()).unwrap_err();
    assert!(matches!(err, KernelOpError::InvalidGeometry(_)), "{:?}", err);
}
