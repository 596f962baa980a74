use super::*;
use crate::error::HolderError;
use crate::kernel::{KernelOpError, MeshKernel, MeshSolid};

#[test]
fn test_deterministic_object_ids() {
    let a = ObjectId::new_deterministic("HepaFilterHolder/HepaFilterHolder#0");
    let b = ObjectId::new_deterministic("HepaFilterHolder/HepaFilterHolder#0");
    let c = ObjectId::new_deterministic("HepaFilterHolder/HepaFilterHolder#1");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(ObjectId::new(), ObjectId::new());
}

#[test]
fn test_insert_without_document_is_host_unavailable() {
    let kernel = MeshKernel::with_segments(16);
    let mut host = MemoryHost::headless(&kernel);
    let cube = kernel.create_box(1.0, 1.0, 1.0).unwrap();

    let err = host.insert_solid("cube", cube).unwrap_err();
    assert!(matches!(err, HolderError::HostUnavailable(_)), "{:?}", err);
    assert!(matches!(host.recompute(), Err(HolderError::HostUnavailable(_))));
}

#[test]
fn test_ensure_document_reuses_active_document() {
    let kernel = MeshKernel::with_segments(16);
    let mut host = MemoryHost::headless(&kernel);

    assert_eq!(ensure_document(&mut host, "First"), DocumentStatus::Created);
    assert_eq!(ensure_document(&mut host, "Second"), DocumentStatus::Existing);
    assert_eq!(host.documents().len(), 1);
    assert_eq!(host.active_document().unwrap().name, "First");
}

#[test]
fn test_recompute_measures_and_clears_dirty() {
    let kernel = MeshKernel::with_segments(16);
    let mut host = MemoryHost::headless(&kernel);
    host.new_document("Doc");

    let cube = kernel.create_box(2.0, 2.0, 2.0).unwrap();
    let id = host.insert_solid("cube", cube).unwrap();
    assert!(host.active_document().unwrap().dirty);
    assert!(host.object(id).unwrap().properties.is_none());

    host.recompute().unwrap();
    let doc = host.active_document().unwrap();
    assert!(!doc.dirty);
    let props = host.object(id).unwrap().properties.unwrap();
    assert!((props.volume - 8.0).abs() < 1e-9);
}

#[test]
fn test_view_is_optional() {
    let kernel = MeshKernel::with_segments(16);

    let mut headless = MemoryHost::headless(&kernel);
    assert!(headless.view().is_none());

    let mut gui = MemoryHost::with_view(&kernel);
    gui.view().unwrap().fit_all();
    assert_eq!(gui.memory_view().unwrap().fit_count(), 1);
}

#[test]
fn test_export_of_unknown_object_fails() {
    let kernel = MeshKernel::with_segments(16);
    let host = MemoryHost::headless(&kernel);

    let err = host.export_stl(ObjectId::new()).unwrap_err();
    assert!(matches!(err, HolderError::Export { .. }), "{:?}", err);
}

#[test]
fn test_step_export_through_host() {
    let kernel = MeshKernel::with_segments(16);
    let mut host = MemoryHost::headless(&kernel);
    host.new_document("Doc");
    let id = host.insert_solid("cube", kernel.create_box(1.0, 1.0, 1.0).unwrap()).unwrap();

    let step = host.export_step(id).unwrap();
    assert!(step.contains("ISO-10303-21"));
    assert!(step.contains("MANIFOLD_SOLID_BREP"));
}

#[test]
fn test_step_export_of_empty_solid_names_the_object() {
    let kernel = MeshKernel::with_segments(16);
    let mut host = MemoryHost::headless(&kernel);
    host.new_document("Doc");
    let id = host.insert_solid("nothing", MeshSolid::default()).unwrap();

    match host.export_step(id) {
        Err(HolderError::Export { object, source }) => {
            assert_eq!(object, "nothing");
            assert!(matches!(source, KernelOpError::InvalidGeometry(_)));
        }
        other => panic!("expected export error, got {:?}", other),
    }
}

#[test]
fn test_completion_messages() {
    assert_eq!(
        COMPLETION_MESSAGES,
        [
            "HEPA Filter Holder script finished successfully.",
            "The final part has been created in the active document.",
            "To export, select the created object and go to File > Export... and choose STL Mesh.",
        ]
    );
    assert!(COMPLETION_MESSAGES[2].contains("STL Mesh"));
}
