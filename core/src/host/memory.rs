use super::{DocumentHost, ObjectId, ViewHost};
use crate::error::{HolderError, HolderResult};
use crate::geometry::{write_ascii_stl, MassProperties};
use crate::kernel::{GeometryKernel, KernelOpError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An object placed in a document.
#[derive(Debug, Clone)]
pub struct SceneObject<S> {
    pub id: ObjectId,
    pub label: String,
    pub solid: S,
    /// Filled in by recompute.
    pub properties: Option<MassProperties>,
}

#[derive(Debug, Clone)]
pub struct Document<S> {
    pub name: String,
    pub objects: Vec<SceneObject<S>>,
    /// Set by insertion, cleared by recompute.
    pub dirty: bool,
}

impl<S> Document<S> {
    fn new(name: &str) -> Self {
        Self { name: name.to_string(), objects: Vec::new(), dirty: false }
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject<S>> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            name: self.name.clone(),
            dirty: self.dirty,
            objects: self
                .objects
                .iter()
                .map(|o| ObjectSnapshot {
                    id: o.id,
                    label: o.label.clone(),
                    properties: o.properties,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSnapshot {
    pub id: ObjectId,
    pub label: String,
    pub properties: Option<MassProperties>,
}

/// Serialisable summary of a document, without geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub name: String,
    pub dirty: bool,
    pub objects: Vec<ObjectSnapshot>,
}

impl DocumentSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// View that only counts how often it was fitted.
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    fit_count: usize,
}

impl MemoryView {
    pub fn fit_count(&self) -> usize {
        self.fit_count
    }
}

impl ViewHost for MemoryView {
    fn fit_all(&mut self) {
        self.fit_count += 1;
    }
}

/// In-memory host backed by a geometry kernel.
///
/// The kernel measures objects on recompute and serves the export actions.
pub struct MemoryHost<'k, K: GeometryKernel> {
    kernel: &'k K,
    documents: Vec<Document<K::Solid>>,
    active: Option<usize>,
    view: Option<MemoryView>,
}

impl<'k, K: GeometryKernel> MemoryHost<'k, K> {
    /// Host without a view, like a command-line session.
    pub fn headless(kernel: &'k K) -> Self {
        Self { kernel, documents: Vec::new(), active: None, view: None }
    }

    pub fn with_view(kernel: &'k K) -> Self {
        Self { view: Some(MemoryView::default()), ..Self::headless(kernel) }
    }

    pub fn kernel(&self) -> &'k K {
        self.kernel
    }

    pub fn documents(&self) -> &[Document<K::Solid>] {
        &self.documents
    }

    pub fn active_document(&self) -> Option<&Document<K::Solid>> {
        self.active.and_then(|i| self.documents.get(i))
    }

    fn active_document_mut(&mut self) -> HolderResult<&mut Document<K::Solid>> {
        self.active
            .and_then(|i| self.documents.get_mut(i))
            .ok_or_else(|| HolderError::HostUnavailable("no active document".into()))
    }

    /// Look an object up in any document.
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject<K::Solid>> {
        self.documents.iter().find_map(|d| d.object(id))
    }

    pub fn memory_view(&self) -> Option<&MemoryView> {
        self.view.as_ref()
    }

    fn require_object(&self, id: ObjectId) -> HolderResult<&SceneObject<K::Solid>> {
        self.object(id).ok_or_else(|| HolderError::Export {
            object: id.to_string(),
            source: KernelOpError::InvalidGeometry("no object with this id".into()),
        })
    }

    /// Tessellate an object and write it as ASCII STL.
    pub fn export_stl(&self, id: ObjectId) -> HolderResult<String> {
        let object = self.require_object(id)?;
        let mesh = self.kernel.tessellate(&object.solid).map_err(|source| HolderError::Export {
            object: object.label.clone(),
            source,
        })?;
        debug!(label = %object.label, triangles = mesh.triangles.len(), "exporting STL");
        Ok(write_ascii_stl(&object.label, &mesh))
    }

    /// STEP text for an object, when the kernel can produce it.
    pub fn export_step(&self, id: ObjectId) -> HolderResult<String> {
        let object = self.require_object(id)?;
        self.kernel.export_step(&object.solid).map_err(|source| HolderError::Export {
            object: object.label.clone(),
            source,
        })
    }

    /// Summary of the active document.
    pub fn snapshot(&self) -> Option<DocumentSnapshot> {
        self.active_document().map(Document::snapshot)
    }
}

impl<'k, K: GeometryKernel> DocumentHost for MemoryHost<'k, K> {
    type Solid = K::Solid;

    fn has_active_document(&self) -> bool {
        self.active.is_some()
    }

    fn new_document(&mut self, name: &str) {
        self.documents.push(Document::new(name));
        self.active = Some(self.documents.len() - 1);
    }

    fn insert_solid(&mut self, label: &str, solid: K::Solid) -> HolderResult<ObjectId> {
        let document = self.active_document_mut()?;
        let seed = format!("{}/{}#{}", document.name, label, document.objects.len());
        let id = ObjectId::new_deterministic(&seed);
        document.objects.push(SceneObject {
            id,
            label: label.to_string(),
            solid,
            properties: None,
        });
        document.dirty = true;
        debug!(%id, label, "object inserted");
        Ok(id)
    }

    fn recompute(&mut self) -> HolderResult<()> {
        let kernel = self.kernel;
        let document = self.active_document_mut()?;
        for object in document.objects.iter_mut().filter(|o| o.properties.is_none()) {
            let props = kernel
                .measure(&object.solid)
                .map_err(|e| HolderError::construction(object.label.clone(), e))?;
            debug!(label = %object.label, volume = props.volume, "object measured");
            object.properties = Some(props);
        }
        document.dirty = false;
        Ok(())
    }

    fn view(&mut self) -> Option<&mut dyn ViewHost> {
        self.view.as_mut().map(|v| v as &mut dyn ViewHost)
    }
}
