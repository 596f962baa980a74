//! Document host abstraction and the top-level holder macro.
//!
//! A host owns documents and the objects inserted into them, and may or may
//! not have a view attached. [`run_holder_macro`] is the whole script: make
//! sure a document exists, build the holder, insert it, recompute and fit
//! the view when there is one.

mod memory;

#[cfg(test)]
mod tests_host;

pub use memory::{Document, DocumentSnapshot, MemoryHost, MemoryView, ObjectSnapshot, SceneObject};

use crate::config::HolderConfig;
use crate::error::HolderResult;
use crate::holder::HolderBuilder;
use crate::kernel::GeometryKernel;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use uuid::Uuid;

/// Stable identifier of an object inside a host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derive an ID from a seed such as `"HepaFilterHolder/HepaFilterHolder#0"`.
    ///
    /// The same seed always yields the same ID, so repeated runs produce
    /// identical snapshots.
    pub fn new_deterministic(seed: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes()))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interactive view attached to a host.
pub trait ViewHost {
    /// Zoom so that every visible object fits.
    fn fit_all(&mut self);
}

/// Application that holds documents of solids.
pub trait DocumentHost {
    type Solid;

    fn has_active_document(&self) -> bool;

    /// Create a document and make it the active one.
    fn new_document(&mut self, name: &str);

    /// Add a solid to the active document.
    ///
    /// Fails with `HostUnavailable` when no document is active.
    fn insert_solid(&mut self, label: &str, solid: Self::Solid) -> HolderResult<ObjectId>;

    /// Bring the active document up to date.
    fn recompute(&mut self) -> HolderResult<()>;

    /// The attached view, if the host runs with one.
    fn view(&mut self) -> Option<&mut dyn ViewHost>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    Created,
    Existing,
}

/// Create a document named `name` unless one is already active.
pub fn ensure_document<H: DocumentHost + ?Sized>(host: &mut H, name: &str) -> DocumentStatus {
    if host.has_active_document() {
        DocumentStatus::Existing
    } else {
        host.new_document(name);
        info!(document = name, "created document");
        DocumentStatus::Created
    }
}

/// The completion lines shown to the user after a successful run.
pub const COMPLETION_MESSAGES: [&str; 3] = [
    "HEPA Filter Holder script finished successfully.",
    "The final part has been created in the active document.",
    "To export, select the created object and go to File > Export... and choose STL Mesh.",
];

/// Outcome of a successful macro run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroReport {
    pub document: DocumentStatus,
    pub object: ObjectId,
    pub view_fitted: bool,
}

/// Build the holder and place it in `host`.
pub fn run_holder_macro<H, K>(host: &mut H, kernel: &K, config: &HolderConfig) -> HolderResult<MacroReport>
where
    H: DocumentHost<Solid = K::Solid>,
    K: GeometryKernel,
{
    let document = ensure_document(host, &config.document_name);

    let holder = HolderBuilder::new(kernel, config.params).build()?;
    let object = host.insert_solid(&config.object_label, holder)?;
    host.recompute()?;

    let view_fitted = match host.view() {
        Some(view) => {
            view.fit_all();
            true
        }
        None => {
            debug!("no view attached, skipping fit");
            false
        }
    };

    info!(%object, label = %config.object_label, ?document, view_fitted, "holder macro finished");
    Ok(MacroReport { document, object, view_fitted })
}
