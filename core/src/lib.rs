pub mod config;
pub mod error;
pub mod geometry;
pub mod holder;
pub mod host;
pub mod kernel;

pub use config::HolderConfig;
pub use error::{HolderError, HolderResult};
pub use holder::{build_holder, HolderBuilder, HolderParams};
pub use host::{
    run_holder_macro, DocumentHost, DocumentStatus, MacroReport, MemoryHost, ObjectId, ViewHost, COMPLETION_MESSAGES,
};
pub use kernel::{GeometryKernel, KernelOpError, MeshKernel, TruckKernel};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
