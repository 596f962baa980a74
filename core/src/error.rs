//! Application-level errors for building and hosting the holder.

use crate::kernel::KernelOpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HolderError {
    /// A primitive or boolean step failed or left nothing behind.
    #[error("Geometry construction failed at step '{step}': {source}")]
    GeometryConstruction {
        step: String,
        #[source]
        source: KernelOpError,
    },

    #[error("Host unavailable: {0}")]
    HostUnavailable(String),

    #[error("Invalid holder parameters: {0}")]
    InvalidParameters(String),

    #[error("Export of object '{object}' failed: {source}")]
    Export {
        object: String,
        #[source]
        source: KernelOpError,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl HolderError {
    pub fn construction(step: impl Into<String>, source: KernelOpError) -> Self {
        Self::GeometryConstruction { step: step.into(), source }
    }

    /// Name of the build step that failed, if this is a construction error.
    pub fn failed_step(&self) -> Option<&str> {
        match self {
            Self::GeometryConstruction { step, .. } => Some(step),
            _ => None,
        }
    }
}

pub type HolderResult<T> = Result<T, HolderError>;
