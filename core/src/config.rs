//! Run configuration for the holder macro.

use crate::error::HolderResult;
use crate::holder::HolderParams;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DOCUMENT_NAME: &str = "HepaFilterHolder";
pub const DEFAULT_OBJECT_LABEL: &str = "HepaFilterHolder";

/// Document naming plus the dimensions to build.
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolderConfig {
    /// Document created when the host has none active.
    pub document_name: String,
    /// Label given to the inserted holder.
    pub object_label: String,
    pub params: HolderParams,
}

impl Default for HolderConfig {
    fn default() -> Self {
        Self {
            document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            object_label: DEFAULT_OBJECT_LABEL.to_string(),
            params: HolderParams::hepa(),
        }
    }
}

impl HolderConfig {
    pub fn from_json(json: &str) -> HolderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
