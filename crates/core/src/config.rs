use crate::error::Result;
use archscope_api::OBJECT_CLASS_NAME;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knobs for one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Finish independent classes on the rayon pool.
    pub parallel: bool,
    /// Root of the class hierarchy; erasure of every unbounded type.
    pub object_type: String,
    /// Log placeholders requested after the registry was frozen at `warn`
    /// instead of `debug`.
    pub warn_on_late_placeholders: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            object_type: OBJECT_CLASS_NAME.to_string(),
            warn_on_late_placeholders: true,
        }
    }
}

impl ImportConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
