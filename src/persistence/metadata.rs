use crate::domain::{Filter, Priority};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// UI preferences stored in meta.json
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Filter that was selected when the app last closed
    #[serde(default)]
    pub filter: Filter,
    /// Priority preselected for new tasks
    #[serde(default)]
    pub priority: Priority,
}

/// Load app metadata from meta.json file
pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<AppMetadata> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(AppMetadata::default());
    }

    let content = std::fs::read_to_string(path)?;
    let metadata: AppMetadata = serde_json::from_str(&content)?;
    Ok(metadata)
}

/// Save app metadata to meta.json file
pub fn save_metadata<P: AsRef<Path>>(path: P, metadata: &AppMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}
