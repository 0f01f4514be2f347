//! Configuration profile persistence
//!
//! Save/load/list/delete configuration profiles as JSON files in a
//! directory chosen by the host.

use std::path::{Path, PathBuf};

use crate::domain::{Configuration, SyncError, SyncResult};

/// Sanitize a configuration name to prevent path traversal.
/// Rejects empty names, path separators and "..".
fn sanitize_name(name: &str) -> SyncResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SyncError::Config("Configuration name cannot be empty".to_string()));
    }
    if trimmed.contains("..") || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(SyncError::Config("Invalid configuration name".to_string()));
    }
    // Only allow alphanumeric, spaces, hyphens, underscores
    if !trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_')
    {
        return Err(SyncError::Config(
            "Configuration name contains invalid characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Directory of JSON configuration profiles
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Open (and create if needed) a profile directory
    pub fn open(dir: impl Into<PathBuf>) -> SyncResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| SyncError::Config(format!("Failed to create {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> SyncResult<PathBuf> {
        let name = sanitize_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }

    pub fn save(&self, config: &Configuration) -> SyncResult<()> {
        let path = self.path_for(&config.name)?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| SyncError::Config(format!("Serialization error: {e}")))?;
        std::fs::write(&path, json)
            .map_err(|e| SyncError::Config(format!("Failed to write config: {e}")))?;
        log::debug!("saved profile '{}' to {}", config.name, path.display());
        Ok(())
    }

    pub fn load(&self, name: &str) -> SyncResult<Configuration> {
        let path = self.path_for(name)?;
        let json = std::fs::read_to_string(&path)
            .map_err(|e| SyncError::Config(format!("Failed to read config '{name}': {e}")))?;
        serde_json::from_str(&json)
            .map_err(|e| SyncError::Config(format!("Failed to parse config '{name}': {e}")))
    }

    /// Profile names, sorted
    pub fn list(&self) -> SyncResult<Vec<String>> {
        let mut names: Vec<String> = std::fs::read_dir(&self.dir)
            .map_err(|e| SyncError::Config(format!("Failed to read configs dir: {e}")))?
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let path = entry.path();
                if path.extension()?.to_str()? == "json" {
                    path.file_stem()?.to_str().map(String::from)
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> SyncResult<()> {
        let path = self.path_for(name)?;
        std::fs::remove_file(&path)
            .map_err(|e| SyncError::Config(format!("Failed to delete config '{name}': {e}")))
    }
}
