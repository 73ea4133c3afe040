//! On-disk preset store
//!
//! One JSON file per named preset under the store directory. Load failures
//! are absorbed with defaults so a broken record never blocks the user from
//! seeing a reticle; write failures are surfaced to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::CrosshairConfig;
use crate::constants::config::{APP_DIR, DEFAULT_PRESET, PRESET_EXTENSION};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preset '{0}' not found")]
    NotFound(String),

    #[error("the '{DEFAULT_PRESET}' preset cannot be deleted")]
    ProtectedPreset,

    #[error("'{}' is not a directory", .0.display())]
    InvalidPath(PathBuf),

    #[error("failed to parse preset '{name}'")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Holds the preset directory and performs all preset file I/O.
///
/// Passed explicitly to whichever component needs it; there is no ambient
/// process-wide config directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Per-user default preset directory
    pub fn default_dir() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path
    }

    pub fn open_default() -> Self {
        Self::new(Self::default_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Switch to a new preset directory.
    ///
    /// The active directory is left untouched unless the new path is an
    /// existing directory.
    pub fn set_directory(&mut self, path: PathBuf) -> Result<(), StoreError> {
        if !path.is_dir() {
            return Err(StoreError::InvalidPath(path));
        }
        info!(dir = %path.display(), "Switched preset directory");
        self.dir = path;
        Ok(())
    }

    fn preset_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{PRESET_EXTENSION}"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.preset_path(name).is_file()
    }

    /// Load a named preset, merged over defaults.
    ///
    /// A missing file or malformed record yields the default configuration;
    /// loaded values are clamped into their documented domains.
    pub fn load(&self, name: &str) -> CrosshairConfig {
        let path = self.preset_path(name);
        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<CrosshairConfig>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    warn!(preset = name, error = %e, "Malformed preset record, using defaults");
                    CrosshairConfig::default()
                }
            },
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(preset = name, error = %e, "Failed to read preset, using defaults");
                }
                CrosshairConfig::default()
            }
        };
        config.validate_and_clamp();
        config
    }

    /// Serialize the full record, atomically enough that a concurrent load
    /// never observes a partial file (write to temp, then rename).
    pub fn save(&self, name: &str, config: &CrosshairConfig) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.preset_path(name);
        let tmp_path = self.dir.join(format!("{name}.{PRESET_EXTENSION}.tmp"));
        let json = serde_json::to_string_pretty(config).map_err(|source| StoreError::Parse {
            name: name.to_string(),
            source,
        })?;

        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &path)?;
        info!(preset = name, path = %path.display(), "Saved preset");
        Ok(())
    }

    /// Enumerate persisted preset names, lexicographically sorted
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(PRESET_EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Remove a named preset. The `default` preset is protected.
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        if name == DEFAULT_PRESET {
            return Err(StoreError::ProtectedPreset);
        }
        let path = self.preset_path(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        info!(preset = name, "Deleted preset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Placement, Shape};
    use crate::types::Position;
    use tempfile::TempDir;

    fn store() -> (TempDir, ConfigStore) {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (_dir, store) = store();
        let config = CrosshairConfig {
            shape: Shape::HollowCrossDot,
            size: 33,
            thickness: 4,
            opacity: 0.55,
            color: "#00FF7F".to_string(),
            position: Placement::At(Position::new(123, 456)),
            hollow_gap: 7,
            hollow_length: 40,
            hollow_thickness: 3,
            center_dot_size: 5,
        };

        store.save("test", &config).unwrap();
        assert_eq!(store.load("test"), config);
    }

    #[test]
    fn test_load_missing_preset_yields_defaults() {
        let (_dir, store) = store();
        assert_eq!(store.load("nope"), CrosshairConfig::default());
    }

    #[test]
    fn test_load_malformed_record_yields_defaults() {
        let (_dir, store) = store();
        fs::write(store.preset_path("broken"), "{not json").unwrap();
        assert_eq!(store.load("broken"), CrosshairConfig::default());
    }

    #[test]
    fn test_load_partial_record_merges_defaults() {
        let (_dir, store) = store();
        fs::write(store.preset_path("partial"), r#"{"size": 50}"#).unwrap();
        let config = store.load("partial");
        assert_eq!(config.size, 50);
        assert_eq!(config.thickness, CrosshairConfig::default().thickness);
        assert_eq!(config.color, CrosshairConfig::default().color);
    }

    #[test]
    fn test_load_clamps_out_of_domain_values() {
        let (_dir, store) = store();
        fs::write(store.preset_path("big"), r#"{"size": 9000, "opacity": 2.5}"#).unwrap();
        let config = store.load("big");
        assert_eq!(config.size, 100);
        assert_eq!(config.opacity, 1.0);
    }

    #[test]
    fn test_list_sorted() {
        let (_dir, store) = store();
        let config = CrosshairConfig::default();
        store.save("zeta", &config).unwrap();
        store.save("alpha", &config).unwrap();
        store.save("default", &config).unwrap();
        assert_eq!(store.list().unwrap(), vec!["alpha", "default", "zeta"]);
    }

    #[test]
    fn test_list_ignores_foreign_files() {
        let (_dir, store) = store();
        store.save("only", &CrosshairConfig::default()).unwrap();
        fs::write(store.dir().join("notes.txt"), "hi").unwrap();
        assert_eq!(store.list().unwrap(), vec!["only"]);
    }

    #[test]
    fn test_list_missing_directory_is_empty() {
        let store = ConfigStore::new(PathBuf::from("/definitely/not/a/real/dir"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_default_is_protected() {
        let (_dir, store) = store();
        store.save("default", &CrosshairConfig::default()).unwrap();
        assert!(matches!(store.delete("default"), Err(StoreError::ProtectedPreset)));
        assert!(store.exists("default"));
    }

    #[test]
    fn test_delete_missing_preset() {
        let (_dir, store) = store();
        assert!(matches!(store.delete("ghost"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_delete_removes_record() {
        let (_dir, store) = store();
        store.save("temp", &CrosshairConfig::default()).unwrap();
        store.delete("temp").unwrap();
        assert!(!store.exists("temp"));
    }

    #[test]
    fn test_set_directory_rejects_non_directory() {
        let (dir, mut store) = store();
        let original = store.dir().to_path_buf();

        let file_path = dir.path().join("a-file");
        fs::write(&file_path, "x").unwrap();
        assert!(matches!(store.set_directory(file_path), Err(StoreError::InvalidPath(_))));
        // Active directory unchanged until corrected
        assert_eq!(store.dir(), original);
    }

    #[test]
    fn test_set_directory_switches() {
        let (_dir, mut store) = store();
        let other = TempDir::new().unwrap();
        store.save("here", &CrosshairConfig::default()).unwrap();

        store.set_directory(other.path().to_path_buf()).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (_dir, store) = store();
        store.save("clean", &CrosshairConfig::default()).unwrap();
        let leftovers: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
