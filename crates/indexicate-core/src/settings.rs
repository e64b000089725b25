//! User preferences, persisted as JSON in the platform config directory.
//!
//! Only preferences live here; scan results are never written to disk.

use crate::actions::DeleteMode;
use crate::error::SettingsError;
use crate::model::SortOrder;
use crate::scanner::ScanOptions;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const CONFIG_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dark_mode: bool,
    pub include_hidden: bool,
    pub sort_order: SortOrder,
    pub delete_mode: DeleteMode,
    /// Ask before deleting anything.
    pub confirm_delete: bool,
    /// Scan `last_directory` automatically on launch.
    pub reopen_last_directory: bool,
    pub last_directory: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            include_hidden: false,
            sort_order: SortOrder::Name,
            delete_mode: DeleteMode::Trash,
            confirm_delete: true,
            reopen_last_directory: false,
            last_directory: None,
        }
    }
}

impl Settings {
    /// Scanner options derived from these preferences.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            include_hidden: self.include_hidden,
            follow_links: false,
        }
    }

    /// Default location of the settings file.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "indexicate", "Indexicate")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Read settings from `path`.
    ///
    /// A missing file yields defaults. A file that cannot be parsed also
    /// yields defaults, with a warning, so a bad edit never stops the app
    /// from starting.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(SettingsError::Io(e, path.to_path_buf())),
        };
        match serde_json::from_str(&text) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) => {
                warn!("Ignoring unreadable settings at {}: {e}", path.display());
                Ok(Self::default())
            }
        }
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| SettingsError::Io(e, dir.to_path_buf()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| SettingsError::Io(e, path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load_from(&tmp.path().join("none.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/settings.json");
        let settings = Settings {
            dark_mode: false,
            sort_order: SortOrder::Size,
            delete_mode: DeleteMode::Permanent,
            last_directory: Some(PathBuf::from("/srv/media")),
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, r#"{ "include_hidden": true }"#).unwrap();

        let loaded = Settings::load_from(&path).unwrap();

        assert!(loaded.include_hidden);
        assert!(loaded.confirm_delete);
        assert!(loaded.scan_options().include_hidden);
    }
}
