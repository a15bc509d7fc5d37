/// Editor configuration
///
/// Defaults work without any file. An optional JSON file can override them:
/// - Linux: ~/.config/filter-editor/config.json
/// - macOS: ~/Library/Application Support/filter-editor/config.json
/// - Windows: %APPDATA%\filter-editor\config.json

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{EditorError, EditorResult};

/// Longest edge of the working preview, matching the editing preview tier
pub const DEFAULT_PREVIEW_MAX_EDGE: u32 = 1280;

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Directory exported files are written to
    pub export_dir: PathBuf,
    /// Working previews are downscaled so neither side exceeds this
    pub preview_max_edge: u32,
}

/// On-disk shape; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    export_dir: Option<PathBuf>,
    preview_max_edge: Option<u32>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            preview_max_edge: DEFAULT_PREVIEW_MAX_EDGE,
        }
    }
}

impl EditorConfig {
    /// Load the config file if present, otherwise the defaults
    pub fn load() -> EditorResult<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> EditorResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| EditorError::io(path, e))?;
        Self::from_json(&json).map_err(|e| match e {
            EditorError::Config { message, .. } => EditorError::Config {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse config JSON, filling anything missing from the defaults
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let file: ConfigFile = serde_json::from_str(json).map_err(|e| EditorError::Config {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;

        let defaults = Self::default();
        let preview_max_edge = file.preview_max_edge.unwrap_or(defaults.preview_max_edge);
        if preview_max_edge == 0 {
            return Err(EditorError::Config {
                path: PathBuf::new(),
                message: "preview_max_edge must be at least 1".to_string(),
            });
        }

        Ok(Self {
            export_dir: file.export_dir.unwrap_or(defaults.export_dir),
            preview_max_edge,
        })
    }

    /// Get the path where the config file is looked up
    fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("filter-editor");
        path.push("config.json");
        Some(path)
    }
}

/// Downloads folder, falling back to home, then the working directory
fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config =
            EditorConfig::from_json(r#"{"export_dir": "/tmp/out", "preview_max_edge": 640}"#).unwrap();
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.preview_max_edge, 640);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(EditorConfig::from_json(r#"{"preview_max_edge": 0}"#).is_err());
        assert!(EditorConfig::from_json(r#"{"export_folder": "/tmp"}"#).is_err());
        assert!(EditorConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_load_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();

        match EditorConfig::load_from(&path) {
            Err(EditorError::Config { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
