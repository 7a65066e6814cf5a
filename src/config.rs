use crate::state::DisplayMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

const RECENT_FILES_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_annotation_file")]
    pub annotation_file: String,
    #[serde(default = "default_true")]
    pub autosave_on_exit: bool,
    #[serde(default)]
    pub recent_files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub start_mode: DisplayMode,
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a config directory")]
    NoConfigDir,
    #[error("failed to create config directory: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write config file: {0}")]
    Write(#[source] std::io::Error),
}

// Default value functions
fn default_annotation_file() -> String {
    "annotations.xlsx".to_string()
}

fn default_true() -> bool {
    true
}

fn default_grid_columns() -> usize {
    4
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            annotation_file: default_annotation_file(),
            autosave_on_exit: true,
            recent_files: Vec::new(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            start_mode: DisplayMode::default(),
            grid_columns: default_grid_columns(),
        }
    }
}

impl StorageConfig {
    /// Path of the library workbook with `~` expanded. Relative paths resolve
    /// against the working directory.
    pub fn annotation_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.annotation_file).as_ref())
    }
}

impl DisplayConfig {
    pub fn columns(&self) -> usize {
        self.grid_columns.max(1)
    }
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "annotapp")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration from file, or return default if file doesn't exist
pub fn load_config() -> AppConfig {
    match config_path() {
        Some(path) if path.exists() => match std::fs::read_to_string(&path) {
            Ok(content) => parse_config(&content),
            Err(e) => {
                warn!(path = %path.display(), "failed to read config file: {e}; using defaults");
                AppConfig::default()
            }
        },
        _ => AppConfig::default(),
    }
}

fn parse_config(content: &str) -> AppConfig {
    toml::from_str(content).unwrap_or_else(|e| {
        warn!("failed to parse config file: {e}; using defaults");
        AppConfig::default()
    })
}

/// Save configuration to file
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(ConfigError::CreateDir)?;
    }

    let toml = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml).map_err(ConfigError::Write)?;

    Ok(())
}

/// Add a workbook path to the recent files list
pub fn add_recent_file(config: &mut AppConfig, path: String) {
    config.storage.recent_files.retain(|p| p != &path);
    config.storage.recent_files.insert(0, path);
    config.storage.recent_files.truncate(RECENT_FILES_LIMIT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = parse_config("");
        assert_eq!(config.storage.annotation_file, "annotations.xlsx");
        assert!(config.storage.autosave_on_exit);
        assert_eq!(config.display.start_mode, DisplayMode::Replace);
        assert_eq!(config.display.columns(), 4);
    }

    #[test]
    fn test_parses_display_section() {
        let config = parse_config(
            r#"
            [display]
            start_mode = "accumulate"
            grid_columns = 0

            [storage]
            annotation_file = "snippets.xlsx"
            autosave_on_exit = false
            "#,
        );
        assert_eq!(config.display.start_mode, DisplayMode::Accumulate);
        assert_eq!(config.display.columns(), 1);
        assert_eq!(config.storage.annotation_path(), PathBuf::from("snippets.xlsx"));
        assert!(!config.storage.autosave_on_exit);
    }

    #[test]
    fn test_invalid_toml_falls_back_to_defaults() {
        let config = parse_config("display = [");
        assert_eq!(config.display.grid_columns, 4);
    }

    #[test]
    fn test_recent_files_dedup_and_cap() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            add_recent_file(&mut config, format!("f{i}.xlsx"));
        }
        add_recent_file(&mut config, "f5.xlsx".to_string());
        assert_eq!(config.storage.recent_files.len(), RECENT_FILES_LIMIT);
        assert_eq!(config.storage.recent_files[0], "f5.xlsx");
        assert_eq!(
            config.storage.recent_files.iter().filter(|p| *p == "f5.xlsx").count(),
            1
        );
    }

    #[test]
    fn test_config_serializes_round_trip() {
        let mut config = AppConfig::default();
        config.display.start_mode = DisplayMode::Accumulate;
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("start_mode = \"accumulate\""));
        assert_eq!(parse_config(&text).display.start_mode, DisplayMode::Accumulate);
    }
}
