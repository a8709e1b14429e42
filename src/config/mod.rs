//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! Only cosmetic and layout preferences persist: the tile gap, the camera
//! synchronization flag, the hover highlight, the multi-view sub mode, and
//! the slice-compare axis and label visibility. Camera positions and the
//! item list never persist between sessions.

pub mod defaults;

pub use defaults::*;

use crate::error::Result;
use crate::viewport::store::{SlicingAxis, SubMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "TwinView";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gap: Option<u16>,
    #[serde(default)]
    pub synchronized: Option<bool>,
    #[serde(default)]
    pub show_highlight: Option<bool>,
    #[serde(default)]
    pub sub_mode: Option<SubMode>,
    #[serde(default)]
    pub slicing_axis: Option<SlicingAxis>,
    #[serde(default)]
    pub show_slice_labels: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gap: Some(DEFAULT_GAP_PX),
            synchronized: Some(true),
            show_highlight: Some(false),
            sub_mode: Some(SubMode::Row),
            slicing_axis: Some(SlicingAxis::Vertical),
            show_slice_labels: Some(true),
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_preferences() {
        let config = Config {
            gap: Some(12),
            synchronized: Some(false),
            show_highlight: Some(true),
            sub_mode: Some(SubMode::Grid),
            slicing_axis: Some(SlicingAxis::Horizontal),
            show_slice_labels: Some(false),
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded.gap, config.gap);
        assert_eq!(loaded.synchronized, config.synchronized);
        assert_eq!(loaded.show_highlight, config.show_highlight);
        assert_eq!(loaded.sub_mode, config.sub_mode);
        assert_eq!(loaded.slicing_axis, config.slicing_axis);
        assert_eq!(loaded.show_slice_labels, config.show_slice_labels);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "gap = \"not a number\"").expect("failed to write file");

        let loaded = load_from_path(&config_path).expect("load should not fail");
        assert_eq!(loaded.gap, Config::default().gap);
    }

    #[test]
    fn default_config_matches_startup_defaults() {
        let config = Config::default();
        assert_eq!(config.gap, Some(DEFAULT_GAP_PX));
        assert_eq!(config.synchronized, Some(true));
        assert_eq!(config.sub_mode, Some(SubMode::Row));
    }
}
