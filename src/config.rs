// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mapwright-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mapwright and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor configuration.
//!
//! `EditorConfig` is built once (defaults, optionally overlaid by a TOML file) and then passed
//! by reference to the library and to editing sessions. Nothing mutates it afterwards.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::Spacing;

pub const DEFAULT_STORAGE_PREFIX: &str = "mapwright";
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Prefix of every file written by `FileStorage` (`<prefix>_<collection>.json`).
    pub storage_prefix: String,
    /// Page size of the map list.
    pub page_size: usize,
    pub spacing_x: f32,
    pub spacing_y: f32,
    pub place_style: PlaceStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let spacing = Spacing::default();
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            spacing_x: spacing.x,
            spacing_y: spacing.y,
            place_style: PlaceStyle::default(),
        }
    }
}

impl EditorConfig {
    /// Layout gaps used when a map carries no usable spacing of its own.
    pub fn default_spacing(&self) -> Spacing {
        Spacing::new(self.spacing_x, self.spacing_y).unwrap_or_default()
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        if config.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page_size",
                reason: "must be positive",
            });
        }
        Ok(config)
    }
}

/// Presentation defaults stamped onto new places.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlaceStyle {
    pub placeholder_name: String,
    pub foreground_color: String,
    pub background_color: String,
    /// Background forced onto every place that carries a teleport.
    pub teleport_color: String,
}

impl Default for PlaceStyle {
    fn default() -> Self {
        Self {
            placeholder_name: "new place".to_owned(),
            foreground_color: "#FFFFFF".to_owned(),
            background_color: "#1c1d1f".to_owned(),
            teleport_color: "#1C6B32".to_owned(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mapwright").join("config.toml"))
}

pub fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("mapwright"))
        .unwrap_or_else(|| PathBuf::from(".mapwright"))
}

/// Reads a config file; a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => EditorConfig::from_toml_str(&text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(EditorConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{load_config, ConfigError, EditorConfig};

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = EditorConfig::from_toml_str(
            r##"
page_size = 5

[place_style]
teleport_color = "#00FF00"
"##,
        )
        .expect("config");

        assert_eq!(config.page_size, 5);
        assert_eq!(config.storage_prefix, "mapwright");
        assert_eq!(config.place_style.teleport_color, "#00FF00");
        assert_eq!(config.place_style.placeholder_name, "new place");
        assert_eq!(config.default_spacing().x, 180.0);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = EditorConfig::from_toml_str("page_size = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "page_size",
                ..
            }
        ));
    }

    #[test]
    fn non_positive_spacing_falls_back_to_defaults() {
        let config = EditorConfig::from_toml_str("spacing_x = -3.0").expect("config");
        let spacing = config.default_spacing();
        assert_eq!((spacing.x, spacing.y), (180.0, 120.0));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(&dir.path().join("absent.toml")).expect("config");
        assert_eq!(config, EditorConfig::default());
    }
}
