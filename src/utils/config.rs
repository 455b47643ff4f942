//! Configuration file handling.
//!
//! Looks for `glyphgrid.toml` in the working directory, then
//! `<config dir>/glyphgrid/config.toml`, unless a path is given explicitly.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::converter::ConvertOptions;
use crate::error::ConfigError;
use crate::grid::Theme;
use crate::shared::constants;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub convert: ConvertOptions,
}

impl Config {
    /// Loads `path`, or the first default location that exists.
    ///
    /// No file at all yields the defaults; a file that exists but cannot be read or
    /// parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_paths().into_iter().find(|p| p.exists()),
        };

        let Some(path) = path else {
            return Ok(Config::default());
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        crate::utils::logger::info(&format!("Loaded config from {}", path.display()));
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Candidate config files in lookup order.
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(constants::CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(constants::APP_NAME).join(constants::USER_CONFIG_FILE));
    }
    paths
}
