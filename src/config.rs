//! Typed configuration, read from `<config dir>/cani/config.json`.
//!
//! Every field has a default, so a missing file or an empty object is a
//! complete configuration. Unknown keys are rejected at load time.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::tui::theme::Palette;

/// Browsers shown when the config names none.
pub const DEFAULT_BROWSERS: [&str; 9] = [
    "chrome", "firefox", "edge", "ie", "safari", "ios_saf", "opera", "android", "bb",
];

/// When to use colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colors unless `NO_COLOR` is set or the terminal has fewer than 8.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path of the caniuse `data.json`. Defaults to the data directory.
    pub data_file: Option<PathBuf>,
    /// Browser keys, in column order.
    pub browsers: Vec<String>,
    pub color: ColorMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: None,
            browsers: DEFAULT_BROWSERS.iter().map(|key| key.to_string()).collect(),
            color: ColorMode::default(),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Read a config file. A missing file is the default config.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = Self::from_json(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load from the default location, or defaults when there is none.
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Config::default()),
        }
    }

    /// Where the dataset lives: the configured path, or the data directory.
    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .or_else(default_data_path)
            .unwrap_or_else(|| PathBuf::from("caniuse.json"))
    }

    /// Palette for this config, given what the terminal supports.
    pub fn palette(&self, colors_available: bool) -> Palette {
        Palette::select(self.color, colors_available)
    }
}

/// `<config dir>/cani/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cani").join("config.json"))
}

/// `<data dir>/cani/caniuse.json`
pub fn default_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("cani").join("caniuse.json"))
}

// ============================================================================
// TESTS
// ============================================================================
