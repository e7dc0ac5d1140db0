//! Project configuration file support for logwindow.
//!
//! Loads defaults from `logwindow.toml` in the working directory, falling
//! back to the user's config directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Defaults loaded from `logwindow.toml`
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Directory holding the rotated logs
    pub logs_dir: Option<PathBuf>,
    /// Date format used in file names, e.g. `YYYY-MM-DD`
    pub date_format: Option<String>,
    /// Default look-back window, e.g. `3DAYS`
    pub duration: Option<String>,
    /// File name template containing `{date}`
    pub name_format: Option<String>,
    /// `ASC` or `DESC`
    pub sort: Option<String>,
    /// Lines per read batch
    pub lines: Option<usize>,
}

/// The config file name
pub const CONFIG_FILE_NAME: &str = "logwindow.toml";

impl ProjectConfig {
    /// Load configuration from the working directory.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(working_dir: &Path) -> Result<Option<Self>> {
        Self::load_file(&working_dir.join(CONFIG_FILE_NAME))
    }

    pub fn load_file(config_path: &Path) -> Result<Option<Self>> {
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }

    /// Working directory first, then `<config dir>/logwindow/logwindow.toml`.
    pub fn discover(working_dir: &Path) -> Result<Option<Self>> {
        if let Some(config) = Self::load(working_dir)? {
            return Ok(Some(config));
        }
        match dirs::config_dir() {
            Some(dir) => Self::load(&dir.join("logwindow")),
            None => Ok(None),
        }
    }

    /// Resolve a relative `logs_dir` against `base`.
    pub fn logs_dir_from(&self, base: &Path) -> Option<PathBuf> {
        self.logs_dir.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                base.join(dir)
            }
        })
    }
}
