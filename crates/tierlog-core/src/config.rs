//! Configuration file parsing for tierlog
//!
//! Supports multiple configuration file formats:
//! - TOML (.toml)
//! - YAML (.yaml, .yml)
//! - JSON (.json)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::*;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::level::Severity;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Logger configuration as it appears in a config file
///
/// Empty `log_dir` or `development = true` selects console output on stderr.
/// Zero durations fall back to the defaults (7 days retention, 24h rotation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory name under `<log_dir>/<pod>/` for this service's files
    pub service_name: String,
    pub log_dir: PathBuf,
    /// Minimum severity; also the lowest level that gets its own file
    pub level: Severity,
    pub development: bool,
    pub file_max_age_secs: u64,
    pub file_rotation_secs: u64,
    /// Static fields attached to every entry
    pub fields: BTreeMap<String, serde_json::Value>,
    pub add_caller: bool,
    /// Entries at or above this level carry a stack trace
    pub stacktrace_level: Option<Severity>,
}

impl LogConfig {
    /// Load config from file, automatically detecting format from extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::config(format!(
                "Unsupported config file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Parse config content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Find and load the first known config file in `dir`
    pub fn find_in(dir: &Path) -> Result<(Self, PathBuf)> {
        for name in CONFIG_FILES {
            let path = dir.join(name);
            if path.exists() {
                let config = Self::load(&path)?;
                return Ok((config, path));
            }
        }
        Err(Error::config(format!(
            "No config file found in {}. Expected one of: {:?}",
            dir.display(),
            CONFIG_FILES
        )))
    }

    pub fn file_max_age(&self) -> Duration {
        match self.file_max_age_secs {
            0 => DEFAULT_FILE_MAX_AGE,
            secs => Duration::from_secs(secs),
        }
    }

    pub fn file_rotation_time(&self) -> Duration {
        match self.file_rotation_secs {
            0 => DEFAULT_FILE_ROTATION_TIME,
            secs => Duration::from_secs(secs),
        }
    }

    /// Static fields in key order
    pub fn static_fields(&self) -> Vec<Field> {
        self.fields
            .iter()
            .map(|(key, value)| Field::new(key.clone(), value.clone()))
            .collect()
    }

    /// Whether entries go to stderr instead of per-level files
    pub fn is_console(&self) -> bool {
        self.development || self.log_dir.as_os_str().is_empty()
    }
}
