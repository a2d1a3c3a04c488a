//! Command implementations

pub mod emit;
pub mod routes;
pub mod serve;

use anyhow::{Context, Result};
use std::path::Path;
use tierlog::Options;
use tierlog_core::{constants, LogConfig};
use tracing::debug;

use crate::cli::Cli;

/// Config from `--config`, a config file in the working directory or
/// `~/.tierlog/tierlog.toml`, in that order, with flags applied on top.
pub fn load_config(cli: &Cli) -> Result<LogConfig> {
    let mut config = match &cli.config {
        Some(path) => LogConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => discover(&std::env::current_dir()?)?,
    };

    if let Some(service) = &cli.service {
        config.service_name = service.clone();
    }
    if let Some(dir) = &cli.dir {
        config.log_dir = dir.clone();
    }
    if let Some(level) = cli.level {
        config.level = level;
    }
    if cli.development {
        config.development = true;
    }
    Ok(config)
}

fn discover(cwd: &Path) -> Result<LogConfig> {
    if constants::CONFIG_FILES
        .iter()
        .any(|name| cwd.join(name).exists())
    {
        let (config, path) = LogConfig::find_in(cwd)?;
        debug!("Loaded config from {}", path.display());
        return Ok(config);
    }

    let fallback = constants::default_config_path();
    if fallback.exists() {
        debug!("Loaded config from {}", fallback.display());
        return LogConfig::load(&fallback)
            .with_context(|| format!("Failed to load config {}", fallback.display()));
    }
    Ok(LogConfig::default())
}

pub fn options(config: &LogConfig) -> Options {
    Options::from_config(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tierlog_core::Severity;

    #[test]
    fn test_discover_reads_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tierlog.toml"),
            "service_name = \"api\"\nlevel = \"warn\"\n",
        )
        .unwrap();

        let config = discover(dir.path()).unwrap();
        assert_eq!(config.service_name, "api");
        assert_eq!(config.level, Severity::Warn);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "service_name: api\nlog_dir: /srv/logs\n").unwrap();

        let cli = Cli::try_parse_from([
            "tierlog",
            "--config",
            path.to_str().unwrap(),
            "--service",
            "worker",
            "--development",
            "routes",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();

        assert_eq!(config.service_name, "worker");
        assert_eq!(config.log_dir, std::path::PathBuf::from("/srv/logs"));
        assert!(config.development);
        assert!(config.is_console());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["tierlog", "--config", "/nonexistent/tierlog.toml", "routes"])
            .unwrap();
        assert!(load_config(&cli).is_err());
    }
}
