//! Error types for tierlog

use std::path::PathBuf;

/// tierlog error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid log level: {0}")]
    InvalidThreshold(i32),

    #[error("Unrecognized level: {0:?}")]
    UnknownLevel(String),

    #[error("Error making directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error creating rotating file writer {}: {message}", path.display())]
    RotatingWriter { path: PathBuf, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for tierlog
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn rotating_writer<P: Into<PathBuf>, S: ToString>(path: P, err: S) -> Self {
        Error::RotatingWriter {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
