//! tierlog core - Shared severity model, thresholds, fields, configuration, and error handling

pub mod config;
pub mod constants;
pub mod error;
pub mod field;
pub mod level;

pub use config::*;
pub use error::{Error, Result};
pub use field::Field;
pub use level::{LevelEnabler, LevelEnablerFn, Severity, Threshold};
