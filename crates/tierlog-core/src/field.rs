//! Structured key/value fields attached to log entries

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// A single key/value pair written alongside a log message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, value)
    }

    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, value)
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, value)
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, value)
    }

    /// Durations are written as fractional seconds
    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, value.as_secs_f64())
    }

    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::string("error", err.to_string())
    }

    pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        let value = serde_json::to_value(value)
            .unwrap_or_else(|e| Value::String(format!("<serialization error: {}>", e)));
        Self::new(key, value)
    }
}
