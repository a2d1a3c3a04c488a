//! Log entry passed from the logger to every core

use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;
use tierlog_core::Severity;

/// Source location of the call that produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// `dir/file.rs:line`, keeping only the last two path components
    pub fn short(&self) -> String {
        let mut parts = self.file.rsplitn(3, ['/', '\\']);
        let file = parts.next().unwrap_or(self.file);
        match parts.next() {
            Some(dir) => format!("{}/{}:{}", dir, file, self.line),
            None => format!("{}:{}", file, self.line),
        }
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Everything known about a log call except its fields
#[derive(Debug, Clone)]
pub struct Entry {
    pub level: Severity,
    pub time: DateTime<Utc>,
    pub logger_name: Option<String>,
    pub message: String,
    pub caller: Option<Caller>,
    pub stack: Option<String>,
}

impl Entry {
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            level,
            time: Utc::now(),
            logger_name: None,
            message: message.into(),
            caller: None,
            stack: None,
        }
    }
}
