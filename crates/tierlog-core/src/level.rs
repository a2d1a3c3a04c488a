//! Severity levels and the shared runtime threshold

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Log severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Severity {
    #[default]
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    /// Panics in development mode, logs an error otherwise
    DPanic = 4,
    Panic = 5,
    Fatal = 6,
}

impl Severity {
    pub const MIN: Severity = Severity::Debug;
    pub const MAX: Severity = Severity::Fatal;

    pub const ALL: [Severity; 7] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::DPanic,
        Severity::Panic,
        Severity::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::DPanic => "dpanic",
            Severity::Panic => "panic",
            Severity::Fatal => "fatal",
        }
    }

    pub fn capital_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::DPanic => "DPANIC",
            Severity::Panic => "PANIC",
            Severity::Fatal => "FATAL",
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// This level and every more severe one, ascending
    pub fn and_above(self) -> impl Iterator<Item = Severity> {
        Severity::ALL.into_iter().filter(move |level| *level >= self)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Severity::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownLevel(s.to_string()))
    }
}

impl TryFrom<i32> for Severity {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| Severity::ALL.get(idx).copied())
            .ok_or(Error::InvalidThreshold(raw))
    }
}

impl TryFrom<u8> for Severity {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self> {
        Severity::try_from(i32::from(raw))
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Decides whether an entry at a given level should be written
pub trait LevelEnabler: Send + Sync {
    fn enabled(&self, level: Severity) -> bool;
}

/// A fixed severity enables itself and everything above it
impl LevelEnabler for Severity {
    fn enabled(&self, level: Severity) -> bool {
        level >= *self
    }
}

/// Adapts a closure into a [`LevelEnabler`]
#[derive(Clone)]
pub struct LevelEnablerFn<F>(pub F);

impl<F> LevelEnabler for LevelEnablerFn<F>
where
    F: Fn(Severity) -> bool + Send + Sync,
{
    fn enabled(&self, level: Severity) -> bool {
        (self.0)(level)
    }
}

impl<F> fmt::Debug for LevelEnablerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LevelEnablerFn")
    }
}

/// Process-wide minimum severity, shared by every clone of the handle
#[derive(Clone)]
pub struct Threshold {
    level: Arc<AtomicU8>,
}

impl Threshold {
    pub fn new(level: Severity) -> Self {
        Self {
            level: Arc::new(AtomicU8::new(level.as_u8())),
        }
    }

    pub fn level(&self) -> Severity {
        // Only valid discriminants are ever stored.
        Severity::try_from(self.level.load(Ordering::Acquire)).unwrap_or(Severity::MIN)
    }

    pub fn set_level(&self, level: Severity) {
        self.level.store(level.as_u8(), Ordering::Release);
    }

    pub fn enabled(&self, level: Severity) -> bool {
        level >= self.level()
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::new(Severity::Info)
    }
}

impl LevelEnabler for Threshold {
    fn enabled(&self, level: Severity) -> bool {
        Threshold::enabled(self, level)
    }
}

impl fmt::Debug for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Threshold").field(&self.level()).finish()
    }
}
