//! Entry encoders: JSON lines for files, tab-separated text for the console

use colored::Colorize;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tierlog_core::constants::TIME_LAYOUT;
use tierlog_core::{Field, Result, Severity};

use crate::entry::Entry;

/// How the level is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEncoding {
    Lowercase,
    LowercaseColor,
    Capital,
}

impl LevelEncoding {
    fn encode(&self, level: Severity) -> String {
        match self {
            LevelEncoding::Lowercase => level.as_str().to_string(),
            LevelEncoding::Capital => level.capital_str().to_string(),
            LevelEncoding::LowercaseColor => {
                let name = level.as_str();
                match level {
                    Severity::Debug => name.magenta().to_string(),
                    Severity::Info => name.blue().to_string(),
                    Severity::Warn => name.yellow().to_string(),
                    _ => name.red().to_string(),
                }
            }
        }
    }
}

/// Key names and formatting shared by both encoders
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    pub time_key: &'static str,
    pub level_key: &'static str,
    pub name_key: &'static str,
    pub caller_key: &'static str,
    pub message_key: &'static str,
    pub stacktrace_key: &'static str,
    pub line_ending: &'static str,
    pub level_encoding: LevelEncoding,
    pub time_layout: &'static str,
}

impl EncoderConfig {
    pub fn production() -> Self {
        Self {
            time_key: "ts",
            level_key: "level",
            name_key: "logger",
            caller_key: "caller",
            message_key: "msg",
            stacktrace_key: "stacktrace",
            line_ending: "\n",
            level_encoding: LevelEncoding::Lowercase,
            time_layout: TIME_LAYOUT,
        }
    }

    pub fn with_level_encoding(mut self, level_encoding: LevelEncoding) -> Self {
        self.level_encoding = level_encoding;
        self
    }

    fn time(&self, entry: &Entry) -> String {
        entry.time.format(self.time_layout).to_string()
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::production()
    }
}

/// Turns an entry and its fields into the bytes written to a destination
pub trait Encoder: Send + Sync {
    fn encode(&self, entry: &Entry, fields: &[Field]) -> Result<Vec<u8>>;
}

/// One JSON object per line
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

struct JsonLine<'a> {
    config: &'a EncoderConfig,
    entry: &'a Entry,
    fields: &'a [Field],
}

impl Serialize for JsonLine<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let config = self.config;
        let entry = self.entry;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(config.level_key, &config.level_encoding.encode(entry.level))?;
        map.serialize_entry(config.time_key, &config.time(entry))?;
        if let Some(name) = &entry.logger_name {
            map.serialize_entry(config.name_key, name)?;
        }
        if let Some(caller) = &entry.caller {
            map.serialize_entry(config.caller_key, &caller.short())?;
        }
        map.serialize_entry(config.message_key, &entry.message)?;
        for field in self.fields {
            map.serialize_entry(&field.key, &field.value)?;
        }
        if let Some(stack) = &entry.stack {
            map.serialize_entry(config.stacktrace_key, stack)?;
        }
        map.end()
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, entry: &Entry, fields: &[Field]) -> Result<Vec<u8>> {
        let mut buf = serde_json::to_vec(&JsonLine {
            config: &self.config,
            entry,
            fields,
        })?;
        buf.extend_from_slice(self.config.line_ending.as_bytes());
        Ok(buf)
    }
}

/// Human readable, tab-separated output for terminals
#[derive(Debug, Clone)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl ConsoleEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }
}

impl Default for ConsoleEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::production().with_level_encoding(LevelEncoding::LowercaseColor))
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, entry: &Entry, fields: &[Field]) -> Result<Vec<u8>> {
        let config = &self.config;
        let mut columns = vec![config.time(entry), config.level_encoding.encode(entry.level)];
        if let Some(name) = &entry.logger_name {
            columns.push(name.clone());
        }
        if let Some(caller) = &entry.caller {
            columns.push(caller.short());
        }
        columns.push(entry.message.clone());

        if !fields.is_empty() {
            let context: serde_json::Map<String, serde_json::Value> = fields
                .iter()
                .map(|f| (f.key.clone(), f.value.clone()))
                .collect();
            columns.push(serde_json::to_string(&context)?);
        }

        let mut line = columns.join("\t");
        if let Some(stack) = &entry.stack {
            line.push_str(config.line_ending);
            line.push_str(stack.trim_end());
        }
        line.push_str(config.line_ending);
        Ok(line.into_bytes())
    }
}
