//! Structured logger

use chrono::Utc;
use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use tierlog_core::constants::TIME_LAYOUT;
use tierlog_core::{Field, Result, Severity, Threshold};
use tierlog_sink::{Caller, Core, Discard, Entry, NopCore, WriteSyncer};

use crate::escalation::{Escalation, Fault};
use crate::options::{FatalHook, Hook, Options};
use crate::sugar::SugaredLogger;

/// Writes entries with typed fields through a set of cores.
///
/// Cloning is cheap; clones share the cores and the threshold.
#[derive(Clone)]
pub struct Logger {
    core: Arc<dyn Core>,
    threshold: Threshold,
    name: Option<String>,
    fields: Arc<Vec<Field>>,
    development: bool,
    add_caller: bool,
    stacktrace: Option<Severity>,
    hooks: Arc<Vec<Hook>>,
    error_output: Arc<dyn WriteSyncer>,
    on_fatal: Option<FatalHook>,
}

impl Logger {
    pub(crate) fn from_parts(core: Arc<dyn Core>, threshold: Threshold, options: Options) -> Self {
        Self {
            core,
            threshold,
            name: None,
            fields: Arc::new(options.fields),
            development: options.development,
            add_caller: options.add_caller,
            stacktrace: options.stacktrace,
            hooks: Arc::new(options.hooks),
            error_output: options.error_output,
            on_fatal: options.on_fatal,
        }
    }

    /// A logger that never writes anything
    pub fn nop() -> Self {
        let options = Options::new().error_output(Discard);
        Self::from_parts(Arc::new(NopCore), Threshold::new(Severity::MAX), options)
    }

    pub fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    /// Whether an entry at `level` would be written anywhere
    pub fn enabled(&self, level: Severity) -> bool {
        self.threshold.enabled(level) && self.core.enabled(level)
    }

    /// Child logger that adds `fields` to every entry
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        let mut logger = self.clone();
        let mut all = (*self.fields).clone();
        all.extend(fields);
        logger.fields = Arc::new(all);
        logger
    }

    /// Child logger with a dot-separated name segment appended
    pub fn named(&self, name: &str) -> Self {
        let mut logger = self.clone();
        logger.name = Some(match &self.name {
            Some(parent) if !name.is_empty() => format!("{}.{}", parent, name),
            Some(parent) => parent.clone(),
            None => name.to_string(),
        });
        logger
    }

    pub fn sugar(&self) -> SugaredLogger {
        SugaredLogger::new(self.clone())
    }

    /// Flush every destination
    pub fn sync(&self) -> Result<()> {
        self.core.sync()
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.write(Severity::Debug, msg, fields, Some(Location::caller().into()));
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.write(Severity::Info, msg, fields, Some(Location::caller().into()));
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.write(Severity::Warn, msg, fields, Some(Location::caller().into()));
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.write(Severity::Error, msg, fields, Some(Location::caller().into()));
    }

    /// Logs, then returns a fault in development mode
    #[track_caller]
    pub fn dpanic(&self, msg: &str, fields: &[Field]) -> std::result::Result<(), Fault> {
        self.log(Severity::DPanic, msg, fields)
    }

    /// Logs if enabled, and always returns a fault
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Field]) -> Fault {
        self.write(Severity::Panic, msg, fields, Some(Location::caller().into()));
        Fault::new(Severity::Panic, msg)
    }

    /// Logs if enabled, flushes, and terminates the process with status 1
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) -> ! {
        self.write(Severity::Fatal, msg, fields, Some(Location::caller().into()));
        self.terminate(1)
    }

    /// Log at any level and apply that level's escalation
    #[track_caller]
    pub fn log(
        &self,
        level: Severity,
        msg: &str,
        fields: &[Field],
    ) -> std::result::Result<(), Fault> {
        self.write(level, msg, fields, Some(Location::caller().into()));
        self.escalate(level, msg)
    }

    pub(crate) fn escalate(&self, level: Severity, msg: &str) -> std::result::Result<(), Fault> {
        match Escalation::for_level(level, self.development) {
            Escalation::Continue => Ok(()),
            Escalation::Fault => Err(Fault::new(level, msg)),
            Escalation::Exit(code) => self.terminate(code),
        }
    }

    pub(crate) fn terminate(&self, code: i32) -> ! {
        if let Err(e) = self.core.sync() {
            self.report(e);
        }
        if let Some(hook) = &self.on_fatal {
            hook(code);
        }
        std::process::exit(code)
    }

    /// Gate, build and fan out one entry. Returns whether it was written.
    pub(crate) fn write(
        &self,
        level: Severity,
        msg: &str,
        fields: &[Field],
        caller: Option<Caller>,
    ) -> bool {
        if !self.enabled(level) {
            return false;
        }

        let mut entry = Entry::new(level, msg);
        entry.logger_name = self.name.clone();
        if self.add_caller {
            entry.caller = caller;
        }
        if self.stacktrace.is_some_and(|min| level >= min) {
            entry.stack = Some(Backtrace::force_capture().to_string());
        }

        let fields: Cow<'_, [Field]> = if self.fields.is_empty() {
            Cow::Borrowed(fields)
        } else {
            let mut all = (*self.fields).clone();
            all.extend_from_slice(fields);
            Cow::Owned(all)
        };

        if let Err(e) = self.core.write(&entry, &fields) {
            self.report(e);
        }
        for hook in self.hooks.iter() {
            if let Err(e) = hook(&entry) {
                self.report(e);
            }
        }
        true
    }

    fn report(&self, err: impl fmt::Display) {
        let line = format!("{} write error: {}\n", Utc::now().format(TIME_LAYOUT), err);
        let _ = self.error_output.write_all(line.as_bytes());
        let _ = self.error_output.sync();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("development", &self.development)
            .finish_non_exhaustive()
    }
}
