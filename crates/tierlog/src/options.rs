//! Construction options for a logger

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tierlog_core::{Field, LogConfig, Severity};
use tierlog_sink::{Core, Entry, Stderr, WriteSyncer};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Runs after every written entry; failures go to the error output
pub type Hook = Arc<dyn Fn(&Entry) -> Result<(), BoxError> + Send + Sync>;

/// Replaces the assembled core, e.g. to add sampling or a test double
pub type WrapCore = Arc<dyn Fn(Arc<dyn Core>) -> Arc<dyn Core> + Send + Sync>;

/// Called with the exit code after a fatal entry is written
pub type FatalHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Logger options.
///
/// Files are only written when a log path is set and development mode is
/// off; otherwise output is colored text on the console output (stderr).
#[derive(Clone)]
pub struct Options {
    pub(crate) service_name: String,
    pub(crate) log_path: PathBuf,
    pub(crate) level: Severity,
    pub(crate) development: bool,
    pub(crate) file_max_age: Duration,
    pub(crate) file_rotation_time: Duration,
    pub(crate) fields: Vec<Field>,
    pub(crate) hooks: Vec<Hook>,
    pub(crate) add_caller: bool,
    pub(crate) stacktrace: Option<Severity>,
    pub(crate) error_output: Arc<dyn WriteSyncer>,
    pub(crate) console_output: Arc<dyn WriteSyncer>,
    pub(crate) wrap_core: Option<WrapCore>,
    pub(crate) on_fatal: Option<FatalHook>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            log_path: PathBuf::new(),
            level: Severity::Debug,
            development: false,
            // Zero means the default: 7 days
            file_max_age: Duration::ZERO,
            // Zero means the default: 24 hours
            file_rotation_time: Duration::ZERO,
            fields: Vec::new(),
            hooks: Vec::new(),
            add_caller: false,
            stacktrace: None,
            error_output: Arc::new(Stderr),
            console_output: Arc::new(Stderr),
            wrap_core: None,
            on_fatal: None,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LogConfig) -> Self {
        let mut options = Self::new()
            .service_name(config.service_name.clone())
            .log_path(config.log_dir.clone())
            .level(config.level)
            .file_max_age(config.file_max_age())
            .file_rotation_time(config.file_rotation_time())
            .fields(config.static_fields());
        options.development = config.development;
        options.add_caller = config.add_caller;
        options.stacktrace = config.stacktrace_level;
        options
    }

    /// Directory name for this service's files under `<log_path>/<pod>/`
    pub fn service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Root directory for log files; empty writes to the console instead
    pub fn log_path(mut self, log_path: impl Into<PathBuf>) -> Self {
        self.log_path = log_path.into();
        self
    }

    /// Initial threshold; also the lowest level that gets a file
    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Console output, and DPanic entries raise a fault
    pub fn development(mut self) -> Self {
        self.development = true;
        self
    }

    pub fn file_max_age(mut self, max_age: Duration) -> Self {
        self.file_max_age = max_age;
        self
    }

    pub fn file_rotation_time(mut self, rotation_time: Duration) -> Self {
        self.file_rotation_time = rotation_time;
        self
    }

    /// Fields attached to every entry
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Entry) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Record the file and line of the logging call
    pub fn add_caller(mut self) -> Self {
        self.add_caller = true;
        self
    }

    /// Attach a stack trace to entries at or above `level`
    pub fn stacktrace(mut self, level: Severity) -> Self {
        self.stacktrace = Some(level);
        self
    }

    /// Where the logger reports its own write and hook failures
    pub fn error_output(mut self, out: impl WriteSyncer + 'static) -> Self {
        self.error_output = Arc::new(out);
        self
    }

    /// Destination of console output
    pub fn console_output(mut self, out: impl WriteSyncer + 'static) -> Self {
        self.console_output = Arc::new(out);
        self
    }

    pub fn wrap_core<F>(mut self, wrap: F) -> Self
    where
        F: Fn(Arc<dyn Core>) -> Arc<dyn Core> + Send + Sync + 'static,
    {
        self.wrap_core = Some(Arc::new(wrap));
        self
    }

    /// Replace the process exit that follows a fatal entry.
    ///
    /// The process still exits if the hook returns.
    pub fn on_fatal<F>(mut self, hook: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.on_fatal = Some(Arc::new(hook));
        self
    }

    pub(crate) fn is_console(&self) -> bool {
        self.development || self.log_path.as_os_str().is_empty()
    }
}
