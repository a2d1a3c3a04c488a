//! The process-wide logger

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::{const_mutex, Mutex};
use tierlog_core::{Field, Result, Severity, Threshold};

use crate::builder::build;
use crate::escalation::Fault;
use crate::logger::Logger;
use crate::options::Options;
use crate::sugar::{KeyValue, SugaredLogger};

static GLOBAL: OnceCell<CompositeLogger> = OnceCell::new();
static NOP: Lazy<CompositeLogger> = Lazy::new(CompositeLogger::nop);
/// Level requested through [`set_level`] before the logger was installed
static PENDING_LEVEL: Mutex<Option<Severity>> = const_mutex(None);

/// A logger, its sugared view and the threshold they share
#[derive(Debug)]
pub struct CompositeLogger {
    logger: Logger,
    sugar: SugaredLogger,
    threshold: Threshold,
}

impl CompositeLogger {
    pub fn new(options: Options) -> Result<Self> {
        let (logger, threshold) = build(options)?;
        Ok(Self::from_logger(logger, threshold))
    }

    fn from_logger(logger: Logger, threshold: Threshold) -> Self {
        Self {
            sugar: logger.sugar(),
            logger,
            threshold,
        }
    }

    pub fn nop() -> Self {
        let logger = Logger::nop();
        let threshold = logger.threshold().clone();
        Self::from_logger(logger, threshold)
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn sugar(&self) -> &SugaredLogger {
        &self.sugar
    }

    pub fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    pub fn set_level(&self, level: Severity) {
        self.threshold.set_level(level);
    }

    pub fn level(&self) -> Severity {
        self.threshold.level()
    }

    /// Sync both views. The second sync runs even if the first fails; the
    /// first error is returned.
    pub fn flush(&self) -> Result<()> {
        let primary = self.logger.sync();
        let secondary = self.sugar.sync();
        primary.and(secondary)
    }
}

/// Install the process-wide logger.
///
/// Only the first call builds anything. Concurrent callers block until it
/// finishes and all of them get the same instance; later options are ignored.
/// A level passed to [`set_level`] before installation overrides the one in
/// `options`.
pub fn try_init(options: Options) -> Result<&'static CompositeLogger> {
    let composite = GLOBAL.get_or_try_init(|| CompositeLogger::new(options))?;
    if let Some(level) = PENDING_LEVEL.lock().take() {
        composite.set_level(level);
    }
    Ok(composite)
}

/// Like [`try_init`], but a construction failure terminates the process
pub fn init(options: Options) -> &'static CompositeLogger {
    match try_init(options) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("tierlog: failed to build logger: {}", e);
            std::process::exit(1);
        }
    }
}

/// The installed logger, or one that drops everything before [`init`]
pub fn global() -> &'static CompositeLogger {
    GLOBAL.get().unwrap_or_else(|| Lazy::force(&NOP))
}

pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Change the level of the installed logger.
///
/// Before [`init`] the level is remembered and applied by the first
/// successful installation.
pub fn set_level(level: Severity) {
    let mut pending = PENDING_LEVEL.lock();
    match GLOBAL.get() {
        Some(composite) => composite.set_level(level),
        None => {
            *pending = Some(level);
            NOP.set_level(level);
        }
    }
}

pub fn level() -> Severity {
    global().level()
}

/// The installed logger's threshold. Before [`init`] this is the threshold
/// of the logger that drops everything, not the one installed later.
pub fn threshold() -> &'static Threshold {
    global().threshold()
}

pub fn flush() -> Result<()> {
    global().flush()
}

#[track_caller]
pub fn debug(msg: &str, fields: &[Field]) {
    global().logger().debug(msg, fields);
}

#[track_caller]
pub fn info(msg: &str, fields: &[Field]) {
    global().logger().info(msg, fields);
}

#[track_caller]
pub fn warn(msg: &str, fields: &[Field]) {
    global().logger().warn(msg, fields);
}

#[track_caller]
pub fn error(msg: &str, fields: &[Field]) {
    global().logger().error(msg, fields);
}

#[track_caller]
pub fn dpanic(msg: &str, fields: &[Field]) -> std::result::Result<(), Fault> {
    global().logger().dpanic(msg, fields)
}

#[track_caller]
pub fn panic(msg: &str, fields: &[Field]) -> Fault {
    global().logger().panic(msg, fields)
}

#[track_caller]
pub fn fatal(msg: &str, fields: &[Field]) -> ! {
    global().logger().fatal(msg, fields)
}

#[track_caller]
pub fn debugw(msg: &str, keys_and_values: &[KeyValue]) {
    global().sugar().debugw(msg, keys_and_values);
}

#[track_caller]
pub fn infow(msg: &str, keys_and_values: &[KeyValue]) {
    global().sugar().infow(msg, keys_and_values);
}

#[track_caller]
pub fn warnw(msg: &str, keys_and_values: &[KeyValue]) {
    global().sugar().warnw(msg, keys_and_values);
}

#[track_caller]
pub fn errorw(msg: &str, keys_and_values: &[KeyValue]) {
    global().sugar().errorw(msg, keys_and_values);
}

#[track_caller]
pub fn dpanicw(msg: &str, keys_and_values: &[KeyValue]) -> std::result::Result<(), Fault> {
    global().sugar().dpanicw(msg, keys_and_values)
}

#[track_caller]
pub fn panicw(msg: &str, keys_and_values: &[KeyValue]) -> Fault {
    global().sugar().panicw(msg, keys_and_values)
}

#[track_caller]
pub fn fatalw(msg: &str, keys_and_values: &[KeyValue]) -> ! {
    global().sugar().fatalw(msg, keys_and_values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tierlog_core::Error;
    use tierlog_sink::{BufferWriter, Core, Entry};

    struct FailingSync {
        inner: Arc<dyn Core>,
        syncs: Arc<AtomicUsize>,
    }

    impl Core for FailingSync {
        fn enabled(&self, level: Severity) -> bool {
            self.inner.enabled(level)
        }

        fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()> {
            self.inner.write(entry, fields)
        }

        fn sync(&self) -> Result<()> {
            let n = self.syncs.fetch_add(1, Ordering::SeqCst);
            Err(Error::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("sync {} failed", n),
            )))
        }
    }

    #[test]
    fn test_flush_attempts_both_views() {
        let syncs = Arc::new(AtomicUsize::new(0));
        let counter = syncs.clone();
        let composite = CompositeLogger::new(
            Options::new()
                .console_output(BufferWriter::new())
                .wrap_core(move |inner| {
                    Arc::new(FailingSync {
                        inner,
                        syncs: counter.clone(),
                    })
                }),
        )
        .unwrap();

        let err = composite.flush().unwrap_err();
        assert_eq!(syncs.load(Ordering::SeqCst), 2);
        assert!(err.to_string().contains("sync 0 failed"));
    }

    #[test]
    fn test_flush_succeeds_on_healthy_writer() {
        let out = BufferWriter::new();
        let composite = CompositeLogger::new(Options::new().console_output(out.clone())).unwrap();
        composite.sugar().infof(format_args!("{}", "pending"));
        assert!(composite.flush().is_ok());
        assert!(out.contents().contains("pending"));
    }

    #[test]
    fn test_set_level_is_shared_by_both_views() {
        let out = BufferWriter::new();
        let composite = CompositeLogger::new(Options::new().console_output(out.clone())).unwrap();

        composite.set_level(Severity::Warn);
        assert_eq!(composite.level(), Severity::Warn);
        composite.logger().info("structured", &[]);
        composite.sugar().infow("sugared", &[]);
        assert!(out.contents().is_empty());

        composite.sugar().warnw("sugared", &[]);
        assert_eq!(out.lines().len(), 1);
    }

    #[test]
    fn test_nop_composite() {
        let composite = CompositeLogger::nop();
        composite.logger().error("dropped", &[]);
        assert!(composite.flush().is_ok());
    }
}
