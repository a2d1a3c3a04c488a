//! Time-based log rotation

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tierlog_core::constants::{DEFAULT_FILE_MAX_AGE, DEFAULT_FILE_ROTATION_TIME, LOG_FILE_SUFFIX};
use tierlog_core::{Error, Result, Severity};
use tracing::debug;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::writer::{Locked, WriteSyncer};

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Log rotation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    /// How long a rotated file is kept before it is purged
    pub max_age: Duration,
    /// Time between rotations
    pub rotation_time: Duration,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_FILE_MAX_AGE,
            rotation_time: DEFAULT_FILE_ROTATION_TIME,
        }
    }
}

impl RotationConfig {
    /// Zero durations fall back to the defaults
    pub fn new(max_age: Duration, rotation_time: Duration) -> Self {
        let default = Self::default();
        Self {
            max_age: if max_age.is_zero() { default.max_age } else { max_age },
            rotation_time: if rotation_time.is_zero() {
                default.rotation_time
            } else {
                rotation_time
            },
        }
    }

    /// The wall-clock period files actually roll over on.
    ///
    /// Intervals snap down to a whole minute, hour or day; anything longer
    /// than a day rotates daily.
    pub fn period(&self) -> Duration {
        if self.rotation_time >= DAY {
            DAY
        } else if self.rotation_time >= HOUR {
            HOUR
        } else {
            MINUTE
        }
    }

    pub fn rotation(&self) -> Rotation {
        let period = self.period();
        if period == DAY {
            Rotation::DAILY
        } else if period == HOUR {
            Rotation::HOURLY
        } else {
            Rotation::MINUTELY
        }
    }

    /// Number of rotated files that covers `max_age`
    pub fn max_files(&self) -> usize {
        let period = self.period().as_secs();
        let files = self.max_age.as_secs().div_ceil(period);
        usize::try_from(files).unwrap_or(usize::MAX).max(1)
    }

    /// strftime layout of the date segment in file names
    pub fn date_layout(&self) -> &'static str {
        let period = self.period();
        if period == DAY {
            "%Y-%m-%d"
        } else if period == HOUR {
            "%Y-%m-%d-%H"
        } else {
            "%Y-%m-%d-%H-%M"
        }
    }

    /// `<dir>/<level>.<date layout>.log`
    pub fn pattern(&self, dir: &Path, level: Severity) -> PathBuf {
        dir.join(format!(
            "{}.{}.{}",
            level.as_str(),
            self.date_layout(),
            LOG_FILE_SUFFIX
        ))
    }
}

/// `<root>/<pod>/<service>`, skipping empty segments
pub fn log_dir(root: &Path, pod: &str, service: &str) -> PathBuf {
    let mut dir = root.to_path_buf();
    for segment in [pod, service] {
        if !segment.is_empty() {
            dir.push(segment);
        }
    }
    dir
}

/// A per-level file that rolls over on a fixed interval
pub struct RotatingFile {
    pattern: PathBuf,
    writer: Locked<RollingFileAppender>,
}

impl RotatingFile {
    /// Open `<dir>/<level>.<date>.log`; `dir` must already exist
    pub fn create(dir: &Path, level: Severity, config: &RotationConfig) -> Result<Self> {
        let pattern = config.pattern(dir, level);

        let appender = RollingFileAppender::builder()
            .rotation(config.rotation())
            .filename_prefix(level.as_str())
            .filename_suffix(LOG_FILE_SUFFIX)
            .max_log_files(config.max_files())
            .build(dir)
            .map_err(|e| Error::rotating_writer(&pattern, e))?;

        debug!(
            "Created rotating file {} (keep {} files)",
            pattern.display(),
            config.max_files()
        );

        Ok(Self {
            pattern,
            writer: Locked::new(appender),
        })
    }

    /// Path with the strftime date placeholder, e.g. `logs/info.%Y-%m-%d.log`
    pub fn pattern(&self) -> &Path {
        &self.pattern
    }
}

impl WriteSyncer for RotatingFile {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.writer.write_all(buf)
    }

    fn sync(&self) -> io::Result<()> {
        self.writer.sync()
    }
}
