//! Constants and default values for tierlog

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the instance (k8s pod) name
pub const POD_NAME_ENV: &str = "KUBE_PODNAME";

/// Default tierlog home directory name
pub const TIERLOG_DIR: &str = ".tierlog";

/// Suffix of every rotated log file
pub const LOG_FILE_SUFFIX: &str = "log";

/// Timestamp layout, `2006-01-02T15:04:05.000Z07:00`: RFC 3339 with
/// milliseconds and `Z` for UTC
pub const TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Default max age of a rotated file before it is purged (7 days)
pub const DEFAULT_FILE_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default time between rotations (24 hours)
pub const DEFAULT_FILE_ROTATION_TIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Config file names to search for (in priority order)
pub const CONFIG_FILES: &[&str] = &[
    "tierlog.toml",
    "tierlog.yaml",
    "tierlog.yml",
    "tierlog.json",
];

/// Get the tierlog home directory
pub fn tierlog_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(TIERLOG_DIR))
        .unwrap_or_else(|| PathBuf::from(TIERLOG_DIR))
}

/// Default config file, looked up when no `--config` is given
pub fn default_config_path() -> PathBuf {
    tierlog_home().join(CONFIG_FILES[0])
}

/// Instance name used to namespace log directories; empty when unset
pub fn pod_name() -> String {
    std::env::var(POD_NAME_ENV).unwrap_or_default()
}
