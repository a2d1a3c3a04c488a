//! tierlog - Leveled, structured logging for a whole process
//!
//! In development (or without a log directory) entries go to stderr as
//! colored text. In production every enabled level gets its own JSON file
//! under `<log_dir>/<pod>/<service>/<level>.<date>.log`, rotated on a fixed
//! interval.
//!
//! ```no_run
//! use tierlog::{Field, Options, Severity};
//!
//! tierlog::init(
//!     Options::new()
//!         .service_name("data")
//!         .log_path("/var/log/apps")
//!         .level(Severity::Info),
//! );
//! tierlog::info("listening", &[Field::int("port", 8080)]);
//! tierlog::infof!("{} workers ready", 4);
//! tierlog::flush().ok();
//! ```

mod bridge;
mod builder;
mod escalation;
mod global;
mod logger;
mod macros;
mod options;
mod sugar;

pub use bridge::TierlogLayer;
pub use builder::build;
pub use escalation::{Escalation, Fault};
pub use global::*;
pub use logger::Logger;
pub use options::{BoxError, FatalHook, Hook, Options, WrapCore};
pub use sugar::{KeyValue, SugaredLogger};

pub use tierlog_core::{Error, Field, LevelEnabler, LogConfig, Result, Severity, Threshold};
pub use tierlog_sink::{BufferWriter, Caller, Core, Entry, WriteSyncer};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
