//! tierlog sinks - Encoding, destinations, rotation, and per-level routing

mod encoder;
mod entry;
mod rotation;
mod router;
mod sink;
mod writer;

pub use encoder::{ConsoleEncoder, Encoder, EncoderConfig, JsonEncoder, LevelEncoding};
pub use entry::{Caller, Entry};
pub use rotation::{log_dir, RotatingFile, RotationConfig};
pub use router::{enabled_levels, route, LevelAndAbove, Route};
pub use sink::{Core, NopCore, SinkCore, Tee};
pub use writer::{BufferWriter, Discard, Locked, Stderr, WriteSyncer};
