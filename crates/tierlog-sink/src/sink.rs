//! Cores: an encoder, a destination and a level predicate, and their fan-out

use std::sync::Arc;
use tierlog_core::{Field, LevelEnabler, Result, Severity};

use crate::encoder::Encoder;
use crate::entry::Entry;
use crate::writer::WriteSyncer;

/// Minimal interface the logger writes through
pub trait Core: Send + Sync {
    fn enabled(&self, level: Severity) -> bool;
    /// Write unconditionally; callers check [`Core::enabled`] first
    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()>;
    fn sync(&self) -> Result<()>;
}

/// One encoder writing to one exclusively owned destination
pub struct SinkCore {
    encoder: Arc<dyn Encoder>,
    out: Arc<dyn WriteSyncer>,
    enabler: Arc<dyn LevelEnabler>,
}

impl SinkCore {
    pub fn new(
        encoder: Arc<dyn Encoder>,
        out: Arc<dyn WriteSyncer>,
        enabler: Arc<dyn LevelEnabler>,
    ) -> Self {
        Self {
            encoder,
            out,
            enabler,
        }
    }
}

impl Core for SinkCore {
    fn enabled(&self, level: Severity) -> bool {
        self.enabler.enabled(level)
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()> {
        let buf = self.encoder.encode(entry, fields)?;
        self.out.write_all(&buf)?;
        // Entries above Error may be followed by process exit.
        if entry.level > Severity::Error {
            self.out.sync()?;
        }
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        self.out.sync()?;
        Ok(())
    }
}

/// Fans every entry out to all cores; each decides for itself whether to write
#[derive(Clone, Default)]
pub struct Tee {
    cores: Vec<Arc<dyn Core>>,
}

impl Tee {
    pub fn new(cores: Vec<Arc<dyn Core>>) -> Self {
        Self { cores }
    }

    pub fn len(&self) -> usize {
        self.cores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cores.is_empty()
    }
}

impl Core for Tee {
    fn enabled(&self, level: Severity) -> bool {
        self.cores.iter().any(|core| core.enabled(level))
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()> {
        let mut first_err = None;
        for core in self.cores.iter().filter(|core| core.enabled(entry.level)) {
            if let Err(e) = core.write(entry, fields) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn sync(&self) -> Result<()> {
        let mut first_err = None;
        for core in &self.cores {
            if let Err(e) = core.sync() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Never enabled, never writes
#[derive(Debug, Clone, Copy, Default)]
pub struct NopCore;

impl Core for NopCore {
    fn enabled(&self, _level: Severity) -> bool {
        false
    }

    fn write(&self, _entry: &Entry, _fields: &[Field]) -> Result<()> {
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{EncoderConfig, JsonEncoder};
    use crate::writer::BufferWriter;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tierlog_core::{Error, LevelEnablerFn};

    fn exact(level: Severity) -> Arc<dyn LevelEnabler> {
        Arc::new(LevelEnablerFn(move |l| l == level))
    }

    fn json_core(out: &BufferWriter, enabler: Arc<dyn LevelEnabler>) -> Arc<dyn Core> {
        Arc::new(SinkCore::new(
            Arc::new(JsonEncoder::new(EncoderConfig::production())),
            Arc::new(out.clone()),
            enabler,
        ))
    }

    struct FailingWriter {
        syncs: AtomicUsize,
    }

    impl WriteSyncer for FailingWriter {
        fn write_all(&self, _buf: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "write refused"))
        }

        fn sync(&self) -> io::Result<()> {
            self.syncs.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::new(io::ErrorKind::Other, "sync refused"))
        }
    }

    #[test]
    fn test_tee_routes_by_predicate() {
        let info = BufferWriter::new();
        let error = BufferWriter::new();
        let tee = Tee::new(vec![
            json_core(&info, exact(Severity::Info)),
            json_core(&error, exact(Severity::Error)),
        ]);

        assert!(tee.enabled(Severity::Info));
        assert!(!tee.enabled(Severity::Warn));

        for level in [Severity::Info, Severity::Error] {
            tee.write(&Entry::new(level, format!("{} entry", level)), &[])
                .unwrap();
        }

        assert_eq!(info.lines().len(), 1);
        assert!(info.contents().contains("info entry"));
        assert_eq!(error.lines().len(), 1);
        assert!(error.contents().contains("error entry"));
    }

    #[test]
    fn test_tee_reports_first_error_but_writes_everywhere() {
        let good = BufferWriter::new();
        let failing = Arc::new(FailingWriter {
            syncs: AtomicUsize::new(0),
        });
        let failing_core: Arc<dyn Core> = Arc::new(SinkCore::new(
            Arc::new(JsonEncoder::default()),
            failing.clone(),
            Arc::new(Severity::Debug),
        ));
        let tee = Tee::new(vec![failing_core, json_core(&good, Arc::new(Severity::Debug))]);

        let err = tee.write(&Entry::new(Severity::Warn, "hi"), &[]).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(good.lines().len(), 1);

        assert!(tee.sync().is_err());
        assert_eq!(failing.syncs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_severe_entries_sync_destination() {
        struct CountingWriter {
            syncs: AtomicUsize,
        }

        impl WriteSyncer for CountingWriter {
            fn write_all(&self, _buf: &[u8]) -> io::Result<()> {
                Ok(())
            }

            fn sync(&self) -> io::Result<()> {
                self.syncs.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let out = Arc::new(CountingWriter {
            syncs: AtomicUsize::new(0),
        });
        let core = SinkCore::new(
            Arc::new(JsonEncoder::default()),
            out.clone(),
            Arc::new(Severity::Debug),
        );

        core.write(&Entry::new(Severity::Error, "still running"), &[]).unwrap();
        assert_eq!(out.syncs.load(Ordering::SeqCst), 0);

        core.write(&Entry::new(Severity::DPanic, "about to stop"), &[]).unwrap();
        assert_eq!(out.syncs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nop_core() {
        assert!(!NopCore.enabled(Severity::Fatal));
        assert!(NopCore.sync().is_ok());
        assert!(Tee::default().is_empty());
    }
}
