//! Destinations that encoded entries are written to

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// A destination that can be shared between threads and flushed on demand
pub trait WriteSyncer: Send + Sync {
    fn write_all(&self, buf: &[u8]) -> io::Result<()>;
    fn sync(&self) -> io::Result<()>;
}

/// Serializes access to a plain [`Write`] so concurrent entries never interleave
pub struct Locked<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> Locked<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }
}

impl<W: Write + Send> WriteSyncer for Locked<W> {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.inner.lock().write_all(buf)
    }

    fn sync(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

/// The process's standard error stream
#[derive(Debug, Clone, Copy, Default)]
pub struct Stderr;

impl WriteSyncer for Stderr {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(buf)
    }

    fn sync(&self) -> io::Result<()> {
        io::stderr().lock().flush()
    }
}

/// Drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl WriteSyncer for Discard {
    fn write_all(&self, _buf: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn sync(&self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory destination; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct BufferWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl BufferWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl WriteSyncer for BufferWriter {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.buf.lock().extend_from_slice(buf);
        Ok(())
    }

    fn sync(&self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.log");
        let file = std::fs::File::create(&path).unwrap();

        let writer = Locked::new(io::BufWriter::new(file));
        writer.write_all(b"first\n").unwrap();
        writer.write_all(b"second\n").unwrap();
        writer.sync().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_buffer_writer_shared_between_clones() {
        let writer = BufferWriter::new();
        let clone = writer.clone();
        clone.write_all(b"a\nb\n").unwrap();

        assert_eq!(writer.lines(), vec!["a", "b"]);
        writer.clear();
        assert!(clone.contents().is_empty());
    }

    #[test]
    fn test_concurrent_lines_do_not_interleave() {
        let writer = Arc::new(Locked::new(Vec::new()));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let writer = writer.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        writer
                            .write_all(format!("thread-{}-line\n", i).as_bytes())
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let data = writer.inner.lock().clone();
        let text = String::from_utf8(data).unwrap();
        assert_eq!(text.lines().count(), 400);
        assert!(text.lines().all(|l| l.starts_with("thread-") && l.ends_with("-line")));
    }
}
