//! Operator-facing output sink.
//!
//! Plan descriptions, dry-run configuration and failure reports are written
//! through an [`OutputSink`] handed to the workflow by its caller. Dry runs
//! silence progress output with [`OutputSink::mute`], which hands back a guard
//! that restores the previous state when dropped.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Cloneable handle to a shared writer
#[derive(Clone)]
pub struct OutputSink {
    writer: SharedWriter,
    mute_depth: Arc<AtomicUsize>,
}

impl OutputSink {
    /// Wrap any writer
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            mute_depth: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sink writing to standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Sink discarding everything
    pub fn discard() -> Self {
        Self::new(std::io::sink())
    }

    /// In-memory sink, returning the sink and a handle to the captured bytes
    pub fn buffer() -> (Self, CapturedOutput) {
        let captured = CapturedOutput::default();
        (Self::new(captured.clone()), captured)
    }

    /// Write one line unless the sink is muted
    pub fn line(&self, line: impl AsRef<str>) {
        if self.is_muted() {
            return;
        }
        self.write_line(line.as_ref());
    }

    /// Write one line even while muted; used for the result of a dry run
    pub fn always(&self, line: impl AsRef<str>) {
        self.write_line(line.as_ref());
    }

    /// Silence [`OutputSink::line`] until the returned guard is dropped
    pub fn mute(&self) -> MuteGuard {
        self.mute_depth.fetch_add(1, Ordering::SeqCst);
        MuteGuard {
            mute_depth: Arc::clone(&self.mute_depth),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.mute_depth.load(Ordering::SeqCst) > 0
    }

    fn write_line(&self, line: &str) {
        let mut writer = self.writer.lock();
        if let Err(e) = writeln!(writer, "{line}").and_then(|_| writer.flush()) {
            tracing::warn!(error = %e, "failed to write operator output");
        }
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("muted", &self.is_muted())
            .finish()
    }
}

/// Restores output when dropped
#[must_use = "output is unmuted as soon as the guard is dropped"]
pub struct MuteGuard {
    mute_depth: Arc<AtomicUsize>,
}

impl Drop for MuteGuard {
    fn drop(&mut self) {
        self.mute_depth.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Bytes captured by [`OutputSink::buffer`]
#[derive(Clone, Default)]
pub struct CapturedOutput {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
