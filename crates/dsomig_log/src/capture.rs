//! In-memory sink for console lines.

use std::io;
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::console::console_subscriber;

/// Collects console lines emitted while [`LogCapture::run`] is active on the
/// current thread.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with this capture as the thread's subscriber.
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = console_subscriber(self.clone(), EnvFilter::new("trace"));
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn lines(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|buffer| {
                String::from_utf8_lossy(&buffer)
                    .lines()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of captured lines tagged with `code` (e.g. `"ERR"`).
    pub fn count_code(&self, code: &str) -> usize {
        let c_tag = format!("] [{code}] - ");
        self.lines().iter().filter(|line| line.contains(&c_tag)).count()
    }

    /// Whether any captured line carries `message` verbatim.
    pub fn contains_message(&self, message: &str) -> bool {
        let c_suffix = format!(" - {message}");
        self.lines().iter().any(|line| line.ends_with(&c_suffix))
    }
}

pub struct LogCaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for LogCaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| io::Error::other("log capture buffer poisoned"))?;
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogCaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LogCapture;

    #[test]
    fn capture_counts_by_code() {
        let log_capture = LogCapture::new();
        log_capture.run(|| {
            crate::info("one");
            crate::error("two");
            crate::error("three");
        });

        assert_eq!(log_capture.count_code("INF"), 1);
        assert_eq!(log_capture.count_code("ERR"), 2);
        assert!(log_capture.contains_message("three"));
        assert!(!log_capture.contains_message("four"));
    }

    #[test]
    fn capture_ignores_lines_outside_run() {
        let log_capture = LogCapture::new();
        crate::info("before");
        log_capture.run(|| crate::info("inside"));
        crate::info("after");

        assert_eq!(log_capture.lines().len(), 1);
        assert!(log_capture.contains_message("inside"));
    }
}
