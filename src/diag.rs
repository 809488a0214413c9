//! Diagnostic routing for non-fatal conditions.
//!
//! Several situations are worth telling the user about without failing the
//! photo or the album: a file skipped for an unexpected extension, a date
//! that had to fall back to filesystem time, a resize that does not
//! actually shrink the image. All of them flow through one injectable
//! [`DiagnosticSink`] rather than a global console, so callers can redirect
//! them and tests can assert on exact messages and counts.
//!
//! [`LogSink`] is the production default and forwards to [`log::warn!`];
//! wire up any `log`-compatible logger to see the output. [`MemorySink`]
//! collects messages in memory.

use std::sync::Mutex;

/// Receiver for non-fatal warnings.
///
/// `Send + Sync` because warnings are emitted from rayon worker threads
/// during album processing.
pub trait DiagnosticSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Default sink: forwards warnings to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn warn(&self, message: &str) {
        log::warn!("{message}");
    }
}

/// Sink that retains every message, for inspection after a run.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far, in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
