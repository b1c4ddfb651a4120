//! report::mock
//!
//! Recording sink for deterministic testing.

use std::sync::{Arc, Mutex};

use super::LogSink;

/// Sink that records every message for later inspection.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; cheap to clone.
///
/// # Example
///
/// ```
/// use stagelink::report::{LogSink, RecordingSink};
///
/// let sink = RecordingSink::new();
/// sink.warn("something looks off");
///
/// assert_eq!(sink.warnings(), vec!["something looks off".to_string()]);
/// assert!(sink.errors().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<RecordingSinkInner>>,
}

#[derive(Default)]
struct RecordingSinkInner {
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded warnings, in report order.
    pub fn warnings(&self) -> Vec<String> {
        self.inner.lock().unwrap().warnings.clone()
    }

    /// Get all recorded errors, in report order.
    pub fn errors(&self) -> Vec<String> {
        self.inner.lock().unwrap().errors.clone()
    }

    /// Clear everything recorded so far.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.warnings.clear();
        inner.errors.clear();
    }
}

impl LogSink for RecordingSink {
    fn warn(&self, message: &str) {
        self.inner.lock().unwrap().warnings.push(message.into());
    }

    fn error(&self, message: &str) {
        self.inner.lock().unwrap().errors.push(message.into());
    }
}
