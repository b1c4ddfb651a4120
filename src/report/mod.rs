//! report
//!
//! Diagnostics sink abstraction.
//!
//! # Design
//!
//! Warnings and errors raised while synchronizing metadata are reported,
//! not thrown: a missing backing source or a duplicate in-flight update is
//! advisory, and the fire-and-forget write path has no caller to hand an
//! error to. The [`LogSink`] trait is the seam those diagnostics flow
//! through, so hosts decide where they end up.
//!
//! [`TracingSink`] is the default implementation and forwards to the
//! `tracing` macros. [`mock::RecordingSink`] captures messages for test
//! assertions.

pub mod mock;

pub use mock::RecordingSink;

/// Sink for diagnostic warnings and errors.
///
/// Implementations must never block and never fail; reporting is strictly
/// best-effort.
pub trait LogSink: Send + Sync {
    /// Report a non-fatal warning.
    fn warn(&self, message: &str);

    /// Report an error.
    fn error(&self, message: &str);
}

/// Default sink forwarding to the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
