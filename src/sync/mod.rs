//! sync
//!
//! Acknowledgment coordination, timeouts, and configuration.
//!
//! # Architecture
//!
//! Confirmed metadata writes flow through one [`SyncCoordinator`] per
//! process. The coordinator owns the pending-acknowledgment registry and
//! enforces the protocol rules: at most one in-flight update per source,
//! a fixed acknowledgment timeout, and silent tolerance of stale acks.
//! [`SyncConfig`] carries the two knobs the protocol has - whether the
//! channel is active at all, and how long to wait for an acknowledgment.

pub mod config;
mod coordinator;

pub use config::{ConfigError, SyncConfig, DEFAULT_ACK_TIMEOUT_MS};
pub use coordinator::{SyncCoordinator, SyncError};
