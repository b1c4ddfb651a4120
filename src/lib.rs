//! Stagelink - Scene metadata synchronization over a development channel
//!
//! Stagelink keeps a small piece of versioned metadata, attached to a named
//! scene, synchronized between a running process and the on-disk source file
//! it came from. Updates are applied locally first and then confirmed by the
//! development host through an asynchronous request/acknowledge handshake.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`core`] - Domain types, the metadata schema, and the metadata store
//! - [`events`] - Current-value container with change subscription
//! - [`channel`] - Abstraction for the development channel transport
//! - [`sync`] - Acknowledgment coordination, timeouts, and configuration
//! - [`report`] - Diagnostics sink abstraction
//!
//! # Correctness Invariants
//!
//! Stagelink maintains the following invariants:
//!
//! 1. Local state is committed and observable before any remote interaction
//! 2. At most one update per source is in flight at any time
//! 3. A failed or timed-out confirmation never corrupts local state
//! 4. A stale acknowledgment is ignored, never an error

pub mod channel;
pub mod core;
pub mod events;
pub mod report;
pub mod sync;
