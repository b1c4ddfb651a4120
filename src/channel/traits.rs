//! channel::traits
//!
//! Development channel trait and wire payload types.
//!
//! # Design
//!
//! The `DevChannel` trait is the seam between this crate and whatever
//! transport the host environment provides (a websocket to a dev server,
//! an in-process loopback, ...). The transport itself - framing, routing,
//! reconnection - is the host's concern; this crate only defines the
//! payloads and the topic names that identify them on the wire.
//!
//! Sending is fire-and-forget: `send_update` enqueues and returns.
//! Acknowledgments flow back as a broadcast subscription that lives for
//! the rest of the process.
//!
//! # Example
//!
//! ```ignore
//! use stagelink::channel::{DevChannel, MetaUpdate};
//!
//! async fn push(channel: &dyn DevChannel, update: MetaUpdate) {
//!     channel.send_update(update).await;
//!     // Resolution arrives later through the ack subscription.
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::core::meta::schema::SceneMeta;
use crate::core::types::SourceKey;

/// Wire topic identifying outbound metadata updates.
pub const TOPIC_META_UPDATE: &str = "metadata-update";

/// Wire topic identifying inbound update acknowledgments.
pub const TOPIC_META_ACK: &str = "metadata-update-ack";

/// Outbound message: the full metadata value for one source.
///
/// One of these is sent per confirmed-write attempt, carrying the complete
/// current value rather than the patch, so the remote side can overwrite
/// the backing file without merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaUpdate {
    /// The backing source this update targets.
    pub source: SourceKey,
    /// The full metadata value to persist.
    pub data: SceneMeta,
}

/// Inbound event: the remote side has persisted an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaAck {
    /// The backing source the acknowledgment is for.
    pub source: SourceKey,
}

/// The development channel between the running process and its host.
///
/// Implementations wrap an existing bidirectional transport. They must be
/// `Send + Sync` so a channel can be shared across async tasks.
///
/// # Error Handling
///
/// `send_update` has no failure surface by design: the transport owns
/// delivery. An update that never reaches the host simply never gets
/// acknowledged and surfaces as a confirmation timeout upstream.
#[async_trait]
pub trait DevChannel: Send + Sync {
    /// Get the channel name (e.g., "loopback", "mock").
    fn name(&self) -> &'static str;

    /// Enqueue an outbound metadata update. Fire-and-forget.
    async fn send_update(&self, update: MetaUpdate);

    /// Subscribe to inbound acknowledgment events.
    ///
    /// The subscription is expected to live for the process lifetime;
    /// there is no unsubscribe.
    fn subscribe_acks(&self) -> broadcast::Receiver<MetaAck>;
}
