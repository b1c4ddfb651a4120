//! channel::mock
//!
//! Mock development channel for deterministic testing.
//!
//! # Design
//!
//! The mock channel records every outbound update and lets tests deliver
//! acknowledgments on demand, either manually via [`MockChannel::acknowledge`]
//! or automatically for every update via [`MockChannel::auto_ack`].
//!
//! # Example
//!
//! ```
//! use stagelink::channel::{DevChannel, MetaUpdate, MockChannel};
//! use stagelink::core::meta::schema::SceneMeta;
//! use stagelink::core::types::SourceKey;
//!
//! # tokio_test::block_on(async {
//! let channel = MockChannel::new();
//! let source = SourceKey::new("scenes/intro.scene").unwrap();
//!
//! channel
//!     .send_update(MetaUpdate {
//!         source: source.clone(),
//!         data: SceneMeta::new(),
//!     })
//!     .await;
//!
//! assert_eq!(channel.sent().len(), 1);
//! assert_eq!(channel.sent()[0].source, source);
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::traits::{DevChannel, MetaAck, MetaUpdate};
use crate::core::types::SourceKey;

/// Buffer size for the mock's acknowledgment broadcast.
const ACK_BUFFER: usize = 64;

/// Mock development channel for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; cheap to clone.
#[derive(Clone)]
pub struct MockChannel {
    inner: Arc<Mutex<MockChannelInner>>,
    acks: broadcast::Sender<MetaAck>,
}

struct MockChannelInner {
    /// Recorded outbound updates, in send order.
    sent: Vec<MetaUpdate>,
    /// Whether every update is acknowledged immediately.
    auto_ack: bool,
}

impl MockChannel {
    /// Create a new mock channel that records updates without acknowledging.
    pub fn new() -> Self {
        let (acks, _) = broadcast::channel(ACK_BUFFER);
        Self {
            inner: Arc::new(Mutex::new(MockChannelInner {
                sent: Vec::new(),
                auto_ack: false,
            })),
            acks,
        }
    }

    /// Configure the mock to acknowledge every update as soon as it is sent.
    pub fn auto_ack(self) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.auto_ack = true;
        }
        self
    }

    /// Deliver an acknowledgment for `source` to all subscribers.
    ///
    /// Returns the number of subscribers that received it.
    pub fn acknowledge(&self, source: &SourceKey) -> usize {
        self.acks
            .send(MetaAck {
                source: source.clone(),
            })
            .unwrap_or(0)
    }

    /// Get all recorded outbound updates.
    pub fn sent(&self) -> Vec<MetaUpdate> {
        let inner = self.inner.lock().unwrap();
        inner.sent.clone()
    }

    /// Get the number of recorded outbound updates.
    pub fn sent_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.sent.len()
    }

    /// Clear recorded updates.
    pub fn clear_sent(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.sent.clear();
    }

    /// Get the number of active acknowledgment subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.acks.receiver_count()
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DevChannel for MockChannel {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn send_update(&self, update: MetaUpdate) {
        let source = update.source.clone();
        let auto_ack = {
            let mut inner = self.inner.lock().unwrap();
            inner.sent.push(update);
            inner.auto_ack
        };

        if auto_ack {
            self.acknowledge(&source);
        }
    }

    fn subscribe_acks(&self) -> broadcast::Receiver<MetaAck> {
        self.acks.subscribe()
    }
}
