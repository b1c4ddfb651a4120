//! sync::coordinator
//!
//! Acknowledgment coordination for confirmed metadata writes.
//!
//! # Design
//!
//! One coordinator exists per process (or per channel). It owns the
//! pending-acknowledgment registry: a table with at most one entry per
//! source key. A confirmed write registers its entry, sends the update,
//! and then races two completions over a single oneshot receiver - the
//! acknowledgment resolving it, or the timeout rejecting it. Whichever
//! side removes the registry entry first wins; the loser is a no-op.
//!
//! A second update for a source that is already pending is refused without
//! touching the in-flight request: the caller gets a warning through the
//! [`LogSink`] and an immediate success. Updates are not queued.
//!
//! Coordinators are cheap to clone; clones share the same registry, so
//! every store attached to one coordinator - and two stores bound to the
//! same source in particular - serialize against each other.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stagelink::channel::MockChannel;
//! use stagelink::report::TracingSink;
//! use stagelink::sync::{SyncConfig, SyncCoordinator};
//!
//! let channel = Arc::new(MockChannel::new().auto_ack());
//! let coordinator = SyncCoordinator::new(channel, SyncConfig::default(), Arc::new(TracingSink));
//! let _listener = coordinator.spawn_ack_listener();
//!
//! coordinator.confirm_update(&scene, &source, data).await?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time;

use super::config::SyncConfig;
use crate::channel::{DevChannel, MetaAck, MetaUpdate};
use crate::core::meta::schema::SceneMeta;
use crate::core::types::{SceneName, SourceKey};
use crate::report::LogSink;

/// Errors from confirmed metadata writes.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// No acknowledgment arrived within the configured timeout.
    #[error("connection timeout while updating metadata for {scene}")]
    AckTimeout {
        /// The scene whose update went unacknowledged.
        scene: String,
    },

    /// The pending entry was torn down before an acknowledgment arrived.
    #[error("acknowledgment channel closed while updating metadata for {scene}")]
    AckDropped {
        /// The scene whose update was abandoned.
        scene: String,
    },
}

/// Coordinates confirmed writes against the development channel.
///
/// See the module documentation for the protocol. Construct one per
/// process; clones share the same pending registry.
#[derive(Clone)]
pub struct SyncCoordinator {
    channel: Arc<dyn DevChannel>,
    sink: Arc<dyn LogSink>,
    config: SyncConfig,
    pending: Arc<Mutex<HashMap<SourceKey, oneshot::Sender<()>>>>,
}

impl SyncCoordinator {
    /// Create a coordinator over the given channel.
    pub fn new(channel: Arc<dyn DevChannel>, config: SyncConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            channel,
            sink,
            config,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether remote synchronization is active.
    ///
    /// When false, [`confirm_update`](Self::confirm_update) resolves
    /// immediately without any channel interaction.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Check whether an update for `source` is currently in flight.
    pub fn has_pending(&self, source: &SourceKey) -> bool {
        self.pending.lock().unwrap().contains_key(source)
    }

    /// Get the number of updates currently in flight.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Send `data` for `source` and await the host's acknowledgment.
    ///
    /// Resolves immediately (without sending) when synchronization is
    /// disabled, or when an update for the same source is already in
    /// flight - the latter after a warning naming the scene. The in-flight
    /// request is never affected.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::AckTimeout`] if no acknowledgment arrives
    /// within the configured timeout. The pending entry is removed either
    /// way, so a later write for the same source may proceed.
    pub async fn confirm_update(
        &self,
        scene: &SceneName,
        source: &SourceKey,
        data: SceneMeta,
    ) -> Result<(), SyncError> {
        if !self.config.enabled {
            return Ok(());
        }

        let rx = {
            let mut pending = self.pending.lock().unwrap();
            if pending.contains_key(source) {
                self.sink
                    .warn(&format!("metadata for {scene} is already being updated"));
                return Ok(());
            }
            let (tx, rx) = oneshot::channel();
            pending.insert(source.clone(), tx);
            rx
        };

        self.channel
            .send_update(MetaUpdate {
                source: source.clone(),
                data,
            })
            .await;

        match time::timeout(self.config.ack_timeout(), rx).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => {
                self.remove_pending(source);
                Err(SyncError::AckDropped {
                    scene: scene.to_string(),
                })
            }
            Err(_) => {
                self.remove_pending(source);
                Err(SyncError::AckTimeout {
                    scene: scene.to_string(),
                })
            }
        }
    }

    /// Resolve the pending entry for an inbound acknowledgment.
    ///
    /// An acknowledgment for a source with no pending entry is silently
    /// ignored; stale or duplicate acks are not an error.
    pub fn handle_ack(&self, ack: &MetaAck) {
        let sender = self.pending.lock().unwrap().remove(&ack.source);
        if let Some(sender) = sender {
            let _ = sender.send(());
        }
    }

    /// Spawn a task feeding the channel's acknowledgment events into
    /// [`handle_ack`](Self::handle_ack) for the process lifetime.
    ///
    /// The task ends when the channel's acknowledgment stream closes.
    pub fn spawn_ack_listener(&self) -> JoinHandle<()> {
        let mut acks = self.channel.subscribe_acks();
        let coordinator = self.clone();
        tokio::spawn(async move {
            loop {
                match acks.recv().await {
                    Ok(ack) => coordinator.handle_ack(&ack),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        coordinator.sink.warn(&format!(
                            "acknowledgment listener lagged, {skipped} events dropped"
                        ));
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    fn remove_pending(&self, source: &SourceKey) {
        self.pending.lock().unwrap().remove(source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MockChannel;
    use crate::report::RecordingSink;
    use std::time::Duration;

    fn scene(name: &str) -> SceneName {
        SceneName::new(name).unwrap()
    }

    fn source(key: &str) -> SourceKey {
        SourceKey::new(key).unwrap()
    }

    fn coordinator(channel: &MockChannel, config: SyncConfig) -> (SyncCoordinator, RecordingSink) {
        let sink = RecordingSink::new();
        let coordinator = SyncCoordinator::new(
            Arc::new(channel.clone()),
            config,
            Arc::new(sink.clone()),
        );
        (coordinator, sink)
    }

    fn short_timeout() -> SyncConfig {
        SyncConfig {
            enabled: true,
            ack_timeout_ms: 50,
        }
    }

    #[tokio::test]
    async fn disabled_sync_sends_nothing() {
        let channel = MockChannel::new();
        let (coordinator, sink) = coordinator(&channel, SyncConfig::disabled());

        coordinator
            .confirm_update(&scene("intro"), &source("intro.scene"), SceneMeta::new())
            .await
            .unwrap();

        assert_eq!(channel.sent_count(), 0);
        assert!(sink.warnings().is_empty());
    }

    #[tokio::test]
    async fn resolves_on_acknowledgment() {
        let channel = MockChannel::new().auto_ack();
        let (coordinator, _sink) = coordinator(&channel, SyncConfig::default());
        let _listener = coordinator.spawn_ack_listener();

        coordinator
            .confirm_update(&scene("intro"), &source("intro.scene"), SceneMeta::new())
            .await
            .unwrap();

        assert_eq!(channel.sent_count(), 1);
        assert_eq!(coordinator.pending_count(), 0);
    }

    #[tokio::test]
    async fn times_out_without_acknowledgment() {
        let channel = MockChannel::new();
        let (coordinator, _sink) = coordinator(&channel, short_timeout());

        let result = coordinator
            .confirm_update(&scene("intro"), &source("intro.scene"), SceneMeta::new())
            .await;

        match result {
            Err(SyncError::AckTimeout { scene }) => assert_eq!(scene, "intro"),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(!coordinator.has_pending(&source("intro.scene")));
    }

    #[tokio::test]
    async fn timed_out_source_can_retry() {
        let channel = MockChannel::new();
        let (coordinator, _sink) = coordinator(&channel, short_timeout());
        let key = source("intro.scene");

        let first = coordinator
            .confirm_update(&scene("intro"), &key, SceneMeta::new())
            .await;
        assert!(first.is_err());

        let _listener = coordinator.spawn_ack_listener();
        channel.clear_sent();

        // Acknowledge the retry as soon as it goes out.
        let retry = {
            let coordinator = coordinator.clone();
            let key = key.clone();
            tokio::spawn(async move {
                coordinator
                    .confirm_update(&scene("intro"), &key, SceneMeta::new())
                    .await
            })
        };

        while channel.sent_count() == 0 {
            time::sleep(Duration::from_millis(1)).await;
        }
        channel.acknowledge(&key);

        retry.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn duplicate_update_is_refused_with_warning() {
        let channel = MockChannel::new();
        let (coordinator, sink) = coordinator(&channel, SyncConfig::default());
        let key = source("intro.scene");

        let in_flight = {
            let coordinator = coordinator.clone();
            let key = key.clone();
            tokio::spawn(async move {
                coordinator
                    .confirm_update(&scene("intro"), &key, SceneMeta::new())
                    .await
            })
        };

        while !coordinator.has_pending(&key) {
            time::sleep(Duration::from_millis(1)).await;
        }

        // Second update for the same source: warned, dropped, first untouched.
        coordinator
            .confirm_update(&scene("intro"), &key, SceneMeta::new())
            .await
            .unwrap();

        assert_eq!(channel.sent_count(), 1);
        assert_eq!(sink.warnings().len(), 1);
        assert!(sink.warnings()[0].contains("intro"));
        assert!(coordinator.has_pending(&key));

        coordinator.handle_ack(&MetaAck { source: key });
        in_flight.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn stale_ack_is_ignored() {
        let channel = MockChannel::new();
        let (coordinator, sink) = coordinator(&channel, SyncConfig::default());

        coordinator.handle_ack(&MetaAck {
            source: source("never-sent.scene"),
        });

        assert_eq!(coordinator.pending_count(), 0);
        assert!(sink.warnings().is_empty());
        assert!(sink.errors().is_empty());
    }

    #[tokio::test]
    async fn distinct_sources_do_not_serialize() {
        let channel = MockChannel::new().auto_ack();
        let (coordinator, sink) = coordinator(&channel, SyncConfig::default());
        let _listener = coordinator.spawn_ack_listener();

        coordinator
            .confirm_update(&scene("intro"), &source("intro.scene"), SceneMeta::new())
            .await
            .unwrap();
        coordinator
            .confirm_update(&scene("outro"), &source("outro.scene"), SceneMeta::new())
            .await
            .unwrap();

        assert_eq!(channel.sent_count(), 2);
        assert!(sink.warnings().is_empty());
    }

    #[tokio::test]
    async fn clones_share_the_registry() {
        let channel = MockChannel::new();
        let (coordinator, sink) = coordinator(&channel, SyncConfig::default());
        let clone = coordinator.clone();
        let key = source("intro.scene");

        let in_flight = {
            let coordinator = coordinator.clone();
            let key = key.clone();
            tokio::spawn(async move {
                coordinator
                    .confirm_update(&scene("intro"), &key, SceneMeta::new())
                    .await
            })
        };

        while !clone.has_pending(&key) {
            time::sleep(Duration::from_millis(1)).await;
        }

        clone
            .confirm_update(&scene("intro"), &key, SceneMeta::new())
            .await
            .unwrap();
        assert_eq!(sink.warnings().len(), 1);

        clone.handle_ack(&MetaAck { source: key });
        in_flight.await.unwrap().unwrap();
    }
}
