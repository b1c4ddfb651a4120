//! core::meta::store
//!
//! In-memory metadata store for one scene.
//!
//! # Architecture
//!
//! A `MetaStore` owns the current [`SceneMeta`] value for one named scene
//! and applies the local-vs-remote update policy:
//!
//! - every write commits locally first, synchronously, and is observable
//!   through [`MetaStore::subscribe`] before any remote interaction;
//! - confirmed writes then hand the full current value to the
//!   [`SyncCoordinator`], which sends it to the development host and
//!   awaits acknowledgment;
//! - a write that fails or times out remotely never rolls back the local
//!   merge.
//!
//! Stores are cheap to clone; clones share the same value and the same
//! coordinator.
//!
//! # Example
//!
//! ```ignore
//! use stagelink::core::meta::schema::MetaPatch;
//! use stagelink::core::meta::store::MetaStore;
//! use stagelink::core::types::{SceneName, SourceBinding, SourceKey};
//! use serde_json::json;
//!
//! let store = MetaStore::new(
//!     SceneName::new("intro")?,
//!     SourceBinding::Bound(SourceKey::new("scenes/intro.scene")?),
//!     coordinator,
//!     sink,
//! );
//!
//! // Visible immediately, confirmed in the background.
//! store.set_and_forget(MetaPatch::new().with_field("seed", json!(7)));
//! assert_eq!(store.data().field("seed"), Some(&json!(7)));
//! ```

use std::sync::Arc;

use tokio::sync::watch;

use super::schema::{MetaPatch, SceneMeta};
use crate::core::types::{SceneName, SourceBinding};
use crate::events::ValueCell;
use crate::report::LogSink;
use crate::sync::{SyncCoordinator, SyncError};

/// In-memory metadata store for one scene.
#[derive(Clone)]
pub struct MetaStore {
    name: SceneName,
    binding: SourceBinding,
    data: ValueCell<SceneMeta>,
    sync: SyncCoordinator,
    sink: Arc<dyn LogSink>,
}

impl MetaStore {
    /// Create a store for `name`, bound per `binding`.
    ///
    /// The initial value is [`SceneMeta::new`]: the current protocol
    /// version and no fields.
    pub fn new(
        name: SceneName,
        binding: SourceBinding,
        sync: SyncCoordinator,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            name,
            binding,
            data: ValueCell::new(SceneMeta::new()),
            sync,
            sink,
        }
    }

    /// Create a store that never synchronizes remotely.
    pub fn detached(name: SceneName, sync: SyncCoordinator, sink: Arc<dyn LogSink>) -> Self {
        Self::new(name, SourceBinding::Detached, sync, sink)
    }

    /// The scene this store belongs to.
    pub fn name(&self) -> &SceneName {
        &self.name
    }

    /// How this store is bound to its backing source.
    pub fn binding(&self) -> &SourceBinding {
        &self.binding
    }

    /// Get the current metadata value.
    pub fn data(&self) -> SceneMeta {
        self.data.get()
    }

    /// Subscribe to metadata changes.
    ///
    /// Every committed write is observable here, including the local merge
    /// of a confirmed write before (and regardless of) its remote outcome.
    pub fn subscribe(&self) -> watch::Receiver<SceneMeta> {
        self.data.subscribe()
    }

    /// Apply a partial update without waiting for confirmation.
    ///
    /// The merge is committed synchronously and is observable as soon as
    /// this returns. The remote confirmation runs in the background; its
    /// eventual failure is reported to the [`LogSink`], never to the
    /// caller.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_and_forget(&self, patch: MetaPatch) {
        let snapshot = self.merge(patch);
        let store = self.clone();
        tokio::spawn(async move {
            if let Err(e) = store.confirm(snapshot).await {
                store.sink.error(&e.to_string());
            }
        });
    }

    /// Apply a partial update and await the host's acknowledgment.
    ///
    /// The merge is committed synchronously before any remote interaction,
    /// so readers never wait on the round-trip. The remote step is skipped
    /// (and this resolves immediately) when synchronization is disabled,
    /// when the store is [`Detached`](SourceBinding::Detached), or - after
    /// a warning - when the backing source is still
    /// [`Unresolved`](SourceBinding::Unresolved) or an update for the same
    /// source is already in flight.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::AckTimeout`] if the host does not acknowledge
    /// within the configured timeout. The local merge is kept.
    pub async fn set(&self, patch: MetaPatch) -> Result<(), SyncError> {
        let snapshot = self.merge(patch);
        self.confirm(snapshot).await
    }

    /// Replace the current value wholesale with metadata from a file.
    ///
    /// Unlike [`set`](Self::set), nothing is merged: prior fields are
    /// discarded. The value is normalized first, so a missing or zero
    /// version becomes the current protocol version. No acknowledgment
    /// round-trip is involved.
    pub fn load(&self, mut meta: SceneMeta) {
        meta.normalize();
        self.data.set(meta);
    }

    /// Merge `patch` into the current value and return the post-merge
    /// snapshot that a confirmed write puts on the wire.
    fn merge(&self, patch: MetaPatch) -> SceneMeta {
        self.data.update(|meta| meta.apply(patch));
        self.data.get()
    }

    async fn confirm(&self, data: SceneMeta) -> Result<(), SyncError> {
        if !self.sync.is_enabled() {
            return Ok(());
        }

        match &self.binding {
            SourceBinding::Detached => Ok(()),
            SourceBinding::Unresolved => {
                self.sink.warn(&format!(
                    "the meta source for {} is missing; make sure the file declaring \
                     the scene matches the scene name",
                    self.name
                ));
                Ok(())
            }
            SourceBinding::Bound(source) => self.sync.confirm_update(&self.name, source, data).await,
        }
    }
}
