//! events
//!
//! Current-value container with change subscription.
//!
//! # Design
//!
//! [`ValueCell`] is a thin wrapper over `tokio::sync::watch`: it always
//! holds a current value, and every committed write notifies subscribers.
//! Readers never wait; `get` returns a clone of the latest value. Slow
//! subscribers observe the latest value rather than every intermediate
//! one, which is exactly the semantics a current-value container wants.
//!
//! # Example
//!
//! ```
//! use stagelink::events::ValueCell;
//!
//! let cell = ValueCell::new(1);
//! let mut rx = cell.subscribe();
//!
//! cell.set(2);
//! assert_eq!(cell.get(), 2);
//! assert!(rx.has_changed().unwrap());
//! ```

use std::sync::Arc;

use tokio::sync::watch;

/// A shared current-value container.
///
/// Cheap to clone; all clones share the same underlying value and notify
/// the same subscribers.
#[derive(Clone)]
pub struct ValueCell<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> ValueCell<T> {
    /// Create a cell holding `initial`.
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.tx.borrow().clone()
    }

    /// Replace the current value and notify subscribers.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Modify the current value in place and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Subscribe to changes.
    ///
    /// The receiver sees the value as of subscription time and is marked
    /// changed on every committed write afterwards.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}
