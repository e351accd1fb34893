//! # Snapshot Store
//!
//! Holds the current `StateSnapshot` and publishes a new one on every
//! mutation. Consumers never see a half-applied change: each mutation builds
//! a fresh snapshot and swaps the `Arc` in one step.
//!
//! Subscriptions are `tokio::sync::watch` receivers. Dropping a receiver
//! unsubscribes it, and a slow subscriber only ever sees the latest value,
//! which is exactly the coalescing the menu engine wants.

use std::sync::Arc;

use log::debug;
use tokio::sync::watch;

use crate::core::intent::{Intent, update};
use crate::core::state::StateSnapshot;

/// Anything that can hand out immutable state snapshots.
pub trait SnapshotSource {
    /// Subscribe to snapshot changes. Drop the receiver to unsubscribe.
    fn subscribe(&self) -> watch::Receiver<Arc<StateSnapshot>>;

    /// The latest snapshot.
    fn snapshot(&self) -> Arc<StateSnapshot>;
}

pub struct Store {
    tx: watch::Sender<Arc<StateSnapshot>>,
}

impl Store {
    pub fn new(initial: StateSnapshot) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    /// Apply an intent. Returns true if a new snapshot was published.
    pub fn dispatch(&self, intent: &Intent) -> bool {
        debug!("Store received {}", intent.kind());
        self.apply(|state| update(state, intent))
    }

    /// Apply an arbitrary host-side mutation (window focus, geometry).
    ///
    /// No snapshot is published when the mutation leaves the state unchanged,
    /// so subscribers are never woken for no-ops.
    pub fn apply(&self, mutate: impl FnOnce(&mut StateSnapshot)) -> bool {
        self.tx.send_if_modified(|current| {
            let mut next = (**current).clone();
            mutate(&mut next);
            next.version = current.version;
            if next == **current {
                return false;
            }
            next.version = current.version + 1;
            debug!("Publishing snapshot version {}", next.version);
            *current = Arc::new(next);
            true
        })
    }
}

impl SnapshotSource for Store {
    fn subscribe(&self) -> watch::Receiver<Arc<StateSnapshot>> {
        self.tx.subscribe()
    }

    fn snapshot(&self) -> Arc<StateSnapshot> {
        Arc::clone(&self.tx.borrow())
    }
}
