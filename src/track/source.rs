//! Latest-snapshot cell shared between the vision ingest path and every
//! session loop.
//!
//! Built on a `tokio::sync::watch` channel: publishing replaces the value
//! and wakes all subscribed session loops, `latest()` never blocks, and a
//! slow session simply observes the newest snapshot on its next wake
//! (at-most-one-behind, never a backlog).

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::track::snapshot::Snapshot;

/// Handle to the shared snapshot cell. Cheap to clone; all clones
/// publish to and read from the same cell.
#[derive(Clone)]
pub struct StateSource {
    tx: Arc<watch::Sender<Arc<Snapshot>>>,
}

impl StateSource {
    /// Create a source holding an empty snapshot. Subscribers are only
    /// woken once the first real snapshot is published.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Snapshot::default()));
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current snapshot and signal readiness to every
    /// session loop.
    pub fn publish(&self, snapshot: Snapshot) {
        debug!(timestamp = snapshot.timestamp, "snapshot published");
        self.tx.send_replace(Arc::new(snapshot));
    }

    /// Most recent snapshot, non-blocking.
    pub fn latest(&self) -> Arc<Snapshot> {
        self.tx.borrow().clone()
    }

    /// Readiness signal for a session loop. The receiver wakes once per
    /// publish and always observes the newest value.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }
}

impl Default for StateSource {
    fn default() -> Self {
        Self::new()
    }
}
