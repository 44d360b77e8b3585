// src/stats/cell.rs

use arc_swap::ArcSwap;
use std::sync::Arc;

use super::Snapshot;

/// Single-writer, many-reader holder of the published snapshot.
///
/// `load` never blocks and always returns a whole snapshot; `publish` swaps
/// the pointer in one step. Clones share the same underlying value.
#[derive(Clone)]
pub struct SnapshotCell {
    inner: Arc<ArcSwap<Snapshot>>,
}

impl SnapshotCell {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// The snapshot currently published.
    pub fn load(&self) -> Arc<Snapshot> {
        self.inner.load_full()
    }

    /// Replace the published snapshot, returning the one it superseded.
    pub(crate) fn publish(&self, next: Arc<Snapshot>) -> Arc<Snapshot> {
        self.inner.swap(next)
    }
}

impl Default for SnapshotCell {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

impl std::fmt::Debug for SnapshotCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snap = self.load();
        f.debug_struct("SnapshotCell")
            .field("rows", &snap.len())
            .field("refreshed_at", &snap.refreshed_at)
            .finish()
    }
}
