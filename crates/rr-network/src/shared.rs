//! Process-wide handle to the current network snapshot.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::info;

use crate::network::NetworkSnapshot;

/// Shared, swappable reference to the live [`NetworkSnapshot`].
///
/// Readers call [`current`](Self::current), which clones the inner `Arc`
/// under a read lock and releases the lock before returning.  A request
/// therefore pins one snapshot for its whole lifetime and never holds the
/// lock while searching or calling the predictor.  A refresh builds a new
/// snapshot off to the side and swaps it in with [`replace`](Self::replace);
/// requests already running keep the old one until they finish.
pub struct SharedSnapshot {
    inner:      RwLock<Arc<NetworkSnapshot>>,
    generation: AtomicU64,
}

impl SharedSnapshot {
    pub fn new(snapshot: NetworkSnapshot) -> Self {
        Self {
            inner:      RwLock::new(Arc::new(snapshot)),
            generation: AtomicU64::new(0),
        }
    }

    /// The snapshot live at the time of the call.
    pub fn current(&self) -> Arc<NetworkSnapshot> {
        Arc::clone(&self.inner.read())
    }

    /// Swap in a freshly built snapshot and return the one it replaced.
    pub fn replace(&self, snapshot: NetworkSnapshot) -> Arc<NetworkSnapshot> {
        let next = Arc::new(snapshot);
        let (nodes, segments) = (next.node_count(), next.segment_count());
        let previous = std::mem::replace(&mut *self.inner.write(), next);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(generation, nodes, segments, "network snapshot replaced");
        previous
    }

    /// Number of completed `replace` calls.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl From<NetworkSnapshot> for SharedSnapshot {
    fn from(snapshot: NetworkSnapshot) -> Self {
        Self::new(snapshot)
    }
}
