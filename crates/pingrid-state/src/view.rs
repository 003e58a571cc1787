//! Read-only views over the replicated pin set.
//!
//! Allocation only ever asks one question of the state: who currently
//! holds a cid. The answer is allowed to be stale and is never an error:
//! a missing pin, an uninitialized snapshot, or a failed read all answer
//! "nobody". Allocation is idempotent over re-reads, and the downstream
//! write commit fails loudly if the state is truly unavailable.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use pingrid_core::{Cid, PeerId};

use crate::store::PinStore;

/// Read-only view over the pin set.
pub trait PinView: Send + Sync {
    /// The currently persisted allocations for a cid, in allocation
    /// order. Empty when the pin is absent or the state is unavailable.
    fn current_allocations(&self, cid: &Cid) -> Vec<PeerId>;
}

impl PinView for PinStore {
    fn current_allocations(&self, cid: &Cid) -> Vec<PeerId> {
        match self.get_pin(cid) {
            Ok(Some(pin)) => pin.allocations,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(%cid, error = %e, "pin read failed, treating cid as unallocated");
                Vec::new()
            }
        }
    }
}

/// Cloneable handle to the consensus-managed state snapshot.
///
/// Starts empty. The consensus component installs a [`PinStore`] once
/// its snapshot is usable; until then every read answers "no one pins
/// this".
#[derive(Clone, Default)]
pub struct SharedState {
    inner: Arc<RwLock<Option<PinStore>>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the backing store.
    pub fn install(&self, store: PinStore) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(store);
            debug!("state snapshot installed");
        }
    }

    /// Whether a snapshot has been installed.
    pub fn is_ready(&self) -> bool {
        self.inner.read().map(|g| g.is_some()).unwrap_or(false)
    }
}

impl PinView for SharedState {
    fn current_allocations(&self, cid: &Cid) -> Vec<PeerId> {
        let guard = match self.inner.read() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        match guard.as_ref() {
            Some(store) => store.current_allocations(cid),
            None => {
                debug!(%cid, "state snapshot not ready, treating cid as unallocated");
                Vec::new()
            }
        }
    }
}
