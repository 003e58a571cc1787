//! Pins: the durable intent that content be held by the cluster.

use crate::ids::{Cid, PeerId};

/// Replication factor meaning "every peer in the cluster".
pub const REPLICATE_EVERYWHERE: i32 = -1;

/// A tracked content object and the peers responsible for it.
///
/// `allocations` carries no duplicates and, once the pin is fully
/// allocated, its length sits between 1 and `replication_factor` unless
/// the factor is [`REPLICATE_EVERYWHERE`]. Pins are created by pin
/// requests, mutated only through the consensus-backed state store, and
/// destroyed by unpins.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub cid: Cid,
    /// Human-readable label, possibly empty.
    pub name: String,
    /// Peers holding (or told to hold) a replica, in allocation order.
    pub allocations: Vec<PeerId>,
    pub replication_factor: i32,
}

impl Pin {
    /// A pin carrying only a cid, with defaults for everything else.
    pub fn with_cid(cid: Cid) -> Self {
        Self {
            cid,
            name: String::new(),
            allocations: Vec::new(),
            replication_factor: 0,
        }
    }

    /// Whether this pin targets every peer in the cluster.
    pub fn is_everywhere(&self) -> bool {
        self.replication_factor == REPLICATE_EVERYWHERE
    }
}
