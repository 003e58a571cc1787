//! Concrete allocation policies.
//!
//! Each policy interprets one informer metric kind. The numeric ones
//! parse metric values as unsigned decimal integers and veto any peer
//! whose value does not parse; the random one ignores values entirely.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use tracing::debug;

use pingrid_core::{Cid, Metric, PeerId};

use crate::allocator::{AllocatorResult, PinAllocator};

/// Sort direction for numeric policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Ascending,
    Descending,
}

/// Rank candidates by their numeric metric value.
///
/// Peers whose value fails to parse are vetoed. Ties break on peer id
/// so rankings are stable across invocations.
fn rank_numeric(candidates: &HashMap<PeerId, Metric>, order: Order) -> Vec<PeerId> {
    let mut scored: Vec<(u64, &PeerId)> = candidates
        .iter()
        .filter_map(|(peer, metric)| {
            match metric.value.trim().parse::<u64>() {
                Ok(value) => Some((value, peer)),
                Err(_) => {
                    debug!(%peer, value = %metric.value, "unparseable metric value, vetoing peer");
                    None
                }
            }
        })
        .collect();

    scored.sort_by(|a, b| match order {
        Order::Ascending => a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)),
        Order::Descending => b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)),
    });

    scored.into_iter().map(|(_, peer)| peer.clone()).collect()
}

/// Prefer peers with the most free storage.
///
/// Interprets `"freespace"` values as free bytes, descending.
#[derive(Debug, Default)]
pub struct FreeSpace;

impl PinAllocator for FreeSpace {
    fn metric_kind(&self) -> &str {
        "freespace"
    }

    fn allocate(
        &self,
        _cid: &Cid,
        _current: &HashMap<PeerId, Metric>,
        candidates: &HashMap<PeerId, Metric>,
    ) -> AllocatorResult<Vec<PeerId>> {
        Ok(rank_numeric(candidates, Order::Descending))
    }
}

/// Prefer peers holding the fewest pins.
///
/// Interprets `"numpin"` values as pin counts, ascending.
#[derive(Debug, Default)]
pub struct PinCount;

impl PinAllocator for PinCount {
    fn metric_kind(&self) -> &str {
        "numpin"
    }

    fn allocate(
        &self,
        _cid: &Cid,
        _current: &HashMap<PeerId, Metric>,
        candidates: &HashMap<PeerId, Metric>,
    ) -> AllocatorResult<Vec<PeerId>> {
        Ok(rank_numeric(candidates, Order::Ascending))
    }
}

/// Spread pins uniformly at random.
///
/// Still consumes the `"ping"` liveness metric so that only peers with a
/// fresh reading are candidates; the values themselves are ignored.
#[derive(Debug, Default)]
pub struct Random;

impl PinAllocator for Random {
    fn metric_kind(&self) -> &str {
        "ping"
    }

    fn allocate(
        &self,
        _cid: &Cid,
        _current: &HashMap<PeerId, Metric>,
        candidates: &HashMap<PeerId, Metric>,
    ) -> AllocatorResult<Vec<PeerId>> {
        let mut peers: Vec<PeerId> = candidates.keys().cloned().collect();
        peers.shuffle(&mut rand::thread_rng());
        Ok(peers)
    }
}
