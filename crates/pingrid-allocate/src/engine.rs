//! The allocation engine.
//!
//! Finds the peers that should hold a cid, constrained by the pin's
//! replication factor bounds. Each call is a straight-line computation
//! over two snapshots read at call time (current allocations, latest
//! metrics) plus one policy invocation; the engine keeps nothing between
//! calls and is safe to call from any task.

use std::collections::HashMap;

use tracing::{debug, error, info};

use pingrid_core::{Cid, Metric, PeerId};
use pingrid_monitor::MetricSource;
use pingrid_state::PinView;

use crate::allocator::PinAllocator;
use crate::error::{AllocationError, AllocationResult};

/// Decides pin placements against the state view, the authoritative
/// metric source, and the configured allocation policy.
///
/// Holds shared borrows of its collaborators; none of them owns the
/// others, and the engine owns nothing for longer than one call.
pub struct AllocationEngine<'a> {
    pins: &'a dyn PinView,
    metrics: &'a dyn MetricSource,
    allocator: &'a dyn PinAllocator,
}

impl<'a> AllocationEngine<'a> {
    pub fn new(
        pins: &'a dyn PinView,
        metrics: &'a dyn MetricSource,
        allocator: &'a dyn PinAllocator,
    ) -> Self {
        Self {
            pins,
            metrics,
            allocator,
        }
    }

    /// Find peers to allocate `cid` to, honoring `rpl_min..=rpl_max`.
    ///
    /// Callers must pass validated factors: `rpl_min > 0` and
    /// `rpl_max >= rpl_min`. Returns `None` when the current allocation
    /// already satisfies the bounds (no rewrite; churn moves data), or
    /// the new full allocation list otherwise. Retained current peers
    /// always come before newly selected ones, so callers can diff old
    /// against new by prefix.
    pub async fn allocate(
        &self,
        cid: &Cid,
        rpl_min: usize,
        rpl_max: usize,
        blacklist: &[PeerId],
    ) -> AllocationResult<Option<Vec<PeerId>>> {
        let current = self.pins.current_allocations(cid);
        let metrics = self
            .metrics
            .last_metrics(self.allocator.metric_kind())
            .await?;

        // Partition metrics between current peers and candidates, as
        // long as they are usable. Current peers without a usable metric
        // fall out entirely: the allocation reflects present health, not
        // historical membership.
        let mut current_metrics: HashMap<PeerId, Metric> = HashMap::new();
        let mut candidate_metrics: HashMap<PeerId, Metric> = HashMap::new();
        for metric in metrics {
            if metric.discard() || blacklist.contains(&metric.peer) {
                continue;
            }
            if current.contains(&metric.peer) {
                current_metrics.insert(metric.peer.clone(), metric);
            } else {
                candidate_metrics.insert(metric.peer.clone(), metric);
            }
        }

        // Current-valid peers keep the persisted allocation order, so
        // shrinks and prefix diffs are deterministic.
        let current_valid: Vec<PeerId> = current
            .iter()
            .filter(|peer| current_metrics.contains_key(peer))
            .cloned()
            .collect();

        self.decide(
            cid,
            rpl_min,
            rpl_max,
            current_valid,
            &current_metrics,
            &candidate_metrics,
        )
    }

    fn decide(
        &self,
        cid: &Cid,
        rpl_min: usize,
        rpl_max: usize,
        current_valid: Vec<PeerId>,
        current_metrics: &HashMap<PeerId, Metric>,
        candidate_metrics: &HashMap<PeerId, Metric>,
    ) -> AllocationResult<Option<Vec<PeerId>>> {
        let n_current = current_valid.len();
        let n_candidates = candidate_metrics.len();
        // The minimum we still need and the maximum we would want.
        let needed = rpl_min as i64 - n_current as i64;
        let wanted = rpl_max as i64 - n_current as i64;

        debug!(%cid, current_valid = n_current, candidates_valid = n_candidates, needed, wanted, "allocating");

        if wanted < 0 {
            // Over-replicated: drop the tail of the current-valid list.
            // An allocator-aware drop (free the worst-scored peers
            // first) would also conform, but truncation is the baseline.
            let keep = (n_current as i64 + wanted) as usize;
            info!(%cid, keep, dropped = n_current - keep, "over replication ceiling, shrinking allocation");
            return Ok(Some(current_valid[..keep].to_vec()));
        }

        if needed <= 0 {
            // Within bounds. Rewriting for a better-scored peer would
            // move data for no invariant gain, so keep things as they are.
            debug!(%cid, "allocation within replication bounds, no change");
            return Ok(None);
        }

        if (n_candidates as i64) < needed {
            let mut valid: Vec<PeerId> = candidate_metrics.keys().cloned().collect();
            valid.sort();
            return Err(insufficient_candidates(cid, needed, wanted, valid));
        }

        // Enough candidates from here on. The policy ranks them by
        // preference and may veto some, so re-check the floor after.
        let ranked = self
            .allocator
            .allocate(cid, current_metrics, candidate_metrics)?;
        debug!(%cid, ranked = ?ranked, "policy ranking");

        if (ranked.len() as i64) < needed {
            return Err(insufficient_candidates(cid, needed, wanted, ranked));
        }

        let take = (wanted as usize).min(ranked.len());
        let mut allocation = current_valid;
        allocation.extend(ranked.into_iter().take(take));
        info!(%cid, added = take, total = allocation.len(), "allocation expanded");
        Ok(Some(allocation))
    }
}

/// Build (and log, peer by peer) the diagnostic under-allocation error.
fn insufficient_candidates(
    cid: &Cid,
    needed: i64,
    wanted: i64,
    valid: Vec<PeerId>,
) -> AllocationError {
    error!(%cid, needed, wanted, valid = valid.len(), "not enough candidates to allocate");
    for peer in &valid {
        error!(%cid, %peer, "valid candidate");
    }
    AllocationError::InsufficientCandidates {
        cid: cid.clone(),
        needed: needed as usize,
        wanted: wanted as usize,
        valid,
    }
}
