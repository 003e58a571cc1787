//! The allocator policy capability.

use std::collections::HashMap;

use thiserror::Error;

use pingrid_core::{Cid, Metric, PeerId};

/// Result type alias for policy invocations.
pub type AllocatorResult<T> = Result<T, AllocatorError>;

/// A failure inside an allocation policy, surfaced to the caller as-is.
#[derive(Debug, Error)]
#[error("allocation policy failed: {0}")]
pub struct AllocatorError(pub String);

/// Ranks candidate peers for a cid.
///
/// A policy is a pure function over the metrics it receives. It may veto
/// candidates by omitting them from the ranking and must never introduce
/// peers absent from its inputs. Metric values are opaque to the rest of
/// the cluster; their meaning is defined here and nowhere else.
pub trait PinAllocator: Send + Sync {
    /// The informer metric kind this policy interprets.
    fn metric_kind(&self) -> &str;

    /// Rank the candidate peers for `cid` in preference order, best
    /// first. `current` holds the metrics of peers already allocated to
    /// the cid, for policies that weigh existing placement.
    fn allocate(
        &self,
        cid: &Cid,
        current: &HashMap<PeerId, Metric>,
        candidates: &HashMap<PeerId, Metric>,
    ) -> AllocatorResult<Vec<PeerId>>;
}
