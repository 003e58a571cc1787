//! Metric sources — where allocation gets its telemetry.
//!
//! [`MetricSource`] is the one contract the allocation engine consumes.
//! [`AuthoritativeSource`] is the production implementation: it resolves
//! the consensus leader and queries that peer's registry, failing the
//! call outright when no leader is known. [`MetricsRegistry`] itself
//! also implements the trait for single-peer deployments and tests.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use pingrid_core::{Metric, PeerId};

use crate::error::{MonitorError, MonitorResult};
use crate::registry::MetricsRegistry;

/// Fetches the last known metric of a kind for every peer.
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Last known metrics of `kind`, one per reporting peer, as seen by
    /// the authoritative monitor. The result may include peers that are
    /// offline, blacklisted, or unknown to the current cluster view;
    /// filtering is the caller's responsibility.
    async fn last_metrics(&self, kind: &str) -> MonitorResult<Vec<Metric>>;
}

/// Where the authoritative monitor currently lives.
///
/// Backed by the consensus engine in a replicated deployment.
pub trait LeaderView: Send + Sync {
    /// The current consensus leader, if one is known.
    fn leader(&self) -> Option<PeerId>;
}

/// Transport seam for querying a remote peer's metric registry.
#[async_trait]
pub trait MetricsRpc: Send + Sync {
    async fn last_metrics(&self, peer: &PeerId, kind: &str) -> MonitorResult<Vec<Metric>>;
}

/// Metric source that always queries the consensus leader's registry.
///
/// If this peer is the leader the local registry answers directly;
/// otherwise the query goes over [`MetricsRpc`]. With no known leader
/// the call fails with [`MonitorError::NoLeader`] rather than serving a
/// possibly stale local view.
pub struct AuthoritativeSource {
    local_peer: PeerId,
    local: Arc<MetricsRegistry>,
    leadership: Arc<dyn LeaderView>,
    rpc: Arc<dyn MetricsRpc>,
}

impl AuthoritativeSource {
    pub fn new(
        local_peer: PeerId,
        local: Arc<MetricsRegistry>,
        leadership: Arc<dyn LeaderView>,
        rpc: Arc<dyn MetricsRpc>,
    ) -> Self {
        Self {
            local_peer,
            local,
            leadership,
            rpc,
        }
    }
}

#[async_trait]
impl MetricSource for AuthoritativeSource {
    async fn last_metrics(&self, kind: &str) -> MonitorResult<Vec<Metric>> {
        let leader = self.leadership.leader().ok_or(MonitorError::NoLeader)?;
        if leader == self.local_peer {
            debug!(kind, "serving metrics from the local registry (leader)");
            return Ok(self.local.last_metrics(kind).await);
        }
        debug!(kind, %leader, "querying the leader's registry");
        self.rpc.last_metrics(&leader, kind).await
    }
}

#[async_trait]
impl MetricSource for MetricsRegistry {
    async fn last_metrics(&self, kind: &str) -> MonitorResult<Vec<Metric>> {
        Ok(MetricsRegistry::last_metrics(self, kind).await)
    }
}
