//! Metrics registry — latest metric per (kind, peer).
//!
//! Each incoming reading replaces the previous one for its slot; there
//! is no history. Reads return whatever is latest, expired or not,
//! because callers (the allocation engine foremost) own the freshness
//! filtering. Expiry sweeps turn lapsed slots into [`Alert`]s.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use pingrid_core::{Alert, Metric, PeerId};

/// Tracks the latest metric of every kind for every peer.
#[derive(Default)]
pub struct MetricsRegistry {
    /// kind → peer → latest reading.
    latest: RwLock<HashMap<String, HashMap<PeerId, Metric>>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading, replacing any previous one for its (kind, peer).
    pub async fn record(&self, metric: Metric) {
        if metric.discard() {
            warn!(kind = %metric.kind, peer = %metric.peer, "recording an already-discardable metric");
        }
        let mut latest = self.latest.write().await;
        debug!(kind = %metric.kind, peer = %metric.peer, value = %metric.value, "metric recorded");
        latest
            .entry(metric.kind.clone())
            .or_default()
            .insert(metric.peer.clone(), metric);
    }

    /// The latest metric of `kind` for every peer that ever reported one.
    ///
    /// May include expired or invalid readings, and readings from peers
    /// that have since left the cluster; callers filter.
    pub async fn last_metrics(&self, kind: &str) -> Vec<Metric> {
        let latest = self.latest.read().await;
        let mut metrics: Vec<Metric> = latest
            .get(kind)
            .map(|by_peer| by_peer.values().cloned().collect())
            .unwrap_or_default();
        // Stable output order keeps downstream decisions reproducible.
        metrics.sort_by(|a, b| a.peer.cmp(&b.peer));
        metrics
    }

    /// The latest reading of `kind` from one peer, if any.
    pub async fn last_metric(&self, kind: &str, peer: &PeerId) -> Option<Metric> {
        let latest = self.latest.read().await;
        latest.get(kind).and_then(|by_peer| by_peer.get(peer)).cloned()
    }

    /// Remove lapsed readings and return one alert per removed slot.
    ///
    /// A slot alerts once per lapse: the entry is dropped, so the next
    /// sweep stays quiet until the peer reports again.
    pub async fn sweep_expired(&self) -> Vec<Alert> {
        let mut latest = self.latest.write().await;
        let mut alerts = Vec::new();
        for (kind, by_peer) in latest.iter_mut() {
            by_peer.retain(|peer, metric| {
                if metric.discard() {
                    alerts.push(Alert {
                        peer: peer.clone(),
                        metric_kind: kind.clone(),
                    });
                    false
                } else {
                    true
                }
            });
        }
        for alert in &alerts {
            warn!(peer = %alert.peer, kind = %alert.metric_kind, "metric expired");
        }
        alerts.sort_by(|a, b| a.peer.cmp(&b.peer));
        alerts
    }
}
