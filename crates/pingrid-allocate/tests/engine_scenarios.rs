//! End-to-end allocation scenarios driven through mock collaborators.
//!
//! Each scenario pins down one branch of the decision algorithm with
//! literal inputs and expected outputs, then a final section checks the
//! cross-cutting allocation invariants.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use pingrid_allocate::{AllocationEngine, AllocationError, AllocatorResult, PinAllocator};
use pingrid_core::{Cid, Metric, PeerId};
use pingrid_monitor::{MetricSource, MonitorError, MonitorResult};
use pingrid_state::PinView;

// ── Mock collaborators ─────────────────────────────────────────────

struct StaticPins(HashMap<Cid, Vec<PeerId>>);

impl StaticPins {
    fn empty() -> Self {
        Self(HashMap::new())
    }

    fn with(cid: &Cid, peers: Vec<PeerId>) -> Self {
        Self(HashMap::from([(cid.clone(), peers)]))
    }
}

impl PinView for StaticPins {
    fn current_allocations(&self, cid: &Cid) -> Vec<PeerId> {
        self.0.get(cid).cloned().unwrap_or_default()
    }
}

struct StaticMetrics(Vec<Metric>);

#[async_trait]
impl MetricSource for StaticMetrics {
    async fn last_metrics(&self, _kind: &str) -> MonitorResult<Vec<Metric>> {
        Ok(self.0.clone())
    }
}

struct LeaderlessMetrics;

#[async_trait]
impl MetricSource for LeaderlessMetrics {
    async fn last_metrics(&self, _kind: &str) -> MonitorResult<Vec<Metric>> {
        Err(MonitorError::NoLeader)
    }
}

/// Returns a scripted ranking and records the candidate set it was shown.
struct ScriptedPolicy {
    ranking: Vec<PeerId>,
    seen_candidates: Mutex<Vec<Vec<PeerId>>>,
}

impl ScriptedPolicy {
    fn returning(ranking: &[&str]) -> Self {
        Self {
            ranking: peers(ranking),
            seen_candidates: Mutex::new(Vec::new()),
        }
    }

    fn last_seen_candidates(&self) -> Vec<PeerId> {
        self.seen_candidates
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

impl PinAllocator for ScriptedPolicy {
    fn metric_kind(&self) -> &str {
        "freespace"
    }

    fn allocate(
        &self,
        _cid: &Cid,
        _current: &HashMap<PeerId, Metric>,
        candidates: &HashMap<PeerId, Metric>,
    ) -> AllocatorResult<Vec<PeerId>> {
        let mut seen: Vec<PeerId> = candidates.keys().cloned().collect();
        seen.sort();
        self.seen_candidates.lock().unwrap().push(seen);
        Ok(self.ranking.clone())
    }
}

// ── Fixtures ───────────────────────────────────────────────────────

fn cid() -> Cid {
    Cid::new("QmScenarioContent")
}

fn peers(ids: &[&str]) -> Vec<PeerId> {
    ids.iter().map(|p| PeerId::new(*p)).collect()
}

/// A usable metric: valid, expiring one hour from now.
fn usable(peer: &str) -> Metric {
    let mut m = Metric::new("freespace", PeerId::new(peer), "1024");
    m.set_ttl_secs(3600);
    m
}

fn expired(peer: &str) -> Metric {
    let mut m = usable(peer);
    m.expire = Some(Utc::now() - chrono::Duration::seconds(1));
    m
}

fn usable_all(ids: &[&str]) -> Vec<Metric> {
    ids.iter().map(|p| usable(p)).collect()
}

// ── Scenarios ──────────────────────────────────────────────────────

#[tokio::test]
async fn s1_fresh_pin_with_enough_candidates() {
    let pins = StaticPins::empty();
    let metrics = StaticMetrics(usable_all(&["P1", "P2", "P3", "P4", "P5"]));
    let policy = ScriptedPolicy::returning(&["P3", "P1", "P5", "P2", "P4"]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let result = engine.allocate(&cid(), 2, 3, &[]).await.unwrap().unwrap();
    assert_eq!(result, peers(&["P3", "P1", "P5"]));
}

#[tokio::test]
async fn s2_under_replicated_with_one_stale_current_peer() {
    let pins = StaticPins::with(&cid(), peers(&["P1", "P2"]));
    let metrics = StaticMetrics(vec![
        usable("P1"),
        expired("P2"),
        usable("P3"),
        usable("P4"),
        usable("P5"),
    ]);
    let policy = ScriptedPolicy::returning(&["P4", "P3", "P5"]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let result = engine.allocate(&cid(), 3, 3, &[]).await.unwrap().unwrap();
    // P2 is dropped as not current-valid; need=2, take 2 from the ranking.
    assert_eq!(result, peers(&["P1", "P4", "P3"]));
}

#[tokio::test]
async fn s3_within_bounds_is_a_no_op() {
    let pins = StaticPins::with(&cid(), peers(&["P1", "P2", "P3"]));
    let metrics = StaticMetrics(usable_all(&["P1", "P2", "P3"]));
    let policy = ScriptedPolicy::returning(&[]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let result = engine.allocate(&cid(), 2, 4, &[]).await.unwrap();
    assert!(result.is_none());
    // The policy is never consulted when nothing changes.
    assert!(policy.seen_candidates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn s4_over_replicated_shrinks_to_a_prefix() {
    let current = peers(&["P1", "P2", "P3", "P4"]);
    let pins = StaticPins::with(&cid(), current.clone());
    let metrics = StaticMetrics(usable_all(&["P1", "P2", "P3", "P4"]));
    let policy = ScriptedPolicy::returning(&[]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let result = engine.allocate(&cid(), 1, 2, &[]).await.unwrap().unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[..], current[..2]);
}

#[tokio::test]
async fn s5_insufficient_candidates_is_diagnostic() {
    let pins = StaticPins::empty();
    let metrics = StaticMetrics(vec![usable("P1")]);
    let policy = ScriptedPolicy::returning(&["P1"]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let err = engine.allocate(&cid(), 2, 3, &[]).await.unwrap_err();
    match err {
        AllocationError::InsufficientCandidates {
            cid: c,
            needed,
            wanted,
            valid,
        } => {
            assert_eq!(c, cid());
            assert_eq!(needed, 2);
            assert_eq!(wanted, 3);
            assert_eq!(valid, peers(&["P1"]));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn s6_blacklisted_peer_never_reaches_the_policy() {
    let pins = StaticPins::empty();
    let metrics = StaticMetrics(usable_all(&["P1", "P2", "P3"]));
    let policy = ScriptedPolicy::returning(&["P1", "P3"]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let result = engine
        .allocate(&cid(), 2, 2, &peers(&["P2"]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result, peers(&["P1", "P3"]));
    assert_eq!(policy.last_seen_candidates(), peers(&["P1", "P3"]));
}

// ── Failure semantics ──────────────────────────────────────────────

#[tokio::test]
async fn missing_leader_aborts_the_call() {
    let pins = StaticPins::empty();
    let metrics = LeaderlessMetrics;
    let policy = ScriptedPolicy::returning(&[]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let err = engine.allocate(&cid(), 1, 1, &[]).await.unwrap_err();
    assert!(matches!(
        err,
        AllocationError::Monitor(MonitorError::NoLeader)
    ));
}

// ── Boundary behaviors ─────────────────────────────────────────────

#[tokio::test]
async fn single_replica_with_exactly_one_candidate() {
    let pins = StaticPins::empty();
    let metrics = StaticMetrics(vec![usable("P1")]);
    let policy = ScriptedPolicy::returning(&["P1"]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let result = engine.allocate(&cid(), 1, 1, &[]).await.unwrap().unwrap();
    assert_eq!(result, peers(&["P1"]));
}

#[tokio::test]
async fn ceiling_equal_to_cluster_size_takes_everyone() {
    let pins = StaticPins::empty();
    let metrics = StaticMetrics(usable_all(&["P1", "P2", "P3"]));
    let policy = ScriptedPolicy::returning(&["P2", "P1", "P3"]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let result = engine.allocate(&cid(), 1, 3, &[]).await.unwrap().unwrap();
    assert_eq!(result, peers(&["P2", "P1", "P3"]));
}

#[tokio::test]
async fn metric_expiring_exactly_now_is_not_a_candidate() {
    let mut on_the_dot = usable("P2");
    on_the_dot.expire = Some(Utc::now());

    let pins = StaticPins::empty();
    let metrics = StaticMetrics(vec![usable("P1"), on_the_dot]);
    let policy = ScriptedPolicy::returning(&["P1"]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let err = engine.allocate(&cid(), 2, 2, &[]).await.unwrap_err();
    match err {
        AllocationError::InsufficientCandidates { valid, .. } => {
            assert_eq!(valid, peers(&["P1"]));
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ── Invariants ─────────────────────────────────────────────────────

/// Re-running against the state produced by the first decision is a no-op.
#[tokio::test]
async fn idempotent_once_the_decision_is_committed() {
    let metrics = StaticMetrics(usable_all(&["P1", "P2", "P3", "P4", "P5"]));
    let policy = ScriptedPolicy::returning(&["P3", "P1", "P5", "P2", "P4"]);

    let first = {
        let pins = StaticPins::empty();
        let engine = AllocationEngine::new(&pins, &metrics, &policy);
        engine.allocate(&cid(), 2, 3, &[]).await.unwrap().unwrap()
    };

    // Commit the first decision, then ask again.
    let pins = StaticPins::with(&cid(), first);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);
    let second = engine.allocate(&cid(), 2, 3, &[]).await.unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn expansion_keeps_current_valid_peers_as_the_prefix() {
    let pins = StaticPins::with(&cid(), peers(&["P5", "P1"]));
    let metrics = StaticMetrics(usable_all(&["P1", "P2", "P3", "P4", "P5"]));
    let policy = ScriptedPolicy::returning(&["P4", "P2", "P3"]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let result = engine.allocate(&cid(), 3, 4, &[]).await.unwrap().unwrap();

    // Prefix: the retained current-valid peers in persisted order.
    assert_eq!(result[..2], peers(&["P5", "P1"])[..]);
    // Bounds: rpl_min <= len <= rpl_max.
    assert!(result.len() >= 3 && result.len() <= 4);
    // Provenance: everyone else came from the policy ranking.
    for peer in &result[2..] {
        assert!(peers(&["P4", "P2", "P3"]).contains(peer));
    }
}

#[tokio::test]
async fn result_never_contains_blacklisted_or_stale_peers() {
    let pins = StaticPins::with(&cid(), peers(&["P1", "P6"]));
    let metrics = StaticMetrics(vec![
        usable("P1"),
        usable("P2"),
        usable("P3"),
        expired("P4"),
        usable("P5"),
        expired("P6"),
    ]);
    let policy = ScriptedPolicy::returning(&["P5", "P3"]);
    let engine = AllocationEngine::new(&pins, &metrics, &policy);

    let blacklist = peers(&["P2"]);
    let result = engine
        .allocate(&cid(), 3, 3, &blacklist)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result, peers(&["P1", "P5", "P3"]));
    for banned in ["P2", "P4", "P6"] {
        assert!(!result.contains(&PeerId::new(banned)));
    }
    // The policy only ever saw the healthy, unlisted candidates.
    assert_eq!(policy.last_seen_candidates(), peers(&["P3", "P5"]));
}
