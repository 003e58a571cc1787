//! Status model for tracked pins.
//!
//! Two views of "is this pinned": [`TrackerStatus`] is the cluster's own
//! tracker state for a cid on a peer, [`DaemonPinStatus`] is what the
//! content daemon underneath that peer reports. [`PinInfo`] and
//! [`GlobalPinInfo`] aggregate tracker states for status queries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{Cid, PeerId};

/// Tracker state of a cid on a single cluster peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerStatus {
    /// Sentinel; a healthy tracker never reports this.
    Bug,
    /// The cluster peer is offline or not responding.
    ClusterError,
    /// An error occurred pinning.
    PinError,
    /// An error occurred unpinning.
    UnpinError,
    Pinned,
    Pinning,
    Unpinning,
    Unpinned,
    /// Tracked by the cluster but allocated to other peers.
    Remote,
}

impl TrackerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackerStatus::Bug => "bug",
            TrackerStatus::ClusterError => "cluster_error",
            TrackerStatus::PinError => "pin_error",
            TrackerStatus::UnpinError => "unpin_error",
            TrackerStatus::Pinned => "pinned",
            TrackerStatus::Pinning => "pinning",
            TrackerStatus::Unpinning => "unpinning",
            TrackerStatus::Unpinned => "unpinned",
            TrackerStatus::Remote => "remote",
        }
    }

    /// Parse the string form; unknown strings map to [`TrackerStatus::Bug`].
    pub fn parse(s: &str) -> Self {
        match s {
            "cluster_error" => TrackerStatus::ClusterError,
            "pin_error" => TrackerStatus::PinError,
            "unpin_error" => TrackerStatus::UnpinError,
            "pinned" => TrackerStatus::Pinned,
            "pinning" => TrackerStatus::Pinning,
            "unpinning" => TrackerStatus::Unpinning,
            "unpinned" => TrackerStatus::Unpinned,
            "remote" => TrackerStatus::Remote,
            _ => TrackerStatus::Bug,
        }
    }
}

impl std::fmt::Display for TrackerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pin state reported by the content daemon behind a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaemonPinStatus {
    /// Sentinel for unparseable daemon output.
    Bug,
    Error,
    Direct,
    Recursive,
    Indirect,
    Unpinned,
}

impl DaemonPinStatus {
    /// Parse the daemon's string form; unknown strings map to `Bug`.
    pub fn parse(s: &str) -> Self {
        match s {
            "direct" => DaemonPinStatus::Direct,
            "recursive" => DaemonPinStatus::Recursive,
            "indirect" => DaemonPinStatus::Indirect,
            _ => DaemonPinStatus::Bug,
        }
    }

    /// True when the daemon actually holds the content itself.
    pub fn is_pinned(self) -> bool {
        matches!(self, DaemonPinStatus::Direct | DaemonPinStatus::Recursive)
    }
}

/// Tracker status of one cid on one peer, with the last transition time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinInfo {
    pub cid: Cid,
    pub peer: PeerId,
    pub status: TrackerStatus,
    pub updated_at: DateTime<Utc>,
    /// Last error message, empty when none.
    #[serde(default)]
    pub error: String,
}

/// Cluster-wide status of a cid, indexed by peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalPinInfo {
    pub cid: Cid,
    pub peer_map: HashMap<PeerId, PinInfo>,
}

/// Raised when a peer's latest metric of some kind lapses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub peer: PeerId,
    pub metric_kind: String,
}
