//! Informer metrics.
//!
//! A metric is a time-bounded opaque value a peer reports about itself
//! (free disk bytes, pin count, whatever the configured informer emits).
//! The cluster is agnostic to the value; only the allocation policy that
//! asked for the metric kind interprets it.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::ids::PeerId;

/// A single metric reading from one peer.
///
/// Each `(kind, peer)` pair has at most one latest value at any instant;
/// the monitor overwrites older readings. A metric without an expiry is
/// already expired.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Informer kind, e.g. `"freespace"` or `"numpin"`.
    pub kind: String,
    /// The peer this reading describes. Filled in by the cluster.
    pub peer: PeerId,
    /// Opaque scalar; the allocation policy defines its meaning.
    pub value: String,
    /// Absolute UTC expiry, nanosecond resolution. `None` means expired.
    pub expire: Option<DateTime<Utc>>,
    /// Set on construction; an invalid metric is discarded unread.
    pub valid: bool,
}

impl Metric {
    /// A valid metric with no expiry set yet.
    pub fn new(kind: impl Into<String>, peer: PeerId, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            peer,
            value: value.into(),
            expire: None,
            valid: true,
        }
    }

    /// Expire this metric the given number of whole seconds from now.
    pub fn set_ttl_secs(&mut self, seconds: u64) {
        self.set_ttl(Duration::from_secs(seconds));
    }

    /// Expire this metric `ttl` from now.
    pub fn set_ttl(&mut self, ttl: Duration) {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let exp = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(chrono::DateTime::<Utc>::MAX_UTC);
        self.expire = Some(exp);
    }

    /// Time left before this metric expires. Zero when unset or lapsed.
    pub fn ttl(&self) -> Duration {
        match self.expire {
            Some(exp) => (exp - Utc::now()).to_std().unwrap_or_default(),
            None => Duration::ZERO,
        }
    }

    /// Whether the expiry has passed. An expiry of exactly now counts as
    /// expired, as does a metric with no expiry set.
    pub fn expired(&self) -> bool {
        match self.expire {
            Some(exp) => Utc::now() >= exp,
            None => true,
        }
    }

    /// Whether this metric must be ignored: invalid or expired.
    pub fn discard(&self) -> bool {
        !self.valid || self.expired()
    }
}
