//! Wire forms of the domain types.
//!
//! These are the JSON shapes exchanged over RPC and written by the state
//! store. Cids travel as their canonical strings, peers as their base58
//! multihash encoding, timestamps as RFC3339 with nanosecond precision
//! in UTC.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{Cid, PeerId};
use crate::metric::Metric;
use crate::pin::{Pin, REPLICATE_EVERYWHERE};

/// Errors decoding a wire form into its native type.
#[derive(Debug, Error)]
pub enum WireError {
    /// The producer emitted a structurally malformed expiry timestamp.
    #[error("malformed metric expiry {0:?}: {1}")]
    Expire(String, chrono::ParseError),
}

/// Serialized form of [`Pin`].
///
/// The legacy form used `everywhere: true` in place of a replication
/// factor of -1. Decoding still honors it; encoding always emits
/// `replication_factor` explicitly and never writes the flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinSerial {
    pub cid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub allocations: Vec<String>,
    #[serde(default, skip_serializing)]
    pub everywhere: bool,
    #[serde(default)]
    pub replication_factor: i32,
}

impl From<&Pin> for PinSerial {
    fn from(pin: &Pin) -> Self {
        Self {
            cid: pin.cid.to_string(),
            name: pin.name.clone(),
            allocations: pin.allocations.iter().map(PeerId::to_string).collect(),
            everywhere: false,
            replication_factor: pin.replication_factor,
        }
    }
}

impl From<PinSerial> for Pin {
    fn from(s: PinSerial) -> Self {
        // Legacy form: everywhere=true with no explicit factor.
        let replication_factor = if s.replication_factor == 0 && s.everywhere {
            REPLICATE_EVERYWHERE
        } else {
            s.replication_factor
        };
        Self {
            cid: Cid::new(s.cid),
            name: s.name,
            allocations: s.allocations.into_iter().map(PeerId::new).collect(),
            replication_factor,
        }
    }
}

/// Serialized form of [`Metric`]. `expire` is empty when no expiry is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSerial {
    pub kind: String,
    pub peer: String,
    pub value: String,
    #[serde(default)]
    pub expire: String,
    pub valid: bool,
}

impl From<&Metric> for MetricSerial {
    fn from(m: &Metric) -> Self {
        Self {
            kind: m.kind.clone(),
            peer: m.peer.to_string(),
            value: m.value.clone(),
            expire: m
                .expire
                .map(|e| e.to_rfc3339_opts(SecondsFormat::Nanos, true))
                .unwrap_or_default(),
            valid: m.valid,
        }
    }
}

impl TryFrom<MetricSerial> for Metric {
    type Error = WireError;

    fn try_from(s: MetricSerial) -> Result<Self, WireError> {
        let expire = if s.expire.is_empty() {
            None
        } else {
            let parsed = DateTime::parse_from_rfc3339(&s.expire)
                .map_err(|e| WireError::Expire(s.expire.clone(), e))?;
            Some(parsed.with_timezone(&Utc))
        };
        Ok(Self {
            kind: s.kind,
            peer: PeerId::new(s.peer),
            value: s.value,
            expire,
            valid: s.valid,
        })
    }
}
