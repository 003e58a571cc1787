//! Peer and content identifiers.
//!
//! Both are opaque newtypes over their canonical string forms: peers use
//! the base58 multihash derived from their public key, content uses the
//! self-describing cid string. The cluster never looks inside either; it
//! only compares, hashes, and prints them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a cluster peer.
///
/// Equality and hashing are by value, so peer ids are usable as keys in
/// any collection. The canonical encoding round-trips unchanged through
/// serialization. A live peer always has a non-empty id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    /// Wrap a canonical peer id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the sentinel empty id, which no live peer carries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Content identifier: a self-describing hash naming an immutable object.
///
/// Immutable once constructed; the canonical string form is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(String);

impl Cid {
    /// Wrap a canonical cid string.
    pub fn new(cid: impl Into<String>) -> Self {
        Self(cid.into())
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cid {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
