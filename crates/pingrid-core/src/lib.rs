//! pingrid-core — domain types shared across the pingrid cluster.
//!
//! Holds the data model every other crate consumes: peer and content
//! identities, pins, informer metrics, the tracked-pin status model, and
//! the wire (serialized) forms exchanged over RPC and persisted by the
//! state store.
//!
//! The native types here are what the cluster logic operates on. The
//! `wire` module bridges them to their JSON forms; all values must be
//! validated before the native types are constructed from them.

pub mod ids;
pub mod metric;
pub mod pin;
pub mod status;
pub mod wire;

pub use ids::{Cid, PeerId};
pub use metric::Metric;
pub use pin::Pin;
pub use status::{Alert, DaemonPinStatus, GlobalPinInfo, PinInfo, TrackerStatus};
pub use wire::{MetricSerial, PinSerial, WireError};
