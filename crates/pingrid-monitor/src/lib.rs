//! pingrid-monitor — the time-windowed telemetry fabric.
//!
//! Peers gossip informer metrics (free space, pin counts) with a TTL;
//! the monitor keeps the latest reading per `(kind, peer)` and raises
//! alerts when one lapses. Allocation consumes metrics exclusively
//! through [`MetricSource`], whose authoritative implementation routes
//! every query to the consensus leader's registry: deciding against a
//! stale or partitioned monitor would silently misallocate, so when no
//! leader is known the call fails instead.
//!
//! The gossip transport itself lives elsewhere; this crate only defines
//! the [`MetricsRpc`] seam it plugs into.

pub mod error;
pub mod registry;
pub mod source;

pub use error::{MonitorError, MonitorResult};
pub use registry::MetricsRegistry;
pub use source::{AuthoritativeSource, LeaderView, MetricSource, MetricsRpc};
