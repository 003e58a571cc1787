//! Monitor error types.

use thiserror::Error;

use pingrid_core::PeerId;

/// Result type alias for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors that can occur fetching metrics.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The authoritative monitor could not be located. Retryable once
    /// the cluster elects a leader.
    #[error("cannot determine the authoritative metrics monitor")]
    NoLeader,

    /// The query to the authoritative monitor failed in transit.
    #[error("metrics query to {peer} failed: {reason}")]
    Rpc { peer: PeerId, reason: String },
}
