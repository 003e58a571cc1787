//! Allocation error types.

use thiserror::Error;

use pingrid_core::{Cid, PeerId};
use pingrid_monitor::MonitorError;

use crate::allocator::AllocatorError;

/// Result type alias for allocation calls.
pub type AllocationResult<T> = Result<T, AllocationError>;

/// Why an allocation was impossible.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The authoritative monitor could not be reached. Callers retry
    /// with backoff.
    #[error(transparent)]
    Monitor(#[from] MonitorError),

    /// Fewer healthy candidates than the replication floor requires.
    /// Not retryable without adding healthy peers or lowering the floor.
    #[error(
        "not enough peers to allocate {cid}: needed at least {needed}, wanted at most {wanted}, {} valid candidates",
        .valid.len()
    )]
    InsufficientCandidates {
        cid: Cid,
        /// How many peers were still needed to reach the floor.
        needed: usize,
        /// How many the ceiling would have admitted.
        wanted: usize,
        /// The healthy candidates that were considered.
        valid: Vec<PeerId>,
    },

    /// The allocation policy itself failed, surfaced unmodified.
    #[error(transparent)]
    Allocator(#[from] AllocatorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_candidates_message_carries_diagnostics() {
        let err = AllocationError::InsufficientCandidates {
            cid: Cid::new("QmContent"),
            needed: 2,
            wanted: 3,
            valid: vec![PeerId::new("QmP1")],
        };
        let msg = err.to_string();
        assert!(msg.contains("QmContent"));
        assert!(msg.contains("needed at least 2"));
        assert!(msg.contains("wanted at most 3"));
        assert!(msg.contains("1 valid candidates"));
    }

    #[test]
    fn monitor_error_surfaces_transparently() {
        let err = AllocationError::from(MonitorError::NoLeader);
        assert_eq!(err.to_string(), MonitorError::NoLeader.to_string());
    }
}
