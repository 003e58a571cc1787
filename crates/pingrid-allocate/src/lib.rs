//! pingrid-allocate — deciding which peers hold which cid.
//!
//! The allocation engine is invoked on every pin, re-pin, and rebalance.
//! It reads the current allocations from the consensus-backed pin set,
//! fetches the latest informer metrics from the authoritative monitor,
//! partitions peers by health, and either keeps the allocation as-is,
//! shrinks it, or asks the configured [`PinAllocator`] policy to rank
//! fresh candidates for an expansion.
//!
//! The engine is an advisory planner: it owns no state across calls and
//! accepts snapshot skew. The serializing authority is the consensus
//! commit downstream of every decision.
//!
//! # Components
//!
//! - **`engine`** — the decision algorithm
//! - **`allocator`** — the pluggable policy capability
//! - **`policies`** — concrete policies (free space, pin count, random)

pub mod allocator;
pub mod engine;
pub mod error;
pub mod policies;

pub use allocator::{AllocatorError, AllocatorResult, PinAllocator};
pub use engine::AllocationEngine;
pub use error::{AllocationError, AllocationResult};
pub use policies::{FreeSpace, PinCount, Random};
