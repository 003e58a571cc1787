//! pingrid-state — the replicated pin set.
//!
//! Backed by [redb](https://docs.rs/redb). Pins are JSON-serialized (in
//! their wire form) into a single `&str → &[u8]` table keyed by the
//! cid's canonical string.
//!
//! The store itself is plumbing; the contract the rest of the cluster
//! cares about is [`PinView`]: a read-only answer to "who currently
//! holds this cid", which never errors. [`SharedState`] is the handle
//! the consensus component fills in once its snapshot is usable, and
//! which reads as empty until then.

pub mod error;
pub mod store;
pub mod tables;
pub mod view;

pub use error::{StateError, StateResult};
pub use store::PinStore;
pub use view::{PinView, SharedState};
