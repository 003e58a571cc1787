//! redb table definitions for the pin store.

use redb::TableDefinition;

/// Pins keyed by the cid's canonical string form, values JSON-serialized
/// wire pins.
pub const PINS: TableDefinition<&str, &[u8]> = TableDefinition::new("pins");
