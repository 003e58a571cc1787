//! PinStore — redb-backed persistence for the pin set.
//!
//! Provides typed CRUD over pins. Values are stored in their wire form
//! (JSON `PinSerial`), so on-disk state stays readable by the same
//! tooling that speaks the RPC wire format, legacy pins included. The
//! store supports on-disk and in-memory backends (the latter for
//! testing and for followers that rebuild from the log).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use pingrid_core::{Cid, Pin, PinSerial};

use crate::error::{StateError, StateResult};
use crate::tables::PINS;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe pin store backed by redb.
#[derive(Clone)]
pub struct PinStore {
    db: Arc<Database>,
}

impl PinStore {
    /// Open (or create) a persistent pin store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "pin store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory pin store.
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory pin store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(PINS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Insert or update a pin.
    pub fn put_pin(&self, pin: &Pin) -> StateResult<()> {
        let key = pin.cid.to_string();
        let value = serde_json::to_vec(&PinSerial::from(pin)).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(PINS).map_err(map_err!(Table))?;
            table
                .insert(key.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(cid = %key, "pin stored");
        Ok(())
    }

    /// Get a pin by cid.
    pub fn get_pin(&self, cid: &Cid) -> StateResult<Option<Pin>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(PINS).map_err(map_err!(Table))?;
        match table.get(cid.as_str()).map_err(map_err!(Read))? {
            Some(guard) => {
                let serial: PinSerial =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(serial.into()))
            }
            None => Ok(None),
        }
    }

    /// List all pins.
    pub fn list_pins(&self) -> StateResult<Vec<Pin>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(PINS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let serial: PinSerial =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(serial.into());
        }
        Ok(results)
    }

    /// Delete a pin by cid. Returns true if it existed.
    pub fn delete_pin(&self, cid: &Cid) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(PINS).map_err(map_err!(Table))?;
            existed = table.remove(cid.as_str()).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%cid, existed, "pin deleted");
        Ok(existed)
    }
}
