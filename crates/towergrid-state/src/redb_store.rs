//! RedbPolicyStore — redb-backed policy state persistence.
//!
//! Values are JSON-serialized into redb's `&[u8]` value column. Every
//! update runs in a single write transaction, and redb allows only one
//! write transaction at a time, which makes the read-modify-write atomic.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use towergrid_core::TowerId;

use crate::error::{StateError, StateResult};
use crate::store::PolicyStore;
use crate::tables::POLICY_STATES;
use crate::types::PolicyState;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe policy store backed by redb.
#[derive(Clone)]
pub struct RedbPolicyStore {
    db: Arc<Database>,
}

impl RedbPolicyStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "policy store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store.
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory policy store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(POLICY_STATES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }
}

fn decode(bytes: &[u8]) -> StateResult<PolicyState> {
    serde_json::from_slice(bytes).map_err(map_err!(Deserialize))
}

impl PolicyStore for RedbPolicyStore {
    fn get(&self, tower: TowerId) -> StateResult<Option<PolicyState>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(POLICY_STATES).map_err(map_err!(Table))?;
        match table.get(tower.0).map_err(map_err!(Read))? {
            Some(guard) => Ok(Some(decode(guard.value())?)),
            None => Ok(None),
        }
    }

    fn put(&self, tower: TowerId, state: PolicyState) -> StateResult<()> {
        let value = serde_json::to_vec(&state).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(POLICY_STATES).map_err(map_err!(Table))?;
            table
                .insert(tower.0, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    fn update(
        &self,
        tower: TowerId,
        f: &mut dyn FnMut(Option<&PolicyState>) -> PolicyState,
    ) -> StateResult<PolicyState> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let next;
        {
            let mut table = txn.open_table(POLICY_STATES).map_err(map_err!(Table))?;
            let previous = match table.get(tower.0).map_err(map_err!(Read))? {
                Some(guard) => Some(decode(guard.value())?),
                None => None,
            };
            next = f(previous.as_ref());
            let value = serde_json::to_vec(&next).map_err(map_err!(Serialize))?;
            table
                .insert(tower.0, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(next)
    }

    fn list(&self) -> StateResult<Vec<(TowerId, PolicyState)>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(POLICY_STATES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (key, value) = entry.map_err(map_err!(Read))?;
            results.push((TowerId(key.value()), decode(value.value())?));
        }
        Ok(results)
    }
}
