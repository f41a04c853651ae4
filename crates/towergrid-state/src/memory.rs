//! In-memory sharded policy store.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use towergrid_core::TowerId;

use crate::error::StateResult;
use crate::store::PolicyStore;
use crate::types::PolicyState;

/// Policy states in a `DashMap`.
///
/// Each shard has its own lock, so only towers hashing to the same
/// shard contend. [`PolicyStore::update`] holds the shard's write lock
/// across the read-modify-write.
#[derive(Clone, Default)]
pub struct MemoryPolicyStore {
    states: Arc<DashMap<TowerId, PolicyState>>,
}

impl MemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with an explicit shard count (must be a power of two).
    pub fn with_shards(shards: usize) -> Self {
        Self {
            states: Arc::new(DashMap::with_shard_amount(shards)),
        }
    }
}

impl PolicyStore for MemoryPolicyStore {
    fn get(&self, tower: TowerId) -> StateResult<Option<PolicyState>> {
        Ok(self.states.get(&tower).map(|s| *s))
    }

    fn put(&self, tower: TowerId, state: PolicyState) -> StateResult<()> {
        self.states.insert(tower, state);
        Ok(())
    }

    fn update(
        &self,
        tower: TowerId,
        f: &mut dyn FnMut(Option<&PolicyState>) -> PolicyState,
    ) -> StateResult<PolicyState> {
        let next = match self.states.entry(tower) {
            Entry::Occupied(mut entry) => {
                let next = f(Some(entry.get()));
                entry.insert(next);
                next
            }
            Entry::Vacant(entry) => {
                let next = f(None);
                entry.insert(next);
                debug!(%tower, "policy state created");
                next
            }
        };
        Ok(next)
    }

    fn list(&self) -> StateResult<Vec<(TowerId, PolicyState)>> {
        let mut all: Vec<(TowerId, PolicyState)> =
            self.states.iter().map(|e| (*e.key(), *e.value())).collect();
        all.sort_by_key(|(id, _)| *id);
        Ok(all)
    }

    fn len(&self) -> StateResult<usize> {
        Ok(self.states.len())
    }
}
