//! The store abstraction the policy engine is built on.

use towergrid_core::TowerId;

use crate::error::StateResult;
use crate::types::PolicyState;

/// Keyed storage of [`PolicyState`] by tower id.
pub trait PolicyStore: Send + Sync {
    fn get(&self, tower: TowerId) -> StateResult<Option<PolicyState>>;

    fn put(&self, tower: TowerId, state: PolicyState) -> StateResult<()>;

    /// Atomically replace the state of `tower` with `f(previous)`.
    ///
    /// `previous` is `None` for a tower never seen before. No other
    /// update for the same tower can interleave between the read and the
    /// write. `f` is called exactly once. Returns the stored value.
    fn update(
        &self,
        tower: TowerId,
        f: &mut dyn FnMut(Option<&PolicyState>) -> PolicyState,
    ) -> StateResult<PolicyState>;

    /// All stored states, ordered by tower id.
    fn list(&self) -> StateResult<Vec<(TowerId, PolicyState)>>;

    fn len(&self) -> StateResult<usize> {
        Ok(self.list()?.len())
    }

    fn is_empty(&self) -> StateResult<bool> {
        Ok(self.len()? == 0)
    }
}
