//! User selection strategies.

use std::sync::Mutex;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use towergrid_core::UserId;

/// Picks which members of a source tower are moved in one batch.
///
/// `members` is the tower's user list in membership order. Implementations
/// return at most `n` distinct members.
pub trait SelectionStrategy: Send + Sync {
    fn select(&self, members: &[UserId], n: usize) -> Vec<UserId>;

    fn name(&self) -> &'static str;
}

/// The first `n` members in membership order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstN;

impl SelectionStrategy for FirstN {
    fn select(&self, members: &[UserId], n: usize) -> Vec<UserId> {
        members.iter().take(n).copied().collect()
    }

    fn name(&self) -> &'static str {
        "first-n"
    }
}

/// The `n` members with the lowest user ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct AscendingId;

impl SelectionStrategy for AscendingId {
    fn select(&self, members: &[UserId], n: usize) -> Vec<UserId> {
        let mut sorted = members.to_vec();
        sorted.sort_unstable();
        sorted.truncate(n);
        sorted
    }

    fn name(&self) -> &'static str {
        "ascending-id"
    }
}

/// `n` members drawn uniformly at random from a seeded RNG.
pub struct RandomSelection {
    rng: Mutex<StdRng>,
}

impl RandomSelection {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl SelectionStrategy for RandomSelection {
    fn select(&self, members: &[UserId], n: usize) -> Vec<UserId> {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        members.choose_multiple(&mut *rng, n).copied().collect()
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
