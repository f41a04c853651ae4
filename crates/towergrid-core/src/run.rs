//! SimulationRun — one caller-owned redistribution session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ScenarioConfig;
use crate::network::Network;
use crate::types::{TowerId, epoch_secs};

/// One iteration of the redistribution loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub iteration: u32,
    pub from_tower: TowerId,
    pub to_tower: TowerId,
    /// Users selected for the batch.
    pub users_attempted: u32,
    /// Users that actually changed tower.
    pub users_moved: u32,
    /// Unix timestamp (seconds).
    pub timestamp: u64,
}

/// A network plus its append-only redistribution history.
///
/// Owned by exactly one caller; it is never shared across threads while
/// an engine works on it.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRun {
    pub id: Uuid,
    /// Unix timestamp (seconds) when the run was created.
    pub created_at: u64,
    pub network: Network,
    history: Vec<MoveRecord>,
}

impl SimulationRun {
    pub fn new(network: Network) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: epoch_secs(),
            network,
            history: Vec::new(),
        }
    }

    /// Start a run on a generated network.
    pub fn seeded(config: &ScenarioConfig) -> Self {
        Self::new(Network::seeded(config))
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn record_move(&mut self, record: MoveRecord) {
        self.history.push(record);
    }

    /// Total users moved across the whole history.
    pub fn users_moved(&self) -> u64 {
        self.history.iter().map(|r| u64::from(r.users_moved)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_append_only_in_order() {
        let mut run = SimulationRun::new(Network::new(Vec::new(), Vec::new()));
        for i in 0..3 {
            run.record_move(MoveRecord {
                iteration: i,
                from_tower: TowerId(0),
                to_tower: TowerId(1),
                users_attempted: 5,
                users_moved: 4,
                timestamp: 1000 + u64::from(i),
            });
        }
        let iterations: Vec<u32> = run.history().iter().map(|r| r.iteration).collect();
        assert_eq!(iterations, vec![0, 1, 2]);
        assert_eq!(run.users_moved(), 12);
    }

    #[test]
    fn runs_get_distinct_ids() {
        let a = SimulationRun::new(Network::new(Vec::new(), Vec::new()));
        let b = SimulationRun::new(Network::new(Vec::new(), Vec::new()));
        assert_ne!(a.id, b.id);
    }
}
