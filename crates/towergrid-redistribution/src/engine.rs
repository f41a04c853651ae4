//! Redistributor — the bounded greedy relief loop.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use towergrid_core::{
    MoveRecord, Network, RedistributionConfig, SimulationRun, Tower, TowerId, User, UserId,
    epoch_secs, load_percentage,
};

use crate::strategy::{FirstN, SelectionStrategy};

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No tower is congested or overloaded.
    NoSource,
    /// No tower is below the target band.
    NoTarget,
    /// An iteration moved nobody.
    NoProgress,
    /// `max_iterations` reached.
    IterationCap,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSource => write!(f, "no overloaded or congested tower"),
            Self::NoTarget => write!(f, "no tower below the target band"),
            Self::NoProgress => write!(f, "iteration moved no users"),
            Self::IterationCap => write!(f, "iteration cap reached"),
        }
    }
}

/// Summary of one [`Redistributor::run`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedistributionReport {
    pub users_moved: u64,
    /// Iterations that produced a history record.
    pub iterations: u32,
    pub stop_reason: StopReason,
}

/// Result of [`run_redistribution`].
#[derive(Debug, Clone, Serialize)]
pub struct RedistributionOutcome {
    pub final_towers: Vec<Tower>,
    pub final_users: Vec<User>,
    pub users_moved: u64,
    pub iterations: u32,
    pub history: Vec<MoveRecord>,
    pub stop_reason: StopReason,
}

/// Greedy redistribution engine.
pub struct Redistributor {
    config: RedistributionConfig,
    strategy: Box<dyn SelectionStrategy>,
}

impl Default for Redistributor {
    fn default() -> Self {
        Self::new(RedistributionConfig::default())
    }
}

/// Per-run ranking context: live load, optionally shifted predictions.
struct Ranking<'a> {
    predictions: Option<&'a HashMap<TowerId, f64>>,
    initial_load: HashMap<TowerId, usize>,
}

impl Ranking<'_> {
    /// Load % used to order towers. Eligibility never goes through here.
    fn pct(&self, tower: &Tower) -> f64 {
        let Some(predicted) = self.predictions.and_then(|p| p.get(&tower.id())) else {
            return tower.load_percentage();
        };
        let initial = self.initial_load.get(&tower.id()).copied().unwrap_or(0);
        let shifted = predicted + tower.load() as f64 - initial as f64;
        load_percentage(shifted, f64::from(tower.capacity()))
    }
}

impl Redistributor {
    pub fn new(config: RedistributionConfig) -> Self {
        Self {
            config,
            strategy: Box::new(FirstN),
        }
    }

    pub fn with_strategy(mut self, strategy: impl SelectionStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn config(&self) -> &RedistributionConfig {
        &self.config
    }

    /// Run the relief loop on `run`, appending one history record per
    /// iteration.
    ///
    /// When `predictions` is given, source and target ranking uses each
    /// tower's predicted load, shifted by the membership change seen so
    /// far in this call. Which towers are eligible is always decided on
    /// live load.
    pub fn run(
        &self,
        run: &mut SimulationRun,
        predictions: Option<&HashMap<TowerId, f64>>,
    ) -> RedistributionReport {
        let band = self.config.target_band_pct;
        let batch = self.config.batch_size as usize;
        let ranking = Ranking {
            predictions,
            initial_load: run
                .network
                .towers()
                .iter()
                .map(|t| (t.id(), t.load()))
                .collect(),
        };

        info!(
            run = %run.id,
            towers = run.network.towers().len(),
            users = run.network.users().len(),
            strategy = self.strategy.name(),
            predicted = predictions.is_some(),
            "redistribution started"
        );

        let mut users_moved = 0u64;
        let mut iterations = 0u32;
        let mut stop_reason = StopReason::IterationCap;

        for iteration in 0..self.config.max_iterations {
            let network = &run.network;

            let Some(source) = network
                .towers()
                .iter()
                .filter(|t| t.status().needs_relief())
                .max_by(|a, b| {
                    ranking
                        .pct(a)
                        .total_cmp(&ranking.pct(b))
                        .then_with(|| b.id().cmp(&a.id()))
                })
            else {
                stop_reason = StopReason::NoSource;
                break;
            };
            let source_id = source.id();

            let mut targets: Vec<&Tower> = network
                .towers()
                .iter()
                .filter(|t| t.id() != source_id && t.load_percentage() < band)
                .collect();
            let Some(target) = targets
                .iter()
                .min_by(|a, b| {
                    ranking
                        .pct(a)
                        .total_cmp(&ranking.pct(b))
                        .then_with(|| a.id().cmp(&b.id()))
                })
                .copied()
            else {
                stop_reason = StopReason::NoTarget;
                break;
            };
            let target_id = target.id();

            // Fallback order for users the primary target cannot admit.
            targets.retain(|t| t.id() != target_id);
            targets.sort_by(|a, b| {
                a.load_percentage()
                    .total_cmp(&b.load_percentage())
                    .then_with(|| a.id().cmp(&b.id()))
            });
            let fallbacks: Vec<TowerId> = targets.iter().map(|t| t.id()).collect();

            let selected = self.strategy.select(source.users(), batch);
            let attempted = selected.len() as u32;
            let mut moved = 0u32;

            for user in selected {
                if self.move_user(&mut run.network, user, source_id, target_id, &fallbacks) {
                    moved += 1;
                }
            }

            debug!(
                iteration,
                source = %source_id,
                target = %target_id,
                attempted,
                moved,
                "redistribution iteration"
            );

            run.record_move(MoveRecord {
                iteration,
                from_tower: source_id,
                to_tower: target_id,
                users_attempted: attempted,
                users_moved: moved,
                timestamp: epoch_secs(),
            });
            iterations += 1;
            users_moved += u64::from(moved);

            if moved == 0 {
                warn!(source = %source_id, target = %target_id, "no user could be moved");
                stop_reason = StopReason::NoProgress;
                break;
            }
        }

        info!(
            run = %run.id,
            iterations,
            users_moved,
            reason = %stop_reason,
            "redistribution finished"
        );

        RedistributionReport {
            users_moved,
            iterations,
            stop_reason,
        }
    }

    /// Try the primary target, then each fallback that still has a free
    /// slot and sits below the band.
    fn move_user(
        &self,
        network: &mut Network,
        user: UserId,
        source: TowerId,
        target: TowerId,
        fallbacks: &[TowerId],
    ) -> bool {
        if network.transfer(user, source, target) {
            return true;
        }
        for &fallback in fallbacks {
            let open = network.tower(fallback).is_some_and(|t| {
                t.available_slots() > 0 && t.load_percentage() < self.config.target_band_pct
            });
            if open && network.transfer(user, source, fallback) {
                debug!(%user, %fallback, "user placed on fallback target");
                return true;
            }
        }
        false
    }
}

/// Redistribute with the default configuration and `max_iterations`.
pub fn run_redistribution(
    towers: Vec<Tower>,
    users: Vec<User>,
    max_iterations: u32,
) -> RedistributionOutcome {
    let engine = Redistributor::new(RedistributionConfig {
        max_iterations,
        ..RedistributionConfig::default()
    });
    let mut run = SimulationRun::new(Network::new(towers, users));
    let report = engine.run(&mut run, None);

    let history = run.history().to_vec();
    let (final_towers, final_users) = run.network.into_parts();
    RedistributionOutcome {
        final_towers,
        final_users,
        users_moved: report.users_moved,
        iterations: report.iterations,
        history,
        stop_reason: report.stop_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use towergrid_core::{Location, UsageCategory};

    use crate::strategy::AscendingId;

    fn user(id: u32) -> User {
        User {
            id: UserId(id),
            location: Location::default(),
            usage: UsageCategory::Data,
            consumption_mb: 1.0,
            connected_tower: None,
        }
    }

    /// Towers given as `(capacity, load)`; users are numbered consecutively.
    fn network(layout: &[(u32, u32)]) -> Network {
        let mut towers = Vec::new();
        let mut users = Vec::new();
        let mut next = 0;
        for (i, &(capacity, load)) in layout.iter().enumerate() {
            let mut tower = Tower::new(TowerId(i as u32 + 1), capacity, Location::default());
            for _ in 0..load {
                tower.seed_user(UserId(next));
                users.push(user(next));
                next += 1;
            }
            towers.push(tower);
        }
        Network::new(towers, users)
    }

    fn load_of(run: &SimulationRun, id: u32) -> usize {
        run.network.tower(TowerId(id)).map(Tower::load).unwrap_or(0)
    }

    #[test]
    fn picks_most_loaded_source_and_least_loaded_target() {
        let mut run = SimulationRun::new(network(&[(100, 85), (100, 95), (100, 30), (100, 10)]));
        let engine = Redistributor::new(RedistributionConfig {
            max_iterations: 1,
            ..Default::default()
        });

        let report = engine.run(&mut run, None);
        assert_eq!(report.iterations, 1);
        assert_eq!(report.stop_reason, StopReason::IterationCap);

        let record = &run.history()[0];
        assert_eq!(record.from_tower, TowerId(2));
        assert_eq!(record.to_tower, TowerId(4));
        assert_eq!(record.users_moved, 5);
        assert_eq!(load_of(&run, 2), 90);
        assert_eq!(load_of(&run, 4), 15);
    }

    #[test]
    fn ties_go_to_lowest_id() {
        let mut run = SimulationRun::new(network(&[(10, 9), (10, 9), (10, 1), (10, 1)]));
        let engine = Redistributor::new(RedistributionConfig {
            max_iterations: 1,
            batch_size: 1,
            ..Default::default()
        });

        engine.run(&mut run, None);
        let record = &run.history()[0];
        assert_eq!(record.from_tower, TowerId(1));
        assert_eq!(record.to_tower, TowerId(3));
    }

    #[test]
    fn falls_back_when_primary_target_cannot_admit() {
        // Tower 2 has zero capacity: 0% load, eligible, but admits nobody.
        let mut run = SimulationRun::new(network(&[(10, 10), (0, 0), (10, 5)]));
        let engine = Redistributor::new(RedistributionConfig {
            max_iterations: 1,
            batch_size: 1,
            ..Default::default()
        });

        let report = engine.run(&mut run, None);
        assert_eq!(report.users_moved, 1);
        assert_eq!(run.history()[0].to_tower, TowerId(2));
        assert_eq!(load_of(&run, 3), 6);
    }

    #[test]
    fn stalls_when_no_target_admits() {
        let mut run = SimulationRun::new(network(&[(10, 10), (0, 0)]));
        let report = Redistributor::default().run(&mut run, None);

        assert_eq!(report.stop_reason, StopReason::NoProgress);
        assert_eq!(report.iterations, 1);
        assert_eq!(run.history()[0].users_attempted, 5);
        assert_eq!(run.history()[0].users_moved, 0);
    }

    #[test]
    fn no_target_below_band_stops_immediately() {
        let mut run = SimulationRun::new(network(&[(10, 10), (10, 8)]));
        let report = Redistributor::default().run(&mut run, None);
        assert_eq!(report.stop_reason, StopReason::NoTarget);
        assert!(run.history().is_empty());
    }

    #[test]
    fn predictions_change_ranking_not_eligibility() {
        // Live: tower 2 is hotter. Predicted: tower 1 will be.
        let mut run = SimulationRun::new(network(&[(100, 85), (100, 95), (100, 10), (100, 20)]));
        let predictions: HashMap<TowerId, f64> = [
            (TowerId(1), 150.0),
            (TowerId(2), 90.0),
            (TowerId(3), 60.0),
            (TowerId(4), 5.0),
        ]
        .into_iter()
        .collect();
        let engine = Redistributor::new(RedistributionConfig {
            max_iterations: 1,
            ..Default::default()
        });

        engine.run(&mut run, Some(&predictions));
        let record = &run.history()[0];
        assert_eq!(record.from_tower, TowerId(1));
        assert_eq!(record.to_tower, TowerId(4));
    }

    #[test]
    fn predicted_hot_tower_that_is_live_normal_is_not_a_source() {
        let mut run = SimulationRun::new(network(&[(100, 50), (100, 10)]));
        let predictions: HashMap<TowerId, f64> = [(TowerId(1), 500.0)].into_iter().collect();

        let report = Redistributor::default().run(&mut run, Some(&predictions));
        assert_eq!(report.stop_reason, StopReason::NoSource);
        assert_eq!(report.users_moved, 0);
    }

    #[test]
    fn strategy_controls_who_moves() {
        let mut towers = vec![
            Tower::new(TowerId(1), 4, Location::default()),
            Tower::new(TowerId(2), 10, Location::default()),
        ];
        for id in [30, 10, 40, 20] {
            towers[0].seed_user(UserId(id));
        }
        let users = [10, 20, 30, 40].into_iter().map(user).collect();
        let mut run = SimulationRun::new(Network::new(towers, users));

        let engine = Redistributor::new(RedistributionConfig {
            max_iterations: 1,
            batch_size: 2,
            ..Default::default()
        })
        .with_strategy(AscendingId);
        engine.run(&mut run, None);

        let moved = run.network.tower(TowerId(2)).map(|t| t.users().to_vec());
        assert_eq!(moved, Some(vec![UserId(10), UserId(20)]));
        assert_eq!(
            run.network.user(UserId(10)).and_then(|u| u.connected_tower),
            Some(TowerId(2))
        );
    }

    #[test]
    fn free_function_returns_final_state() {
        let net = network(&[(200, 200), (200, 0)]);
        let (towers, users) = net.into_parts();

        let outcome = run_redistribution(towers, users, 100);
        assert_eq!(outcome.users_moved, 40);
        assert_eq!(outcome.iterations, 8);
        assert_eq!(outcome.history.len(), 8);
        assert_eq!(outcome.final_towers[0].load(), 160);
        assert_eq!(outcome.final_towers[1].load(), 40);
        assert_eq!(outcome.stop_reason, StopReason::NoSource);
    }
}
