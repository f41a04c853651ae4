//! The transition function.

use serde::{Deserialize, Serialize};

use towergrid_core::{PolicyConfig, TowerId};
use towergrid_state::{PolicyDecision, PolicyState};

use crate::snapshot::TowerSnapshot;

/// Result of evaluating one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub tower_id: TowerId,
    pub load_percentage: f64,
    pub failure_rate: f64,
    pub decision: PolicyDecision,
    pub previous: PolicyDecision,
    /// Load alone is above the overload threshold.
    pub overloaded: bool,
    pub rollback: bool,
    pub rollback_reason: Option<String>,
    /// Unix seconds.
    pub evaluated_at: u64,
}

impl Decision {
    /// The state to persist after this decision.
    pub fn state(&self) -> PolicyState {
        PolicyState {
            decision: self.decision,
            load_percentage: self.load_percentage,
            updated_at: self.evaluated_at,
        }
    }

    pub fn changed(&self) -> bool {
        self.decision != self.previous
    }
}

/// Evaluate `snapshot` against the tower's `previous` state.
///
/// Hysteresis picks the candidate; the rollback guard then forces `stay`
/// when the handover failure rate exceeds the configured maximum.
pub fn evaluate(
    snapshot: &TowerSnapshot,
    previous: &PolicyState,
    config: &PolicyConfig,
    now: u64,
) -> Decision {
    let load_percentage = snapshot.load_percentage();
    let failure_rate = snapshot.failure_rate();

    let mut decision = match previous.decision {
        PolicyDecision::Stay if load_percentage > config.overload_threshold => {
            PolicyDecision::Migrate
        }
        PolicyDecision::Migrate if load_percentage > config.hysteresis_threshold => {
            PolicyDecision::Migrate
        }
        _ => PolicyDecision::Stay,
    };

    let rollback = failure_rate > config.max_handover_failure_rate;
    let rollback_reason = rollback.then(|| {
        decision = PolicyDecision::Stay;
        format!("High handover failure rate: {failure_rate:.1}%")
    });

    Decision {
        tower_id: snapshot.tower_id,
        load_percentage,
        failure_rate,
        decision,
        previous: previous.decision,
        overloaded: load_percentage > config.overload_threshold,
        rollback,
        rollback_reason,
        evaluated_at: snapshot.timestamp.unwrap_or(now),
    }
}
