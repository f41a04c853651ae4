//! RunReport — what the CLI prints after a simulation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::improvement::{Improvement, compute_improvement};
use crate::summary::NetworkSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub before: NetworkSummary,
    pub after: NetworkSummary,
    pub improvement: Improvement,
    pub users_moved: u64,
    pub iterations: u32,
}

impl RunReport {
    pub fn new(
        run_id: Uuid,
        before: NetworkSummary,
        after: NetworkSummary,
        users_moved: u64,
        iterations: u32,
    ) -> Self {
        let improvement = compute_improvement(&before, &after);
        Self {
            run_id,
            before,
            after,
            improvement,
            users_moved,
            iterations,
        }
    }
}
