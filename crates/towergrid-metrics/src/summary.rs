//! Point-in-time network counts.

use serde::{Deserialize, Serialize};

use towergrid_core::{Tower, TowerStatus, load_percentage};

/// Status counts and utilization for a set of towers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub towers: usize,
    /// Users attached to any tower.
    pub users: usize,
    pub total_capacity: u64,
    pub overloaded: usize,
    pub congested: usize,
    pub normal: usize,
    /// Mean of per-tower load percentages.
    pub average_load_percentage: f64,
    /// Attached users over total capacity.
    pub utilization_percentage: f64,
}

impl NetworkSummary {
    pub fn from_towers(towers: &[Tower]) -> Self {
        let mut summary = Self {
            towers: towers.len(),
            ..Self::default()
        };
        let mut pct_sum = 0.0;

        for tower in towers {
            summary.users += tower.load();
            summary.total_capacity += u64::from(tower.capacity());
            pct_sum += tower.load_percentage();
            match tower.status() {
                TowerStatus::Overloaded => summary.overloaded += 1,
                TowerStatus::Congested => summary.congested += 1,
                TowerStatus::Normal => summary.normal += 1,
            }
        }

        if !towers.is_empty() {
            summary.average_load_percentage = pct_sum / towers.len() as f64;
        }
        summary.utilization_percentage =
            load_percentage(summary.users as f64, summary.total_capacity as f64);
        summary
    }

    /// Towers that are congested or overloaded.
    pub fn needing_relief(&self) -> usize {
        self.overloaded + self.congested
    }
}
