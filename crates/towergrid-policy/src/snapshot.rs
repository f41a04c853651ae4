//! Telemetry input for one tower.

use serde::{Deserialize, Serialize};

use towergrid_core::{TowerId, load_percentage};

/// Radio measurements that ride along to the audit trail.
///
/// They do not influence the decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RadioKpis {
    #[serde(default)]
    pub downlink_mbps: Option<f64>,
    #[serde(default)]
    pub uplink_mbps: Option<f64>,
    #[serde(default)]
    pub rssi_dbm: Option<f64>,
    #[serde(default)]
    pub sinr_db: Option<f64>,
}

/// One telemetry reading. Missing load or capacity means 0% load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    pub tower_id: TowerId,
    #[serde(default)]
    pub load: Option<f64>,
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub handover_attempts: u64,
    #[serde(default)]
    pub handover_failures: u64,
    /// Unix seconds; the evaluation time is used when absent.
    #[serde(default)]
    pub timestamp: Option<u64>,
    #[serde(flatten)]
    pub radio: RadioKpis,
}

impl TowerSnapshot {
    pub fn new(tower_id: TowerId, load: f64, capacity: f64) -> Self {
        Self {
            tower_id,
            load: Some(load),
            capacity: Some(capacity),
            handover_attempts: 0,
            handover_failures: 0,
            timestamp: None,
            radio: RadioKpis::default(),
        }
    }

    pub fn with_handovers(mut self, attempts: u64, failures: u64) -> Self {
        self.handover_attempts = attempts;
        self.handover_failures = failures;
        self
    }

    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn load_percentage(&self) -> f64 {
        load_percentage(self.load.unwrap_or(0.0), self.capacity.unwrap_or(0.0))
    }

    /// `failures / attempts * 100`, or 0 without attempts.
    pub fn failure_rate(&self) -> f64 {
        if self.handover_attempts == 0 {
            return 0.0;
        }
        self.handover_failures as f64 / self.handover_attempts as f64 * 100.0
    }
}
