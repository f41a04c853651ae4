//! Persisted policy state types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a policy evaluation for one tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyDecision {
    /// Keep users where they are.
    #[default]
    Stay,
    /// Move load off this tower.
    Migrate,
}

impl fmt::Display for PolicyDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stay => f.write_str("stay"),
            Self::Migrate => f.write_str("migrate"),
        }
    }
}

/// Last known policy state of one tower.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyState {
    pub decision: PolicyDecision,
    /// Load percentage observed at the last decision.
    pub load_percentage: f64,
    /// Unix timestamp (seconds) of the last decision.
    pub updated_at: u64,
}

impl PolicyState {
    /// State assumed for a tower that has never been evaluated.
    pub fn initial() -> Self {
        Self::default()
    }
}
