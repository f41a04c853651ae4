//! Policy engine error types.

use thiserror::Error;

use towergrid_core::{ConfigError, TowerId};
use towergrid_state::StateError;

/// Result type alias for policy engine operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Missing or odd telemetry is never an error; only a bad config, the
/// store, or a crashed batch task can fail a decision.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid policy config: {0}")]
    Config(#[from] ConfigError),

    #[error("policy store: {0}")]
    State(#[from] StateError),

    #[error("policy store did not apply the update for {0}")]
    NotApplied(TowerId),

    #[error("decision task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
