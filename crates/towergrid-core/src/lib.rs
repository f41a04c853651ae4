//! towergrid-core — entity model and configuration for TowerGrid.
//!
//! Towers own their user membership; users only hold a lookup
//! back-reference to the tower they are connected to. A [`Network`]
//! keeps both sides in sync and a [`SimulationRun`] wraps a network with
//! an append-only redistribution history.
//!
//! # Status bands
//!
//! ```text
//! load_pct = users / capacity * 100
//!
//! load_pct > 100  → overloaded
//! load_pct >  80  → congested
//! otherwise       → normal
//! ```

pub mod config;
pub mod error;
pub mod network;
pub mod run;
pub mod tower;
pub mod types;
pub mod user;

pub use config::{
    PolicyConfig, PredictorConfig, RedistributionConfig, ScenarioConfig, TowergridConfig,
};
pub use error::{ConfigError, ConfigResult};
pub use network::Network;
pub use run::{MoveRecord, SimulationRun};
pub use tower::{Tower, TowerReport};
pub use types::*;
pub use user::User;
