//! TowerGrid load prediction.
//!
//! The redistribution engine only depends on [`LoadPredictor`]; what sits
//! behind it is a collaborator's business. This crate ships a heuristic
//! stand-in and the recommendation tiers built on top of predictions.
//!
//! # Components
//!
//! - **`features`** — Per-tower prediction inputs with documented defaults
//! - **`predictor`** — The `LoadPredictor` trait and `HeuristicPredictor`
//! - **`recommend`** — Priority tiers over predicted load

pub mod features;
pub mod predictor;
pub mod recommend;

pub use features::TowerFeatures;
pub use predictor::{HeuristicPredictor, LoadPredictor, Predictions};
pub use recommend::{
    NetworkOutlook, Priority, Recommendation, RecommendationReport, RecommendedAction, recommend,
};
