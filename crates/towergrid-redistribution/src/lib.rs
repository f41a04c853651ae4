//! towergrid-redistribution — moves users off overloaded towers.
//!
//! The engine is a bounded greedy loop over a caller-owned
//! [`SimulationRun`](towergrid_core::SimulationRun):
//!
//! ```text
//! loop (at most max_iterations):
//!   sources = towers that are overloaded or congested
//!   targets = towers below the target band (70% by default)
//!   either empty → stop
//!   source  = highest load %   (ties → lowest id)
//!   target  = lowest load %    (ties → lowest id)
//!   move up to batch_size users source → target,
//!     falling back to the other targets when the first is full
//!   record the iteration; stop if nothing moved
//! ```
//!
//! # Components
//!
//! - **`engine`** — The `Redistributor` loop and `run_redistribution`
//! - **`strategy`** — Which users of the source tower get moved

pub mod engine;
pub mod strategy;

pub use engine::{
    RedistributionOutcome, RedistributionReport, Redistributor, StopReason, run_redistribution,
};
pub use strategy::{AscendingId, FirstN, RandomSelection, SelectionStrategy};
