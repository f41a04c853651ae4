//! towergrid-metrics — how much did a redistribution help?
//!
//! # Architecture
//!
//! ```text
//! NetworkSummary::from_towers(before) ─┐
//!                                      ├─ compute_improvement() → Improvement
//! NetworkSummary::from_towers(after)  ─┘
//!
//! RunReport = before + after + improvement + users moved
//! ```

pub mod improvement;
pub mod report;
pub mod summary;

pub use improvement::{Improvement, compute_improvement, reduction_pct};
pub use report::RunReport;
pub use summary::NetworkSummary;
