//! towergrid-policy — per-tower migrate/stay decisions.
//!
//! Each tower id carries a two-state machine. Hysteresis keeps a tower
//! hovering near the threshold from flapping; a rollback guard overrides
//! the load signal when handovers are failing.
//!
//! ```text
//!             load % > overload_threshold
//!   ┌──────┐ ───────────────────────────▶ ┌─────────┐
//!   │ stay │                              │ migrate │
//!   └──────┘ ◀─────────────────────────── └─────────┘
//!             load % <= hysteresis_threshold
//!
//! failure rate > max_handover_failure_rate  →  stay (rollback)
//! ```
//!
//! # Components
//!
//! - **`snapshot`** — Telemetry input for one tower
//! - **`decision`** — The pure transition function
//! - **`engine`** — `PolicyEngine`: store-backed decide, batch, and status
//! - **`audit`** — Where decisions are reported

pub mod audit;
pub mod decision;
pub mod engine;
pub mod error;
pub mod snapshot;

pub use audit::{AuditRecord, AuditSink, ChannelAuditSink, TracingAuditSink};
pub use decision::{Decision, evaluate};
pub use engine::{PolicyEngine, PolicyStatus};
pub use error::{PolicyError, PolicyResult};
pub use snapshot::{RadioKpis, TowerSnapshot};

pub use towergrid_core::PolicyConfig;
pub use towergrid_state::{PolicyDecision, PolicyState};
