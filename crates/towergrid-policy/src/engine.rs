//! PolicyEngine — store-backed decisions.
//!
//! Every decision is one atomic read-modify-write on the tower's stored
//! state, so concurrent decisions for the same tower never interleave.
//!
//! ```text
//! decide(snapshot)
//!   store.update(tower, |previous| evaluate(snapshot, previous))
//!   audit.record(decision)
//!
//! decide_batch(snapshots)
//!   group by tower id (first-seen order)
//!   one task per group, entries in input order
//!   reassemble results in input order
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use towergrid_core::{PolicyConfig, TowerId, epoch_secs};
use towergrid_state::{MemoryPolicyStore, PolicyDecision, PolicyState, PolicyStore};

use crate::audit::{AuditRecord, AuditSink, TracingAuditSink};
use crate::decision::{Decision, evaluate};
use crate::error::{PolicyError, PolicyResult};
use crate::snapshot::TowerSnapshot;

/// Counts over every tower the engine has seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatus {
    pub active_towers: usize,
    pub migrating_towers: usize,
}

/// Hysteresis + rollback decision engine over a [`PolicyStore`].
#[derive(Clone)]
pub struct PolicyEngine {
    store: Arc<dyn PolicyStore>,
    audit: Arc<dyn AuditSink>,
}

impl PolicyEngine {
    /// Create an engine that audits through `tracing`.
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self {
            store,
            audit: Arc::new(TracingAuditSink),
        }
    }

    /// An engine over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryPolicyStore::new()))
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Decide for one snapshot and persist the resulting state.
    pub fn decide(&self, snapshot: &TowerSnapshot, config: &PolicyConfig) -> PolicyResult<Decision> {
        config.validate()?;
        let tower = snapshot.tower_id;
        let now = epoch_secs();

        let mut decision = None;
        self.store.update(tower, &mut |previous| {
            let previous = previous.copied().unwrap_or_else(PolicyState::initial);
            decision.insert(evaluate(snapshot, &previous, config, now)).state()
        })?;
        let decision = decision.ok_or(PolicyError::NotApplied(tower))?;

        if decision.rollback {
            warn!(
                %tower,
                failure_rate = decision.failure_rate,
                load_pct = decision.load_percentage,
                "rollback: forcing stay"
            );
        } else if decision.changed() {
            info!(
                %tower,
                from = %decision.previous,
                to = %decision.decision,
                load_pct = decision.load_percentage,
                "policy transition"
            );
        } else {
            debug!(%tower, decision = %decision.decision, load_pct = decision.load_percentage, "policy unchanged");
        }

        self.audit.record(&AuditRecord {
            decision: decision.clone(),
            radio: snapshot.radio,
        });
        Ok(decision)
    }

    /// Decide for many snapshots concurrently.
    ///
    /// Distinct towers run in parallel tasks. Snapshots for the same
    /// tower run one after another in input order, each seeing the state
    /// left by the previous one. The output is in input order.
    ///
    /// A failed batch is partially applied: every task is awaited before
    /// the first error is returned, so decisions made by other tasks are
    /// stored and audited. Within the failing tower's group, entries after
    /// the error are skipped.
    pub async fn decide_batch(
        &self,
        snapshots: Vec<TowerSnapshot>,
        config: PolicyConfig,
    ) -> PolicyResult<Vec<Decision>> {
        config.validate()?;
        let total = snapshots.len();

        let mut group_of: HashMap<TowerId, usize> = HashMap::new();
        let mut groups: Vec<Vec<(usize, TowerSnapshot)>> = Vec::new();
        for (index, snapshot) in snapshots.into_iter().enumerate() {
            let group = *group_of.entry(snapshot.tower_id).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[group].push((index, snapshot));
        }

        debug!(snapshots = total, towers = groups.len(), "policy batch started");

        let handles: Vec<_> = groups
            .into_iter()
            .map(|group| {
                let engine = self.clone();
                tokio::spawn(async move {
                    group
                        .into_iter()
                        .map(|(index, snapshot)| {
                            engine.decide(&snapshot, &config).map(|d| (index, d))
                        })
                        .collect::<PolicyResult<Vec<_>>>()
                })
            })
            .collect();

        let mut slots: Vec<Option<Decision>> = vec![None; total];
        let mut first_error = None;
        for handle in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(e.into()),
            };
            match outcome {
                Ok(decided) => {
                    for (index, decision) in decided {
                        slots[index] = Some(decision);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "policy batch task failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let decisions: Vec<Decision> = slots.into_iter().flatten().collect();
        info!(
            decisions = decisions.len(),
            migrating = decisions
                .iter()
                .filter(|d| d.decision == PolicyDecision::Migrate)
                .count(),
            "policy batch finished"
        );
        Ok(decisions)
    }

    pub fn status(&self) -> PolicyResult<PolicyStatus> {
        let states = self.store.list()?;
        Ok(PolicyStatus {
            active_towers: states.len(),
            migrating_towers: states
                .iter()
                .filter(|(_, s)| s.decision == PolicyDecision::Migrate)
                .count(),
        })
    }

    pub fn state(&self, tower: TowerId) -> PolicyResult<Option<PolicyState>> {
        Ok(self.store.get(tower)?)
    }
}
