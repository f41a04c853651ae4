use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use towergrid_core::TowergridConfig;
use towergrid_policy::{Decision, PolicyEngine, PolicyStatus, TowerSnapshot};
use towergrid_state::{MemoryPolicyStore, PolicyStore, RedbPolicyStore};
use tracing::info;

#[derive(Serialize)]
struct DecideOutput {
    decisions: Vec<Decision>,
    status: PolicyStatus,
}

pub async fn decide(
    config: TowergridConfig,
    input: &Path,
    state_db: Option<&Path>,
) -> anyhow::Result<()> {
    let snapshots: Vec<TowerSnapshot> = super::read_json_array(input)?;

    let store: Arc<dyn PolicyStore> = match state_db {
        Some(path) => Arc::new(RedbPolicyStore::open(path)?),
        None => Arc::new(MemoryPolicyStore::new()),
    };
    let engine = PolicyEngine::new(store);

    info!(snapshots = snapshots.len(), persistent = state_db.is_some(), "deciding");
    let decisions = engine.decide_batch(snapshots, config.policy).await?;
    let output = DecideOutput {
        decisions,
        status: engine.status()?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
