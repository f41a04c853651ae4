use serde::Serialize;
use towergrid_core::{MoveRecord, SimulationRun, TowerReport, TowergridConfig, epoch_secs};
use towergrid_metrics::{NetworkSummary, RunReport};
use towergrid_predictor::{HeuristicPredictor, LoadPredictor, TowerFeatures};
use towergrid_redistribution::{Redistributor, StopReason};
use tracing::info;

use super::{Prediction, sorted_predictions};

/// Command-line values that win over the config file.
pub struct Overrides {
    pub towers: Option<u32>,
    pub users: Option<u32>,
    pub seed: Option<u64>,
    pub max_iterations: Option<u32>,
}

impl Overrides {
    fn apply(&self, config: &mut TowergridConfig) {
        if let Some(towers) = self.towers {
            config.scenario.towers = towers;
        }
        if let Some(users) = self.users {
            config.scenario.users = users;
        }
        if let Some(seed) = self.seed {
            config.scenario.seed = Some(seed);
            config.predictor.seed = Some(seed);
        }
        if let Some(max) = self.max_iterations {
            config.redistribution.max_iterations = max;
        }
    }
}

#[derive(Serialize)]
struct SimulateOutput<'a> {
    #[serde(flatten)]
    report: RunReport,
    stop_reason: StopReason,
    towers: Vec<TowerReport>,
    history: &'a [MoveRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    predictions: Option<Vec<Prediction>>,
}

pub fn simulate(
    mut config: TowergridConfig,
    overrides: Overrides,
    predict: bool,
    format: &str,
) -> anyhow::Result<()> {
    overrides.apply(&mut config);
    config.validate()?;

    let mut run = SimulationRun::seeded(&config.scenario);
    let before = NetworkSummary::from_towers(run.network.towers());
    info!(
        run = %run.id,
        towers = before.towers,
        users = before.users,
        overloaded = before.overloaded,
        congested = before.congested,
        needing_relief = before.needing_relief(),
        "scenario seeded"
    );

    let predictions = predict.then(|| {
        let now = epoch_secs();
        let features: Vec<TowerFeatures> = run
            .network
            .towers()
            .iter()
            .map(|t| TowerFeatures::from_tower(t, now))
            .collect();
        HeuristicPredictor::new(&config.predictor).predict(&features)
    });

    let outcome = Redistributor::new(config.redistribution).run(&mut run, predictions.as_ref());
    let after = NetworkSummary::from_towers(run.network.towers());
    let report = RunReport::new(run.id, before, after, run.users_moved(), outcome.iterations);

    match format {
        "text" => {
            println!("run {}", report.run_id);
            println!(
                "before: {} overloaded, {} congested, {:.1}% utilization",
                report.before.overloaded,
                report.before.congested,
                report.before.utilization_percentage
            );
            println!(
                "after:  {} overloaded, {} congested, {:.1}% utilization",
                report.after.overloaded,
                report.after.congested,
                report.after.utilization_percentage
            );
            println!(
                "moved {} users in {} iterations ({})",
                report.users_moved, report.iterations, outcome.stop_reason
            );
            println!(
                "towers needing relief: {} -> {}",
                report.before.needing_relief(),
                report.after.needing_relief()
            );
            println!("{}", report.improvement);
        }
        _ => {
            let output = SimulateOutput {
                report,
                stop_reason: outcome.stop_reason,
                towers: run.network.towers().iter().map(|t| t.report()).collect(),
                history: run.history(),
                predictions: predictions.as_ref().map(sorted_predictions),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
