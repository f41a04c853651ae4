use std::path::Path;

use serde::Serialize;
use towergrid_core::TowergridConfig;
use towergrid_predictor::{
    HeuristicPredictor, LoadPredictor, RecommendationReport, TowerFeatures, recommend,
};

use super::{Prediction, sorted_predictions};

#[derive(Serialize)]
struct PredictOutput {
    predictions: Vec<Prediction>,
    #[serde(flatten)]
    report: RecommendationReport,
}

pub fn predict(config: TowergridConfig, input: &Path, seed: Option<u64>) -> anyhow::Result<()> {
    let features: Vec<TowerFeatures> = super::read_json_array(input)?;

    let mut predictor_config = config.predictor;
    if seed.is_some() {
        predictor_config.seed = seed;
    }
    let predictor = HeuristicPredictor::new(&predictor_config);
    let predicted = predictor.predict(&features);

    let output = PredictOutput {
        predictions: sorted_predictions(&predicted),
        report: recommend(&features, &predicted),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
