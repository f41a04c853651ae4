use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use towergrid_core::{TowerId, TowergridConfig};
use towergrid_predictor::Predictions;

pub mod decide;
pub mod predict;
pub mod simulate;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<TowergridConfig> {
    match path {
        Some(path) => TowergridConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(TowergridConfig::default()),
    }
}

pub fn show_config(config: &TowergridConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}

/// Read a JSON array from `path`.
pub fn read_json_array<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

#[derive(Serialize)]
pub struct Prediction {
    pub tower_id: TowerId,
    pub predicted_load: f64,
}

/// Predictions as a list ordered by tower id.
pub fn sorted_predictions(predicted: &Predictions) -> Vec<Prediction> {
    let mut predictions: Vec<Prediction> = predicted
        .iter()
        .map(|(&tower_id, &predicted_load)| Prediction {
            tower_id,
            predicted_load,
        })
        .collect();
    predictions.sort_by_key(|p| p.tower_id);
    predictions
}
