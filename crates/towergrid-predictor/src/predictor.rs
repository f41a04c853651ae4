//! Load predictors.
//!
//! The heuristic mirrors the scoring a trained model would replace:
//!
//! ```text
//! base      = 0.6 * current + 0.4 * historical_avg
//! adjusted  = base * time_factor * weekend_factor * (1 + density / 500)
//! predicted = clamp(adjusted * (1 + noise), 10, capacity * 1.3)
//!
//! time_factor    = 1.2 at 08–10 and 17–19, else 0.8
//! weekend_factor = 0.9 on Saturday/Sunday, else 1.0
//! noise          ∈ [-jitter, +jitter]
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use towergrid_core::{PredictorConfig, TowerId};

use crate::features::TowerFeatures;

/// Predicted load (users) per tower.
pub type Predictions = HashMap<TowerId, f64>;

/// Floor applied to every heuristic prediction.
pub const MIN_PREDICTED_LOAD: f64 = 10.0;

/// Ceiling as a multiple of capacity.
pub const MAX_CAPACITY_FACTOR: f64 = 1.3;

/// Anything that turns tower features into predicted loads.
pub trait LoadPredictor: Send + Sync {
    fn predict(&self, features: &[TowerFeatures]) -> Predictions;
}

/// Closures scoring one tower at a time are predictors too.
impl<F> LoadPredictor for F
where
    F: Fn(&TowerFeatures) -> f64 + Send + Sync,
{
    fn predict(&self, features: &[TowerFeatures]) -> Predictions {
        features.iter().map(|f| (f.tower_id, self(f))).collect()
    }
}

/// Rule-based stand-in for a trained load model.
pub struct HeuristicPredictor {
    jitter: f64,
    rng: Mutex<StdRng>,
}

impl HeuristicPredictor {
    pub fn new(config: &PredictorConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            jitter: if config.jitter.is_finite() {
                config.jitter.clamp(0.0, 1.0)
            } else {
                0.0
            },
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// A predictor with no noise: identical inputs give identical outputs.
    pub fn deterministic() -> Self {
        Self::new(&PredictorConfig {
            jitter: 0.0,
            seed: Some(0),
        })
    }

    fn noise(&self) -> f64 {
        if self.jitter == 0.0 {
            return 0.0;
        }
        // A poisoned lock only means another predict() panicked mid-draw;
        // the RNG state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(-self.jitter..=self.jitter)
    }

    fn predict_one(&self, f: &TowerFeatures) -> f64 {
        let capacity = f.capacity_or_default();

        let base = f.current_load_or_default() * 0.6 + f.historical_avg_or_default() * 0.4;
        let time_factor = if f.is_peak_hour() { 1.2 } else { 0.8 };
        let weekend_factor = if f.is_weekend() { 0.9 } else { 1.0 };
        let density_factor = 1.0 + f.user_density_or_default() / 500.0;

        let adjusted = base * time_factor * weekend_factor * density_factor;
        let predicted = adjusted * (1.0 + self.noise());

        predicted
            .min(capacity * MAX_CAPACITY_FACTOR)
            .max(MIN_PREDICTED_LOAD)
    }
}

impl LoadPredictor for HeuristicPredictor {
    fn predict(&self, features: &[TowerFeatures]) -> Predictions {
        let predictions: Predictions = features
            .iter()
            .map(|f| (f.tower_id, self.predict_one(f)))
            .collect();
        debug!(towers = predictions.len(), "heuristic predictions computed");
        predictions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(id: u32, current: f64, hour: u8, day: u8) -> TowerFeatures {
        TowerFeatures {
            tower_id: TowerId(id),
            current_load: Some(current),
            capacity: Some(200.0),
            hour_of_day: hour,
            day_of_week: day,
            historical_avg_load: Some(80.0),
            user_density: Some(50.0),
        }
    }

    #[test]
    fn off_peak_weekday_formula() {
        let p = HeuristicPredictor::deterministic();
        // base = 60 + 32 = 92; * 0.8 * 1.0 * 1.1 = 80.96
        let out = p.predict(&[features(1, 100.0, 12, 2)]);
        assert!((out[&TowerId(1)] - 80.96).abs() < 1e-9);
    }

    #[test]
    fn peak_hours_raise_prediction() {
        let p = HeuristicPredictor::deterministic();
        let out = p.predict(&[features(1, 100.0, 12, 2), features(2, 100.0, 18, 2)]);
        assert!(out[&TowerId(2)] > out[&TowerId(1)]);
        assert!((out[&TowerId(2)] - 121.44).abs() < 1e-9);
    }

    #[test]
    fn weekend_lowers_prediction() {
        let p = HeuristicPredictor::deterministic();
        let out = p.predict(&[features(1, 100.0, 12, 2), features(2, 100.0, 12, 6)]);
        assert!(out[&TowerId(2)] < out[&TowerId(1)]);
    }

    #[test]
    fn clamps_to_floor_and_ceiling() {
        let p = HeuristicPredictor::deterministic();
        let mut quiet = features(1, 0.0, 3, 6);
        quiet.historical_avg_load = Some(0.0);
        let mut hot = features(2, 1000.0, 18, 1);
        hot.capacity = Some(100.0);

        let out = p.predict(&[quiet, hot]);
        assert_eq!(out[&TowerId(1)], MIN_PREDICTED_LOAD);
        assert!((out[&TowerId(2)] - 130.0).abs() < 1e-9);
    }

    #[test]
    fn jitter_stays_within_band_and_is_seeded() {
        let config = PredictorConfig {
            jitter: 0.15,
            seed: Some(11),
        };
        let a = HeuristicPredictor::new(&config);
        let b = HeuristicPredictor::new(&config);
        let input: Vec<TowerFeatures> = (0..50).map(|i| features(i, 100.0, 12, 2)).collect();

        let pa = a.predict(&input);
        let pb = b.predict(&input);
        for f in &input {
            let v = pa[&f.tower_id];
            assert!((80.96 * 0.85 - 1e-9..=80.96 * 1.15 + 1e-9).contains(&v));
            assert_eq!(v, pb[&f.tower_id]);
        }
    }

    #[test]
    fn non_finite_jitter_disables_noise() {
        let p = HeuristicPredictor::new(&PredictorConfig {
            jitter: f64::NAN,
            seed: Some(1),
        });
        let out = p.predict(&[features(1, 100.0, 12, 2)]);
        assert!((out[&TowerId(1)] - 80.96).abs() < 1e-9);
    }

    #[test]
    fn closures_are_predictors() {
        let fixed = |f: &TowerFeatures| f.current_load_or_default() * 2.0;
        let out = fixed.predict(&[features(3, 40.0, 0, 0)]);
        assert_eq!(out[&TowerId(3)], 80.0);
    }
}
