//! Prediction inputs.

use serde::{Deserialize, Serialize};

use towergrid_core::{Tower, TowerId};

pub const DEFAULT_CURRENT_LOAD: f64 = 100.0;
pub const DEFAULT_CAPACITY: f64 = 200.0;
pub const DEFAULT_HISTORICAL_AVG_LOAD: f64 = 80.0;
pub const DEFAULT_USER_DENSITY: f64 = 50.0;

/// Feature vector for one tower. Missing values fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerFeatures {
    pub tower_id: TowerId,
    #[serde(default)]
    pub current_load: Option<f64>,
    #[serde(default)]
    pub capacity: Option<f64>,
    /// Hour of day, 0–23 (UTC).
    #[serde(default)]
    pub hour_of_day: u8,
    /// Day of week, 0 = Monday … 6 = Sunday.
    #[serde(default)]
    pub day_of_week: u8,
    #[serde(default)]
    pub historical_avg_load: Option<f64>,
    /// Users per square kilometer.
    #[serde(default)]
    pub user_density: Option<f64>,
}

impl TowerFeatures {
    /// Features for a live tower at the given unix time.
    pub fn from_tower(tower: &Tower, at_epoch_secs: u64) -> Self {
        let (hour_of_day, day_of_week) = clock_fields(at_epoch_secs);
        Self {
            tower_id: tower.id(),
            current_load: Some(tower.load() as f64),
            capacity: Some(f64::from(tower.capacity())),
            hour_of_day,
            day_of_week,
            historical_avg_load: None,
            user_density: None,
        }
    }

    pub fn current_load_or_default(&self) -> f64 {
        self.current_load.unwrap_or(DEFAULT_CURRENT_LOAD)
    }

    pub fn capacity_or_default(&self) -> f64 {
        self.capacity.unwrap_or(DEFAULT_CAPACITY)
    }

    pub fn historical_avg_or_default(&self) -> f64 {
        self.historical_avg_load.unwrap_or(DEFAULT_HISTORICAL_AVG_LOAD)
    }

    pub fn user_density_or_default(&self) -> f64 {
        self.user_density.unwrap_or(DEFAULT_USER_DENSITY)
    }

    pub fn is_peak_hour(&self) -> bool {
        matches!(self.hour_of_day, 8..=10 | 17..=19)
    }

    pub fn is_weekend(&self) -> bool {
        self.day_of_week >= 5
    }
}

/// `(hour_of_day, day_of_week)` in UTC, Monday = 0.
fn clock_fields(epoch_secs: u64) -> (u8, u8) {
    let days = epoch_secs / 86_400;
    let hour = (epoch_secs % 86_400) / 3_600;
    // 1970-01-01 was a Thursday.
    let weekday = (days + 3) % 7;
    (hour as u8, weekday as u8)
}
