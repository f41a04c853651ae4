//! towergrid.toml configuration parser.
//!
//! Every section and every field is optional; omitted values take the
//! documented defaults.
//!
//! ```toml
//! [policy]
//! overload_threshold = 85.0
//!
//! [redistribution]
//! max_iterations = 500
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowergridConfig {
    pub policy: PolicyConfig,
    pub redistribution: RedistributionConfig,
    pub scenario: ScenarioConfig,
    pub predictor: PredictorConfig,
}

/// Thresholds for the per-tower stay/migrate policy (all percentages).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// A stable tower starts migrating above this load.
    pub overload_threshold: f64,
    /// A migrating tower keeps migrating only above this load.
    pub hysteresis_threshold: f64,
    /// Above this handover failure rate every decision is forced to stay.
    pub max_handover_failure_rate: f64,
    /// Reserved for batch-level rollback; not applied to single decisions.
    pub rollback_threshold: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            overload_threshold: 80.0,
            hysteresis_threshold: 70.0,
            max_handover_failure_rate: 10.0,
            rollback_threshold: 15.0,
        }
    }
}

impl PolicyConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("overload_threshold", self.overload_threshold),
            ("hysteresis_threshold", self.hysteresis_threshold),
            ("max_handover_failure_rate", self.max_handover_failure_rate),
            ("rollback_threshold", self.rollback_threshold),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "policy.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.hysteresis_threshold > self.overload_threshold {
            return Err(ConfigError::Invalid(format!(
                "policy.hysteresis_threshold ({}) must not exceed policy.overload_threshold ({})",
                self.hysteresis_threshold, self.overload_threshold
            )));
        }
        Ok(())
    }
}

/// Parameters of the greedy redistribution loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedistributionConfig {
    /// Hard cap on loop iterations.
    pub max_iterations: u32,
    /// Users moved per iteration at most.
    pub batch_size: u32,
    /// Towers strictly below this load percentage can receive users.
    pub target_band_pct: f64,
}

impl Default for RedistributionConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            batch_size: 5,
            target_band_pct: 70.0,
        }
    }
}

impl RedistributionConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "redistribution.batch_size must be at least 1".to_string(),
            ));
        }
        if !self.target_band_pct.is_finite() || self.target_band_pct <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "redistribution.target_band_pct must be positive, got {}",
                self.target_band_pct
            )));
        }
        Ok(())
    }
}

/// Synthetic network generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub towers: u32,
    pub users: u32,
    pub capacity_min: u32,
    pub capacity_max: u32,
    /// Number of towers that receive the hotspot share of users.
    pub hotspot_towers: u32,
    /// Fraction of users (0.0–1.0) seeded onto hotspot towers.
    pub hotspot_share: f64,
    /// RNG seed. Random when absent.
    pub seed: Option<u64>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            towers: 5,
            users: 150,
            capacity_min: 150,
            capacity_max: 250,
            hotspot_towers: 2,
            hotspot_share: 0.7,
            seed: None,
        }
    }
}

impl ScenarioConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.capacity_min > self.capacity_max {
            return Err(ConfigError::Invalid(format!(
                "scenario.capacity_min ({}) exceeds scenario.capacity_max ({})",
                self.capacity_min, self.capacity_max
            )));
        }
        if !(0.0..=1.0).contains(&self.hotspot_share) {
            return Err(ConfigError::Invalid(format!(
                "scenario.hotspot_share must be within 0.0..=1.0, got {}",
                self.hotspot_share
            )));
        }
        Ok(())
    }
}

/// Stand-in load predictor settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Relative noise applied to each prediction (0.15 = ±15%).
    pub jitter: f64,
    pub seed: Option<u64>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            jitter: 0.15,
            seed: None,
        }
    }
}

impl PredictorConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.jitter) {
            return Err(ConfigError::Invalid(format!(
                "predictor.jitter must be between 0.0 and 1.0, got {}",
                self.jitter
            )));
        }
        Ok(())
    }
}

impl TowergridConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: TowergridConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.policy.validate()?;
        self.redistribution.validate()?;
        self.scenario.validate()?;
        self.predictor.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = TowergridConfig::from_toml_str("").unwrap();
        assert_eq!(config, TowergridConfig::default());
        assert_eq!(config.policy.overload_threshold, 80.0);
        assert_eq!(config.policy.hysteresis_threshold, 70.0);
        assert_eq!(config.policy.max_handover_failure_rate, 10.0);
        assert_eq!(config.policy.rollback_threshold, 15.0);
        assert_eq!(config.redistribution.batch_size, 5);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let toml_str = r#"
[policy]
overload_threshold = 90.0

[redistribution]
max_iterations = 1000
"#;
        let config = TowergridConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.policy.overload_threshold, 90.0);
        assert_eq!(config.policy.hysteresis_threshold, 70.0);
        assert_eq!(config.redistribution.max_iterations, 1000);
        assert_eq!(config.redistribution.target_band_pct, 70.0);
    }

    #[test]
    fn rejects_hysteresis_above_overload() {
        let toml_str = r#"
[policy]
overload_threshold = 60.0
"#;
        let err = TowergridConfig::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_batch() {
        let config = RedistributionConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_or_out_of_range_jitter() {
        let err = TowergridConfig::from_toml_str("[predictor]\njitter = nan\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        for jitter in [f64::INFINITY, -0.1, 1.5] {
            let config = PredictorConfig {
                jitter,
                seed: None,
            };
            assert!(config.validate().is_err(), "jitter {jitter}");
        }
        assert!(PredictorConfig::default().validate().is_ok());
    }

    #[test]
    fn roundtrips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("towergrid.toml");

        let mut config = TowergridConfig::default();
        config.scenario.seed = Some(9);
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        let back = TowergridConfig::from_file(&path).unwrap();
        assert_eq!(back, config);
    }
}
