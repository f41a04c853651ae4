//! Identifiers and small value types shared across TowerGrid crates.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Load percentage above which a tower is overloaded.
pub const OVERLOADED_ABOVE_PCT: f64 = 100.0;

/// Load percentage above which a tower is congested.
pub const CONGESTED_ABOVE_PCT: f64 = 80.0;

/// Stable, unique identifier of a tower.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TowerId(pub u32);

impl fmt::Display for TowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tower-{}", self.0)
    }
}

/// Identifier of a mobile user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user-{}", self.0)
    }
}

/// A point on the map (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// What a user is doing on the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageCategory {
    Call,
    Data,
    Video,
}

impl UsageCategory {
    pub const ALL: [UsageCategory; 3] = [Self::Call, Self::Data, Self::Video];

    /// Per-session consumption range in MB, `(low, high)`.
    pub fn consumption_range_mb(self) -> (f64, f64) {
        match self {
            Self::Call => (0.1, 0.5),
            Self::Data => (1.0, 10.0),
            Self::Video => (5.0, 50.0),
        }
    }
}

/// Load band of a tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerStatus {
    Normal,
    Congested,
    Overloaded,
}

impl TowerStatus {
    /// Classify a load percentage into a status band.
    pub fn from_load_percentage(pct: f64) -> Self {
        if pct > OVERLOADED_ABOVE_PCT {
            Self::Overloaded
        } else if pct > CONGESTED_ABOVE_PCT {
            Self::Congested
        } else {
            Self::Normal
        }
    }

    /// Overloaded and congested towers are candidates for draining.
    pub fn needs_relief(self) -> bool {
        matches!(self, Self::Overloaded | Self::Congested)
    }
}

impl fmt::Display for TowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normal => "normal",
            Self::Congested => "congested",
            Self::Overloaded => "overloaded",
        };
        f.write_str(s)
    }
}

/// `load / capacity * 100`, or 0 when capacity is zero or the ratio is
/// not a finite number.
pub fn load_percentage(load: f64, capacity: f64) -> f64 {
    if !(capacity > 0.0 && load > 0.0) {
        return 0.0;
    }
    let pct = load / capacity * 100.0;
    if pct.is_finite() { pct } else { 0.0 }
}

/// Current unix time in seconds.
pub fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
