//! Recommendation tiers over predicted load.
//!
//! ```text
//! predicted % > 90  → critical, immediate redistribution
//! predicted % > 80  → high,     preventive redistribution
//! predicted % > 70  → medium,   monitor closely
//! predicted % < 50  → low,      capacity optimization
//! ```
//!
//! Recommendations are ranked by priority, then urgency, both descending.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use towergrid_core::{TowerId, load_percentage};

use crate::features::TowerFeatures;
use crate::predictor::Predictions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    ImmediateRedistribution,
    PreventiveRedistribution,
    MonitorClosely,
    CapacityOptimization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub tower_id: TowerId,
    pub priority: Priority,
    pub action: RecommendedAction,
    pub current_load: f64,
    pub predicted_load: f64,
    pub predicted_percentage: f64,
    /// 0–100; higher means act sooner.
    pub urgency: f64,
    pub message: String,
}

/// Network-wide view of the predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkOutlook {
    pub total_predicted_load: f64,
    pub total_capacity: f64,
    pub utilization_percentage: f64,
    pub critical_towers: usize,
    pub high_risk_towers: usize,
    pub recommendations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub recommendations: Vec<Recommendation>,
    pub outlook: NetworkOutlook,
}

fn classify(pct: f64) -> Option<(Priority, RecommendedAction, f64)> {
    if pct > 90.0 {
        Some((Priority::Critical, RecommendedAction::ImmediateRedistribution, pct))
    } else if pct > 80.0 {
        Some((Priority::High, RecommendedAction::PreventiveRedistribution, pct))
    } else if pct > 70.0 {
        Some((Priority::Medium, RecommendedAction::MonitorClosely, pct))
    } else if pct < 50.0 {
        Some((Priority::Low, RecommendedAction::CapacityOptimization, 100.0 - pct))
    } else {
        None
    }
}

fn message(priority: Priority, tower: TowerId, pct: f64) -> String {
    match priority {
        Priority::Critical => format!("{tower} predicted at {pct:.1}% of capacity, redistribute now"),
        Priority::High => format!("{tower} predicted at {pct:.1}% of capacity, plan redistribution"),
        Priority::Medium => format!("{tower} predicted at {pct:.1}% of capacity, monitor closely"),
        Priority::Low => format!("{tower} predicted at {pct:.1}% of capacity, spare capacity available"),
    }
}

/// Build ranked recommendations for every tower with a prediction.
///
/// Towers in `features` without an entry in `predictions` are skipped.
pub fn recommend(features: &[TowerFeatures], predictions: &Predictions) -> RecommendationReport {
    let mut recommendations = Vec::new();
    let mut total_predicted = 0.0;
    let mut total_capacity = 0.0;

    for f in features {
        let Some(&predicted) = predictions.get(&f.tower_id) else {
            continue;
        };
        let capacity = f.capacity_or_default();
        total_predicted += predicted;
        total_capacity += capacity;

        let pct = load_percentage(predicted, capacity);
        if let Some((priority, action, urgency)) = classify(pct) {
            recommendations.push(Recommendation {
                tower_id: f.tower_id,
                priority,
                action,
                current_load: f.current_load_or_default(),
                predicted_load: predicted,
                predicted_percentage: pct,
                urgency,
                message: message(priority, f.tower_id, pct),
            });
        }
    }

    recommendations.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.urgency.partial_cmp(&a.urgency).unwrap_or(Ordering::Equal))
    });

    let outlook = NetworkOutlook {
        total_predicted_load: total_predicted,
        total_capacity,
        utilization_percentage: load_percentage(total_predicted, total_capacity),
        critical_towers: recommendations
            .iter()
            .filter(|r| r.priority == Priority::Critical)
            .count(),
        high_risk_towers: recommendations
            .iter()
            .filter(|r| r.priority == Priority::High)
            .count(),
        recommendations: recommendations.len(),
    };

    RecommendationReport {
        recommendations,
        outlook,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tower(id: u32) -> TowerFeatures {
        TowerFeatures {
            tower_id: TowerId(id),
            current_load: Some(100.0),
            capacity: Some(100.0),
            hour_of_day: 12,
            day_of_week: 2,
            historical_avg_load: None,
            user_density: None,
        }
    }

    fn predictions(pairs: &[(u32, f64)]) -> Predictions {
        pairs.iter().map(|&(id, v)| (TowerId(id), v)).collect()
    }

    #[test]
    fn tiers_follow_predicted_percentage() {
        let features: Vec<_> = (1..=5).map(tower).collect();
        let preds = predictions(&[(1, 95.0), (2, 85.0), (3, 75.0), (4, 60.0), (5, 20.0)]);

        let report = recommend(&features, &preds);
        let got: Vec<(TowerId, Priority)> = report
            .recommendations
            .iter()
            .map(|r| (r.tower_id, r.priority))
            .collect();

        // 60% falls between the low and medium bands and gets nothing.
        assert_eq!(
            got,
            vec![
                (TowerId(1), Priority::Critical),
                (TowerId(2), Priority::High),
                (TowerId(3), Priority::Medium),
                (TowerId(5), Priority::Low),
            ]
        );
        assert_eq!(report.recommendations[3].urgency, 80.0);
        assert_eq!(
            report.recommendations[3].action,
            RecommendedAction::CapacityOptimization
        );
    }

    #[test]
    fn same_priority_ranks_by_urgency() {
        let features: Vec<_> = (1..=3).map(tower).collect();
        let preds = predictions(&[(1, 92.0), (2, 120.0), (3, 99.0)]);

        let report = recommend(&features, &preds);
        let ids: Vec<u32> = report.recommendations.iter().map(|r| r.tower_id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn outlook_totals() {
        let features: Vec<_> = (1..=2).map(tower).collect();
        let preds = predictions(&[(1, 95.0), (2, 85.0)]);

        let outlook = recommend(&features, &preds).outlook;
        assert_eq!(outlook.total_capacity, 200.0);
        assert_eq!(outlook.utilization_percentage, 90.0);
        assert_eq!(outlook.critical_towers, 1);
        assert_eq!(outlook.high_risk_towers, 1);
        assert_eq!(outlook.recommendations, 2);
    }

    #[test]
    fn towers_without_prediction_are_skipped() {
        let features = vec![tower(1), tower(2)];
        let report = recommend(&features, &predictions(&[(2, 95.0)]));
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.outlook.total_capacity, 100.0);
    }
}
