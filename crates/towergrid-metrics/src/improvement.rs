//! Before/after improvement.
//!
//! ```text
//! reduction = (before - after) / max(before, 1) * 100, rounded to 0.1
//! ```
//!
//! A category that got worse yields a negative reduction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::summary::NetworkSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    pub overloaded_reduction_pct: f64,
    pub congested_reduction_pct: f64,
}

impl fmt::Display for Improvement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "overloaded reduced {:.1}%, congested reduced {:.1}%",
            self.overloaded_reduction_pct, self.congested_reduction_pct
        )
    }
}

/// Percentage reduction from `before` to `after`, one decimal.
pub fn reduction_pct(before: usize, after: usize) -> f64 {
    let raw = (before as f64 - after as f64) / before.max(1) as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

pub fn compute_improvement(before: &NetworkSummary, after: &NetworkSummary) -> Improvement {
    Improvement {
        overloaded_reduction_pct: reduction_pct(before.overloaded, after.overloaded),
        congested_reduction_pct: reduction_pct(before.congested, after.congested),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(overloaded: usize, congested: usize) -> NetworkSummary {
        NetworkSummary {
            overloaded,
            congested,
            ..NetworkSummary::default()
        }
    }

    #[test]
    fn reduction_rounds_to_one_decimal() {
        assert_eq!(reduction_pct(3, 1), 66.7);
        assert_eq!(reduction_pct(4, 0), 100.0);
        assert_eq!(reduction_pct(0, 0), 0.0);
    }

    #[test]
    fn zero_before_uses_one_as_denominator() {
        assert_eq!(reduction_pct(0, 2), -200.0);
    }

    #[test]
    fn improvement_per_category() {
        let imp = compute_improvement(&summary(2, 4), &summary(1, 3));
        assert_eq!(imp.overloaded_reduction_pct, 50.0);
        assert_eq!(imp.congested_reduction_pct, 25.0);
        assert_eq!(
            imp.to_string(),
            "overloaded reduced 50.0%, congested reduced 25.0%"
        );
    }
}
