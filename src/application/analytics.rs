//! Analytics: aggregate statistics over a batch of assessments.
//!
//! Feeds the dashboard-level views (band distribution, dominant risk
//! factors) without touching the inference pipeline itself.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Assessment, RiskBand};

/// Aggregate risk summary for a set of assessed families.
#[derive(Debug, Clone, Serialize)]
pub struct RiskSummary {
    /// Families assessed
    pub total: usize,
    /// Families in the Low band
    pub low: usize,
    /// Families in the Medium band
    pub medium: usize,
    /// Families in the High band
    pub high: usize,
    /// Mean probability across all families (0.0 when empty)
    pub mean_probability: f64,
    /// Risk factor labels with occurrence counts, most frequent first
    pub factor_counts: Vec<(String, usize)>,
}

impl RiskSummary {
    /// Fraction of families in the High band (0.0 when empty).
    #[must_use]
    pub fn high_share(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.high as f64 / self.total as f64
        }
    }
}

/// Summarize a batch of assessments.
#[must_use]
pub fn summarize(assessments: &[Assessment]) -> RiskSummary {
    let mut low = 0;
    let mut medium = 0;
    let mut high = 0;
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut probability_sum = 0.0;

    for assessment in assessments {
        match assessment.risk_band {
            RiskBand::Low => low += 1,
            RiskBand::Medium => medium += 1,
            RiskBand::High => high += 1,
        }
        probability_sum += assessment.probability;
        for factor in &assessment.contributing_factors {
            *counts.entry(factor.as_str()).or_insert(0) += 1;
        }
    }

    let total = assessments.len();
    let mean_probability = if total == 0 {
        0.0
    } else {
        probability_sum / total as f64
    };

    let mut factor_counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    // BTreeMap iteration gives alphabetical order, so ties stay stable.
    factor_counts.sort_by(|a, b| b.1.cmp(&a.1));

    tracing::debug!(total, low, medium, high, "risk summary computed");

    RiskSummary {
        total,
        low,
        medium,
        high,
        mean_probability,
        factor_counts,
    }
}
