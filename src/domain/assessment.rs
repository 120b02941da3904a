//! Risk assessment types.
//!
//! Turns the raw model probability into a categorical risk band plus the
//! list of contributing risk factors.

use serde::{Deserialize, Serialize};

/// Risk band for family stunting vulnerability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    /// Low risk of stunting
    Low,
    /// Medium risk, follow-up recommended
    Medium,
    /// High risk, intervention recommended
    High,
}

impl RiskBand {
    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - No significant indicators",
            Self::Medium => "Medium risk - Follow-up recommended",
            Self::High => "High risk - Immediate intervention advised",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Probability thresholding policy.
///
/// The dashboards this model served used two variants; `ThreeBand` is the
/// more informative default, `TwoBand` is the simplified screening mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThresholdPolicy {
    /// p > 0.7 is High, 0.3 < p <= 0.7 is Medium, p <= 0.3 is Low
    #[default]
    ThreeBand,
    /// p >= 0.5 is High, else Low (the 0.5 bound is inclusive)
    TwoBand,
}

impl ThresholdPolicy {
    /// Classify a probability into a risk band.
    #[must_use]
    pub fn classify(&self, probability: f64) -> RiskBand {
        match self {
            Self::ThreeBand => {
                if probability > 0.7 {
                    RiskBand::High
                } else if probability > 0.3 {
                    RiskBand::Medium
                } else {
                    RiskBand::Low
                }
            }
            Self::TwoBand => {
                if probability >= 0.5 {
                    RiskBand::High
                } else {
                    RiskBand::Low
                }
            }
        }
    }
}

/// Complete assessment for one family, returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    /// Raw model probability (0.0 to 1.0)
    pub probability: f64,

    /// Risk classification under the chosen policy
    pub risk_band: RiskBand,

    /// Labels of the indicators that are set, in feature order
    pub contributing_factors: Vec<String>,

    /// Timestamp of the assessment
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// Create an assessment from a probability and the raw indicators'
    /// factor labels.
    #[must_use]
    pub fn new(
        probability: f64,
        policy: ThresholdPolicy,
        contributing_factors: Vec<String>,
    ) -> Self {
        Self {
            probability,
            risk_band: policy.classify(probability),
            contributing_factors,
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_band_thresholds() {
        let policy = ThresholdPolicy::ThreeBand;
        assert_eq!(policy.classify(0.1), RiskBand::Low);
        assert_eq!(policy.classify(0.3), RiskBand::Low);
        assert_eq!(policy.classify(0.31), RiskBand::Medium);
        assert_eq!(policy.classify(0.7), RiskBand::Medium);
        assert_eq!(policy.classify(0.71), RiskBand::High);
        assert_eq!(policy.classify(0.9), RiskBand::High);
    }

    #[test]
    fn test_two_band_thresholds() {
        let policy = ThresholdPolicy::TwoBand;
        assert_eq!(policy.classify(0.49), RiskBand::Low);
        assert_eq!(policy.classify(0.5), RiskBand::High);
        assert_eq!(policy.classify(0.9), RiskBand::High);
    }

    #[test]
    fn test_half_probability_diverges_between_policies() {
        // The two policies disagree at exactly 0.5: Medium vs High.
        assert_eq!(ThresholdPolicy::ThreeBand.classify(0.5), RiskBand::Medium);
        assert_eq!(ThresholdPolicy::TwoBand.classify(0.5), RiskBand::High);
    }

    #[test]
    fn test_assessment_creation() {
        let assessment = Assessment::new(
            0.8,
            ThresholdPolicy::ThreeBand,
            vec!["Jamban tidak layak".to_string()],
        );

        assert_eq!(assessment.risk_band, RiskBand::High);
        assert_eq!(assessment.contributing_factors.len(), 1);
    }
}
