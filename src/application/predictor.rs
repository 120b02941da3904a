//! Inference service: Orchestrates family risk prediction.
//!
//! Lifecycle: load the weight set once at construction, then serve any
//! number of independent requests. Each request runs the full pipeline
//! build -> scale -> LSTM step -> classify -> decide as a pure synchronous
//! function; the service holds no mutable state and is safe to share
//! across threads.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Assessment, FamilyIndicators, ModelDims, ThresholdPolicy, WeightSet};
use crate::ports::{FeatureScaler, WeightStore};
use crate::StuntguardError;

/// Service for running stunting risk predictions.
#[derive(Debug)]
pub struct InferenceService<S>
where
    S: FeatureScaler,
{
    weights: Arc<WeightSet>,
    scaler: Arc<S>,
    policy: ThresholdPolicy,
}

impl<S> InferenceService<S>
where
    S: FeatureScaler,
{
    /// Load the weight set from a store and build the service.
    ///
    /// Weights are read exactly once; a failure here is fatal for request
    /// serving and is surfaced to the host, never retried.
    ///
    /// # Errors
    /// Returns `StuntguardError::WeightLoad` if any weight file is missing,
    /// malformed, or shape-inconsistent.
    pub fn load<W>(store: &W, scaler: S, policy: ThresholdPolicy) -> crate::Result<Self>
    where
        W: WeightStore,
        W::Error: Into<crate::adapters::WeightLoadError>,
    {
        let weights = store
            .load()
            .map_err(|e| StuntguardError::WeightLoad(e.into()))?;

        let dims = weights.dims();
        tracing::info!(
            features = dims.features,
            hidden = dims.hidden,
            policy = ?policy,
            "model weights loaded"
        );

        Ok(Self::with_weights(weights, scaler, policy))
    }

    /// Build the service around an already-loaded weight set.
    #[must_use]
    pub fn with_weights(weights: WeightSet, scaler: S, policy: ThresholdPolicy) -> Self {
        Self {
            weights: Arc::new(weights),
            scaler: Arc::new(scaler),
            policy,
        }
    }

    /// Dimensions of the loaded model.
    #[must_use]
    pub fn dims(&self) -> ModelDims {
        self.weights.dims()
    }

    /// Thresholding policy in use.
    #[must_use]
    pub fn policy(&self) -> ThresholdPolicy {
        self.policy
    }

    /// Run one prediction for a family.
    ///
    /// # Errors
    /// Returns `StuntguardError::ShapeMismatch` on any dimension
    /// disagreement between indicators, scaler, and weights. That is a
    /// configuration error, not a user error.
    pub fn predict(&self, indicators: &FamilyIndicators) -> crate::Result<Assessment> {
        let raw = indicators.to_vector();
        let scaled = self
            .scaler
            .apply(&raw)
            .map_err(|e| StuntguardError::ShapeMismatch(e.to_string()))?;

        let hidden = self.weights.lstm_step(&scaled)?;
        let probability = self.weights.classify(&hidden)?;

        let assessment = Assessment::new(probability, self.policy, indicators.contributing_factors());
        tracing::debug!(
            probability,
            band = %assessment.risk_band,
            factors = assessment.contributing_factors.len(),
            "prediction complete"
        );

        Ok(assessment)
    }

    /// Run one prediction from a name -> bool indicator map.
    ///
    /// # Errors
    /// Returns `StuntguardError::MissingFeature` when a required indicator
    /// is absent; the request is rejected, no partial result is produced.
    pub fn predict_map(&self, indicators: &HashMap<String, bool>) -> crate::Result<Assessment> {
        let parsed = FamilyIndicators::from_map(indicators)?;
        self.predict(&parsed)
    }

    /// Predict a batch of families.
    ///
    /// Results are in input order. The batch is an independent map; a
    /// failure on any family fails the whole call.
    ///
    /// # Errors
    /// Same failure modes as [`predict`](Self::predict).
    pub fn predict_batch(&self, families: &[FamilyIndicators]) -> crate::Result<Vec<Assessment>> {
        families.iter().map(|f| self.predict(f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::textfile::{
        StandardScaler, TextWeightStore, DENSE_BIAS_FILE, DENSE_KERNEL_FILE, LSTM_BIAS_FILE,
        LSTM_KERNEL_FILE, LSTM_RECURRENT_KERNEL_FILE,
    };
    use crate::domain::{sigmoid, RiskBand, FEATURE_NAMES};
    use std::fs;
    use std::path::Path;

    const DIMS: ModelDims = ModelDims {
        features: 11,
        hidden: 2,
    };

    /// Deterministic fixture weights; golden probabilities below were
    /// computed once against an independent implementation of the same
    /// arithmetic.
    fn write_fixture_weights(dir: &Path) {
        let width = DIMS.gate_width();

        let kernel: Vec<String> = (0..DIMS.features)
            .map(|r| {
                (0..width)
                    .map(|c| (0.05 * (r as f64 + 1.0) - 0.04 * c as f64).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        fs::write(dir.join(LSTM_KERNEL_FILE), kernel.join("\n")).unwrap();

        let recurrent: Vec<String> = (0..DIMS.hidden)
            .map(|r| {
                (0..width)
                    .map(|c| (0.01 * (r + c) as f64).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        fs::write(dir.join(LSTM_RECURRENT_KERNEL_FILE), recurrent.join("\n")).unwrap();

        let bias: Vec<String> = (0..width)
            .map(|c| (0.1 - 0.02 * c as f64).to_string())
            .collect();
        fs::write(dir.join(LSTM_BIAS_FILE), bias.join("\n")).unwrap();

        fs::write(dir.join(DENSE_KERNEL_FILE), "0.6\n0.3\n").unwrap();
        fs::write(dir.join(DENSE_BIAS_FILE), "-0.15\n").unwrap();
    }

    fn fixture_service(policy: ThresholdPolicy) -> InferenceService<StandardScaler> {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_weights(dir.path());

        let store = TextWeightStore::with_dims(dir.path(), DIMS);
        let scaler =
            StandardScaler::new(vec![0.5; DIMS.features], vec![2.0; DIMS.features]).unwrap();
        InferenceService::load(&store, scaler, policy).expect("Should load fixture weights")
    }

    fn indicators_from_bits(bits: &[u8; 11]) -> FamilyIndicators {
        let map: HashMap<String, bool> = FEATURE_NAMES
            .iter()
            .zip(bits)
            .map(|(name, &bit)| (name.to_string(), bit == 1))
            .collect();
        FamilyIndicators::from_map(&map).expect("Map is complete")
    }

    #[test]
    fn test_golden_scenario_baduta_only() {
        let service = fixture_service(ThresholdPolicy::ThreeBand);
        let indicators = indicators_from_bits(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

        let assessment = service.predict(&indicators).expect("Should predict");
        assert!((assessment.probability - 0.45030228586689086).abs() < 1e-12);
        assert_eq!(assessment.risk_band, RiskBand::Medium);
        assert_eq!(
            assessment.contributing_factors,
            vec!["Ada anak usia 0-24 bulan"]
        );
    }

    #[test]
    fn test_golden_scenario_mixed_indicators() {
        let service = fixture_service(ThresholdPolicy::ThreeBand);
        let indicators = indicators_from_bits(&[1, 0, 1, 0, 0, 1, 1, 0, 0, 0, 0]);

        let assessment = service.predict(&indicators).expect("Should predict");
        assert!((assessment.probability - 0.45206028618187444).abs() < 1e-12);
        assert_eq!(
            assessment.contributing_factors,
            vec![
                "Ada anak usia 0-24 bulan",
                "Pasangan usia subur",
                "Jamban tidak layak",
                "Ibu hamil di usia < 20 tahun",
            ]
        );
    }

    #[test]
    fn test_determinism_bit_identical() {
        let service = fixture_service(ThresholdPolicy::ThreeBand);
        let indicators = indicators_from_bits(&[0, 1, 1, 0, 1, 0, 0, 1, 0, 1, 0]);

        let first = service.predict(&indicators).expect("Should predict");
        let second = service.predict(&indicators).expect("Should predict");
        assert_eq!(first.probability.to_bits(), second.probability.to_bits());
    }

    #[test]
    fn test_probability_in_unit_interval_for_all_inputs() {
        let service = fixture_service(ThresholdPolicy::ThreeBand);

        // All 2^11 indicator combinations.
        for mask in 0u16..(1 << 11) {
            let mut bits = [0u8; 11];
            for (pos, bit) in bits.iter_mut().enumerate() {
                *bit = ((mask >> pos) & 1) as u8;
            }
            let assessment = service
                .predict(&indicators_from_bits(&bits))
                .expect("Should predict");
            assert!(
                (0.0..=1.0).contains(&assessment.probability),
                "probability {} out of range for mask {mask:b}",
                assessment.probability
            );
        }
    }

    #[test]
    fn test_predict_map_rejects_missing_indicator() {
        let service = fixture_service(ThresholdPolicy::ThreeBand);

        let map: HashMap<String, bool> = FEATURE_NAMES[..5]
            .iter()
            .map(|name| (name.to_string(), true))
            .collect();

        let err = service.predict_map(&map).unwrap_err();
        assert!(matches!(err, StuntguardError::MissingFeature(_)));
    }

    #[test]
    fn test_policies_disagree_only_on_banding() {
        let three = fixture_service(ThresholdPolicy::ThreeBand);
        let two = fixture_service(ThresholdPolicy::TwoBand);
        let indicators = indicators_from_bits(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

        let a = three.predict(&indicators).expect("Should predict");
        let b = two.predict(&indicators).expect("Should predict");

        // Same fixture probability (~0.450): Medium under ThreeBand, Low
        // under TwoBand.
        assert_eq!(a.probability.to_bits(), b.probability.to_bits());
        assert_eq!(a.risk_band, RiskBand::Medium);
        assert_eq!(b.risk_band, RiskBand::Low);
    }

    #[test]
    fn test_batch_matches_individual_predictions() {
        let service = fixture_service(ThresholdPolicy::ThreeBand);
        let families = vec![
            indicators_from_bits(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
            indicators_from_bits(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
            indicators_from_bits(&[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]),
        ];

        let batch = service.predict_batch(&families).expect("Should predict");
        assert_eq!(batch.len(), families.len());
        for (family, result) in families.iter().zip(&batch) {
            let single = service.predict(family).expect("Should predict");
            assert_eq!(single.probability.to_bits(), result.probability.to_bits());
        }
    }

    #[test]
    fn test_scaler_length_mismatch_is_shape_error() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_weights(dir.path());

        let store = TextWeightStore::with_dims(dir.path(), DIMS);
        // Scaler fitted for 9 features against an 11-feature model.
        let service =
            InferenceService::load(&store, StandardScaler::identity(9), ThresholdPolicy::ThreeBand)
                .expect("Should load");

        let err = service
            .predict(&FamilyIndicators::default())
            .unwrap_err();
        assert!(matches!(err, StuntguardError::ShapeMismatch(_)));
    }

    #[test]
    fn test_load_failure_surfaces_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        // No weight files written.
        let store = TextWeightStore::with_dims(dir.path(), DIMS);

        let err = InferenceService::load(
            &store,
            StandardScaler::identity(DIMS.features),
            ThresholdPolicy::ThreeBand,
        )
        .unwrap_err();
        assert!(matches!(err, StuntguardError::WeightLoad(_)));
    }

    #[test]
    fn test_zero_indicator_probability_is_sigmoid_of_logit() {
        // With the identity scaler and an all-clear family, every gate sees
        // only its bias; the hidden state is nonzero but finite and the
        // probability stays strictly inside (0, 1).
        let service = fixture_service(ThresholdPolicy::ThreeBand);
        let assessment = service
            .predict(&FamilyIndicators::default())
            .expect("Should predict");

        assert!(assessment.probability > 0.0 && assessment.probability < 1.0);
        assert!(assessment.contributing_factors.is_empty());
        // sanity anchor: sigmoid(0) stays exactly 0.5
        assert_eq!(sigmoid(0.0), 0.5);
    }
}
