//! Scaler port: Trait for the fitted feature-scaling transform.
//!
//! The transform is fitted during training and persisted; at inference time
//! it is opaque apart from `apply`. Applying a different transform than the
//! one fitted with the model silently changes every prediction.

/// Trait for applying the persisted feature-scaling transform.
pub trait FeatureScaler: Send + Sync {
    /// Error type for scaling operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Scale a raw feature vector for model input.
    ///
    /// The output has the same length as the input.
    ///
    /// # Errors
    /// Returns an error if the vector length does not match the fitted
    /// transform.
    fn apply(&self, features: &[f64]) -> Result<Vec<f64>, Self::Error>;
}
