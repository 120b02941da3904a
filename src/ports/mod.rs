//! Ports layer: Trait definitions for external operations.
//!
//! These traits abstract the model artifacts (weight files, fitted scaler)
//! from the application logic.

pub mod scaler;
pub mod weights;

pub use scaler::FeatureScaler;
pub use weights::WeightStore;
