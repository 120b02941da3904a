//! Weight store port: Trait for loading the exported model weights.
//!
//! Weights are immutable after export; implementations load them once at
//! startup and the result is reused for the process lifetime. A load
//! failure is fatal and never retried.

use crate::domain::WeightSet;

/// Trait for loading a validated weight set from persisted storage.
pub trait WeightStore: Send + Sync {
    /// Error type for load operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and validate the full weight set.
    ///
    /// # Errors
    /// Returns an error when a file is missing, malformed, or
    /// shape-inconsistent with the declared dimensions.
    fn load(&self) -> Result<WeightSet, Self::Error>;
}
