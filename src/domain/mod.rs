//! Domain layer: core business types and the numeric model.

pub mod assessment;
pub mod indicators;
pub mod network;

pub use assessment::{Assessment, RiskBand, ThresholdPolicy};
pub use indicators::{FamilyIndicators, FEATURE_COUNT, FEATURE_NAMES};
pub use network::{sigmoid, ModelDims, RecurrentState, WeightSet};
