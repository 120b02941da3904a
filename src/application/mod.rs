//! Application layer: Use cases orchestrating domain and ports.

pub mod analytics;
pub mod predictor;

pub use analytics::{summarize, RiskSummary};
pub use predictor::InferenceService;
