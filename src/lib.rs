//! # Stuntguard
//!
//! Stunting family-risk classification from raw exported LSTM weights.
//!
//! This crate reimplements the forward pass of a trained single-layer LSTM
//! plus dense sigmoid classifier directly from its exported weight matrices,
//! without any neural-network runtime. Given 11 boolean household indicators
//! it produces a risk probability, a risk band, and the list of contributing
//! risk factors.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (indicators, weights, LSTM math, assessment)
//! - `ports`: Trait definitions for external operations (scaler, weight store)
//! - `adapters`: Concrete implementations (plain-text weight/scaler files)
//! - `application`: Use cases orchestrating domain and ports

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use application::InferenceService;
pub use domain::{Assessment, FamilyIndicators, RiskBand, ThresholdPolicy};

/// Result type for Stuntguard operations
pub type Result<T> = std::result::Result<T, StuntguardError>;

/// Main error type for Stuntguard
#[derive(Debug, thiserror::Error)]
pub enum StuntguardError {
    #[error("failed to load model weights: {0}")]
    WeightLoad(#[from] adapters::WeightLoadError),

    #[error("missing required indicator: {0}")]
    MissingFeature(String),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
