//! Adapters layer: Concrete implementations of ports.
//!
//! - `textfile`: plain-text weight matrices and scaler parameters, as
//!   exported from the trained model with `np.savetxt`.

pub mod textfile;

pub use textfile::{ScaleError, StandardScaler, TextWeightStore, WeightLoadError};
