//! Plain-text model artifact adapters.
//!
//! The training pipeline dumps each weight array with `np.savetxt`:
//! whitespace-delimited numbers, one matrix row per line, 1-D arrays one
//! value per line. Lines starting with `#` are `savetxt` headers and are
//! skipped. The fitted standard scaler is persisted in the same format as
//! two rows: per-feature means, then per-feature scales.

use std::path::{Path, PathBuf};

use crate::domain::{ModelDims, WeightSet};
use crate::ports::{FeatureScaler, WeightStore};

/// File names produced by the weight export script.
pub const LSTM_KERNEL_FILE: &str = "lstm_kernel.txt";
pub const LSTM_RECURRENT_KERNEL_FILE: &str = "lstm_recurrent_kernel.txt";
pub const LSTM_BIAS_FILE: &str = "lstm_bias.txt";
pub const DENSE_KERNEL_FILE: &str = "dense_kernel.txt";
pub const DENSE_BIAS_FILE: &str = "dense_bias.txt";
pub const SCALER_FILE: &str = "scaler.txt";

/// Error loading persisted model artifacts.
#[derive(Debug, thiserror::Error)]
pub enum WeightLoadError {
    #[error("model file not found: {path:?}")]
    Missing { path: PathBuf },

    #[error("malformed number {token:?} in {path:?} at line {line}")]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("{file}: expected shape {expected}, got {actual}")]
    Shape {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("inconsistent weight shapes: {0}")]
    Inconsistent(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Weight store reading the five `np.savetxt` files from one directory.
#[derive(Debug, Clone)]
pub struct TextWeightStore {
    dir: PathBuf,
    dims: ModelDims,
}

impl TextWeightStore {
    /// Store for the default model dimensions (11 features, 64 hidden units).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_dims(dir, ModelDims::default())
    }

    /// Store validating against explicit dimensions.
    #[must_use]
    pub fn with_dims(dir: impl Into<PathBuf>, dims: ModelDims) -> Self {
        Self {
            dir: dir.into(),
            dims,
        }
    }

    /// Dimensions this store validates against.
    #[must_use]
    pub fn dims(&self) -> ModelDims {
        self.dims
    }

    fn read_matrix_checked(
        &self,
        file: &str,
        rows: usize,
        cols: usize,
    ) -> Result<Vec<Vec<f64>>, WeightLoadError> {
        let matrix = read_rows(&self.dir.join(file))?;
        if matrix.len() != rows || matrix.iter().any(|row| row.len() != cols) {
            let actual_cols = matrix.first().map_or(0, Vec::len);
            return Err(WeightLoadError::Shape {
                file: file.to_string(),
                expected: format!("({rows}, {cols})"),
                actual: format!("({}, {})", matrix.len(), actual_cols),
            });
        }
        Ok(matrix)
    }

    fn read_vector_checked(&self, file: &str, len: usize) -> Result<Vec<f64>, WeightLoadError> {
        let values = read_flat(&self.dir.join(file))?;
        if values.len() != len {
            return Err(WeightLoadError::Shape {
                file: file.to_string(),
                expected: format!("({len},)"),
                actual: format!("({},)", values.len()),
            });
        }
        Ok(values)
    }

    fn read_scalar(&self, file: &str) -> Result<f64, WeightLoadError> {
        let values = read_flat(&self.dir.join(file))?;
        match values.as_slice() {
            [value] => Ok(*value),
            _ => Err(WeightLoadError::Shape {
                file: file.to_string(),
                expected: "()".to_string(),
                actual: format!("({},)", values.len()),
            }),
        }
    }
}

impl WeightStore for TextWeightStore {
    type Error = WeightLoadError;

    fn load(&self) -> Result<WeightSet, WeightLoadError> {
        let ModelDims { features, hidden } = self.dims;
        let width = self.dims.gate_width();

        let input_kernel = self.read_matrix_checked(LSTM_KERNEL_FILE, features, width)?;
        let recurrent_kernel =
            self.read_matrix_checked(LSTM_RECURRENT_KERNEL_FILE, hidden, width)?;
        let bias = self.read_vector_checked(LSTM_BIAS_FILE, width)?;
        let dense_kernel = self.read_vector_checked(DENSE_KERNEL_FILE, hidden)?;
        let dense_bias = self.read_scalar(DENSE_BIAS_FILE)?;

        WeightSet::new(
            self.dims,
            input_kernel,
            recurrent_kernel,
            bias,
            dense_kernel,
            dense_bias,
        )
        .map_err(|e| WeightLoadError::Inconsistent(e.to_string()))
    }
}

/// Error applying a fitted scaler to a vector of the wrong length.
#[derive(Debug, thiserror::Error)]
#[error("scaler fitted for {expected} features, got {actual}")]
pub struct ScaleError {
    pub expected: usize,
    pub actual: usize,
}

/// Standardization transform `(x - mean) / scale`, fitted during training.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler from fitted parameters.
    ///
    /// # Errors
    /// Returns `WeightLoadError::Inconsistent` when the parameter rows
    /// disagree in length or a scale entry is zero.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, WeightLoadError> {
        if mean.len() != scale.len() {
            return Err(WeightLoadError::Inconsistent(format!(
                "scaler mean has {} entries but scale has {}",
                mean.len(),
                scale.len()
            )));
        }
        if let Some(idx) = scale.iter().position(|&s| s == 0.0) {
            return Err(WeightLoadError::Inconsistent(format!(
                "scaler scale is zero at index {idx}"
            )));
        }
        Ok(Self { mean, scale })
    }

    /// Identity transform (mean 0, scale 1) for the given feature count.
    #[must_use]
    pub fn identity(features: usize) -> Self {
        Self {
            mean: vec![0.0; features],
            scale: vec![1.0; features],
        }
    }

    /// Load fitted parameters from a two-row text file: means, then scales.
    ///
    /// # Errors
    /// Returns a `WeightLoadError` on missing file, malformed numbers, or
    /// a row count other than two.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WeightLoadError> {
        let path = path.as_ref();
        let rows = read_rows(path)?;
        match <[Vec<f64>; 2]>::try_from(rows) {
            Ok([mean, scale]) => Self::new(mean, scale),
            Err(rows) => Err(WeightLoadError::Shape {
                file: path.display().to_string(),
                expected: "(2, F)".to_string(),
                actual: format!("({}, _)", rows.len()),
            }),
        }
    }

    /// Number of features the transform was fitted for.
    #[must_use]
    pub fn features(&self) -> usize {
        self.mean.len()
    }
}

impl FeatureScaler for StandardScaler {
    type Error = ScaleError;

    fn apply(&self, features: &[f64]) -> Result<Vec<f64>, ScaleError> {
        if features.len() != self.mean.len() {
            return Err(ScaleError {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }
}

/// Read a whitespace-delimited numeric file as rows, skipping blank and
/// `#`-header lines.
fn read_rows(path: &Path) -> Result<Vec<Vec<f64>>, WeightLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            WeightLoadError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            WeightLoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let mut rows = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row = trimmed
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| WeightLoadError::Parse {
                    path: path.to_path_buf(),
                    line: line_no + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, WeightLoadError>>()?;
        rows.push(row);
    }
    Ok(rows)
}

/// Read a numeric file as one flat vector, regardless of line layout.
fn read_flat(path: &Path) -> Result<Vec<f64>, WeightLoadError> {
    Ok(read_rows(path)?.into_iter().flatten().collect())
}
