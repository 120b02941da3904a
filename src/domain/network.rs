//! Manual forward pass of the trained LSTM + dense sigmoid classifier.
//!
//! The weights come from a Keras model whose LSTM layer was dumped with
//! `np.savetxt`. Keras concatenates the four gate blocks along the last
//! axis in the order input, forget, candidate, output; the split here must
//! keep that order or the model silently computes something else with the
//! same shapes.

use serde::{Deserialize, Serialize};

use crate::StuntguardError;

/// Declared model dimensions: feature count F and hidden size H.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDims {
    /// Number of input features (F)
    pub features: usize,
    /// LSTM hidden units (H)
    pub hidden: usize,
}

impl ModelDims {
    /// Width of the concatenated gate dimension (4H).
    #[must_use]
    pub fn gate_width(&self) -> usize {
        4 * self.hidden
    }
}

impl Default for ModelDims {
    fn default() -> Self {
        // The exported stunting model: 11 indicators, 64 hidden units.
        Self {
            features: 11,
            hidden: 64,
        }
    }
}

/// Hidden and cell state of the LSTM cell.
///
/// Created zeroed for every independent prediction and consumed within the
/// single recurrent step; never shared across requests.
#[derive(Debug, Clone)]
pub struct RecurrentState {
    /// Hidden state, length H
    pub h: Vec<f64>,
    /// Cell state, length H
    pub c: Vec<f64>,
}

impl RecurrentState {
    /// Fresh all-zero state for the given hidden size.
    #[must_use]
    pub fn zeroed(hidden: usize) -> Self {
        Self {
            h: vec![0.0; hidden],
            c: vec![0.0; hidden],
        }
    }
}

/// Immutable set of exported model weights, validated against [`ModelDims`].
#[derive(Debug, Clone)]
pub struct WeightSet {
    dims: ModelDims,
    /// (F, 4H)
    input_kernel: Vec<Vec<f64>>,
    /// (H, 4H)
    recurrent_kernel: Vec<Vec<f64>>,
    /// (4H,)
    bias: Vec<f64>,
    /// (H,) — single output unit
    dense_kernel: Vec<f64>,
    dense_bias: f64,
}

impl WeightSet {
    /// Assemble a weight set, enforcing the shape invariants.
    ///
    /// # Errors
    /// Returns `StuntguardError::ShapeMismatch` when any array disagrees
    /// with the declared dimensions.
    pub fn new(
        dims: ModelDims,
        input_kernel: Vec<Vec<f64>>,
        recurrent_kernel: Vec<Vec<f64>>,
        bias: Vec<f64>,
        dense_kernel: Vec<f64>,
        dense_bias: f64,
    ) -> crate::Result<Self> {
        let width = dims.gate_width();

        check_matrix("input kernel", &input_kernel, dims.features, width)?;
        check_matrix("recurrent kernel", &recurrent_kernel, dims.hidden, width)?;
        if bias.len() != width {
            return Err(StuntguardError::ShapeMismatch(format!(
                "bias: expected length {width}, got {}",
                bias.len()
            )));
        }
        if dense_kernel.len() != dims.hidden {
            return Err(StuntguardError::ShapeMismatch(format!(
                "dense kernel: expected length {}, got {}",
                dims.hidden,
                dense_kernel.len()
            )));
        }

        Ok(Self {
            dims,
            input_kernel,
            recurrent_kernel,
            bias,
            dense_kernel,
            dense_bias,
        })
    }

    /// Declared dimensions of this weight set.
    #[must_use]
    pub fn dims(&self) -> ModelDims {
        self.dims
    }

    /// One LSTM step over a scaled feature vector with fresh zero state.
    ///
    /// Computes `z = x·K + h_prev·R + b`, splits `z` into the four gate
    /// blocks, applies the gate activations, updates the cell state and
    /// returns the hidden state of length H. The cell state is discarded:
    /// every prediction is a single-step inference.
    ///
    /// # Errors
    /// Returns `StuntguardError::ShapeMismatch` if the input length differs
    /// from the declared feature count. This is a configuration error and
    /// must not be retried.
    pub fn lstm_step(&self, scaled: &[f64]) -> crate::Result<Vec<f64>> {
        let ModelDims { features, hidden } = self.dims;
        if scaled.len() != features {
            return Err(StuntguardError::ShapeMismatch(format!(
                "input vector: expected length {features}, got {}",
                scaled.len()
            )));
        }

        let state = RecurrentState::zeroed(hidden);

        // z = x·K + h_prev·R + b, length 4H
        let mut z = self.bias.clone();
        for (&x, row) in scaled.iter().zip(&self.input_kernel) {
            for (acc, &k) in z.iter_mut().zip(row) {
                *acc += x * k;
            }
        }
        for (&h_prev, row) in state.h.iter().zip(&self.recurrent_kernel) {
            for (acc, &k) in z.iter_mut().zip(row) {
                *acc += h_prev * k;
            }
        }

        let (z_i, z_f, z_g, z_o) = split_gates(&z, hidden);

        let mut h = Vec::with_capacity(hidden);
        for k in 0..hidden {
            let i = sigmoid(z_i[k]);
            let f = sigmoid(z_f[k]);
            let g = z_g[k].tanh();
            let o = sigmoid(z_o[k]);
            let c = f * state.c[k] + i * g;
            h.push(o * c.tanh());
        }

        Ok(h)
    }

    /// Project the hidden state through the dense head and sigmoid.
    ///
    /// Returns the risk probability. Underflow to exactly 0.0 or 1.0 at
    /// extreme logits is acceptable, not an error.
    ///
    /// # Errors
    /// Returns `StuntguardError::ShapeMismatch` if the hidden state length
    /// differs from the declared hidden size.
    pub fn classify(&self, hidden_state: &[f64]) -> crate::Result<f64> {
        if hidden_state.len() != self.dims.hidden {
            return Err(StuntguardError::ShapeMismatch(format!(
                "hidden state: expected length {}, got {}",
                self.dims.hidden,
                hidden_state.len()
            )));
        }

        let logit: f64 = hidden_state
            .iter()
            .zip(&self.dense_kernel)
            .map(|(&h, &w)| h * w)
            .sum::<f64>()
            + self.dense_bias;

        Ok(sigmoid(logit))
    }
}

/// Logistic sigmoid, `1 / (1 + e^-x)`.
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Split the pre-activation vector into the four gate blocks.
///
/// Keras gate order: input, forget, candidate, output.
fn split_gates(z: &[f64], hidden: usize) -> (&[f64], &[f64], &[f64], &[f64]) {
    let (z_i, rest) = z.split_at(hidden);
    let (z_f, rest) = rest.split_at(hidden);
    let (z_g, z_o) = rest.split_at(hidden);
    (z_i, z_f, z_g, z_o)
}

fn check_matrix(
    name: &str,
    matrix: &[Vec<f64>],
    rows: usize,
    cols: usize,
) -> crate::Result<()> {
    if matrix.len() != rows {
        return Err(StuntguardError::ShapeMismatch(format!(
            "{name}: expected {rows} rows, got {}",
            matrix.len()
        )));
    }
    if let Some(row) = matrix.iter().find(|row| row.len() != cols) {
        return Err(StuntguardError::ShapeMismatch(format!(
            "{name}: expected {cols} columns, got {}",
            row.len()
        )));
    }
    Ok(())
}
