// src/lstm.rs

use ndarray::{Array1, Array2};
use serde_json::Value;

use crate::error::ModelError;
use crate::layer::{parse_matrix, parse_vector};
use crate::math;

// One learned gate projection: input weights, recurrent weights, bias.
#[derive(Debug)]
struct Gate {
    w: Array2<f32>,
    u: Array2<f32>,
    b: Array1<f32>,
}

impl Gate {
    fn zeros(input_dim: usize, hidden_dim: usize) -> Self {
        Self {
            w: Array2::zeros((hidden_dim, input_dim)),
            u: Array2::zeros((hidden_dim, hidden_dim)),
            b: Array1::zeros(hidden_dim),
        }
    }

    // Pre-activation: W.x + U.h + b.
    fn project(&self, x: &Array1<f32>, hidden: &Array1<f32>) -> Array1<f32> {
        self.w.dot(x) + self.u.dot(hidden) + &self.b
    }
}

/// Gated recurrent layer. The three gates use the hard sigmoid; the
/// candidate and the output nonlinearity use the true tanh. That mixture
/// matches the exporting framework and must not be collapsed into one
/// sigmoid variant. `hidden` and `cell` are transient working state, not
/// model parameters; they are zeroed by `reset()` before each sequence.
#[derive(Debug)]
pub struct Lstm {
    name: String,
    input_dim: usize,
    hidden_dim: usize,
    forget: Gate,
    input: Gate,
    output: Gate,
    candidate: Gate,
    hidden: Array1<f32>,
    cell: Array1<f32>,
}

impl Lstm {
    pub fn new(name: &str, input_dim: usize, hidden_dim: usize) -> Self {
        Self {
            name: name.to_string(),
            input_dim,
            hidden_dim,
            forget: Gate::zeros(input_dim, hidden_dim),
            input: Gate::zeros(input_dim, hidden_dim),
            output: Gate::zeros(input_dim, hidden_dim),
            candidate: Gate::zeros(input_dim, hidden_dim),
            hidden: Array1::zeros(hidden_dim),
            cell: Array1::zeros(hidden_dim),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn parse_gate(&self, blobs: &Value, suffix: &str) -> Result<Gate, ModelError> {
        Ok(Gate {
            w: parse_matrix(
                blobs,
                &format!("{}_W_{}", self.name, suffix),
                self.hidden_dim,
                self.input_dim,
            )?,
            u: parse_matrix(
                blobs,
                &format!("{}_U_{}", self.name, suffix),
                self.hidden_dim,
                self.hidden_dim,
            )?,
            b: parse_vector(blobs, &format!("{}_b_{}", self.name, suffix), self.hidden_dim)?,
        })
    }

    /// Binds the twelve blobs `<name>_W_g`, `<name>_U_g`, `<name>_b_g` for
    /// g in {f, i, o, c}.
    pub fn bind_weights(&mut self, blobs: &Value) -> Result<(), ModelError> {
        self.forget = self.parse_gate(blobs, "f")?;
        self.input = self.parse_gate(blobs, "i")?;
        self.output = self.parse_gate(blobs, "o")?;
        self.candidate = self.parse_gate(blobs, "c")?;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.hidden.fill(0.0);
        self.cell.fill(0.0);
    }

    pub fn transform(&mut self, x: &Array1<f32>) -> Result<Array1<f32>, ModelError> {
        if x.len() != self.input_dim {
            return Err(ModelError::DimensionMismatch {
                expected: self.input_dim,
                got: x.len(),
            });
        }
        let f = math::hard_sigmoid(&self.forget.project(x, &self.hidden));
        let i = math::hard_sigmoid(&self.input.project(x, &self.hidden));
        let o = math::hard_sigmoid(&self.output.project(x, &self.hidden));
        let cand = math::tanh(&self.candidate.project(x, &self.hidden));
        let cell = &f * &self.cell + &i * &cand;
        let hidden = &o * &math::tanh(&cell);
        self.cell = cell;
        self.hidden = hidden.clone();
        Ok(hidden)
    }
}
