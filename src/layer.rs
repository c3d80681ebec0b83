// src/layer.rs
//
// The layer contract shared by all variants: reset transient state, bind
// weight blobs once after construction, transform one timestep vector.
// The chain is a closed set of variants dispatched by match; the builder
// in `model.rs` is the single point that maps class tags to variants.

use ndarray::{Array1, Array2};
use serde_json::Value;

use crate::activation::Activation;
use crate::codec;
use crate::dense::Dense;
use crate::error::ModelError;
use crate::lstm::Lstm;

#[derive(Debug)]
pub enum Layer {
    Dense(Dense),
    Activation(Activation),
    Lstm(Lstm),
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Layer::Dense(l) => l.name(),
            Layer::Activation(l) => l.name(),
            Layer::Lstm(l) => l.name(),
        }
    }

    /// Whether every timestep output survives into the next layer's input.
    /// The LSTM collapses the sequence to its final hidden vector; dense
    /// and activation layers pass the full sequence through.
    pub fn propagate_sequence(&self) -> bool {
        !matches!(self, Layer::Lstm(_))
    }

    /// True for variants that carry learned parameters and therefore need
    /// a weights sub-document at bind time.
    pub fn has_weights(&self) -> bool {
        !matches!(self, Layer::Activation(_))
    }

    /// Clears transient recurrent state. Called once before each sequence
    /// evaluation; a no-op for stateless variants.
    pub fn reset(&mut self) {
        if let Layer::Lstm(l) = self {
            l.reset();
        }
    }

    /// Parses and stores this layer's parameters from its named blobs.
    /// Called exactly once after construction, before any transform.
    pub fn bind_weights(&mut self, blobs: &Value) -> Result<(), ModelError> {
        match self {
            Layer::Dense(l) => l.bind_weights(blobs),
            Layer::Activation(_) => Ok(()),
            Layer::Lstm(l) => l.bind_weights(blobs),
        }
    }

    /// Consumes one timestep's vector and produces this layer's output for
    /// that timestep. Only the LSTM mutates its own state; weights are
    /// never touched.
    pub fn transform(&mut self, x: &Array1<f32>) -> Result<Array1<f32>, ModelError> {
        match self {
            Layer::Dense(l) => l.transform(x),
            Layer::Activation(l) => Ok(l.transform(x)),
            Layer::Lstm(l) => l.transform(x),
        }
    }
}

fn named_blob<'a>(blobs: &'a Value, key: &str) -> Result<&'a str, ModelError> {
    blobs
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ModelError::MissingWeights(key.to_string()))
}

fn with_key(err: ModelError, key: &str) -> ModelError {
    match err {
        ModelError::MalformedWeights(msg) => {
            ModelError::MalformedWeights(format!("{}: {}", key, msg))
        }
        other => other,
    }
}

/// Looks up, parses and shape-checks one matrix blob. `rows`/`cols` are the
/// expected dimensions after the load-time transposition.
pub(crate) fn parse_matrix(
    blobs: &Value,
    key: &str,
    rows: usize,
    cols: usize,
) -> Result<Array2<f32>, ModelError> {
    let m = codec::matrix_from_blob(named_blob(blobs, key)?).map_err(|e| with_key(e, key))?;
    if m.dim() != (rows, cols) {
        return Err(ModelError::MalformedWeights(format!(
            "{}: expected {}x{} matrix, got {}x{}",
            key,
            rows,
            cols,
            m.nrows(),
            m.ncols()
        )));
    }
    Ok(m)
}

pub(crate) fn parse_vector(blobs: &Value, key: &str, len: usize) -> Result<Array1<f32>, ModelError> {
    let v = codec::vector_from_blob(named_blob(blobs, key)?).map_err(|e| with_key(e, key))?;
    if v.len() != len {
        return Err(ModelError::MalformedWeights(format!(
            "{}: expected vector of length {}, got {}",
            key,
            len,
            v.len()
        )));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collapse_policy_per_variant() {
        let dense = Layer::Dense(Dense::new("d", 1, 1));
        let act = Layer::Activation(Activation::new("a", "linear").unwrap());
        let lstm = Layer::Lstm(Lstm::new("r", 1, 1));
        assert!(dense.propagate_sequence());
        assert!(act.propagate_sequence());
        assert!(!lstm.propagate_sequence());
    }

    #[test]
    fn test_parse_matrix_shape_checked() {
        let blobs = json!({ "d_W": "1 2\n3 4" });
        assert!(parse_matrix(&blobs, "d_W", 2, 2).is_ok());
        let err = parse_matrix(&blobs, "d_W", 3, 2).unwrap_err();
        assert!(matches!(err, ModelError::MalformedWeights(ref s) if s.contains("expected 3x2")));
    }

    #[test]
    fn test_missing_blob_reported_by_key() {
        let blobs = json!({});
        let err = parse_vector(&blobs, "d_b", 2).unwrap_err();
        assert!(matches!(err, ModelError::MissingWeights(ref s) if s == "d_b"));
    }
}
