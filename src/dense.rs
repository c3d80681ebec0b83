// src/dense.rs

use ndarray::{Array1, Array2};
use serde_json::Value;

use crate::error::ModelError;
use crate::layer::{parse_matrix, parse_vector};

/// Affine layer: `W . x + b`. After the load-time transposition `W` is
/// stored as output_dim x input_dim, so the product consumes a vector of
/// the declared input dimension directly.
#[derive(Debug)]
pub struct Dense {
    name: String,
    input_dim: usize,
    output_dim: usize,
    weight: Array2<f32>,
    bias: Array1<f32>,
}

impl Dense {
    pub fn new(name: &str, input_dim: usize, output_dim: usize) -> Self {
        Self {
            name: name.to_string(),
            input_dim,
            output_dim,
            weight: Array2::zeros((output_dim, input_dim)),
            bias: Array1::zeros(output_dim),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds `<name>_W` and `<name>_b` from this layer's weights
    /// sub-document.
    pub fn bind_weights(&mut self, blobs: &Value) -> Result<(), ModelError> {
        self.weight = parse_matrix(
            blobs,
            &format!("{}_W", self.name),
            self.output_dim,
            self.input_dim,
        )?;
        self.bias = parse_vector(blobs, &format!("{}_b", self.name), self.output_dim)?;
        Ok(())
    }

    pub fn transform(&self, x: &Array1<f32>) -> Result<Array1<f32>, ModelError> {
        if x.len() != self.input_dim {
            return Err(ModelError::DimensionMismatch {
                expected: self.input_dim,
                got: x.len(),
            });
        }
        Ok(self.weight.dot(x) + &self.bias)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use serde_json::json;

    #[test]
    fn test_transform_is_affine() {
        let mut layer = Dense::new("d1", 2, 2);
        // Blob rows follow the export orientation; after transposition the
        // effective W is [[1, 3], [2, 4]].
        let blobs = json!({ "d1_W": "1 2\n3 4", "d1_b": "0.5 -0.5" });
        layer.bind_weights(&blobs).unwrap();

        let y = layer.transform(&array![1.0_f32, 1.0]).unwrap();
        assert_abs_diff_eq!(y[0], 4.5, epsilon = 1e-6);
        assert_abs_diff_eq!(y[1], 5.5, epsilon = 1e-6);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let layer = Dense::new("d1", 2, 3);
        let err = layer.transform(&array![1.0_f32, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { expected: 2, got: 3 }));
    }

    #[test]
    fn test_bind_rejects_wrong_shape() {
        let mut layer = Dense::new("d1", 3, 2);
        let blobs = json!({ "d1_W": "1 2\n3 4", "d1_b": "0 0" });
        let err = layer.bind_weights(&blobs).unwrap_err();
        assert!(matches!(err, ModelError::MalformedWeights(_)));
    }

    #[test]
    fn test_bind_rejects_matrix_shaped_bias() {
        // "0\n0" flattens to the declared bias length; it still is not a
        // single-row vector blob.
        let mut layer = Dense::new("d1", 2, 2);
        let blobs = json!({ "d1_W": "1 0\n0 1", "d1_b": "0\n0" });
        let err = layer.bind_weights(&blobs).unwrap_err();
        assert!(matches!(err, ModelError::MalformedWeights(ref s) if s.contains("d1_b")));
    }

    #[test]
    fn test_bind_rejects_missing_bias() {
        let mut layer = Dense::new("d1", 2, 2);
        let blobs = json!({ "d1_W": "1 0\n0 1" });
        let err = layer.bind_weights(&blobs).unwrap_err();
        assert!(matches!(err, ModelError::MissingWeights(ref s) if s == "d1_b"));
    }
}
