// src/activation.rs

use ndarray::Array1;

use crate::error::ModelError;
use crate::math;

/// The closed set of elementwise nonlinearities an activation layer can
/// dispatch to. Anything else in the structural document is rejected at
/// construction time as `InvalidActivation`; there is no fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationKind {
    Linear,
    Sigmoid,
    Tanh,
}

impl ActivationKind {
    pub fn parse(name: &str) -> Result<Self, ModelError> {
        match name {
            "linear" => Ok(ActivationKind::Linear),
            "sigmoid" => Ok(ActivationKind::Sigmoid),
            "tanh" => Ok(ActivationKind::Tanh),
            other => Err(ModelError::InvalidActivation(other.to_string())),
        }
    }
}

/// Stateless elementwise activation layer. No learned parameters, so
/// weight binding is a no-op.
#[derive(Debug)]
pub struct Activation {
    name: String,
    kind: ActivationKind,
}

impl Activation {
    pub fn new(name: &str, activation: &str) -> Result<Self, ModelError> {
        Ok(Self {
            name: name.to_string(),
            kind: ActivationKind::parse(activation)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self, x: &Array1<f32>) -> Array1<f32> {
        match self.kind {
            ActivationKind::Linear => x.clone(),
            ActivationKind::Sigmoid => math::sigmoid(x),
            ActivationKind::Tanh => math::tanh(x),
        }
    }
}
