// src/error.rs

use std::fmt;

/// Errors surfaced while building a model from its exported documents or
/// while running a forward pass. Unrecognized layer classes are not an
/// error; the builder skips them with a warning.
#[derive(Debug)]
pub enum ModelError {
    /// The structural document is missing a field the builder needs.
    MalformedStructure(String),
    /// No weight blob was found under the expected key.
    MissingWeights(String),
    /// A weight blob could not be parsed, or its parsed shape disagrees
    /// with the layer's declared dimensions.
    MalformedWeights(String),
    /// A transform received a vector whose length disagrees with the
    /// layer's declared input dimension.
    DimensionMismatch { expected: usize, got: usize },
    /// An activation name outside the supported set.
    InvalidActivation(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::MalformedStructure(s) => write!(f, "Malformed structure document: {}", s),
            ModelError::MissingWeights(s) => write!(f, "Missing weights: {}", s),
            ModelError::MalformedWeights(s) => write!(f, "Malformed weights: {}", s),
            ModelError::DimensionMismatch { expected, got } => {
                write!(f, "Dimension mismatch: expected input of length {}, got {}", expected, got)
            }
            ModelError::InvalidActivation(s) => write!(f, "Invalid activation function: '{}'", s),
        }
    }
}

impl std::error::Error for ModelError {}
