// src/model.rs
//
// Builds the executable layer chain from the exported documents and runs
// forward passes over timestep sequences.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::warn;
use ndarray::Array1;
use serde::Deserialize;
use serde_json::Value;

use crate::activation::Activation;
use crate::dense::Dense;
use crate::error::ModelError;
use crate::layer::Layer;
use crate::lstm::Lstm;

/// An ordered chain of layers built once from a structural description and
/// a weights document. Immutable after construction except for the
/// transient recurrent state of its LSTM members, which makes a `Model`
/// unsafe for concurrent evaluations; run one sequence at a time.
#[derive(Debug)]
pub struct Model {
    layers: Vec<Layer>,
}

// One entry of the structural layer list. The dimension and activation
// fields are per-class, so they stay optional here and are demanded when
// the class needs them; everything else the exporter writes is ignored.
#[derive(Deserialize, Debug)]
struct LayerSpec {
    class_name: String,
    config: LayerParams,
}

#[derive(Deserialize, Debug)]
struct LayerParams {
    name: String,
    input_dim: Option<usize>,
    output_dim: Option<usize>,
    activation: Option<String>,
}

impl LayerParams {
    fn input_dim(&self) -> Result<usize, ModelError> {
        self.input_dim.ok_or_else(|| {
            ModelError::MalformedStructure(format!("layer '{}' missing 'input_dim'", self.name))
        })
    }

    fn output_dim(&self) -> Result<usize, ModelError> {
        self.output_dim.ok_or_else(|| {
            ModelError::MalformedStructure(format!("layer '{}' missing 'output_dim'", self.name))
        })
    }

    fn activation(&self) -> Result<&str, ModelError> {
        self.activation.as_deref().ok_or_else(|| {
            ModelError::MalformedStructure(format!("layer '{}' missing 'activation'", self.name))
        })
    }
}

impl Model {
    /// Loads a combined document (`struct` + `weights`) from a JSON file.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if !Path::new(path).exists() {
            return Err(format!("Model file not found at: {}", path).into());
        }
        let mut file = File::open(path)
            .map_err(|e| format!("Failed to open model file {}: {}", path, e))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| format!("Failed to read model file {}: {}", path, e))?;
        let root: Value = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to deserialize JSON from {}: {}", path, e))?;
        Ok(Self::from_document(&root)?)
    }

    /// Builds from a combined document holding the structural description
    /// under `struct` and the weight blobs under `weights`.
    pub fn from_document(root: &Value) -> Result<Self, ModelError> {
        let structure = root.get("struct").ok_or_else(|| {
            ModelError::MalformedStructure("document missing 'struct'".to_string())
        })?;
        let weights = root.get("weights").ok_or_else(|| {
            ModelError::MalformedStructure("document missing 'weights'".to_string())
        })?;
        Self::from_parts(structure, weights)
    }

    /// Builds the chain from the structural description, then binds each
    /// recognized layer's parameters from the weights document. Entries
    /// with an unrecognized class tag contribute no layer and consume no
    /// weights; they are skipped with a warning so genuinely unsupported
    /// layers do not vanish silently.
    pub fn from_parts(structure: &Value, weights: &Value) -> Result<Self, ModelError> {
        let entries = structure
            .get("config")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ModelError::MalformedStructure("structure missing 'config' layer list".to_string())
            })?;

        let mut layers: Vec<Layer> = Vec::new();
        for entry in entries {
            let spec = LayerSpec::deserialize(entry)
                .map_err(|e| ModelError::MalformedStructure(format!("layer entry: {}", e)))?;
            let params = &spec.config;
            let layer = match spec.class_name.as_str() {
                "Dense" => Some(Layer::Dense(Dense::new(
                    &params.name,
                    params.input_dim()?,
                    params.output_dim()?,
                ))),
                "Activation" => Some(Layer::Activation(Activation::new(
                    &params.name,
                    params.activation()?,
                )?)),
                "LSTM" => Some(Layer::Lstm(Lstm::new(
                    &params.name,
                    params.input_dim()?,
                    params.output_dim()?,
                ))),
                other => {
                    warn!("skipping layer '{}' of unsupported class '{}'", params.name, other);
                    None
                }
            };
            if let Some(layer) = layer {
                layers.push(layer);
            }
        }

        // Binding is per-layer; order over the chain does not matter.
        for layer in &mut layers {
            if !layer.has_weights() {
                continue;
            }
            let blobs = weights.get(layer.name()).ok_or_else(|| {
                ModelError::MissingWeights(format!("no weights entry for layer '{}'", layer.name()))
            })?;
            layer.bind_weights(blobs)?;
        }

        Ok(Self { layers })
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Runs the chain over a timestep sequence. Each layer is reset, then
    /// transforms every timestep; a layer that does not propagate the
    /// sequence keeps only its final timestep's output, collapsing the
    /// sequence to length 1 for everything downstream.
    pub fn evaluate(&mut self, input: &[Array1<f32>]) -> Result<Vec<Array1<f32>>, ModelError> {
        let mut current: Vec<Array1<f32>> = input.to_vec();
        for layer in &mut self.layers {
            layer.reset();
            let keep_all = layer.propagate_sequence();
            let last = current.len().saturating_sub(1);
            let mut next = Vec::with_capacity(if keep_all { current.len() } else { 1 });
            for (index, v) in current.iter().enumerate() {
                let out = layer.transform(v)?;
                if keep_all || index == last {
                    next.push(out);
                }
            }
            current = next;
        }
        Ok(current)
    }

    /// Flat-array entry point: one feature row per timestep in, the first
    /// vector of the final output sequence out. A model whose output
    /// sequence comes back empty is misconfigured; that is surfaced as an
    /// error, not an empty result.
    pub fn predict(&mut self, rows: &[Vec<f32>]) -> Result<Vec<f32>, ModelError> {
        let sequence: Vec<Array1<f32>> = rows
            .iter()
            .map(|row| Array1::from_vec(row.clone()))
            .collect();
        let output = self.evaluate(&sequence)?;
        let first = output.first().ok_or_else(|| {
            ModelError::MalformedStructure("model produced an empty output sequence".to_string())
        })?;
        Ok(first.to_vec())
    }
}
