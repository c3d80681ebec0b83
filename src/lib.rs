//! Replays a neural network exported by Keras (structure + weights as
//! JSON) by evaluating a forward pass over a sequence of input feature
//! vectors. Supports dense, elementwise-activation and LSTM layers.

pub mod activation;
pub mod codec;
pub mod dense;
pub mod error;
pub mod features;
pub mod layer;
pub mod lstm;
pub mod math;
pub mod model;

pub use crate::error::ModelError;
pub use crate::model::Model;
