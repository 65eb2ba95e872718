use serde::{Serialize, Deserialize};

use crate::errors::ConfigError;
use crate::layers::Layer;
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::config::{build_layers, LayerConfig};
use crate::train::train_config::UpdatePolicy;

/// A strictly linear pipeline of layers plus the loss used to train it.
///
/// The network owns no parameters of its own; every weight lives inside a
/// layer.  The top-level learning rate is kept for reporting only — each
/// layer carries the rate actually used by its `update`.
#[derive(Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    pub loss: LossType,
    pub learning_rate: f64,
}

impl Network {
    pub fn new(layers: Vec<Layer>, loss: LossType, learning_rate: f64) -> Network {
        Network { layers, loss, learning_rate }
    }

    /// Builds a network from a layer configuration list and a loss name.
    /// Loss resolution is strict; activation resolution inside the layer
    /// factory is lenient.
    pub fn from_config(
        configs: &[LayerConfig],
        loss_name: &str,
        learning_rate: f64,
    ) -> Result<Network, ConfigError> {
        Ok(Network {
            layers: build_layers(configs)?,
            loss: LossType::from_name(loss_name)?,
            learning_rate,
        })
    }

    /// Threads one timestep's batch through every layer in order.
    pub fn forward(&mut self, x: &Matrix) -> Matrix {
        let mut current = x.clone();
        for layer in &mut self.layers {
            current = layer.forward(&current);
        }
        current
    }

    /// Runs the reverse unroll: consumes the per-timestep loss gradients in
    /// reverse chronological order, threading each through the layers in
    /// reverse.  With `UpdatePolicy::PerTimestep` every layer's `update` runs
    /// after each timestep's pass; with `PerBatch` updating is left to the
    /// caller.
    pub fn backward(&mut self, grads: &[Matrix], policy: UpdatePolicy) {
        for grad in grads.iter().rev() {
            let mut current = grad.clone();
            for layer in self.layers.iter_mut().rev() {
                current = layer.backward(&current);
            }
            if policy == UpdatePolicy::PerTimestep {
                self.update();
            }
        }
    }

    pub fn update(&mut self) {
        for layer in &mut self.layers {
            layer.update();
        }
    }

    /// Clears every layer's per-sequence cache.  Must run at each sequence
    /// boundary, including after validation-only forward passes.
    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.reset();
        }
    }

    /// Forwards a single sequence timestep by timestep (batch of one) and
    /// returns the final timestep's output.  Caches are reset on both sides
    /// so prediction never leaks state into training.
    pub fn predict(&mut self, sequence: &[Vec<f64>]) -> Vec<f64> {
        self.reset();
        let mut last = Vec::new();
        for step in sequence {
            let output = self.forward(&Matrix::from_row(step.clone()));
            last = output.row(0).to_vec();
        }
        self.reset();
        last
    }

    /// Serializes the network weights to a pretty-printed JSON file.  Layer
    /// caches and pending gradients are skipped; a loaded network starts at a
    /// sequence boundary.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}
