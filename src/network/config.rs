use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::errors::ConfigError;
use crate::layers::{Dense, Input, Layer, Recurrent};

pub const DEFAULT_LEARNING_RATE: f64 = 0.001;
pub const DEFAULT_WEIGHT_RANGE: (f64, f64) = (-0.1, 0.1);

/// Which layer variant a configuration record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Input,
    Dense,
    Recurrent,
}

/// One record of a layer configuration list.
///
/// The first record must be of kind `input` and supplies the network's input
/// width; every later record's `size` is its output width, with the input
/// width inferred from the previous record's size.  The activation name is
/// resolved leniently (unknown names fall back to Linear); learning rate and
/// weight range default to `0.001` and `(-0.1, 0.1)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub size: usize,
    #[serde(default)]
    pub activation: Option<String>,
    #[serde(default)]
    pub learning_rate: Option<f64>,
    #[serde(default)]
    pub weight_range: Option<(f64, f64)>,
}

impl LayerConfig {
    pub fn input(size: usize) -> LayerConfig {
        LayerConfig {
            kind: LayerKind::Input,
            size,
            activation: None,
            learning_rate: None,
            weight_range: None,
        }
    }

    pub fn dense(size: usize) -> LayerConfig {
        LayerConfig {
            kind: LayerKind::Dense,
            size,
            activation: None,
            learning_rate: None,
            weight_range: None,
        }
    }

    pub fn recurrent(size: usize) -> LayerConfig {
        LayerConfig {
            kind: LayerKind::Recurrent,
            size,
            activation: None,
            learning_rate: None,
            weight_range: None,
        }
    }

    pub fn with_activation(mut self, name: &str) -> LayerConfig {
        self.activation = Some(name.to_string());
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> LayerConfig {
        self.learning_rate = Some(learning_rate);
        self
    }

    pub fn with_weight_range(mut self, weight_range: (f64, f64)) -> LayerConfig {
        self.weight_range = Some(weight_range);
        self
    }
}

/// Builds the ordered layer stack described by `configs`.
///
/// Fails fast on malformed configuration: an empty list, or a list whose
/// first record is not an `input` layer.
pub fn build_layers(configs: &[LayerConfig]) -> Result<Vec<Layer>, ConfigError> {
    let first = configs.first().ok_or(ConfigError::EmptyConfig)?;
    if first.kind != LayerKind::Input {
        return Err(ConfigError::FirstLayerNotInput {
            found: format!("{:?}", first.kind).to_lowercase(),
        });
    }

    let mut layers = vec![Layer::Input(Input::new(first.size))];
    for i in 1..configs.len() {
        let config = &configs[i];
        let input_size = configs[i - 1].size;
        let activation = ActivationFunction::from_name(config.activation.as_deref());
        let learning_rate = config.learning_rate.unwrap_or(DEFAULT_LEARNING_RATE);
        let weight_range = config.weight_range.unwrap_or(DEFAULT_WEIGHT_RANGE);

        layers.push(match config.kind {
            LayerKind::Input => {
                // A second `input` record would break width inference.
                return Err(ConfigError::MisplacedInputLayer { index: i });
            }
            LayerKind::Dense => Layer::Dense(Dense::new(
                input_size,
                config.size,
                activation,
                learning_rate,
                weight_range,
            )),
            LayerKind::Recurrent => Layer::Recurrent(Recurrent::new(
                input_size,
                config.size,
                activation,
                learning_rate,
                weight_range,
            )),
        });
    }
    Ok(layers)
}
