//! Configuration and construction error types.

use thiserror::Error;

/// Errors raised while building a network from a layer configuration list.
///
/// These are all fail-fast construction-time errors; runtime shape or
/// call-ordering violations inside the layers panic instead, since they
/// indicate a bug in the caller rather than bad configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Layer configuration list is empty")]
    EmptyConfig,

    #[error("The first layer must be of type `input`, got `{found}`")]
    FirstLayerNotInput { found: String },

    #[error("Layer {index} is of type `input`; only the first layer may be")]
    MisplacedInputLayer { index: usize },

    #[error("Unknown loss function: {name} (only `mse` is supported)")]
    UnknownLoss { name: String },
}
