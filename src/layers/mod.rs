pub mod input;
pub mod dense;
pub mod recurrent;

pub use input::Input;
pub use dense::Dense;
pub use recurrent::Recurrent;

use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// The three layer variants behind one flat dispatch surface.
///
/// Every variant supports the same four operations: `forward` caches whatever
/// its backward pass will need, `backward` pops that cache while accumulating
/// parameter gradients, `update` consumes the accumulated gradients, and
/// `reset` clears all per-sequence state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "layer", rename_all = "snake_case")]
pub enum Layer {
    Input(Input),
    Dense(Dense),
    Recurrent(Recurrent),
}

impl Layer {
    pub fn forward(&mut self, x: &Matrix) -> Matrix {
        match self {
            Layer::Input(layer) => layer.forward(x),
            Layer::Dense(layer) => layer.forward(x),
            Layer::Recurrent(layer) => layer.forward(x),
        }
    }

    pub fn backward(&mut self, grad: &Matrix) -> Matrix {
        match self {
            Layer::Input(layer) => layer.backward(grad),
            Layer::Dense(layer) => layer.backward(grad),
            Layer::Recurrent(layer) => layer.backward(grad),
        }
    }

    pub fn update(&mut self) {
        match self {
            Layer::Input(layer) => layer.update(),
            Layer::Dense(layer) => layer.update(),
            Layer::Recurrent(layer) => layer.update(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Layer::Input(layer) => layer.reset(),
            Layer::Dense(layer) => layer.reset(),
            Layer::Recurrent(layer) => layer.reset(),
        }
    }

    /// Output width of this layer (for `Input`, the declared input width).
    pub fn size(&self) -> usize {
        match self {
            Layer::Input(layer) => layer.size,
            Layer::Dense(layer) => layer.output_size,
            Layer::Recurrent(layer) => layer.output_size,
        }
    }
}
