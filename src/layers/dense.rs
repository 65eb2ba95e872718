use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::math::matrix::Matrix;

/// Fully connected layer.
///
/// The input/output stacks let one layer instance process a whole sequence:
/// each `forward` pushes, each `backward` pops the most recent entry, so the
/// backward pass must run in strictly reverse timestep order.  Parameter
/// gradients sum across those backward calls and are consumed by `update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    pub input_size: usize,
    pub output_size: usize,
    /// Weight matrix, shape [input_size, output_size].
    pub weights: Matrix,
    /// Bias row, shape [1, output_size].
    pub bias: Matrix,
    pub activation: ActivationFunction,
    pub learning_rate: f64,
    #[serde(skip)]
    inputs: Vec<Matrix>,
    #[serde(skip)]
    outputs: Vec<Matrix>,
    #[serde(skip)]
    weight_grad: Option<Matrix>,
    #[serde(skip)]
    bias_grad: Option<Matrix>,
}

impl Dense {
    pub fn new(
        input_size: usize,
        output_size: usize,
        activation: ActivationFunction,
        learning_rate: f64,
        weight_range: (f64, f64),
    ) -> Dense {
        Dense {
            input_size,
            output_size,
            weights: Matrix::random_range(input_size, output_size, weight_range.0, weight_range.1),
            bias: Matrix::random_unit(1, output_size),
            activation,
            learning_rate,
            inputs: Vec::new(),
            outputs: Vec::new(),
            weight_grad: None,
            bias_grad: None,
        }
    }

    pub fn forward(&mut self, x: &Matrix) -> Matrix {
        assert_eq!(
            x.cols, self.input_size,
            "input width {} does not match dense layer input size {}",
            x.cols, self.input_size
        );
        let output = self.activation.apply(&(x.clone() * self.weights.clone()).add_row(&self.bias));
        self.inputs.push(x.clone());
        self.outputs.push(output.clone());
        output
    }

    /// Pops the most recent cached output, evaluates the activation derivative
    /// at it (post-activation convention), and returns the gradient for the
    /// previous layer.  Weight and bias gradients accumulate across calls.
    pub fn backward(&mut self, grad: &Matrix) -> Matrix {
        let (Some(output), Some(input)) = (self.outputs.pop(), self.inputs.pop()) else {
            panic!("Dense::backward called without a matching forward; was reset() called mid-sequence?")
        };

        let act_grad = self.activation.derivative_at(&output);
        let scaled = grad.hadamard(&act_grad);

        let weight_grad = input.transpose() * scaled.clone();
        let bias_grad = act_grad.column_sums();
        self.weight_grad = Some(match self.weight_grad.take() {
            Some(acc) => acc + weight_grad,
            None => weight_grad,
        });
        self.bias_grad = Some(match self.bias_grad.take() {
            Some(acc) => acc + bias_grad,
            None => bias_grad,
        });

        scaled * self.weights.transpose()
    }

    /// Applies the accumulated gradients once and clears them.
    pub fn update(&mut self) {
        let lr = self.learning_rate;
        if let Some(grad) = self.weight_grad.take() {
            self.weights = self.weights.clone() - grad.map(|v| v * lr);
        }
        if let Some(grad) = self.bias_grad.take() {
            self.bias = self.bias.clone() - grad.map(|v| v * lr);
        }
    }

    /// Clears cached inputs/outputs and pending gradients.  Must be called at
    /// every sequence boundary; stale caches corrupt the next backward pass.
    pub fn reset(&mut self) {
        self.inputs.clear();
        self.outputs.clear();
        self.weight_grad = None;
        self.bias_grad = None;
    }

    #[cfg(test)]
    pub(crate) fn weight_grad(&self) -> Option<&Matrix> {
        self.weight_grad.as_ref()
    }
}
