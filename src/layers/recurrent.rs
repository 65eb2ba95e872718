use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::math::matrix::Matrix;

/// Elman-style recurrent layer trained by backpropagation through time.
///
/// Every hidden output since the last `reset` is kept on a stack, because the
/// reverse unroll needs access to each prior hidden state.  The running
/// `delta_jacobian` folds the sensitivity of all later timesteps into the
/// current backward call, so the call order is rigid: forwards in timestep
/// order, backwards in strictly reverse timestep order, then `reset`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recurrent {
    pub input_size: usize,
    pub output_size: usize,
    /// Input-to-hidden weights, shape [input_size, output_size].
    pub weights: Matrix,
    /// Hidden-to-hidden weights, shape [output_size, output_size].
    pub internal_weights: Matrix,
    /// Bias row, shape [1, output_size].  Only participates in the first
    /// timestep of each sequence.
    pub bias: Matrix,
    pub activation: ActivationFunction,
    pub learning_rate: f64,
    #[serde(skip)]
    inputs: Vec<Matrix>,
    #[serde(skip)]
    outputs: Vec<Matrix>,
    #[serde(skip)]
    delta_jacobian: Option<Matrix>,
    #[serde(skip)]
    weight_grad: Option<Matrix>,
    #[serde(skip)]
    internal_weight_grad: Option<Matrix>,
    #[serde(skip)]
    bias_grad: Option<Matrix>,
}

impl Recurrent {
    pub fn new(
        input_size: usize,
        output_size: usize,
        activation: ActivationFunction,
        learning_rate: f64,
        weight_range: (f64, f64),
    ) -> Recurrent {
        Recurrent {
            input_size,
            output_size,
            // Input weights start small and non-negative; only the internal
            // weights follow the configured range.
            weights: Matrix::random_range(input_size, output_size, 0.0, 0.1),
            internal_weights: Matrix::random_range(
                output_size,
                output_size,
                weight_range.0,
                weight_range.1,
            ),
            bias: Matrix::random_unit(1, output_size),
            activation,
            learning_rate,
            inputs: Vec::new(),
            outputs: Vec::new(),
            delta_jacobian: None,
            weight_grad: None,
            internal_weight_grad: None,
            bias_grad: None,
        }
    }

    /// First timestep: `h = act(x·W + bias)`.  Later timesteps:
    /// `h = act(h_prev·W_rec + x·W)`, with no bias term.
    pub fn forward(&mut self, x: &Matrix) -> Matrix {
        assert!(
            self.delta_jacobian.is_none(),
            "Recurrent::forward called during a backward unroll; reset() is required first"
        );
        assert_eq!(
            x.cols, self.input_size,
            "input width {} does not match recurrent layer input size {}",
            x.cols, self.input_size
        );

        let output = match self.outputs.last() {
            None => self
                .activation
                .apply(&(x.clone() * self.weights.clone()).add_row(&self.bias)),
            Some(prev) => self.activation.apply(
                &(prev.clone() * self.internal_weights.clone() + x.clone() * self.weights.clone()),
            ),
        };
        self.inputs.push(x.clone());
        self.outputs.push(output.clone());
        output
    }

    /// One step of the reverse unroll.
    ///
    /// On every call after the first, the most recently consumed hidden output
    /// is popped and its activation derivative forms the recurrent sensitivity
    /// `diag(d)·W_recᵀ`, which threads the previous delta-Jacobian into this
    /// timestep: `dj = grad + dj_prev · diag(d) · W_recᵀ`.  The gradient
    /// returned to the previous *layer* is `dj · diag(d_k) · Wᵀ`, where `d_k`
    /// is the derivative at the current top-of-stack hidden output.
    pub fn backward(&mut self, grad: &Matrix) -> Matrix {
        let delta_jacobian = match self.delta_jacobian.take() {
            Some(prev) => {
                // The pop consumes the hidden output the previous call worked
                // on; if nothing is left beneath it, the unroll has run past
                // the number of forwarded timesteps.
                let popped = match (self.outputs.pop(), self.inputs.pop()) {
                    (Some(popped), Some(_)) if !self.outputs.is_empty() => popped,
                    _ => panic!(
                        "Recurrent::backward called more times than forward for this sequence"
                    ),
                };
                let popped_grad = self.activation.derivative_at(&popped);
                grad.clone() + prev.hadamard(&popped_grad) * self.internal_weights.transpose()
            }
            None => grad.clone(),
        };

        let Some(output) = self.outputs.last().cloned() else {
            panic!("Recurrent::backward called without a matching forward; was reset() called mid-sequence?")
        };
        let input = self.inputs.last().cloned().unwrap_or_default();
        let act_grad = self.activation.derivative_at(&output);
        // Hidden state that fed this timestep; zero at the sequence start.
        let previous_output = if self.outputs.len() >= 2 {
            self.outputs[self.outputs.len() - 2].clone()
        } else {
            Matrix::zeros(output.rows, self.output_size)
        };

        let scaled = grad.hadamard(&act_grad);
        let weight_grad = input.transpose() * scaled.clone();
        let internal_weight_grad = previous_output.transpose() * scaled;
        let bias_grad = act_grad.column_sums();

        self.weight_grad = Some(match self.weight_grad.take() {
            Some(acc) => acc + weight_grad,
            None => weight_grad,
        });
        self.internal_weight_grad = Some(match self.internal_weight_grad.take() {
            Some(acc) => acc + internal_weight_grad,
            None => internal_weight_grad,
        });
        self.bias_grad = Some(match self.bias_grad.take() {
            Some(acc) => acc + bias_grad,
            None => bias_grad,
        });

        let out_grad = delta_jacobian.hadamard(&act_grad) * self.weights.transpose();
        self.delta_jacobian = Some(delta_jacobian);
        out_grad
    }

    /// Applies the accumulated gradients once and clears them.  The
    /// delta-Jacobian survives until `reset`, since it belongs to the unroll
    /// rather than to the parameters.
    pub fn update(&mut self) {
        let lr = self.learning_rate;
        if let Some(grad) = self.weight_grad.take() {
            self.weights = self.weights.clone() - grad.map(|v| v * lr);
        }
        if let Some(grad) = self.internal_weight_grad.take() {
            self.internal_weights = self.internal_weights.clone() - grad.map(|v| v * lr);
        }
        if let Some(grad) = self.bias_grad.take() {
            self.bias = self.bias.clone() - grad.map(|v| v * lr);
        }
    }

    /// Clears the hidden-output stack, the delta-Jacobian, and all pending
    /// gradients.  Must be called at every sequence boundary.
    pub fn reset(&mut self) {
        self.inputs.clear();
        self.outputs.clear();
        self.delta_jacobian = None;
        self.weight_grad = None;
        self.internal_weight_grad = None;
        self.bias_grad = None;
    }

    #[cfg(test)]
    pub(crate) fn weight_grad(&self) -> Option<&Matrix> {
        self.weight_grad.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn delta_jacobian(&self) -> Option<&Matrix> {
        self.delta_jacobian.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn cached_steps(&self) -> usize {
        self.outputs.len()
    }
}
