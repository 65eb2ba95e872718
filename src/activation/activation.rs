use serde::{Serialize, Deserialize};
use std::f64::consts::E;

use crate::math::matrix::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Linear,
    ReLU,
    Sigmoid,
    Tanh,
}

impl ActivationFunction {
    /// Resolves a configuration name to an activation.  Unknown or missing
    /// names fall back to `Linear` rather than failing; loss selection is the
    /// strict one, activation selection is deliberately lenient.
    pub fn from_name(name: Option<&str>) -> ActivationFunction {
        match name {
            Some("relu") => ActivationFunction::ReLU,
            Some("sigmoid") => ActivationFunction::Sigmoid,
            Some("tanh") => ActivationFunction::Tanh,
            _ => ActivationFunction::Linear,
        }
    }

    /// Element-wise activation.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Linear => x,
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
        }
    }

    /// Element-wise derivative of the activation.
    ///
    /// Layers evaluate this at their *cached post-activation output*, not at
    /// the raw pre-activation input.  The forward/backward pairs in
    /// `layers::dense` and `layers::recurrent` are co-designed around that
    /// convention; it must stay in sync with them.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Linear => 1.0,
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            }
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
        }
    }

    /// Applies the activation element-wise over a matrix.
    pub fn apply(&self, x: &Matrix) -> Matrix {
        x.map(|v| self.function(v))
    }

    /// Evaluates the derivative element-wise over a matrix.
    pub fn derivative_at(&self, x: &Matrix) -> Matrix {
        x.map(|v| self.derivative(v))
    }
}
