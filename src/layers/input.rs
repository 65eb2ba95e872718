use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Identity passthrough layer.  Carries no parameters and no cache; it exists
/// to declare the expected input width of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Input {
    pub size: usize,
}

impl Input {
    pub fn new(size: usize) -> Input {
        Input { size }
    }

    pub fn forward(&mut self, x: &Matrix) -> Matrix {
        assert_eq!(
            x.cols, self.size,
            "input width {} does not match the declared network input width {}",
            x.cols, self.size
        );
        x.clone()
    }

    pub fn backward(&mut self, grad: &Matrix) -> Matrix {
        grad.clone()
    }

    pub fn update(&mut self) {}

    pub fn reset(&mut self) {}
}
