use crate::math::matrix::Matrix;

/// Cross-entropy loss.  Defined with the same contract as `MseLoss` for
/// completeness, but the trainer only ever selects MSE; this variant is not
/// reachable through `LossType::from_name`.
pub struct CrossEntropyLoss;

/// Small epsilon added inside log2() to prevent log(0) = -inf.
const EPS: f64 = 1e-20;

impl CrossEntropyLoss {
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        predicted.data.iter().zip(expected.data.iter())
            .flat_map(|(pr, er)| pr.iter().zip(er.iter()))
            .map(|(p, e)| -e * (p + EPS).log2())
            .sum()
    }

    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        let mut res = Matrix::zeros(predicted.rows, predicted.cols);
        for i in 0..predicted.rows {
            for j in 0..predicted.cols {
                let p = predicted.data[i][j];
                res.data[i][j] = if p != 0.0 { -expected.data[i][j] / p } else { 0.0 };
            }
        }
        res
    }
}
