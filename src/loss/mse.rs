use crate::math::matrix::Matrix;

pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²) over every element.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        let n = (predicted.rows * predicted.cols) as f64;
        predicted.data.iter().zip(expected.data.iter())
            .flat_map(|(pr, er)| pr.iter().zip(er.iter()))
            .map(|(p, e)| (p - e).powi(2))
            .sum::<f64>() / n
    }

    /// Gradient w.r.t. the prediction: 2 * (predicted - expected).
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        (predicted.clone() - expected.clone()).map(|v| 2.0 * v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_of_identical_matrices_is_zero() {
        let p = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(MseLoss::loss(&p, &p.clone()), 0.0);
    }

    #[test]
    fn loss_is_mean_of_squares() {
        let p = Matrix::from_row(vec![1.0, 3.0]);
        let e = Matrix::from_row(vec![0.0, 1.0]);
        // (1 + 4) / 2
        assert!((MseLoss::loss(&p, &e) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn derivative_is_twice_the_error() {
        let p = Matrix::from_row(vec![1.0, 3.0]);
        let e = Matrix::from_row(vec![0.0, 1.0]);
        let g = MseLoss::derivative(&p, &e);
        assert_eq!(g.data, vec![vec![2.0, 4.0]]);
    }
}
