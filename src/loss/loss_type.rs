use serde::{Serialize, Deserialize};

use crate::errors::ConfigError;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;

/// Selects which loss function the training loop uses.
///
/// MSE is the only loss reachable from configuration; `CrossEntropy` exists
/// for extensibility with the same loss/derivative contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Mse,
    CrossEntropy,
}

impl LossType {
    /// Strict name resolution: only `"mse"` is accepted.  Anything else is a
    /// fatal configuration error, unlike the lenient activation lookup.
    pub fn from_name(name: &str) -> Result<LossType, ConfigError> {
        match name {
            "mse" => Ok(LossType::Mse),
            other => Err(ConfigError::UnknownLoss { name: other.to_string() }),
        }
    }

    /// Scalar loss for one prediction/target pair.
    pub fn loss(&self, predicted: &Matrix, expected: &Matrix) -> f64 {
        match self {
            LossType::Mse => MseLoss::loss(predicted, expected),
            LossType::CrossEntropy => CrossEntropyLoss::loss(predicted, expected),
        }
    }

    /// Gradient of the loss w.r.t. the prediction, same shape as `predicted`.
    pub fn derivative(&self, predicted: &Matrix, expected: &Matrix) -> Matrix {
        match self {
            LossType::Mse => MseLoss::derivative(predicted, expected),
            LossType::CrossEntropy => CrossEntropyLoss::derivative(predicted, expected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mse_resolves_by_name() {
        assert_eq!(LossType::from_name("mse").unwrap(), LossType::Mse);
    }

    #[test]
    fn unknown_loss_name_is_an_error() {
        assert!(LossType::from_name("mae").is_err());
        assert!(LossType::from_name("cross_entropy").is_err());
    }
}
