use serde::{Serialize, Deserialize};

/// Per-epoch training statistics recorded by `fit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean per-timestep training loss over this epoch.
    pub train_loss: f64,
    /// Mean per-sequence validation loss after this epoch.
    pub val_loss: f64,
}

/// The loss trajectories of a whole `fit` run, one entry per epoch.
#[derive(Debug, Clone, Default)]
pub struct TrainingHistory {
    pub train_loss: Vec<f64>,
    pub val_loss: Vec<f64>,
}
