use serde::{Serialize, Deserialize};

/// When accumulated gradients are turned into parameter updates.
///
/// - `PerTimestep` — every layer's `update` runs after each timestep of the
///   reverse unroll (the reference behavior).
/// - `PerBatch`    — one `update` runs after the whole batch's backward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    PerTimestep,
    PerBatch,
}

/// Configuration for a `fit` run.
///
/// # Fields
/// - `epochs`        — total number of full passes over the training data
/// - `batch_size`    — examples per batch; trailing partial batches are dropped
/// - `update_policy` — see `UpdatePolicy`
/// - `verbose`       — print one line of loss statistics per epoch
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub update_policy: UpdatePolicy,
    pub verbose: bool,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with per-timestep updates and quiet output.
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            update_policy: UpdatePolicy::PerTimestep,
            verbose: false,
        }
    }

    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
