pub mod fit;
pub mod epoch_stats;
pub mod train_config;

pub use fit::{evaluate, fit, validation_loss};
pub use epoch_stats::{EpochStats, TrainingHistory};
pub use train_config::{TrainConfig, UpdatePolicy};
