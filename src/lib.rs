pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod network;
pub mod data;
pub mod train;
pub mod errors;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::Layer;
pub use loss::LossType;
pub use network::{build_layers, LayerConfig, LayerKind, Network};
pub use data::{batch_iterator, generate_dataset, split_dataset, Sequence};
pub use train::{evaluate, fit, validation_loss, EpochStats, TrainConfig, TrainingHistory, UpdatePolicy};
pub use errors::ConfigError;
