pub mod config;
pub mod network;

pub use config::{build_layers, LayerConfig, LayerKind};
pub use network::Network;
