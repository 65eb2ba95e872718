pub mod generator;

pub use generator::{batch_iterator, generate_dataset, split_dataset, Sequence};
