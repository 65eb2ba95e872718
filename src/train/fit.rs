use crate::data::generator::{batch_iterator, Sequence};
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::train::epoch_stats::{EpochStats, TrainingHistory};
use crate::train::train_config::{TrainConfig, UpdatePolicy};

/// Every output unit at or above this cutoff counts as a 1 when `evaluate`
/// binarizes predictions.
const ACCURACY_THRESHOLD: f64 = 0.5;

/// Trains `network` for `config.epochs` epochs and returns the per-epoch loss
/// history.
///
/// Per batch, the whole timestep-major forward pass runs first, collecting
/// one loss gradient per timestep; those gradients then drive the reverse
/// unroll through `Network::backward`, parameters are updated according to
/// the configured policy, and every layer cache is reset before the next
/// batch.  Validation is forward-only and also ends at a reset, so no state
/// leaks across epochs.
///
/// # Panics
/// Panics if `train_inputs` is empty, lengths mismatch, or `batch_size == 0`.
pub fn fit(
    network: &mut Network,
    train_inputs: &[Sequence],
    train_targets: &[Sequence],
    val_inputs: &[Sequence],
    val_targets: &[Sequence],
    config: &TrainConfig,
) -> TrainingHistory {
    assert!(!train_inputs.is_empty(), "train_inputs must not be empty");
    assert_eq!(
        train_inputs.len(),
        train_targets.len(),
        "train_inputs and train_targets must have equal length"
    );
    assert!(config.batch_size > 0, "batch_size must be at least 1");

    let mut history = TrainingHistory::default();

    for epoch in 1..=config.epochs {
        let mut epoch_loss = 0.0;
        let mut timesteps = 0usize;

        for (input_batch, target_batch) in
            batch_iterator(config.batch_size, train_inputs, train_targets)
        {
            let mut grads: Vec<Matrix> = Vec::with_capacity(input_batch.len());
            for (x, expected) in input_batch.iter().zip(target_batch.iter()) {
                let predicted = network.forward(x);
                epoch_loss += network.loss.loss(&predicted, expected);
                grads.push(network.loss.derivative(&predicted, expected));
                timesteps += 1;
            }

            network.backward(&grads, config.update_policy);
            if config.update_policy == UpdatePolicy::PerBatch {
                network.update();
            }
            network.reset();
        }

        let train_loss = epoch_loss / timesteps.max(1) as f64;
        let val_loss = validation_loss(network, val_inputs, val_targets);
        network.reset();

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            val_loss,
        };
        if config.verbose {
            println!(
                "Epoch {}/{}: train loss {:.6}, validation loss {:.6}",
                stats.epoch, stats.total_epochs, stats.train_loss, stats.val_loss
            );
        }
        history.train_loss.push(train_loss);
        history.val_loss.push(val_loss);
    }

    history
}

/// Mean per-sequence loss over a validation set.  Forward-only: no gradients
/// accumulate and no parameters move, but caches still fill, so each sequence
/// ends with a reset.
pub fn validation_loss(
    network: &mut Network,
    inputs: &[Sequence],
    targets: &[Sequence],
) -> f64 {
    if inputs.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for (sequence, target) in inputs.iter().zip(targets.iter()) {
        network.reset();
        for (step, expected) in sequence.iter().zip(target.iter()) {
            let predicted = network.forward(&Matrix::from_row(step.clone()));
            total += network.loss.loss(&predicted, &Matrix::from_row(expected.clone()));
        }
        network.reset();
    }
    total / inputs.len() as f64
}

/// Exact-match accuracy against the final timestep of each target sequence.
///
/// Each prediction is thresholded per unit at 0.5; an example counts as
/// correct only when every binarized unit matches the target bit.
pub fn evaluate(
    network: &mut Network,
    inputs: &[Sequence],
    targets: &[Sequence],
    verbose: bool,
) -> f64 {
    if inputs.is_empty() {
        return 0.0;
    }

    let mut correct = 0usize;
    for (sequence, target) in inputs.iter().zip(targets.iter()) {
        let prediction = network.predict(sequence);
        let binarized: Vec<f64> = prediction
            .iter()
            .map(|&v| if v >= ACCURACY_THRESHOLD { 1.0 } else { 0.0 })
            .collect();
        let expected = &target[target.len() - 1];
        if &binarized == expected {
            correct += 1;
        }
        if verbose {
            println!("Pred: {prediction:?}\nTarget: {expected:?}\n");
        }
    }
    correct as f64 / inputs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generator::{generate_dataset, split_dataset};
    use crate::network::config::LayerConfig;

    fn rotation_network() -> Network {
        Network::from_config(
            &[
                LayerConfig::input(10),
                LayerConfig::recurrent(20).with_activation("tanh"),
                LayerConfig::dense(10),
            ],
            "mse",
            0.001,
        )
        .unwrap()
    }

    #[test]
    fn end_to_end_training_produces_finite_losses_and_valid_accuracy() {
        let (inputs, targets) = generate_dataset(6, 10, 10);
        let (train_in, val_in, test_in) = split_dataset(&inputs, 0.2, 0.2);
        let (train_tg, val_tg, test_tg) = split_dataset(&targets, 0.2, 0.2);

        let mut network = rotation_network();
        let config = TrainConfig::new(5, 2);
        let history = fit(&mut network, &train_in, &train_tg, &val_in, &val_tg, &config);

        assert_eq!(history.train_loss.len(), 5);
        assert_eq!(history.val_loss.len(), 5);
        assert!(history.train_loss.iter().all(|l| l.is_finite()));
        assert!(history.val_loss.iter().all(|l| l.is_finite()));

        // The mean training loss should trend downward: at least 3 of the 4
        // epoch-over-epoch transitions non-increasing, within a small noise
        // tolerance.
        let non_increasing = history
            .train_loss
            .windows(2)
            .filter(|pair| pair[1] <= pair[0] + 1e-3)
            .count();
        assert!(
            non_increasing >= 3,
            "expected a non-increasing loss trend, got {:?}",
            history.train_loss
        );

        let accuracy = evaluate(&mut network, &test_in, &test_tg, false);
        assert!((0.0..=1.0).contains(&accuracy));
    }

    #[test]
    fn per_batch_policy_trains_too() {
        let (inputs, targets) = generate_dataset(4, 6, 8);
        let mut network = Network::from_config(
            &[
                LayerConfig::input(8),
                LayerConfig::recurrent(12).with_activation("tanh"),
                LayerConfig::dense(8),
            ],
            "mse",
            0.001,
        )
        .unwrap();

        let config = TrainConfig::new(2, 2).with_update_policy(UpdatePolicy::PerBatch);
        let history = fit(&mut network, &inputs, &targets, &[], &[], &config);
        assert_eq!(history.train_loss.len(), 2);
        assert!(history.train_loss.iter().all(|l| l.is_finite()));
        // No validation set: recorded validation loss stays at zero.
        assert!(history.val_loss.iter().all(|&l| l == 0.0));
    }

    #[test]
    fn validation_loss_does_not_move_parameters() {
        let (inputs, targets) = generate_dataset(3, 5, 6);
        let mut network = Network::from_config(
            &[
                LayerConfig::input(6),
                LayerConfig::recurrent(8).with_activation("tanh"),
                LayerConfig::dense(6),
            ],
            "mse",
            0.001,
        )
        .unwrap();

        let first = validation_loss(&mut network, &inputs, &targets);
        let second = validation_loss(&mut network, &inputs, &targets);
        assert_eq!(first, second);
    }

    #[test]
    fn training_on_a_constant_sequence_reduces_loss() {
        // A constant-bit sequence is learnable by bias alone; the loss should
        // move downward over a long run even with small steps.
        let sequence: Sequence = vec![vec![1.0, 0.0, 1.0, 0.0]; 6];
        let inputs = vec![sequence.clone(); 4];
        let targets = vec![sequence; 4];

        let mut network = Network::from_config(
            &[
                LayerConfig::input(4),
                LayerConfig::recurrent(8).with_activation("tanh"),
                LayerConfig::dense(4).with_learning_rate(0.01),
            ],
            "mse",
            0.01,
        )
        .unwrap();

        let config = TrainConfig::new(30, 2);
        let history = fit(&mut network, &inputs, &targets, &[], &[], &config);
        let first = history.train_loss[0];
        let last = *history.train_loss.last().unwrap();
        assert!(
            last < first,
            "expected loss to decrease, got {first} -> {last}"
        );
    }
}
