use rand::prelude::*;

use crate::math::matrix::Matrix;

/// One example: a sequence of fixed-width bit vectors, shape [time][bits].
pub type Sequence = Vec<Vec<f64>>;

/// Rotation amounts a sequence may be generated with.
const ROTATIONS: [i64; 4] = [-2, -1, 1, 2];

/// Synthesizes `size` (input, target) sequence pairs.
///
/// Each sequence picks one rotation amount uniformly from {-2, -1, 1, 2} and
/// a random bit vector of width `num_bits`; at every timestep the current
/// vector is recorded as the input, then rotated to produce the next one, so
/// the target at step t is the input at step t + 1.
pub fn generate_dataset(
    size: usize,
    sequence_length: usize,
    num_bits: usize,
) -> (Vec<Sequence>, Vec<Sequence>) {
    let mut rng = rand::thread_rng();
    let mut inputs = Vec::with_capacity(size);
    let mut targets = Vec::with_capacity(size);

    for _ in 0..size {
        let rotation = ROTATIONS[rng.gen_range(0..ROTATIONS.len())];
        let mut bit_pattern: Vec<f64> = (0..num_bits)
            .map(|_| if rng.gen_bool(0.5) { 1.0 } else { 0.0 })
            .collect();

        let mut sequence = Vec::with_capacity(sequence_length);
        let mut target = Vec::with_capacity(sequence_length);
        for _ in 0..sequence_length {
            sequence.push(bit_pattern.clone());
            bit_pattern = rotate(&bit_pattern, rotation);
            target.push(bit_pattern.clone());
        }
        inputs.push(sequence);
        targets.push(target);
    }

    (inputs, targets)
}

/// Circularly rotates `v` right by `amount` positions (left when negative).
fn rotate(v: &[f64], amount: i64) -> Vec<f64> {
    let n = v.len() as i64;
    let shift = ((amount % n) + n) % n;
    (0..n)
        .map(|i| v[(((i - shift) % n + n) % n) as usize])
        .collect()
}

/// Partitions `data` into contiguous train/validation/test ranges.  The
/// training split takes the leading `1 - val_fraction - test_fraction` share;
/// no shuffling happens here.
pub fn split_dataset(
    data: &[Sequence],
    val_fraction: f64,
    test_fraction: f64,
) -> (Vec<Sequence>, Vec<Sequence>, Vec<Sequence>) {
    let n = data.len();
    let train_end = ((1.0 - val_fraction - test_fraction) * n as f64) as usize;
    let val_end = (((1.0 - test_fraction) * n as f64) as usize).max(train_end);

    (
        data[..train_end].to_vec(),
        data[train_end..val_end].to_vec(),
        data[val_end..].to_vec(),
    )
}

/// Slices the dataset into contiguous chunks of exactly `batch_size` examples
/// and transposes each from example-major `[batch][time][bits]` to
/// timestep-major `Vec<Matrix>` (length T, each matrix `[batch, bits]`), so
/// one timestep's across-batch slice feeds the network at once.  A trailing
/// partial batch is dropped, never padded.
pub fn batch_iterator(
    batch_size: usize,
    inputs: &[Sequence],
    targets: &[Sequence],
) -> Vec<(Vec<Matrix>, Vec<Matrix>)> {
    assert!(batch_size > 0, "batch_size must be at least 1");
    assert_eq!(
        inputs.len(),
        targets.len(),
        "inputs and targets must have equal length"
    );

    let mut batches = Vec::new();
    for start in (0..inputs.len()).step_by(batch_size) {
        let end = start + batch_size;
        if end > inputs.len() {
            break;
        }
        batches.push((
            to_timestep_major(&inputs[start..end]),
            to_timestep_major(&targets[start..end]),
        ));
    }
    batches
}

fn to_timestep_major(chunk: &[Sequence]) -> Vec<Matrix> {
    let timesteps = chunk[0].len();
    (0..timesteps)
        .map(|t| Matrix::from_data(chunk.iter().map(|seq| seq[t].clone()).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_shapes_match_the_request() {
        let (inputs, targets) = generate_dataset(6, 10, 10);
        assert_eq!(inputs.len(), 6);
        assert_eq!(targets.len(), 6);
        for (sequence, target) in inputs.iter().zip(targets.iter()) {
            assert_eq!(sequence.len(), 10);
            assert_eq!(target.len(), 10);
            for step in sequence {
                assert_eq!(step.len(), 10);
                assert!(step.iter().all(|&b| b == 0.0 || b == 1.0));
            }
        }
    }

    #[test]
    fn target_at_t_is_input_at_t_plus_one() {
        let (inputs, targets) = generate_dataset(4, 8, 6);
        for (sequence, target) in inputs.iter().zip(targets.iter()) {
            for t in 0..sequence.len() - 1 {
                assert_eq!(target[t], sequence[t + 1]);
            }
        }
    }

    #[test]
    fn rotation_is_circular() {
        let v = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(rotate(&v, 1), vec![4.0, 1.0, 2.0, 3.0]);
        assert_eq!(rotate(&v, -1), vec![2.0, 3.0, 4.0, 1.0]);
        assert_eq!(rotate(&v, 2), vec![3.0, 4.0, 1.0, 2.0]);
        assert_eq!(rotate(&v, -2), vec![3.0, 4.0, 1.0, 2.0]);
        assert_eq!(rotate(&rotate(&v, 2), -2), v);
    }

    #[test]
    fn split_is_contiguous_with_majority_train_share() {
        let data: Vec<Sequence> = (0..10)
            .map(|i| vec![vec![i as f64]])
            .collect();
        let (train, val, test) = split_dataset(&data, 0.2, 0.2);
        assert_eq!(train.len(), 6);
        assert_eq!(val.len(), 2);
        assert_eq!(test.len(), 2);
        assert_eq!(train[0][0][0], 0.0);
        assert_eq!(val[0][0][0], 6.0);
        assert_eq!(test[0][0][0], 8.0);
    }

    #[test]
    fn batch_iterator_drops_the_trailing_partial_batch() {
        let (inputs, targets) = generate_dataset(10, 5, 3);
        let batches = batch_iterator(4, &inputs, &targets);
        assert_eq!(batches.len(), 2);
        for (input_batch, target_batch) in &batches {
            assert_eq!(input_batch.len(), 5);
            assert_eq!(target_batch.len(), 5);
            for step in input_batch {
                assert_eq!(step.rows, 4);
                assert_eq!(step.cols, 3);
            }
        }
    }

    #[test]
    fn batches_are_timestep_major() {
        let inputs = vec![
            vec![vec![1.0], vec![2.0]],
            vec![vec![3.0], vec![4.0]],
        ];
        let batches = batch_iterator(2, &inputs, &inputs.clone());
        let (input_batch, _) = &batches[0];
        // Timestep 0 holds the first element of both examples.
        assert_eq!(input_batch[0].data, vec![vec![1.0], vec![3.0]]);
        assert_eq!(input_batch[1].data, vec![vec![2.0], vec![4.0]]);
    }
}
