use recurrent_nn::{
    evaluate, fit, generate_dataset, split_dataset, ConfigError, LayerConfig, Network, TrainConfig,
};

fn run() -> Result<(), ConfigError> {
    let num_bits = 10;
    let (inputs, targets) = generate_dataset(100, 8, num_bits);
    let (train_in, val_in, test_in) = split_dataset(&inputs, 0.15, 0.15);
    let (train_tg, val_tg, test_tg) = split_dataset(&targets, 0.15, 0.15);

    let mut network = Network::from_config(
        &[
            LayerConfig::input(num_bits),
            LayerConfig::recurrent(64)
                .with_activation("tanh")
                .with_learning_rate(0.0001),
            LayerConfig::dense(num_bits)
                .with_activation("tanh")
                .with_learning_rate(0.0001),
        ],
        "mse",
        0.0001,
    )?;

    let config = TrainConfig::new(20, 4).with_verbose(true);
    fit(&mut network, &train_in, &train_tg, &val_in, &val_tg, &config);

    let accuracy = evaluate(&mut network, &test_in, &test_tg, false);
    println!("Accuracy: {:.1} %", accuracy * 100.0);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
