use std::borrow::Borrow;
use std::time::Instant;

use tracing::info;

use crate::{
    data::sample::Sample,
    error::Result,
    network::network::Network,
    train::{epoch_stats::EpochStats, train_config::TrainConfig},
};

/// Output/label threshold used by [`binary_accuracy`].
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Trains `network` for `config.epochs` epochs and returns the stats of every
/// completed epoch.
///
/// Epoch `e` (0-based) calls [`Network::train`] with `config.epoch_seed(e)`.
/// After each epoch the training cost (and, with `validation`, the validation
/// cost and accuracy) is measured, logged, and passed to `on_epoch` before the
/// next epoch starts; an error from `on_epoch` aborts the run.
pub fn train_loop<S, F>(
    network: &mut Network,
    train: &[S],
    validation: Option<&[S]>,
    config: &TrainConfig,
    mut on_epoch: F,
) -> Result<Vec<EpochStats>>
where
    S: Borrow<Sample>,
    F: FnMut(&Network, &EpochStats) -> Result<()>,
{
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 0..config.epochs {
        let t_start = Instant::now();

        network.train(train, config.epoch_seed(epoch), config.batch_size, config.eta)?;

        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        let train_cost = network.run_cost_avg(train)?;
        let (val_cost, val_accuracy) = match validation {
            Some(set) if !set.is_empty() => (
                Some(network.run_cost_avg(set)?),
                Some(binary_accuracy(network, set)?),
            ),
            _ => (None, None),
        };

        let stats = EpochStats {
            epoch: epoch + 1,
            total_epochs: config.epochs,
            train_cost,
            val_cost,
            val_accuracy,
            elapsed_ms,
        };
        info!(
            epoch = stats.epoch,
            of = stats.total_epochs,
            train_cost = stats.train_cost,
            val_cost = ?stats.val_cost,
            val_accuracy = ?stats.val_accuracy,
            elapsed_ms = stats.elapsed_ms,
            "epoch finished"
        );

        on_epoch(network, &stats)?;
        history.push(stats);
    }

    Ok(history)
}

/// Fraction of `samples` whose first output and label fall on the same side
/// of [`DECISION_THRESHOLD`]. Empty input gives 0.
pub fn binary_accuracy<S: Borrow<Sample>>(network: &Network, samples: &[S]) -> Result<f64> {
    if samples.is_empty() {
        return Ok(0.0);
    }
    let mut correct = 0usize;
    for sample in samples {
        let sample = sample.borrow();
        let output = network.run(sample.input())?;
        if (output.get(0, 0) >= DECISION_THRESHOLD) == (sample.label() >= DECISION_THRESHOLD) {
            correct += 1;
        }
    }
    Ok(correct as f64 / samples.len() as f64)
}
