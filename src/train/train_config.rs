use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    network::network::DEFAULT_SEED,
    train::trainer::{DEFAULT_BATCH_SIZE, DEFAULT_ETA},
};

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`     — number of full passes over the training data
/// - `batch_size` — samples per mini-batch; use `1` for online SGD
/// - `eta`        — learning rate
/// - `seed`       — shuffle seed of the first epoch; epoch `e` uses `seed + e`
///
/// Every field is optional in JSON; missing ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub eta: f64,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 1,
            batch_size: DEFAULT_BATCH_SIZE,
            eta: DEFAULT_ETA,
            seed: DEFAULT_SEED,
        }
    }
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, eta: f64, seed: u64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            eta,
            seed,
        }
    }

    /// Shuffle seed for the 0-based `epoch`.
    pub fn epoch_seed(&self, epoch: usize) -> u64 {
        self.seed.wrapping_add(epoch as u64)
    }

    /// Deserializes a `TrainConfig` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
