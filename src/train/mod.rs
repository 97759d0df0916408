pub mod batching;
pub mod epoch_stats;
pub mod loop_fn;
pub mod train_config;
pub mod trainer;

pub use batching::shuffled_batches;
pub use epoch_stats::EpochStats;
pub use loop_fn::{binary_accuracy, train_loop};
pub use train_config::TrainConfig;
pub use trainer::{DEFAULT_BATCH_SIZE, DEFAULT_ETA};
