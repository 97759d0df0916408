pub mod activation;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use data::sample::Sample;
pub use error::{NetworkError, Result};
pub use math::matrix::Matrix;
pub use network::backprop::{Gradients, LayerGradients};
pub use network::network::{Network, DEFAULT_SEED};
pub use train::loop_fn::train_loop;
pub use train::train_config::TrainConfig;
pub use train::trainer::{DEFAULT_BATCH_SIZE, DEFAULT_ETA};
