pub mod backprop;
pub mod network;
pub mod persist;

pub use backprop::{Gradients, LayerGradients};
pub use network::{Network, DEFAULT_SEED};
pub use persist::NetworkFile;
