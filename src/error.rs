use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, NetworkError>;

#[derive(Error, Debug)]
pub enum NetworkError {
    /// Layer sizes that cannot describe a network (fewer than two layers or a zero-width layer).
    #[error("invalid network shape: {0}")]
    InvalidShape(String),

    /// A vector or matrix handed to the network does not match the layer it feeds.
    #[error("{what} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Gradients whose layer count differs from the network or accumulator they are applied to.
    #[error("gradients have {found} layers, expected {expected}")]
    LayerCountMismatch { expected: usize, found: usize },

    /// A weight or bias that is NaN or infinite, which the JSON file format cannot hold.
    #[error("{what} layer {layer} holds a non-finite value")]
    NonFinite { what: &'static str, layer: usize },

    #[error("cannot average over an empty batch")]
    EmptyBatch,

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("batch size must be at least 1")]
    ZeroBatchSize,

    /// Persisted network content that parsed as JSON but does not describe a valid network.
    #[error("malformed network file: {0}")]
    Malformed(String),

    #[error("malformed sample {index}: {reason}")]
    MalformedSample { index: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
