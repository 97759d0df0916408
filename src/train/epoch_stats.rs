/// Per-epoch training statistics produced by `train_loop`.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Average cost over the training set after this epoch.
    pub train_cost: f64,
    /// Average cost over the validation set, if one was provided.
    pub val_cost: Option<f64>,
    /// Fraction of validation samples whose output lands on the same side of
    /// 0.5 as their label.
    pub val_accuracy: Option<f64>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
