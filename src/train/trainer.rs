use std::borrow::Borrow;

use tracing::debug;

use crate::{
    data::sample::Sample,
    error::{NetworkError, Result},
    network::{backprop::Gradients, network::Network},
    optim::sgd::Sgd,
    train::batching::shuffled_batches,
};

/// Learning rate used when the caller has no preference.
pub const DEFAULT_ETA: f64 = 3.0;

/// Mini-batch size used when the caller has no preference.
pub const DEFAULT_BATCH_SIZE: usize = 100;

impl Network {
    /// One gradient-descent step on `batch`.
    ///
    /// Gradients of every sample are summed into an accumulator shaped like the
    /// parameters, then each parameter moves by `-eta / batch.len() * sum`.
    pub fn train_batch<S: Borrow<Sample>>(&mut self, batch: &[S], eta: f64) -> Result<()> {
        if batch.is_empty() {
            return Err(NetworkError::EmptyBatch);
        }

        let mut acc = Gradients::zeros_like(self);
        for sample in batch {
            let sample = sample.borrow();
            acc.accumulate(&self.backprop(sample.input(), sample.expected())?)?;
        }

        Sgd::new(eta).step(self, &acc, batch.len())
    }

    /// One epoch: shuffle `samples` with `seed`, split into `batch_size`
    /// chunks and run [`Network::train_batch`] on each chunk in order.
    pub fn train<S: Borrow<Sample>>(
        &mut self,
        samples: &[S],
        seed: u64,
        batch_size: usize,
        eta: f64,
    ) -> Result<()> {
        let batches = shuffled_batches(samples, seed, batch_size)?;
        let n_batches = batches.len();
        for (i, batch) in batches.iter().enumerate() {
            self.train_batch(batch, eta)?;
            debug!(batch = i + 1, of = n_batches, size = batch.len(), "trained batch");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> Vec<Sample> {
        vec![
            Sample::new(vec![0.0, 0.0], 0.0),
            Sample::new(vec![0.0, 1.0], 0.0),
            Sample::new(vec![1.0, 0.0], 1.0),
            Sample::new(vec![1.0, 1.0], 1.0),
        ]
    }

    #[test]
    fn test_train_batch_lowers_average_cost() {
        let batch = separable();
        let mut net = Network::new(&[2, 2, 1], 1).unwrap();

        let before = net.run_cost_avg(&batch).unwrap();
        net.train_batch(&batch, 0.1).unwrap();
        let after = net.run_cost_avg(&batch).unwrap();

        assert!(after <= before, "cost rose from {} to {}", before, after);
    }

    #[test]
    fn test_train_batch_matches_manual_update() {
        let batch = separable();
        let mut net = Network::new(&[2, 1], 4).unwrap();
        let eta = 0.5;

        let mut sum = Gradients::zeros_like(&net);
        for s in &batch {
            sum.accumulate(&net.backprop(s.input(), s.expected()).unwrap()).unwrap();
        }
        let scale = eta / batch.len() as f64;
        let mut expected = net.clone();
        for (layer, grad) in expected.layers.iter_mut().zip(sum.layers()) {
            layer.apply_gradients(&grad.weights, &grad.biases, scale);
        }

        net.train_batch(&batch, eta).unwrap();
        assert_eq!(net, expected);
    }

    #[test]
    fn test_train_batch_rejects_empty() {
        let mut net = Network::new(&[2, 1], 4).unwrap();
        let before = net.clone();
        let empty: Vec<Sample> = Vec::new();
        assert!(matches!(net.train_batch(&empty, DEFAULT_ETA), Err(NetworkError::EmptyBatch)));
        assert_eq!(net, before);
    }

    #[test]
    fn test_train_is_reproducible_for_a_seed() {
        let samples = separable();
        let mut a = Network::new(&[2, 3, 1], 8).unwrap();
        let mut b = a.clone();

        a.train(&samples, 21, 3, DEFAULT_ETA).unwrap();
        b.train(&samples, 21, 3, DEFAULT_ETA).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_train_applies_batches_sequentially() {
        let samples = separable();
        let mut net = Network::new(&[2, 2, 1], 6).unwrap();
        let mut expected = net.clone();

        for batch in shuffled_batches(&samples, 5, 3).unwrap() {
            expected.train_batch(&batch, 1.0).unwrap();
        }
        net.train(&samples, 5, 3, 1.0).unwrap();
        assert_eq!(net, expected);
    }

    #[test]
    fn test_train_rejects_empty_training_set() {
        let mut net = Network::new(&[2, 1], 4).unwrap();
        let empty: Vec<Sample> = Vec::new();
        assert!(matches!(
            net.train(&empty, 1, DEFAULT_BATCH_SIZE, DEFAULT_ETA),
            Err(NetworkError::EmptyTrainingSet)
        ));
    }
}
