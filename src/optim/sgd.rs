use crate::{error::Result, network::backprop::Gradients, network::network::Network};

/// Plain gradient descent step over a whole network.
pub struct Sgd {
    pub eta: f64,
}

impl Sgd {
    pub fn new(eta: f64) -> Sgd {
        Sgd { eta }
    }

    /// Applies gradients summed over `batch_size` samples, i.e. moves every
    /// parameter by `-eta / batch_size * grad`.
    ///
    /// `grads` must match the network layer for layer; otherwise the network
    /// is left untouched.
    pub fn step(&self, network: &mut Network, grads: &Gradients, batch_size: usize) -> Result<()> {
        grads.check_fits(network.layers().iter().map(|l| (l.weights(), l.biases())))?;
        let scale = self.eta / batch_size as f64;
        for (layer, grad) in network.layers.iter_mut().zip(grads.layers()) {
            layer.apply_gradients(&grad.weights, &grad.biases, scale);
        }
        Ok(())
    }
}
