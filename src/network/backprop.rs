use crate::{
    activation::sigmoid::{sigmoid, sigmoid_prime},
    error::{NetworkError, Result},
    loss::squared_error::SquaredErrorLoss,
    math::matrix::Matrix,
    network::network::Network,
};

/// Cost gradient for one layer; shapes match the layer's `weights` and `biases`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub biases: Matrix,
}

/// One [`LayerGradients`] per weighted layer of a network, in layer order.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    layers: Vec<LayerGradients>,
}

impl Gradients {
    /// Zero accumulator shaped like `network`'s parameters.
    pub fn zeros_like(network: &Network) -> Gradients {
        let layers = network
            .layers()
            .iter()
            .map(|layer| LayerGradients {
                weights: Matrix::zeros(layer.weights().rows(), layer.weights().cols()),
                biases: Matrix::zeros(layer.biases().rows(), layer.biases().cols()),
            })
            .collect();
        Gradients { layers }
    }

    pub fn layers(&self) -> &[LayerGradients] {
        &self.layers
    }

    /// Adds `other` element-wise. Nothing is added unless every layer of
    /// `other` has the same shapes as `self`.
    pub fn accumulate(&mut self, other: &Gradients) -> Result<()> {
        other.check_fits(self.layers.iter().map(|g| (&g.weights, &g.biases)))?;
        for (acc, grad) in self.layers.iter_mut().zip(&other.layers) {
            acc.weights += &grad.weights;
            acc.biases += &grad.biases;
        }
        Ok(())
    }

    /// Checks that there is one gradient per `(weights, biases)` pair and that shapes agree.
    pub(crate) fn check_fits<'a, I>(&self, params: I) -> Result<()>
    where
        I: ExactSizeIterator<Item = (&'a Matrix, &'a Matrix)>,
    {
        if params.len() != self.layers.len() {
            return Err(NetworkError::LayerCountMismatch {
                expected: params.len(),
                found: self.layers.len(),
            });
        }
        for (grad, (weights, biases)) in self.layers.iter().zip(params) {
            if grad.weights.shape() != weights.shape() {
                return Err(NetworkError::ShapeMismatch {
                    what: "weight gradient",
                    expected: weights.shape(),
                    found: grad.weights.shape(),
                });
            }
            if grad.biases.shape() != biases.shape() {
                return Err(NetworkError::ShapeMismatch {
                    what: "bias gradient",
                    expected: biases.shape(),
                    found: grad.biases.shape(),
                });
            }
        }
        Ok(())
    }
}

impl Network {
    /// Gradient of the summed squared error of one sample w.r.t. every weight and bias.
    ///
    /// `input` must be `(n[0], 1)` and `expected` `(n[L-1], 1)`. The network is not modified.
    pub fn backprop(&self, input: &Matrix, expected: &Matrix) -> Result<Gradients> {
        self.check_input(input)?;
        self.check_expected(expected)?;

        // Forward, caching pre-activations and activations.
        let mut zs: Vec<Matrix> = Vec::with_capacity(self.layers.len());
        let mut activations: Vec<Matrix> = Vec::with_capacity(self.layers.len() + 1);
        activations.push(input.clone());
        for layer in &self.layers {
            let z = layer.pre_activation(&activations[activations.len() - 1]);
            activations.push(z.map(sigmoid));
            zs.push(z);
        }

        let mut grads = Vec::with_capacity(self.layers.len());
        let mut d_a = SquaredErrorLoss::derivative(&activations[self.layers.len()], expected);
        for l in (0..self.layers.len()).rev() {
            let d_z = d_a.hadamard(&zs[l].map(sigmoid_prime));
            let d_w = &d_z * &activations[l].transpose();
            if l > 0 {
                d_a = &self.layers[l].weights().transpose() * &d_z;
            }
            grads.push(LayerGradients {
                weights: d_w,
                biases: d_z,
            });
        }
        grads.reverse();

        Ok(Gradients { layers: grads })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-5;
    const TOLERANCE: f64 = 1e-4;

    fn numeric_gradient<F>(net: &Network, input: &Matrix, expected: &Matrix, mut perturb: F) -> f64
    where
        F: FnMut(&mut Network, f64),
    {
        let mut plus = net.clone();
        perturb(&mut plus, EPS);
        let mut minus = net.clone();
        perturb(&mut minus, -EPS);
        let c_plus = plus.run_cost(input, expected).unwrap();
        let c_minus = minus.run_cost(input, expected).unwrap();
        (c_plus - c_minus) / (2.0 * EPS)
    }

    #[test]
    fn test_gradients_match_finite_differences() {
        let net = Network::new(&[2, 2, 1], 1).unwrap();
        let input = Matrix::column(vec![0.7, -0.4]);
        let expected = Matrix::column(vec![1.0]);
        let grads = net.backprop(&input, &expected).unwrap();

        for (l, layer) in net.layers().iter().enumerate() {
            for i in 0..layer.weights().rows() {
                for j in 0..layer.weights().cols() {
                    let numeric = numeric_gradient(&net, &input, &expected, |n, delta| {
                        let w = &mut n.layers[l].weights;
                        w.set(i, j, w.get(i, j) + delta);
                    });
                    let analytic = grads.layers()[l].weights.get(i, j);
                    assert!(
                        (numeric - analytic).abs() < TOLERANCE,
                        "dW[{}][{},{}]: numeric {} vs backprop {}",
                        l,
                        i,
                        j,
                        numeric,
                        analytic
                    );
                }

                let numeric = numeric_gradient(&net, &input, &expected, |n, delta| {
                    let b = &mut n.layers[l].biases;
                    b.set(i, 0, b.get(i, 0) + delta);
                });
                let analytic = grads.layers()[l].biases.get(i, 0);
                assert!(
                    (numeric - analytic).abs() < TOLERANCE,
                    "dB[{}][{}]: numeric {} vs backprop {}",
                    l,
                    i,
                    numeric,
                    analytic
                );
            }
        }
    }

    #[test]
    fn test_gradient_shapes_mirror_parameters() {
        let net = Network::new(&[4, 3, 2, 1], 11).unwrap();
        let grads = net
            .backprop(&Matrix::column(vec![1.0, 0.0, 1.0, 0.0]), &Matrix::column(vec![0.0]))
            .unwrap();

        assert_eq!(grads.layers().len(), net.layers().len());
        for (grad, layer) in grads.layers().iter().zip(net.layers()) {
            assert_eq!(grad.weights.shape(), layer.weights().shape());
            assert_eq!(grad.biases.shape(), layer.biases().shape());
        }
    }

    #[test]
    fn test_backprop_does_not_mutate_network() {
        let net = Network::new(&[2, 3, 1], 4).unwrap();
        let before = net.clone();
        net.backprop(&Matrix::column(vec![0.1, 0.9]), &Matrix::column(vec![1.0]))
            .unwrap();
        assert_eq!(net, before);
    }

    #[test]
    fn test_backprop_rejects_wrong_expected_shape() {
        let net = Network::new(&[2, 1], 4).unwrap();
        let result = net.backprop(&Matrix::column(vec![0.1, 0.9]), &Matrix::column(vec![1.0, 0.0]));
        assert!(matches!(result, Err(NetworkError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_accumulate_sums_per_layer() {
        let net = Network::new(&[2, 2, 1], 2).unwrap();
        let input = Matrix::column(vec![1.0, 1.0]);
        let expected = Matrix::column(vec![0.0]);
        let single = net.backprop(&input, &expected).unwrap();

        let mut acc = Gradients::zeros_like(&net);
        acc.accumulate(&single).unwrap();
        acc.accumulate(&single).unwrap();

        for (sum, one) in acc.layers().iter().zip(single.layers()) {
            assert_eq!(sum.weights, one.weights.map(|x| x + x));
            assert_eq!(sum.biases, one.biases.map(|x| x + x));
        }
    }

    #[test]
    fn test_accumulate_rejects_gradients_of_another_network() {
        let small = Network::new(&[2, 1], 2).unwrap();
        let deep = Network::new(&[2, 2, 1], 2).unwrap();
        let wide = Network::new(&[3, 1], 2).unwrap();

        let mut acc = Gradients::zeros_like(&small);
        let before = acc.clone();

        assert!(matches!(
            acc.accumulate(&Gradients::zeros_like(&deep)),
            Err(NetworkError::LayerCountMismatch { expected: 1, found: 2 })
        ));
        assert!(matches!(
            acc.accumulate(&Gradients::zeros_like(&wide)),
            Err(NetworkError::ShapeMismatch { what: "weight gradient", .. })
        ));
        assert_eq!(acc, before);
    }
}
