use rand::Rng;

use crate::{activation::sigmoid::sigmoid, math::matrix::Matrix};

/// One weighted sigmoid layer: `a = sigmoid(W x + b)`.
///
/// `weights` is `(size, input_size)` and `biases` is `(size, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub(crate) weights: Matrix,
    pub(crate) biases: Matrix,
}

impl Layer {
    /// Draws the weight matrix and then the bias vector from N(0, 1).
    pub fn random<R: Rng + ?Sized>(size: usize, input_size: usize, rng: &mut R) -> Layer {
        let weights = Matrix::standard_normal(size, input_size, rng);
        let biases = Matrix::standard_normal(size, 1, rng);
        Layer { weights, biases }
    }

    /// Caller guarantees `weights.rows() == biases.rows()` and `biases.cols() == 1`.
    pub(crate) fn from_parts(weights: Matrix, biases: Matrix) -> Layer {
        debug_assert_eq!(weights.rows(), biases.rows());
        debug_assert_eq!(biases.cols(), 1);
        Layer { weights, biases }
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    /// Pre-activation `z = W x + b`.
    pub fn pre_activation(&self, input: &Matrix) -> Matrix {
        &(&self.weights * input) + &self.biases
    }

    pub fn feed_from(&self, input: &Matrix) -> Matrix {
        self.pre_activation(input).map(sigmoid)
    }

    /// Subtracts `grad * scale` from the parameters.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, scale: f64) {
        self.weights = &self.weights - &weights_grad.map(|x| x * scale);
        self.biases = &self.biases - &biases_grad.map(|x| x * scale);
    }
}
