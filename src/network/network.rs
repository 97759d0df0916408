use std::borrow::Borrow;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    data::sample::Sample,
    error::{NetworkError, Result},
    layers::dense::Layer,
    loss::squared_error::SquaredErrorLoss,
    math::matrix::Matrix,
};

/// Seed used when the caller has no preference.
pub const DEFAULT_SEED: u64 = 1;

/// A fully-connected feed-forward network of sigmoid layers.
///
/// `shape[0]` is the input dimension and `shape[L-1]` the output dimension;
/// `layers[l]` maps `shape[l]` values to `shape[l + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub(crate) shape: Vec<usize>,
    pub(crate) layers: Vec<Layer>,
}

impl Network {
    /// Builds a network with N(0, 1) parameters drawn from a generator seeded with `seed`.
    pub fn new(shape: &[usize], seed: u64) -> Result<Network> {
        Network::with_rng(shape, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    /// Builds a network drawing, layer by layer, the weights and then the biases from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> Result<Network> {
        validate_shape(shape)?;
        let layers = shape
            .windows(2)
            .map(|pair| Layer::random(pair[1], pair[0], &mut *rng))
            .collect();
        Ok(Network {
            shape: shape.to_vec(),
            layers,
        })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.shape[0]
    }

    pub fn output_size(&self) -> usize {
        self.shape[self.shape.len() - 1]
    }

    pub fn weights(&self) -> impl Iterator<Item = &Matrix> + '_ {
        self.layers.iter().map(Layer::weights)
    }

    pub fn biases(&self) -> impl Iterator<Item = &Matrix> + '_ {
        self.layers.iter().map(Layer::biases)
    }

    /// Forward pass; returns the output activation `(n[L-1], 1)`.
    pub fn run(&self, input: &Matrix) -> Result<Matrix> {
        self.check_input(input)?;
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.feed_from(&current);
        }
        Ok(current)
    }

    /// Squared error of the output against `expected`, summed over output components.
    pub fn run_cost(&self, input: &Matrix, expected: &Matrix) -> Result<f64> {
        self.check_expected(expected)?;
        let output = self.run(input)?;
        Ok(SquaredErrorLoss::loss(&output, expected))
    }

    /// Mean of [`Network::run_cost`] over `batch`.
    pub fn run_cost_avg<S: Borrow<Sample>>(&self, batch: &[S]) -> Result<f64> {
        if batch.is_empty() {
            return Err(NetworkError::EmptyBatch);
        }
        let mut total = 0.0;
        for sample in batch {
            let sample = sample.borrow();
            total += self.run_cost(sample.input(), sample.expected())?;
        }
        Ok(total / batch.len() as f64)
    }

    pub(crate) fn check_input(&self, input: &Matrix) -> Result<()> {
        check("input", (self.input_size(), 1), input)
    }

    pub(crate) fn check_expected(&self, expected: &Matrix) -> Result<()> {
        check("expected output", (self.output_size(), 1), expected)
    }
}

fn check(what: &'static str, expected: (usize, usize), found: &Matrix) -> Result<()> {
    if found.shape() != expected {
        return Err(NetworkError::ShapeMismatch {
            what,
            expected,
            found: found.shape(),
        });
    }
    Ok(())
}

pub(crate) fn validate_shape(shape: &[usize]) -> Result<()> {
    if shape.len() < 2 {
        return Err(NetworkError::InvalidShape(format!(
            "need at least 2 layers, got {}",
            shape.len()
        )));
    }
    if let Some(i) = shape.iter().position(|&n| n == 0) {
        return Err(NetworkError::InvalidShape(format!("layer {} has size 0", i)));
    }
    Ok(())
}
