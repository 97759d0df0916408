use crate::math::matrix::Matrix;

pub struct SquaredErrorLoss;

impl SquaredErrorLoss {
    /// Squared error summed (not averaged) over the output components.
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> f64 {
        (predicted - expected).map(|x| x * x).sum()
    }

    /// Gradient of [`SquaredErrorLoss::loss`] w.r.t. the prediction: `2 (predicted - expected)`.
    pub fn derivative(predicted: &Matrix, expected: &Matrix) -> Matrix {
        (predicted - expected).map(|x| 2.0 * x)
    }
}
