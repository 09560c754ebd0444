use ndarray::Array1;

/// A differentiable loss used by the [`Trainer`](crate::trainer::Trainer).
///
/// Implementors provide the scalar loss (for logging) and its gradient with
/// respect to the predictions, which is fed into the model's `backward()`.
pub trait Loss {
    fn loss(&self, prediction: &Array1<f64>, target: &Array1<f64>) -> f64;

    fn grad_wrt_prediction(&self, prediction: &Array1<f64>, target: &Array1<f64>)
        -> Array1<f64>;
}

/// Mean squared error: `L = (1/n) * Σ(pred_i - target_i)^2`.
///
/// The gradient is returned as `(pred - target) / n`; the factor of 2 is absorbed
/// into the learning rate.
#[derive(Clone, Copy, Debug, Default)]
pub struct MSELoss;

impl Loss for MSELoss {
    fn loss(&self, prediction: &Array1<f64>, target: &Array1<f64>) -> f64 {
        if prediction.is_empty() {
            return 0.0;
        }
        let diff = prediction - target;
        diff.dot(&diff) / prediction.len() as f64
    }

    fn grad_wrt_prediction(
        &self,
        prediction: &Array1<f64>,
        target: &Array1<f64>,
    ) -> Array1<f64> {
        let n = prediction.len().max(1) as f64;
        (prediction - target) / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_mse_loss_value() {
        let pred = array![2.0, 3.0, 4.0, 5.0];
        let target = array![1.0, 2.0, 3.0, 4.0];
        assert!((MSELoss.loss(&pred, &target) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mse_loss_perfect_fit() {
        let pred = array![0.9, 0.8];
        assert_eq!(MSELoss.loss(&pred, &pred.clone()), 0.0);
    }

    #[test]
    fn test_mse_gradient() {
        let pred = array![1.0, 3.0];
        let target = array![0.0, 4.0];
        assert_eq!(MSELoss.grad_wrt_prediction(&pred, &target), array![0.5, -0.5]);
    }
}
