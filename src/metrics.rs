use crate::error::AdvisorError;
use serde::Serialize;

/// Goodness-of-fit summary for a regression model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r_squared: f64,
}

impl RegressionMetrics {
    /// Computes MSE, RMSE, MAE and R² of `y_pred` against `y_true`.
    ///
    /// R² is `1 - SS_res / SS_tot`; for a constant target it is 1 when the
    /// predictions match exactly and 0 otherwise.
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Result<Self, AdvisorError> {
        if y_true.len() != y_pred.len() {
            return Err(AdvisorError::Schema(format!(
                "cannot score {} predictions against {} targets",
                y_pred.len(),
                y_true.len()
            )));
        }
        if y_true.is_empty() {
            return Err(AdvisorError::EmptyData(
                "cannot score an empty prediction set".into(),
            ));
        }

        let n = y_true.len() as f64;
        let (ss_res, abs_sum) = y_true
            .iter()
            .zip(y_pred)
            .fold((0.0, 0.0), |(sq, ab), (&t, &p)| {
                (sq + (t - p).powi(2), ab + (t - p).abs())
            });
        let mean_true = y_true.iter().sum::<f64>() / n;
        let ss_tot: f64 = y_true.iter().map(|&t| (t - mean_true).powi(2)).sum();

        let r_squared = if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        };

        let mse = ss_res / n;
        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mae: abs_sum / n,
            r_squared,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let y = [1.0, 2.0, 3.0, 4.0];
        let m = RegressionMetrics::compute(&y, &y).unwrap();
        assert_eq!(m.mse, 0.0);
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.r_squared, 1.0);
    }

    #[test]
    fn test_constant_offset() {
        let y_true = [1.0, 2.0, 3.0, 4.0];
        let y_pred = [2.0, 3.0, 4.0, 5.0];
        let m = RegressionMetrics::compute(&y_true, &y_pred).unwrap();
        assert!((m.mse - 1.0).abs() < 1e-12);
        assert!((m.rmse - 1.0).abs() < 1e-12);
        assert!((m.mae - 1.0).abs() < 1e-12);
        // SS_tot = 5, SS_res = 4
        assert!((m.r_squared - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_constant_target() {
        let m = RegressionMetrics::compute(&[2.0, 2.0], &[2.0, 2.5]).unwrap();
        assert_eq!(m.r_squared, 0.0);
    }

    #[test]
    fn test_length_mismatch_and_empty() {
        assert!(RegressionMetrics::compute(&[1.0], &[1.0, 2.0]).is_err());
        let err = RegressionMetrics::compute(&[], &[]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::EmptyData);
    }
}
