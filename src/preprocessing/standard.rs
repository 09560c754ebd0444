//! Standard scaler (z-score normalization).
//!
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the per-feature mean of the training rows and `s` the population
//! standard deviation. Constant features get `s = 1` so they map to zero instead of NaN.

use crate::error::{AdvisorError, ArtifactError};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Serializable parameters of a [`FittedStandardScaler`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    pub n_features: usize,
}

#[derive(Clone, Debug, Default)]
pub struct StandardScaler;

impl StandardScaler {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for StandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, AdvisorError> {
        let (rows, cols) = data.dim();
        if rows == 0 {
            return Err(AdvisorError::EmptyData(
                "cannot fit StandardScaler on empty data".into(),
            ));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(AdvisorError::Training(
                "cannot fit StandardScaler on non-finite values".into(),
            ));
        }

        let mean = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(cols));
        // population std (ddof = 0)
        let std = data
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s == 0.0 { 1.0 } else { s });

        // finite inputs near f64::MAX can still overflow the squared deviations
        if let Some(col) = (0..cols).find(|&j| !mean[j].is_finite() || !std[j].is_finite()) {
            return Err(AdvisorError::Training(format!(
                "feature {} is too large to standardize (mean {}, std {})",
                col, mean[col], std[col]
            )));
        }

        Ok(FittedStandardScaler { mean, std })
    }
}

/// A fitted scaler, stored alongside the regression weights it feeds.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedStandardScaler {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl FittedStandardScaler {
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn std(&self) -> &Array1<f64> {
        &self.std
    }

    fn check_width(&self, cols: usize) -> Result<(), AdvisorError> {
        if cols != self.mean.len() {
            return Err(AdvisorError::Schema(format!(
                "feature mismatch: expected {} features, got {}",
                self.mean.len(),
                cols
            )));
        }
        Ok(())
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = StandardScalerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, AdvisorError> {
        self.check_width(data.ncols())?;
        Ok((data - &self.mean) / &self.std)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
            n_features: self.mean.len(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, AdvisorError> {
        if params.mean.len() != params.n_features || params.std.len() != params.n_features {
            return Err(ArtifactError::CorruptPayload(format!(
                "scaler declares {} features but stores {} means and {} deviations",
                params.n_features,
                params.mean.len(),
                params.std.len()
            ))
            .into());
        }
        if params.std.iter().any(|&s| !s.is_finite() || s <= 0.0)
            || params.mean.iter().any(|m| !m.is_finite())
        {
            return Err(
                ArtifactError::CorruptPayload("scaler has invalid statistics".into()).into(),
            );
        }
        Ok(Self {
            mean: Array1::from(params.mean),
            std: Array1::from(params.std),
        })
    }

    fn n_features_in(&self) -> usize {
        self.mean.len()
    }
}
