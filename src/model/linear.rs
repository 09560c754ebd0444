//! Linear regression: `y = w^T x + b`.
//!
//! - [`LinearRegression`] = `LinearModel<Unfitted>` is what the trainer updates.
//! - `LinearModel<Fitted>` is the inference-only predictor that gets persisted.

use crate::error::{AdvisorError, ArtifactError};
use crate::model::{Fitted, InferenceModel, ParamOps, TrainableModel, Unfitted};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Trainable parameters of a linear model.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearParams {
    pub weights: Array1<f64>,
    pub bias: f64,
}

/// Plain-data form of [`LinearParams`] stored inside model artifacts.
///
/// Kept in `f64` so that a save/load round-trip reproduces predictions bit for bit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl From<&LinearParams> for SerializableLinearParams {
    fn from(params: &LinearParams) -> Self {
        Self {
            weights: params.weights.to_vec(),
            bias: params.bias,
        }
    }
}

impl TryFrom<SerializableLinearParams> for LinearParams {
    type Error = AdvisorError;

    fn try_from(value: SerializableLinearParams) -> Result<Self, Self::Error> {
        if value.weights.is_empty() {
            return Err(ArtifactError::CorruptPayload("linear model has no weights".into()).into());
        }
        let params = Self {
            weights: Array1::from(value.weights),
            bias: value.bias,
        };
        if !params.is_finite() {
            return Err(
                ArtifactError::CorruptPayload("linear model has non-finite parameters".into())
                    .into(),
            );
        }
        Ok(params)
    }
}

impl ParamOps for LinearParams {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: &self.weights + &other.weights,
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, factor: f64) -> Self {
        Self {
            weights: &self.weights * factor,
            bias: self.bias * factor,
        }
    }

    fn is_finite(&self) -> bool {
        self.bias.is_finite() && self.weights.iter().all(|w| w.is_finite())
    }
}

/// A linear model whose training state is part of its type.
#[derive(Clone, Debug)]
pub struct LinearModel<S> {
    params: LinearParams,
    _state: PhantomData<S>,
}

impl<S> LinearModel<S> {
    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }
}

impl LinearModel<Fitted> {
    /// Wraps already-trained parameters.
    pub fn new(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.params.weights
    }

    pub fn bias(&self) -> f64 {
        self.params.bias
    }
}

impl InferenceModel for LinearModel<Fitted> {
    type InputSingle = Array1<f64>;
    type OutputSingle = f64;
    type InputBatch = Array2<f64>;
    type OutputBatch = Array1<f64>;
    type ParamsRepr = SerializableLinearParams;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        self.params.weights.dot(input) + self.params.bias
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        input.dot(&self.params.weights) + self.params.bias
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self, AdvisorError> {
        Ok(Self::new(LinearParams::try_from(params)?))
    }
}

/// Forward pass: `X @ w + b`.
/// Backward pass: `dw = X^T · grad`, `db = sum(grad)`.
impl TrainableModel for LinearModel<Unfitted> {
    type Input = Array2<f64>;
    type Prediction = Array1<f64>;
    type Params = LinearParams;
    type Gradients = LinearParams;
    type Output = LinearModel<Fitted>;

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        x.dot(&self.params.weights) + self.params.bias
    }

    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        LinearParams {
            weights: x.t().dot(grad_output),
            bias: grad_output.sum(),
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, params: &Self::Params) {
        self.params = params.clone();
    }

    fn into_fitted(self) -> LinearModel<Fitted> {
        LinearModel::<Fitted>::new(self.params)
    }
}

/// An unfitted linear model, the input to [`Trainer::fit`](crate::trainer::Trainer::fit).
pub type LinearRegression = LinearModel<Unfitted>;

impl LinearRegression {
    /// Zero-initialized weights and bias.
    pub fn new(n_features: usize) -> Self {
        Self::from_params(LinearParams {
            weights: Array1::zeros(n_features),
            bias: 0.0,
        })
    }

    /// Warm start from explicit parameters.
    pub fn from_params(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}
