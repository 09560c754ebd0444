//! Regression models with compile-time training state.
//!
//! Models are parameterized by [`Unfitted`] or [`Fitted`]. Training code works with
//! [`TrainableModel`]; once fitted, a model exposes [`InferenceModel`] only.

pub mod linear;
pub mod state;

pub use state::{Fitted, Unfitted};

use crate::error::AdvisorError;

/// Interface used by the [`Trainer`](crate::trainer::Trainer) while fitting.
pub trait TrainableModel {
    type Input;
    type Prediction;
    type Params;
    type Gradients;
    type Output;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;
    fn params(&self) -> &Self::Params;
    fn update_params(&mut self, new_params: &Self::Params);

    /// Drops training-only state and returns the inference model.
    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic an optimizer needs on a parameter set.
pub trait ParamOps: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, factor: f64) -> Self;

    /// Returns `false` if any parameter is NaN or infinite.
    fn is_finite(&self) -> bool;
}

/// Prediction and parameter extraction for a fitted model.
pub trait InferenceModel {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    /// Plain-data representation used for persistence.
    type ParamsRepr;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;
    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> Result<Self, AdvisorError>
    where
        Self: Sized;
}
