use crate::error::AdvisorError;

/// An unfitted transformer with hyperparameters.
pub trait Transformer: Clone {
    type Input;
    type Output;
    type Fitted: FittedTransformer<Input = Self::Input, Output = Self::Output>;

    /// Learns parameters from training data.
    ///
    /// # Errors
    /// Fails if the data is empty or contains non-finite values.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, AdvisorError>;

    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, AdvisorError> {
        self.fit(data)?.transform(data)
    }
}

/// A fitted transformer ready for inference.
///
/// `extract_params()` followed by `from_params()` must reproduce the transformer exactly.
pub trait FittedTransformer: Clone {
    type Input;
    type Output;
    /// Plain-data representation used for persistence.
    type Params;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, AdvisorError>;

    fn extract_params(&self) -> Self::Params;

    fn from_params(params: Self::Params) -> Result<Self, AdvisorError>
    where
        Self: Sized;

    /// Number of features seen during fit.
    fn n_features_in(&self) -> usize;
}
