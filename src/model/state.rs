/// Marker for a model that is still being trained.
///
/// Only `Model<Unfitted>` implements [`TrainableModel`](super::TrainableModel), so
/// prediction on an untrained model is rejected at compile time.
#[derive(Clone, Copy, Debug)]
pub struct Unfitted;

/// Marker for a model that finished training.
///
/// A `Model<Fitted>` carries inference parameters only: no optimizer state or
/// training hyperparameters.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;
