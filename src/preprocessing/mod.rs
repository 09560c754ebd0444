//! Feature preprocessing.
//!
//! Transformers follow the same fitted/unfitted split as models: a [`Transformer`]
//! holds hyperparameters and learns from data, a [`FittedTransformer`] only applies
//! what was learned and can be persisted with the model it feeds.

pub mod standard;
pub mod traits;

pub use standard::{FittedStandardScaler, StandardScaler, StandardScalerParams};
pub use traits::{FittedTransformer, Transformer};
