use crate::{
    dataset::Dataset,
    error::AdvisorError,
    loss::Loss,
    model::{ParamOps, TrainableModel},
    optimizer::Optimizer,
};
use log::debug;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::marker::PhantomData;

/// Default seed for batch shuffling when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Orchestrates mini-batch training of a [`TrainableModel`].
///
/// Rows are reshuffled every epoch from an RNG seeded with `seed`, so identical
/// inputs and seed always produce an identical fitted model.
pub struct Trainer<L, O, M, P>
where
    L: Loss,
    M: TrainableModel<Params = P, Gradients = P>,
    O: Optimizer<P>,
{
    pub(crate) batch_size: usize,
    pub(crate) max_epochs: usize,
    pub(crate) seed: u64,
    pub(crate) verbose: bool,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    _phantom_model: PhantomData<M>,
}

/// Fluent builder for a [`Trainer`].
///
/// Defaults:
/// - `batch_size`: 32
/// - `max_epochs`: 1000
/// - `seed`: [`DEFAULT_SEED`]
/// - `verbose`: false
pub struct TrainerBuilder<L, O, M, P>
where
    L: Loss,
    M: TrainableModel<Params = P, Gradients = P>,
    O: Optimizer<P>,
{
    batch_size: usize,
    max_epochs: usize,
    seed: u64,
    verbose: bool,
    loss_fn: L,
    optimizer: O,
    _phantom_model: PhantomData<M>,
}

impl<L, O, M, P> TrainerBuilder<L, O, M, P>
where
    L: Loss,
    M: TrainableModel<Params = P, Gradients = P>,
    O: Optimizer<P>,
{
    pub fn new(loss_fn: L, optimizer: O) -> Self {
        Self {
            batch_size: 32,
            max_epochs: 1000,
            seed: DEFAULT_SEED,
            verbose: false,
            loss_fn,
            optimizer,
            _phantom_model: PhantomData,
        }
    }

    /// A size of zero is treated as one.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// When `true`, logs the average loss of every epoch at debug level.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build(self) -> Trainer<L, O, M, P> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            seed: self.seed,
            verbose: self.verbose,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            _phantom_model: PhantomData,
        }
    }
}

impl<L, O, M, P> Trainer<L, O, M, P>
where
    L: Loss,
    M: TrainableModel<Input = Array2<f64>, Prediction = Array1<f64>, Params = P, Gradients = P>,
    O: Optimizer<P>,
    P: ParamOps,
{
    /// Starts the builder pattern; same as [`TrainerBuilder::new`].
    pub fn builder(loss_fn: L, optimizer: O) -> TrainerBuilder<L, O, M, P> {
        TrainerBuilder::new(loss_fn, optimizer)
    }

    /// Trains `model` on `dataset` for `max_epochs` epochs.
    ///
    /// # Errors
    /// [`AdvisorError::Training`] if the dataset is empty or of unknown length, if a
    /// batch cannot be loaded, or if the loss or parameters become non-finite.
    pub fn fit<D>(&self, mut model: M, dataset: &D) -> Result<M::Output, AdvisorError>
    where
        D: Dataset,
    {
        let n_total = dataset
            .len()
            .ok_or_else(|| AdvisorError::Training("dataset length unknown".into()))?;
        if n_total == 0 {
            return Err(AdvisorError::Training("dataset is empty".into()));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        for epoch in 0..self.max_epochs {
            let mut total_loss = 0.0;
            for batch in dataset.shuffled_batches(self.batch_size, &mut rng) {
                let (batch_x, batch_y) =
                    batch.map_err(|e| AdvisorError::Training(format!("data error: {:?}", e)))?;
                let preds = model.forward(&batch_x);
                total_loss += self.loss_fn.loss(&preds, &batch_y) * batch_y.len() as f64;
                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let grads = model.backward(&batch_x, &grad_preds);
                let new_params = self.optimizer.step(model.params(), &grads);
                model.update_params(&new_params);
            }

            let avg_loss = total_loss / n_total as f64;
            if !avg_loss.is_finite() {
                return Err(AdvisorError::Training(format!(
                    "loss diverged at epoch {}",
                    epoch
                )));
            }
            if self.verbose {
                debug!("epoch {}: loss = {:.6}", epoch, avg_loss);
            }
        }

        if !model.params().is_finite() {
            return Err(AdvisorError::Training(
                "optimization produced non-finite parameters".into(),
            ));
        }
        Ok(model.into_fitted())
    }
}
