//! Dataset abstractions for training.
//!
//! A [`Dataset`] yields `(X, y)` pairs where `X` has shape `(n_samples, n_features)` and
//! `y` has shape `(n_samples,)`. Batches are produced by [`DatasetBatchIter`] in a seeded
//! random order for stochastic gradient descent.

use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::Debug;

pub mod memory;
pub use self::memory::InMemoryDataset;

/// Source of training rows.
pub trait Dataset {
    /// Error returned when rows cannot be materialized.
    type Error: Debug + 'static;

    /// Number of samples, if known.
    fn len(&self) -> Option<usize>;

    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Gathers the given rows, in the given order, into a feature matrix and target vector.
    fn get_rows(&self, indices: &[usize]) -> Result<(Array2<f64>, Array1<f64>), Self::Error>;

    /// Batches over a permutation drawn from `rng`. The last batch may be smaller
    /// than `batch_size`.
    ///
    /// The permutation depends only on the RNG state, so a seeded RNG gives a
    /// reproducible batch order.
    fn shuffled_batches<R: Rng + ?Sized>(
        &self,
        batch_size: usize,
        rng: &mut R,
    ) -> DatasetBatchIter<'_, Self>
    where
        Self: Sized,
    {
        let mut order: Vec<usize> = (0..self.len().unwrap_or(0)).collect();
        order.shuffle(rng);
        DatasetBatchIter::new(self, order, batch_size)
    }
}

/// Iterator over consecutive chunks of a row order.
pub struct DatasetBatchIter<'a, D: ?Sized> {
    dataset: &'a D,
    order: Vec<usize>,
    batch_size: usize,
    current: usize,
}

impl<'a, D: Dataset + ?Sized> DatasetBatchIter<'a, D> {
    fn new(dataset: &'a D, order: Vec<usize>, batch_size: usize) -> Self {
        Self {
            dataset,
            order,
            batch_size: batch_size.max(1),
            current: 0,
        }
    }
}

impl<'a, D: Dataset + ?Sized> Iterator for DatasetBatchIter<'a, D> {
    type Item = Result<(Array2<f64>, Array1<f64>), D::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.order.len() {
            return None;
        }
        let end = (self.current + self.batch_size).min(self.order.len());
        let indices = &self.order[self.current..end];
        self.current = end;
        Some(self.dataset.get_rows(indices))
    }
}
