use crate::dataset::Dataset;
use crate::error::AdvisorError;
use ndarray::{Array1, Array2, Axis};

/// A dataset fully held in memory as an ndarray matrix and target vector.
#[derive(Clone, Debug)]
pub struct InMemoryDataset {
    x: Array2<f64>,
    y: Array1<f64>,
}

impl InMemoryDataset {
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Result<Self, AdvisorError> {
        if x.nrows() != y.len() {
            return Err(AdvisorError::Training(format!(
                "feature rows ({}) and targets ({}) must have the same length",
                x.nrows(),
                y.len()
            )));
        }
        Ok(Self { x, y })
    }
}

impl Dataset for InMemoryDataset {
    type Error = AdvisorError;

    fn len(&self) -> Option<usize> {
        Some(self.x.nrows())
    }

    fn get_rows(&self, indices: &[usize]) -> Result<(Array2<f64>, Array1<f64>), Self::Error> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.x.nrows()) {
            return Err(AdvisorError::Training(format!(
                "row index {} out of bounds for dataset of {} rows",
                bad,
                self.x.nrows()
            )));
        }
        Ok((self.x.select(Axis(0), indices), self.y.select(Axis(0), indices)))
    }
}
