use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Feature columns, in the order the model consumes them.
pub const FEATURE_COLUMNS: [&str; 3] = ["bandwidth", "latency", "signal_strength"];

/// Label column required for training.
pub const LABEL_COLUMN: &str = "uptime";

/// The three measured inputs of the uptime model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkFeatures {
    /// Mbps, > 0.
    pub bandwidth: f64,
    /// ms, >= 0.
    pub latency: f64,
    /// dBm or normalized units.
    pub signal_strength: f64,
}

impl NetworkFeatures {
    pub fn new(bandwidth: f64, latency: f64, signal_strength: f64) -> Self {
        Self {
            bandwidth,
            latency,
            signal_strength,
        }
    }

    pub fn to_row(&self) -> [f64; 3] {
        [self.bandwidth, self.latency, self.signal_strength]
    }
}

/// One labelled row of measured network conditions.
///
/// `uptime` is a fraction or a percentage; which one is up to the caller, but it must
/// be the same convention for training and inference data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkSample {
    pub bandwidth: f64,
    pub latency: f64,
    pub signal_strength: f64,
    pub uptime: f64,
}

impl NetworkSample {
    pub fn new(bandwidth: f64, latency: f64, signal_strength: f64, uptime: f64) -> Self {
        Self {
            bandwidth,
            latency,
            signal_strength,
            uptime,
        }
    }

    pub fn features(&self) -> NetworkFeatures {
        NetworkFeatures::new(self.bandwidth, self.latency, self.signal_strength)
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.bandwidth.is_finite()
            && self.latency.is_finite()
            && self.signal_strength.is_finite()
            && self.uptime.is_finite()
    }
}

/// Stacks feature rows into an `(n, 3)` matrix.
pub fn feature_matrix<'a, I>(rows: I) -> Array2<f64>
where
    I: IntoIterator<Item = &'a NetworkFeatures>,
{
    let flat: Vec<f64> = rows.into_iter().flat_map(|f| f.to_row()).collect();
    let n = flat.len() / FEATURE_COLUMNS.len();
    Array2::from_shape_vec((n, FEATURE_COLUMNS.len()), flat)
        .unwrap_or_else(|_| Array2::zeros((0, FEATURE_COLUMNS.len())))
}

/// Splits labelled samples into a feature matrix and a target vector.
pub fn training_arrays(samples: &[NetworkSample]) -> (Array2<f64>, Array1<f64>) {
    let features: Vec<NetworkFeatures> = samples.iter().map(NetworkSample::features).collect();
    let targets = samples.iter().map(|s| s.uptime).collect();
    (feature_matrix(&features), targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_feature_matrix_layout() {
        let rows = [
            NetworkFeatures::new(10.0, 50.0, -60.0),
            NetworkFeatures::new(20.0, 5.0, -40.0),
        ];
        assert_eq!(
            feature_matrix(&rows),
            array![[10.0, 50.0, -60.0], [20.0, 5.0, -40.0]]
        );
    }

    #[test]
    fn test_feature_matrix_empty() {
        assert_eq!(feature_matrix(&[]).dim(), (0, 3));
    }

    #[test]
    fn test_training_arrays() {
        let samples = [
            NetworkSample::new(10.0, 1.0, 2.0, 0.9),
            NetworkSample::new(20.0, 3.0, 4.0, 0.8),
        ];
        let (x, y) = training_arrays(&samples);
        assert_eq!(x.dim(), (2, 3));
        assert_eq!(y, array![0.9, 0.8]);
        assert_eq!(samples[1].features(), NetworkFeatures::new(20.0, 3.0, 4.0));
    }
}
