//! Uptime regression over (bandwidth, latency, signal_strength).
//!
//! An [`UptimeModel`] is a fitted [`StandardScaler`] feeding a fitted linear model.
//! [`UptimePredictor`] owns at most one such model and guards the train/predict
//! lifecycle around it.

use crate::config::TrainingConfig;
use crate::dataset::InMemoryDataset;
use crate::error::{AdvisorError, ArtifactError, Result};
use crate::loss::MSELoss;
use crate::metrics::RegressionMetrics;
use crate::model::linear::{LinearModel, LinearParams, LinearRegression, SerializableLinearParams};
use crate::model::{Fitted, InferenceModel};
use crate::network::sample::{
    feature_matrix, training_arrays, NetworkFeatures, NetworkSample, FEATURE_COLUMNS,
};
use crate::optimizer::SGD;
use crate::preprocessing::{
    FittedStandardScaler, FittedTransformer, StandardScaler, StandardScalerParams, Transformer,
};
use crate::serialization::{read_artifact, write_artifact, ArtifactHeader};
use crate::trainer::Trainer;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MODEL_FORMAT: &str = "uptime-linear";
pub const MODEL_VERSION: u16 = 1;

const MODEL_HEADER: ArtifactHeader<'static> = ArtifactHeader::new(MODEL_FORMAT, MODEL_VERSION);

type UptimeTrainer = Trainer<MSELoss, SGD, LinearRegression, LinearParams>;

/// Persisted payload of an [`UptimeModel`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct UptimeModelParams {
    scaler: StandardScalerParams,
    regressor: SerializableLinearParams,
    seed: u64,
    n_training_rows: usize,
}

/// A trained uptime regression.
#[derive(Clone, Debug)]
pub struct UptimeModel {
    scaler: FittedStandardScaler,
    regressor: LinearModel<Fitted>,
    seed: u64,
    n_training_rows: usize,
}

impl UptimeModel {
    /// Fits a model on labelled samples.
    ///
    /// Row order does not matter beyond the seeded shuffle: the same rows and seed
    /// always give the same model.
    ///
    /// # Errors
    /// [`AdvisorError::Training`] if fewer than two rows are given, a value is not
    /// finite, or optimization diverges. [`AdvisorError::Config`] for invalid
    /// hyperparameters.
    pub fn fit(samples: &[NetworkSample], config: &TrainingConfig) -> Result<Self> {
        config.validate()?;
        if samples.len() < 2 {
            return Err(AdvisorError::Training(format!(
                "need at least 2 rows to train, got {}",
                samples.len()
            )));
        }
        if let Some(row) = samples.iter().position(|s| !s.is_finite()) {
            return Err(AdvisorError::Training(format!(
                "row {} contains a non-finite value",
                row + 1
            )));
        }

        let (x, y) = training_arrays(samples);
        let scaler = StandardScaler::new().fit(&x)?;
        let dataset = InMemoryDataset::new(scaler.transform(&x)?, y)?;

        let trainer: UptimeTrainer = Trainer::builder(MSELoss, SGD::new(config.learning_rate))
            .batch_size(config.batch_size)
            .max_epochs(config.max_epochs)
            .seed(config.seed)
            .verbose(config.verbose)
            .build();
        let regressor = trainer.fit(LinearRegression::new(FEATURE_COLUMNS.len()), &dataset)?;

        info!(
            "trained uptime model on {} rows (seed {}, {} epochs)",
            samples.len(),
            config.seed,
            config.max_epochs
        );
        Ok(Self {
            scaler,
            regressor,
            seed: config.seed,
            n_training_rows: samples.len(),
        })
    }

    /// One uptime estimate per row, in input order.
    pub fn predict(&self, features: &[NetworkFeatures]) -> Result<Vec<f64>> {
        if features.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(row) = features
            .iter()
            .position(|f| f.to_row().iter().any(|v| !v.is_finite()))
        {
            return Err(AdvisorError::Schema(format!(
                "row {} contains a non-finite feature",
                row + 1
            )));
        }
        let scaled = self.scaler.transform(&feature_matrix(features))?;
        Ok(self.regressor.predict_batch(&scaled).to_vec())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn n_training_rows(&self) -> usize {
        self.n_training_rows
    }

    pub fn scaler(&self) -> &FittedStandardScaler {
        &self.scaler
    }

    pub fn regressor(&self) -> &LinearModel<Fitted> {
        &self.regressor
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let params = UptimeModelParams {
            scaler: self.scaler.extract_params(),
            regressor: self.regressor.extract_params(),
            seed: self.seed,
            n_training_rows: self.n_training_rows,
        };
        Ok(MODEL_HEADER.encode(&params)?)
    }

    /// # Errors
    /// [`AdvisorError::ModelLoad`] for foreign, incompatible or damaged bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let params: UptimeModelParams = MODEL_HEADER.decode(bytes)?;
        let scaler = FittedStandardScaler::from_params(params.scaler)?;
        let regressor = LinearModel::<Fitted>::from_params(params.regressor)?;

        let expected = FEATURE_COLUMNS.len();
        if scaler.n_features_in() != expected || regressor.n_features() != expected {
            return Err(ArtifactError::CorruptPayload(format!(
                "model expects {} features, artifact has {} (scaler) and {} (weights)",
                expected,
                scaler.n_features_in(),
                regressor.n_features()
            ))
            .into());
        }
        Ok(Self {
            scaler,
            regressor,
            seed: params.seed,
            n_training_rows: params.n_training_rows,
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        write_artifact(path.as_ref(), &bytes).map_err(|e| match e {
            ArtifactError::Io(io) => AdvisorError::Io(io),
            other => other.into(),
        })?;
        info!("saved uptime model to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = read_artifact(path)?;
        Self::from_bytes(&bytes)
    }
}

/// Holds at most one [`UptimeModel`] and the hyperparameters used to train it.
#[derive(Clone, Debug, Default)]
pub struct UptimePredictor {
    config: TrainingConfig,
    model: Option<UptimeModel>,
}

impl UptimePredictor {
    /// An untrained predictor.
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    pub fn with_model(config: TrainingConfig, model: UptimeModel) -> Self {
        Self {
            config,
            model: Some(model),
        }
    }

    /// Startup path: loads the artifact at `path`, or starts untrained when it is
    /// missing or cannot be loaded.
    pub fn from_artifact_or_untrained<P: AsRef<Path>>(path: P, config: TrainingConfig) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("no model at {}; starting untrained", path.display());
            return Self::new(config);
        }
        match UptimeModel::load_from_file(path) {
            Ok(model) => {
                info!("loaded uptime model from {}", path.display());
                Self::with_model(config, model)
            }
            Err(e) => {
                warn!(
                    "failed to load model from {}: {}; starting untrained",
                    path.display(),
                    e
                );
                Self::new(config)
            }
        }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&UptimeModel> {
        self.model.as_ref()
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Trains a new model and replaces the held one only on success.
    pub fn train(&mut self, samples: &[NetworkSample]) -> Result<&UptimeModel> {
        let model = UptimeModel::fit(samples, &self.config)?;
        Ok(&*self.model.insert(model))
    }

    /// # Errors
    /// [`AdvisorError::NotTrained`] when no model is held.
    pub fn predict(&self, features: &[NetworkFeatures]) -> Result<Vec<f64>> {
        self.trained()?.predict(features)
    }

    /// Scores the held model against labelled samples.
    pub fn evaluate(&self, samples: &[NetworkSample]) -> Result<RegressionMetrics> {
        let model = self.trained()?;
        let features: Vec<NetworkFeatures> = samples.iter().map(NetworkSample::features).collect();
        let targets: Vec<f64> = samples.iter().map(|s| s.uptime).collect();
        let predictions = model.predict(&features)?;
        RegressionMetrics::compute(&targets, &predictions)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.trained()?.save_to_file(path)
    }

    fn trained(&self) -> Result<&UptimeModel> {
        self.model.as_ref().ok_or(AdvisorError::NotTrained)
    }
}
