//! Runtime configuration.
//!
//! Loaded from an optional TOML file, then overridden by `NETADVISOR_*` environment
//! variables. Every field has a default, so an empty file is a valid configuration.

use crate::error::{AdvisorError, Result};
use crate::trainer::DEFAULT_SEED;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_MODEL_PATH: &str = "NETADVISOR_MODEL_PATH";
pub const ENV_SEED: &str = "NETADVISOR_SEED";
pub const ENV_TEMP_DIR: &str = "NETADVISOR_TEMP_DIR";
pub const ENV_MAX_FILE_SIZE: &str = "NETADVISOR_MAX_FILE_SIZE";
pub const ENV_LOG_LEVEL: &str = "NETADVISOR_LOG_LEVEL";

/// 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Where the trained uptime model is persisted and looked up at startup.
    pub model_path: PathBuf,
    /// Default `env_logger` filter; `RUST_LOG` still wins.
    pub log_level: String,
    pub training: TrainingConfig,
    pub upload: UploadConfig,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("data/models/network_predictor.bin"),
            log_level: "info".to_string(),
            training: TrainingConfig::default(),
            upload: UploadConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Training
// ---------------------------------------------------------------------------

/// Hyperparameters of the uptime regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Seeds batch shuffling; identical data and seed give an identical model.
    pub seed: u64,
    pub learning_rate: f64,
    pub max_epochs: usize,
    pub batch_size: usize,
    /// Log per-epoch loss at debug level.
    pub verbose: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            learning_rate: 0.05,
            max_epochs: 300,
            batch_size: 16,
            verbose: false,
        }
    }
}

impl TrainingConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(AdvisorError::Config(format!(
                "training.learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        if self.max_epochs == 0 {
            return Err(AdvisorError::Config(
                "training.max_epochs must be at least 1".into(),
            ));
        }
        if self.batch_size == 0 {
            return Err(AdvisorError::Config(
                "training.batch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Staging directory; the system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
    /// Largest accepted upload in bytes.
    pub max_file_size: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl AdvisorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| AdvisorError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            AdvisorError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// File (or defaults), then process environment, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `NETADVISOR_*` overrides read through `lookup`.
    ///
    /// Takes the lookup as a parameter so tests do not touch the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_MODEL_PATH) {
            self.model_path = PathBuf::from(path);
        }
        if let Some(seed) = lookup(ENV_SEED) {
            self.training.seed = parse_env(ENV_SEED, &seed)?;
        }
        if let Some(dir) = lookup(ENV_TEMP_DIR) {
            self.upload.temp_dir = Some(PathBuf::from(dir));
        }
        if let Some(size) = lookup(ENV_MAX_FILE_SIZE) {
            self.upload.max_file_size = parse_env(ENV_MAX_FILE_SIZE, &size)?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.training.validate()?;
        if self.upload.max_file_size == 0 {
            return Err(AdvisorError::Config(
                "upload.max_file_size must be positive".into(),
            ));
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(AdvisorError::Config("model_path must not be empty".into()));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AdvisorError::Config(format!("{} has an invalid value: '{}'", key, value)))
}
