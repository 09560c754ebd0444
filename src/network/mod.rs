//! Uptime prediction from measured network conditions.

pub mod energy;
pub mod loader;
pub mod predictor;
pub mod sample;

pub use energy::{analyze_energy_efficiency, EnergyEstimate, ENERGY_SCALE};
pub use loader::{load_features, load_features_from_path, load_samples, load_samples_from_path};
pub use predictor::{UptimeModel, UptimePredictor, MODEL_FORMAT, MODEL_VERSION};
pub use sample::{NetworkFeatures, NetworkSample, FEATURE_COLUMNS, LABEL_COLUMN};
