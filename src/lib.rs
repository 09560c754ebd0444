//! Network uptime prediction and node placement advice.
//!
//! Two independent components:
//! - [`UptimePredictor`] trains a regression from (bandwidth, latency, signal_strength)
//!   to uptime and estimates energy usage;
//! - [`NodePlacementAdvisor`] turns GeoJSON features into candidate node sites.
//!
//! [`AnalysisContext`] composes them for an explicitly selected [`AnalysisMode`].

pub mod config;
pub mod dataset;
pub mod error;
pub mod loss;
pub mod metrics;
pub mod model;
pub mod network;
pub mod optimizer;
pub mod placement;
pub mod preprocessing;
pub mod report;
pub mod sample_data;
pub mod serialization;
pub mod trainer;
pub mod upload;

pub use config::{AdvisorConfig, TrainingConfig, UploadConfig};
pub use error::{AdvisorError, ArtifactError, ErrorKind, Result};
pub use metrics::RegressionMetrics;
pub use network::{
    analyze_energy_efficiency, load_features, load_samples, EnergyEstimate, NetworkFeatures,
    NetworkSample, UptimeModel, UptimePredictor,
};
pub use placement::{
    load_geo_features, suggest_placements, GeoFeature, NodeMap, NodePlacementAdvisor,
    PlacementCandidate,
};
pub use report::{
    run_network_analysis, run_node_placement, AnalysisContext, AnalysisMode, AnalysisReport,
    NetworkReport, PlacementReport,
};
pub use upload::{StagedUpload, UploadPolicy};
