//! The two analysis flows and the reports they produce.
//!
//! [`AnalysisContext`] carries the selected [`AnalysisMode`] and configuration
//! explicitly; nothing is kept between calls except the model inside the
//! [`UptimePredictor`] passed in by the caller.

use crate::config::AdvisorConfig;
use crate::error::{AdvisorError, Result};
use crate::metrics::RegressionMetrics;
use crate::network::{
    analyze_energy_efficiency, load_samples, EnergyEstimate, NetworkFeatures, NetworkSample,
    UptimePredictor,
};
use crate::placement::{NodeMap, NodePlacementAdvisor, PlacementCandidate};
use crate::upload::{StagedUpload, UploadPolicy};
use clap::ValueEnum;
use log::info;
use serde::Serialize;
use std::fmt;
use std::io::Read;

/// Rows shown in report previews.
pub const PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    NetworkAnalysis,
    NodePlacement,
}

impl AnalysisMode {
    fn accepts(&self, extension: &str) -> bool {
        match self {
            Self::NetworkAnalysis => extension == "csv",
            Self::NodePlacement => extension == "geojson" || extension == "json",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkAnalysis => write!(f, "Network Analysis"),
            Self::NodePlacement => write!(f, "Node Placement"),
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkReport {
    pub rows: usize,
    /// Uptime estimates for the uploaded rows, in input order.
    pub predictions: Vec<f64>,
    pub energy: EnergyEstimate,
    /// In-sample fit of the freshly trained model.
    pub metrics: RegressionMetrics,
}

impl NetworkReport {
    /// First predictions as percentages, assuming fractional uptime.
    pub fn preview_percent(&self) -> Vec<f64> {
        self.predictions
            .iter()
            .take(PREVIEW_ROWS)
            .map(|p| p * 100.0)
            .collect()
    }
}

impl fmt::Display for NetworkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows analyzed:        {}", self.rows)?;
        for (i, pct) in self.preview_percent().iter().enumerate() {
            writeln!(f, "predicted uptime #{}: {:.2}%", i + 1, pct)?;
        }
        writeln!(f, "avg energy usage:     {:.4}", self.energy.avg_energy_usage)?;
        writeln!(f, "total energy usage:   {:.4}", self.energy.total_energy_usage)?;
        write!(
            f,
            "fit: rmse {:.4}, mae {:.4}, r2 {:.4}",
            self.metrics.rmse, self.metrics.mae, self.metrics.r_squared
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementReport {
    pub candidates: Vec<PlacementCandidate>,
    pub map: NodeMap,
}

impl PlacementReport {
    pub fn preview(&self) -> &[PlacementCandidate] {
        &self.candidates[..self.candidates.len().min(PREVIEW_ROWS)]
    }
}

impl fmt::Display for PlacementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "suggested nodes: {}", self.candidates.len())?;
        for (i, c) in self.preview().iter().enumerate() {
            writeln!(
                f,
                "Node {}: lat {:.6}, lon {:.6}",
                i + 1,
                c.latitude,
                c.longitude
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnalysisReport {
    Network(NetworkReport),
    Placement(PlacementReport),
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(report) => fmt::Display::fmt(report, f),
            Self::Placement(report) => fmt::Display::fmt(report, f),
        }
    }
}

// ---------------------------------------------------------------------------
// Flows
// ---------------------------------------------------------------------------

/// Loads labelled rows, retrains `predictor` on them and scores the same rows.
///
/// On any failure the predictor keeps the model it held before the call.
pub fn run_network_analysis<R: Read>(
    predictor: &mut UptimePredictor,
    reader: R,
) -> Result<NetworkReport> {
    let samples = load_samples(reader)?;
    predictor.train(&samples)?;

    let features: Vec<NetworkFeatures> = samples.iter().map(NetworkSample::features).collect();
    let predictions = predictor.predict(&features)?;
    let energy = analyze_energy_efficiency(&samples)?;
    let metrics = predictor.evaluate(&samples)?;
    info!(
        "network analysis: {} rows, avg energy {:.4}",
        samples.len(),
        energy.avg_energy_usage
    );

    Ok(NetworkReport {
        rows: samples.len(),
        predictions,
        energy,
        metrics,
    })
}

/// Loads features, suggests one site per feature and renders the markers.
pub fn run_node_placement<R: Read>(
    advisor: &NodePlacementAdvisor,
    reader: R,
) -> Result<PlacementReport> {
    let features = advisor.load(reader)?;
    let candidates = advisor.suggest_placements(&features)?;
    let map = advisor.render_markers(&candidates);
    Ok(PlacementReport { candidates, map })
}

/// Explicit replacement for session state: which flow to run, with what settings.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub mode: AnalysisMode,
    pub config: AdvisorConfig,
}

impl AnalysisContext {
    pub fn new(mode: AnalysisMode, config: AdvisorConfig) -> Self {
        Self { mode, config }
    }

    /// Runs the selected flow on an already staged upload.
    pub fn analyze_upload(
        &self,
        predictor: &mut UptimePredictor,
        upload: &StagedUpload,
    ) -> Result<AnalysisReport> {
        if !self.mode.accepts(upload.extension()) {
            return Err(AdvisorError::UploadRejected(format!(
                "'{}' cannot be used for {}",
                upload.original_name(),
                self.mode
            )));
        }
        match self.mode {
            AnalysisMode::NetworkAnalysis => {
                run_network_analysis(predictor, upload.open()?).map(AnalysisReport::Network)
            }
            AnalysisMode::NodePlacement => {
                run_node_placement(&NodePlacementAdvisor::new(), upload.open()?)
                    .map(AnalysisReport::Placement)
            }
        }
    }

    /// Stages `bytes`, runs the selected flow and removes the staged file.
    pub fn analyze_bytes(
        &self,
        predictor: &mut UptimePredictor,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<AnalysisReport> {
        let policy = UploadPolicy::from_config(&self.config.upload);
        let upload = StagedUpload::stage(original_name, bytes, &policy)?;
        self.analyze_upload(predictor, &upload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingConfig;
    use crate::error::ErrorKind;

    const NETWORK_CSV: &str = "\
node_id,bandwidth,latency,signal_strength,uptime
Node_1,10,200,30,0.75
Node_2,80,20,95,0.97
Node_3,40,90,60,0.88
Node_4,15,150,40,0.80
Node_5,60,40,85,0.94
Node_6,25,120,50,0.84
";

    const SCHOOLS: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"name": "School_1"},
         "geometry": {"type": "Point", "coordinates": [25.0, -2.0]}},
        {"type": "Feature", "properties": {"name": "School_2"},
         "geometry": {"type": "Point", "coordinates": [21.5, 3.5]}}
    ]}"#;

    fn context(mode: AnalysisMode, dir: &std::path::Path) -> AnalysisContext {
        let mut config = AdvisorConfig::default();
        config.upload.temp_dir = Some(dir.to_path_buf());
        AnalysisContext::new(mode, config)
    }

    #[test]
    fn test_network_analysis_report() {
        let mut predictor = UptimePredictor::new(TrainingConfig::default());
        let report = run_network_analysis(&mut predictor, NETWORK_CSV.as_bytes()).unwrap();

        assert_eq!(report.rows, 6);
        assert_eq!(report.predictions.len(), 6);
        assert_eq!(report.preview_percent().len(), PREVIEW_ROWS);
        assert!((report.preview_percent()[0] - report.predictions[0] * 100.0).abs() < 1e-12);
        assert!(predictor.is_trained());
    }

    #[test]
    fn test_failed_analysis_keeps_model() {
        let mut predictor = UptimePredictor::new(TrainingConfig::default());
        run_network_analysis(&mut predictor, NETWORK_CSV.as_bytes()).unwrap();

        let err = run_network_analysis(&mut predictor, "bandwidth,uptime\n1,0.5\n".as_bytes())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(predictor.is_trained());
    }

    #[test]
    fn test_node_placement_report() {
        let report = run_node_placement(&NodePlacementAdvisor::new(), SCHOOLS.as_bytes()).unwrap();
        assert_eq!(report.candidates, vec![
            PlacementCandidate::new(-2.0, 25.0),
            PlacementCandidate::new(3.5, 21.5),
        ]);
        assert_eq!(report.preview().len(), 2);
        assert_eq!(report.map.markers().len(), 2);
    }

    #[test]
    fn test_context_dispatches_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut predictor = UptimePredictor::default();

        let ctx = context(AnalysisMode::NodePlacement, dir.path());
        let report = ctx
            .analyze_bytes(&mut predictor, "schools.geojson", SCHOOLS.as_bytes())
            .unwrap();
        assert!(matches!(report, AnalysisReport::Placement(_)));

        let ctx = context(AnalysisMode::NetworkAnalysis, dir.path());
        let report = ctx
            .analyze_bytes(&mut predictor, "stats.csv", NETWORK_CSV.as_bytes())
            .unwrap();
        assert!(matches!(report, AnalysisReport::Network(_)));

        // a failing flow must not leave its staged file behind either
        assert!(ctx
            .analyze_bytes(&mut predictor, "broken.csv", b"bandwidth\n1\n")
            .is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_context_rejects_wrong_file_type() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(AnalysisMode::NetworkAnalysis, dir.path());
        let err = ctx
            .analyze_bytes(&mut UptimePredictor::default(), "schools.geojson", SCHOOLS.as_bytes())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UploadRejected);
    }

    #[test]
    fn test_binary_geojson_upload_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(AnalysisMode::NodePlacement, dir.path());
        let err = ctx
            .analyze_bytes(&mut UptimePredictor::default(), "schools.geojson", &[0xff, 0xfe, 0x00])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GeoFormat);
    }
}
