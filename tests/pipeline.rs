use netadvisor::error::{ArtifactError, ErrorKind};
use netadvisor::network::{UptimeModel, MODEL_FORMAT};
use netadvisor::sample_data::{write_scenario_files, GeoScenario, NetworkScenario};
use netadvisor::serialization::ArtifactHeader;
use netadvisor::{
    analyze_energy_efficiency, load_features, load_geo_features, load_samples, suggest_placements,
    AdvisorError, NetworkFeatures, NetworkSample, NodePlacementAdvisor, TrainingConfig,
    UptimePredictor,
};
use std::fs;
use std::path::Path;

fn scenario_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_scenario_files(dir.path(), 42).unwrap();
    dir
}

fn mixed_samples(dir: &Path) -> Vec<NetworkSample> {
    let file = fs::File::open(dir.join(NetworkScenario::Mixed.file_name())).unwrap();
    load_samples(file).unwrap()
}

fn features(samples: &[NetworkSample]) -> Vec<NetworkFeatures> {
    samples.iter().map(NetworkSample::features).collect()
}

#[test]
fn train_is_deterministic_for_a_fixed_seed() {
    let dir = scenario_dir();
    let samples = mixed_samples(dir.path());
    let config = TrainingConfig::default().with_seed(11);

    let a = UptimeModel::fit(&samples, &config).unwrap();
    let b = UptimeModel::fit(&samples, &config).unwrap();
    assert_eq!(
        a.predict(&features(&samples)).unwrap(),
        b.predict(&features(&samples)).unwrap()
    );
}

#[test]
fn predict_returns_one_value_per_row_in_order() {
    let dir = scenario_dir();
    let samples = mixed_samples(dir.path());
    let mut predictor = UptimePredictor::new(TrainingConfig::default());
    predictor.train(&samples).unwrap();

    let rows = features(&samples);
    let all = predictor.predict(&rows).unwrap();
    assert_eq!(all.len(), rows.len());

    let reversed: Vec<NetworkFeatures> = rows.iter().rev().copied().collect();
    let mut back = predictor.predict(&reversed).unwrap();
    back.reverse();
    assert_eq!(all, back);
}

#[test]
fn energy_of_single_row() {
    let estimate =
        analyze_energy_efficiency(&[NetworkSample::new(10.0, 30.0, 70.0, 0.9)]).unwrap();
    assert!((estimate.avg_energy_usage - 0.9).abs() < 1e-12);
    assert!((estimate.total_energy_usage - 0.9).abs() < 1e-12);

    let err = analyze_energy_efficiency(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyData);
}

#[test]
fn three_points_give_three_exact_candidates() {
    let text = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [20.5, -4.25]}},
        {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [-73.125, 40.75]}},
        {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [0.1, 0.2]}}
    ]}"#;
    let features = load_geo_features(text.as_bytes()).unwrap();
    let candidates = suggest_placements(&features).unwrap();

    let expected = [(-4.25, 20.5), (40.75, -73.125), (0.2, 0.1)];
    assert_eq!(candidates.len(), 3);
    for (c, (lat, lon)) in candidates.iter().zip(expected) {
        assert_eq!(c.latitude, lat);
        assert_eq!(c.longitude, lon);
    }
}

#[test]
fn polygon_candidate_is_area_centroid() {
    // L-shaped polygon: 2x2 square with the top-right 1x1 cell removed
    let text = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"name": "campus"}, "geometry": {"type": "Polygon",
         "coordinates": [[[0, 0], [2, 0], [2, 1], [1, 1], [1, 2], [0, 2], [0, 0]]]}}
    ]}"#;
    let features = load_geo_features(text.as_bytes()).unwrap();
    let candidate = NodePlacementAdvisor::new()
        .suggest_placements(&features)
        .unwrap()[0];
    // three unit cells centred at (0.5,0.5), (1.5,0.5), (0.5,1.5)
    assert!((candidate.longitude - 2.5 / 3.0).abs() < 1e-12);
    assert!((candidate.latitude - 2.5 / 3.0).abs() < 1e-12);
}

#[test]
fn missing_latency_column_is_schema_error() {
    let text = "bandwidth,signal_strength,uptime\n10,50,0.9\n";
    let err = load_samples(text.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    let err = load_features("bandwidth,signal_strength\n10,50\n".as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn save_and_load_give_identical_predictions() {
    let dir = scenario_dir();
    let samples = mixed_samples(dir.path());
    let path = dir.path().join("models").join("uptime.bin");

    let mut predictor = UptimePredictor::new(TrainingConfig::default());
    predictor.train(&samples).unwrap();
    predictor.save(&path).unwrap();

    let loaded = UptimePredictor::from_artifact_or_untrained(&path, TrainingConfig::default());
    assert!(loaded.is_trained());
    assert_eq!(
        predictor.predict(&features(&samples)).unwrap(),
        loaded.predict(&features(&samples)).unwrap()
    );
}

#[test]
fn never_trained_predictor_refuses_to_predict() {
    let predictor = UptimePredictor::new(TrainingConfig::default());
    let err = predictor
        .predict(&[NetworkFeatures::new(10.0, 20.0, 30.0)])
        .unwrap_err();
    assert!(matches!(err, AdvisorError::NotTrained));
}

#[test]
fn damaged_artifacts_are_model_load_errors() {
    let dir = scenario_dir();
    let model = UptimeModel::fit(&mixed_samples(dir.path()), &TrainingConfig::default()).unwrap();
    let bytes = model.to_bytes().unwrap();

    let err = UptimeModel::from_bytes(&bytes[..bytes.len() - 8]).unwrap_err();
    assert!(matches!(err, AdvisorError::ModelLoad(ArtifactError::CorruptPayload(_))));

    let err = UptimeModel::from_bytes(b"\x80\x04\x95pickled forest").unwrap_err();
    assert!(matches!(err, AdvisorError::ModelLoad(ArtifactError::UnknownFormat(_))));

    let newer = ArtifactHeader::new(MODEL_FORMAT, 2).encode(&0u8).unwrap();
    let err = UptimeModel::from_bytes(&newer).unwrap_err();
    assert!(matches!(
        err,
        AdvisorError::ModelLoad(ArtifactError::UnsupportedVersion { found: 2, .. })
    ));

    let missing = UptimeModel::load_from_file(dir.path().join("nope.bin")).unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::ModelLoad);
}

#[test]
fn failed_training_keeps_previous_model() {
    let dir = scenario_dir();
    let samples = mixed_samples(dir.path());
    let mut predictor = UptimePredictor::new(TrainingConfig::default());
    predictor.train(&samples).unwrap();
    let before = predictor.predict(&features(&samples)).unwrap();

    let err = predictor.train(&samples[..1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Training);
    assert_eq!(predictor.predict(&features(&samples)).unwrap(), before);
}

#[test]
fn non_wgs84_collection_is_rejected() {
    let text = r#"{"type": "FeatureCollection",
        "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::32633"}},
        "features": [{"type": "Feature", "properties": {},
                      "geometry": {"type": "Point", "coordinates": [10.0, 10.0]}}]}"#;
    let err = load_geo_features(text.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::GeoFormat);
}

#[test]
fn generated_school_files_place_one_node_per_school() {
    let dir = scenario_dir();
    for (scenario, expected) in [(GeoScenario::Rural, 10), (GeoScenario::Urban, 30)] {
        let file = fs::File::open(dir.path().join(scenario.file_name())).unwrap();
        let features = load_geo_features(file).unwrap();
        let candidates = suggest_placements(&features).unwrap();
        assert_eq!(candidates.len(), expected);
    }
}
