//! Shared fixtures for the netadvisor benchmarks.

use geo::{Point, Polygon};
use netadvisor::sample_data::{generate_network_records, NetworkScenario};
use netadvisor::{GeoFeature, NetworkFeatures, NetworkSample};

/// The mixed scenario repeated `copies` times.
pub fn mixed_samples(copies: usize, seed: u64) -> Vec<NetworkSample> {
    let records = generate_network_records(NetworkScenario::Mixed, seed);
    (0..copies)
        .flat_map(|_| records.iter())
        .map(|r| NetworkSample::new(r.bandwidth, r.latency, r.signal_strength, r.uptime))
        .collect()
}

pub fn features_of(samples: &[NetworkSample]) -> Vec<NetworkFeatures> {
    samples.iter().map(NetworkSample::features).collect()
}

/// `n` small square polygons laid out along the equator.
pub fn square_features(n: usize) -> Vec<GeoFeature> {
    (0..n)
        .map(|i| {
            let x = (i % 300) as f64 * 0.5 - 75.0;
            let exterior = vec![(x, 0.0), (x + 0.25, 0.0), (x + 0.25, 0.25), (x, 0.25), (x, 0.0)];
            GeoFeature::new(Polygon::new(exterior.into(), vec![]).into())
        })
        .collect()
}

pub fn point_features(n: usize) -> Vec<GeoFeature> {
    (0..n)
        .map(|i| GeoFeature::new(Point::new((i % 360) as f64 - 180.0, 10.0).into()))
        .collect()
}
