//! Seeded synthetic datasets for demos and tests.
//!
//! Network scenarios model rural, urban and mixed connectivity. School-location
//! scenarios model sparse rural and dense urban sites. The same seed always
//! produces the same files.

use crate::error::{AdvisorError, Result};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// One generated CSV row; `node_id` is extra and ignored by the loaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRecord {
    pub node_id: String,
    pub bandwidth: f64,
    pub latency: f64,
    pub signal_strength: f64,
    pub uptime: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkScenario {
    /// Low bandwidth, high latency, weak signal.
    Rural,
    /// High bandwidth, low latency, strong signal.
    Urban,
    Mixed,
}

struct NetworkRanges {
    rows: usize,
    bandwidth: Range<f64>,
    latency: Range<f64>,
    signal_strength: Range<f64>,
    uptime: Range<f64>,
}

impl NetworkScenario {
    pub const ALL: [NetworkScenario; 3] = [Self::Rural, Self::Urban, Self::Mixed];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Rural => "network_stats_rural.csv",
            Self::Urban => "network_stats_urban.csv",
            Self::Mixed => "network_stats_mixed.csv",
        }
    }

    fn ranges(&self) -> NetworkRanges {
        match self {
            Self::Rural => NetworkRanges {
                rows: 50,
                bandwidth: 1.0..20.0,
                latency: 100.0..300.0,
                signal_strength: 20.0..60.0,
                uptime: 0.7..0.9,
            },
            Self::Urban => NetworkRanges {
                rows: 50,
                bandwidth: 50.0..100.0,
                latency: 10.0..50.0,
                signal_strength: 80.0..100.0,
                uptime: 0.9..1.0,
            },
            Self::Mixed => NetworkRanges {
                rows: 100,
                bandwidth: 5.0..80.0,
                latency: 20.0..200.0,
                signal_strength: 30.0..90.0,
                uptime: 0.75..0.98,
            },
        }
    }
}

fn uniform_column(rng: &mut StdRng, n: usize, range: &Range<f64>) -> Vec<f64> {
    (0..n).map(|_| rng.random_range(range.clone())).collect()
}

/// Draws one column at a time, so every column depends only on the seed.
pub fn generate_network_records(scenario: NetworkScenario, seed: u64) -> Vec<NetworkRecord> {
    let r = scenario.ranges();
    let mut rng = StdRng::seed_from_u64(seed);
    let bandwidth = uniform_column(&mut rng, r.rows, &r.bandwidth);
    let latency = uniform_column(&mut rng, r.rows, &r.latency);
    let signal_strength = uniform_column(&mut rng, r.rows, &r.signal_strength);
    let uptime = uniform_column(&mut rng, r.rows, &r.uptime);

    (0..r.rows)
        .map(|i| NetworkRecord {
            node_id: format!("Node_{}", i + 1),
            bandwidth: bandwidth[i],
            latency: latency[i],
            signal_strength: signal_strength[i],
            uptime: uptime[i],
        })
        .collect()
}

pub fn write_network_csv<W: Write>(records: &[NetworkRecord], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoScenario {
    /// Sparse sites near the equator.
    Rural,
    /// A dense cluster around a city.
    Urban,
}

struct GeoRanges {
    sites: usize,
    latitude: Range<f64>,
    longitude: Range<f64>,
    population: Range<u32>,
}

impl GeoScenario {
    pub const ALL: [GeoScenario; 2] = [Self::Rural, Self::Urban];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Rural => "school_locations_rural.geojson",
            Self::Urban => "school_locations_urban.geojson",
        }
    }

    fn ranges(&self) -> GeoRanges {
        match self {
            Self::Rural => GeoRanges {
                sites: 10,
                latitude: -5.0..5.0,
                longitude: 20.0..30.0,
                population: 50..200,
            },
            Self::Urban => GeoRanges {
                sites: 30,
                latitude: 40.0..41.0,
                longitude: -74.0..-73.0,
                population: 200..1000,
            },
        }
    }
}

/// School sites as WGS84 point features with `name` and `population`.
pub fn generate_school_locations(scenario: GeoScenario, seed: u64) -> FeatureCollection {
    let r = scenario.ranges();
    let mut rng = StdRng::seed_from_u64(seed);
    let latitudes = uniform_column(&mut rng, r.sites, &r.latitude);
    let longitudes = uniform_column(&mut rng, r.sites, &r.longitude);

    let features = (0..r.sites)
        .map(|i| {
            let mut properties = JsonObject::new();
            properties.insert("name".into(), JsonValue::from(format!("School_{}", i + 1)));
            properties.insert(
                "population".into(),
                JsonValue::from(rng.random_range(r.population.clone())),
            );
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![
                    longitudes[i],
                    latitudes[i],
                ]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let mut crs = JsonObject::new();
    crs.insert(
        "crs".into(),
        serde_json::json!({
            "type": "name",
            "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}
        }),
    );
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(crs),
    }
}

/// Writes every network and school scenario into `dir` and returns the paths.
pub fn write_scenario_files<P: AsRef<Path>>(dir: P, seed: u64) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    for scenario in NetworkScenario::ALL {
        let path = dir.join(scenario.file_name());
        let records = generate_network_records(scenario, seed);
        write_network_csv(&records, BufWriter::new(File::create(&path)?))?;
        info!("generated {}", path.display());
        written.push(path);
    }

    for scenario in GeoScenario::ALL {
        let path = dir.join(scenario.file_name());
        let collection = generate_school_locations(scenario, seed);
        let text = serde_json::to_string_pretty(&collection)
            .map_err(|e| AdvisorError::GeoFormat(e.to_string()))?;
        fs::write(&path, text)?;
        info!("generated {}", path.display());
        written.push(path);
    }
    Ok(written)
}
