use geo::Geometry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A geographic entity read from a feature collection.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    /// WGS84, x = longitude, y = latitude.
    pub geometry: Geometry<f64>,
    pub name: Option<String>,
    pub population: Option<f64>,
    /// All properties as read, including `name` and `population`.
    pub properties: Map<String, Value>,
}

impl GeoFeature {
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry,
            name: None,
            population: None,
            properties: Map::new(),
        }
    }

    /// Builds a feature and picks the known attributes out of `properties`.
    pub fn with_properties(geometry: Geometry<f64>, properties: Map<String, Value>) -> Self {
        let name = properties
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let population = properties.get("population").and_then(Value::as_f64);
        Self {
            geometry,
            name,
            population,
            properties,
        }
    }
}

/// A suggested node site in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementCandidate {
    pub latitude: f64,
    pub longitude: f64,
}

impl PlacementCandidate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<geo::Point<f64>> for PlacementCandidate {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}
