//! Node placement from geographic features.

pub mod advisor;
pub mod feature;
pub mod loader;
pub mod render;

pub use advisor::{suggest_placements, NodePlacementAdvisor};
pub use feature::{GeoFeature, PlacementCandidate};
pub use loader::{load_geo_features, load_geo_features_from_path, parse_geo_features, WGS84_CRS_NAMES};
pub use render::{Marker, NodeMap};
