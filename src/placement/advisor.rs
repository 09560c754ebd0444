use crate::error::{AdvisorError, Result};
use crate::placement::feature::{GeoFeature, PlacementCandidate};
use crate::placement::loader::load_geo_features;
use crate::placement::render::NodeMap;
use geo::Centroid;
use log::info;
use std::io::Read;

/// One candidate per feature: the centroid of its geometry, in input order.
///
/// This is a placeholder for a real facility-location optimizer; candidates are
/// neither clustered nor deduplicated.
///
/// # Errors
/// [`AdvisorError::GeoFormat`] if a geometry has no centroid (e.g. it is empty).
pub fn suggest_placements(features: &[GeoFeature]) -> Result<Vec<PlacementCandidate>> {
    features
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            feature
                .geometry
                .centroid()
                .map(PlacementCandidate::from)
                .ok_or_else(|| {
                    AdvisorError::GeoFormat(format!("feature {} has an empty geometry", i))
                })
        })
        .collect()
}

/// Suggests node sites from geographic features and renders them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePlacementAdvisor {
    center: PlacementCandidate,
    zoom: u8,
}

impl Default for NodePlacementAdvisor {
    fn default() -> Self {
        Self {
            center: PlacementCandidate::new(0.0, 0.0),
            zoom: NodeMap::DEFAULT_ZOOM,
        }
    }
}

impl NodePlacementAdvisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial view of rendered maps.
    pub fn with_view(mut self, center: PlacementCandidate, zoom: u8) -> Self {
        self.center = center;
        self.zoom = zoom;
        self
    }

    pub fn load<R: Read>(&self, reader: R) -> Result<Vec<GeoFeature>> {
        load_geo_features(reader)
    }

    pub fn suggest_placements(&self, features: &[GeoFeature]) -> Result<Vec<PlacementCandidate>> {
        let candidates = suggest_placements(features)?;
        info!("suggested {} node placements", candidates.len());
        Ok(candidates)
    }

    /// One "Suggested Node" marker per candidate.
    pub fn render_markers(&self, candidates: &[PlacementCandidate]) -> NodeMap {
        let mut map = NodeMap::new(self.center, self.zoom);
        for candidate in candidates {
            map.add_marker(*candidate, NodeMap::SUGGESTED_NODE);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Geometry, GeometryCollection, LineString, Point};

    #[test]
    fn test_point_centroid_is_exact() {
        let features: Vec<GeoFeature> = [(20.125, -4.5), (-73.9, 40.3), (0.0, 0.0)]
            .iter()
            .map(|&(x, y)| GeoFeature::new(Point::new(x, y).into()))
            .collect();
        let candidates = suggest_placements(&features).unwrap();
        assert_eq!(candidates, vec![
            PlacementCandidate::new(-4.5, 20.125),
            PlacementCandidate::new(40.3, -73.9),
            PlacementCandidate::new(0.0, 0.0),
        ]);
    }

    #[test]
    fn test_polygon_centroid() {
        let square = polygon![
            (x: 10.0, y: 0.0),
            (x: 12.0, y: 0.0),
            (x: 12.0, y: 2.0),
            (x: 10.0, y: 2.0),
            (x: 10.0, y: 0.0),
        ];
        let candidates = suggest_placements(&[GeoFeature::new(square.into())]).unwrap();
        assert!((candidates[0].latitude - 1.0).abs() < 1e-12);
        assert!((candidates[0].longitude - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_centroid() {
        let line = LineString::from(vec![(0.0, 0.0), (4.0, 0.0)]);
        let candidates = suggest_placements(&[GeoFeature::new(line.into())]).unwrap();
        assert_eq!(candidates[0], PlacementCandidate::new(0.0, 2.0));
    }

    #[test]
    fn test_empty_geometry_is_error() {
        let empty = Geometry::GeometryCollection(GeometryCollection::<f64>(vec![]));
        let err = suggest_placements(&[GeoFeature::new(empty)]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::GeoFormat);
    }

    #[test]
    fn test_render_one_marker_per_candidate() {
        let advisor = NodePlacementAdvisor::new();
        let candidates = vec![
            PlacementCandidate::new(1.0, 2.0),
            PlacementCandidate::new(3.0, 4.0),
        ];
        let map = advisor.render_markers(&candidates);
        assert_eq!(map.markers().len(), 2);
        assert_eq!(map.zoom(), 2);
        assert!(map
            .markers()
            .iter()
            .all(|m| m.label == NodeMap::SUGGESTED_NODE));
    }
}
