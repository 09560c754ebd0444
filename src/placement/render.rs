//! Marker maps for suggested node sites.

use crate::placement::feature::PlacementCandidate;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: PlacementCandidate,
    pub label: String,
}

/// A renderable map: an initial view plus labelled markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMap {
    center: PlacementCandidate,
    zoom: u8,
    markers: Vec<Marker>,
}

impl NodeMap {
    pub const DEFAULT_ZOOM: u8 = 2;
    pub const SUGGESTED_NODE: &'static str = "Suggested Node";

    pub fn new(center: PlacementCandidate, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            markers: Vec::new(),
        }
    }

    pub fn add_marker(&mut self, position: PlacementCandidate, label: &str) {
        self.markers.push(Marker {
            position,
            label: label.to_owned(),
        });
    }

    pub fn center(&self) -> PlacementCandidate {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Markers as point features with a `popup` property.
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .markers
            .iter()
            .map(|marker| {
                let mut properties = JsonObject::new();
                properties.insert("popup".into(), JsonValue::from(marker.label.clone()));
                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::Point(vec![
                        marker.position.longitude,
                        marker.position.latitude,
                    ]))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    /// A standalone Leaflet page showing every marker.
    pub fn to_html(&self) -> String {
        // keep the payload from closing the script element
        let data = self.to_geojson().to_string().replace("</", "<\\/");

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Suggested node placements</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map("map").setView([{lat}, {lon}], {zoom});
L.tileLayer("https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png", {{
  attribution: "&copy; OpenStreetMap contributors"
}}).addTo(map);
L.geoJSON({data}, {{
  onEachFeature: function (feature, layer) {{
    layer.bindPopup(feature.properties.popup);
  }}
}}).addTo(map);
</script>
</body>
</html>
"#,
            lat = self.center.latitude,
            lon = self.center.longitude,
            zoom = self.zoom,
            data = data,
        )
    }
}
