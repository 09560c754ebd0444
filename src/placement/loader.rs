//! GeoJSON loading.
//!
//! Only WGS84 feature collections are accepted. A legacy `crs` member must name
//! WGS84, and every coordinate must be a valid longitude/latitude pair.

use crate::error::{AdvisorError, Result};
use crate::placement::feature::GeoFeature;
use geo::CoordsIter;
use geojson::{FeatureCollection, GeoJson};
use log::debug;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// CRS names that denote WGS84 longitude/latitude.
pub const WGS84_CRS_NAMES: [&str; 3] = [
    "EPSG:4326",
    "urn:ogc:def:crs:EPSG::4326",
    "urn:ogc:def:crs:OGC:1.3:CRS84",
];

fn check_crs(collection: &FeatureCollection) -> Result<()> {
    let crs = match collection
        .foreign_members
        .as_ref()
        .and_then(|members| members.get("crs"))
    {
        None | Some(Value::Null) => return Ok(()),
        Some(crs) => crs,
    };

    let name = crs
        .get("properties")
        .and_then(|props| props.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| AdvisorError::GeoFormat("crs member does not name a CRS".into()))?;
    if WGS84_CRS_NAMES.iter().any(|w| w.eq_ignore_ascii_case(name)) {
        Ok(())
    } else {
        Err(AdvisorError::GeoFormat(format!(
            "unsupported coordinate reference system '{}', expected WGS84",
            name
        )))
    }
}

fn check_coordinates(geometry: &geo::Geometry<f64>, index: usize) -> Result<()> {
    let out_of_range = geometry.coords_iter().find(|c| {
        !(-180.0..=180.0).contains(&c.x) || !(-90.0..=90.0).contains(&c.y)
    });
    match out_of_range {
        Some(c) => Err(AdvisorError::GeoFormat(format!(
            "feature {}: coordinate ({}, {}) is not a WGS84 longitude/latitude",
            index, c.x, c.y
        ))),
        None => Ok(()),
    }
}

/// Parses a GeoJSON FeatureCollection document.
///
/// # Errors
/// - [`AdvisorError::GeoFormat`] if the text is not JSON, not a FeatureCollection,
///   a feature has no geometry, or the coordinate reference is not WGS84.
/// - [`AdvisorError::EmptyData`] if the collection has no features.
pub fn parse_geo_features(text: &str) -> Result<Vec<GeoFeature>> {
    let collection = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(_) => {
            return Err(AdvisorError::GeoFormat(
                "expected a FeatureCollection, found a single Feature".into(),
            ))
        }
        GeoJson::Geometry(_) => {
            return Err(AdvisorError::GeoFormat(
                "expected a FeatureCollection, found a bare Geometry".into(),
            ))
        }
    };
    check_crs(&collection)?;

    if collection.features.is_empty() {
        return Err(AdvisorError::EmptyData(
            "feature collection has no features".into(),
        ));
    }

    let mut features = Vec::with_capacity(collection.features.len());
    for (i, feature) in collection.features.into_iter().enumerate() {
        let geometry = feature
            .geometry
            .ok_or_else(|| AdvisorError::GeoFormat(format!("feature {} has no geometry", i)))?;
        let geometry = geo::Geometry::<f64>::try_from(geometry)?;
        check_coordinates(&geometry, i)?;
        features.push(GeoFeature::with_properties(
            geometry,
            feature.properties.unwrap_or_default(),
        ));
    }
    debug!("loaded {} geo features", features.len());
    Ok(features)
}

/// Reads the whole stream; bytes that are not UTF-8 are a [`AdvisorError::GeoFormat`],
/// only failed reads are [`AdvisorError::Io`].
pub fn load_geo_features<R: Read>(mut reader: R) -> Result<Vec<GeoFeature>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| AdvisorError::GeoFormat(format!("input is not valid UTF-8: {}", e)))?;
    parse_geo_features(text)
}

pub fn load_geo_features_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<GeoFeature>> {
    load_geo_features(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use geo::Geometry;

    fn collection(features: &str, extra: &str) -> String {
        format!(
            r#"{{"type": "FeatureCollection"{}, "features": [{}]}}"#,
            extra, features
        )
    }

    const POINT: &str = r#"{"type": "Feature",
        "properties": {"name": "School_1", "population": 80},
        "geometry": {"type": "Point", "coordinates": [25.5, -1.25]}}"#;

    #[test]
    fn test_parse_points() {
        let features = parse_geo_features(&collection(POINT, "")).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name.as_deref(), Some("School_1"));
        assert_eq!(features[0].population, Some(80.0));
        assert!(matches!(features[0].geometry, Geometry::Point(p) if p.x() == 25.5 && p.y() == -1.25));
    }

    #[test]
    fn test_wgs84_crs_is_accepted() {
        let crs = r#", "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:OGC:1.3:CRS84"}}"#;
        assert_eq!(parse_geo_features(&collection(POINT, crs)).unwrap().len(), 1);
    }

    #[test]
    fn test_projected_crs_is_rejected() {
        let crs = r#", "crs": {"type": "name", "properties": {"name": "EPSG:3857"}}"#;
        let err = parse_geo_features(&collection(POINT, crs)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GeoFormat);
        assert!(err.to_string().contains("EPSG:3857"));
    }

    #[test]
    fn test_out_of_range_coordinates() {
        let projected = r#"{"type": "Feature", "properties": {},
            "geometry": {"type": "Point", "coordinates": [2845000.0, 4865000.0]}}"#;
        let err = parse_geo_features(&collection(projected, "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GeoFormat);
    }

    #[test]
    fn test_empty_collection() {
        let err = parse_geo_features(&collection("", "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyData);
    }

    #[test]
    fn test_missing_geometry() {
        let feature = r#"{"type": "Feature", "properties": {}, "geometry": null}"#;
        let err = parse_geo_features(&collection(feature, "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GeoFormat);
    }

    #[test]
    fn test_not_a_feature_collection() {
        let err = parse_geo_features(r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GeoFormat);
        let err = parse_geo_features("node_id,bandwidth\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GeoFormat);
    }

    #[test]
    fn test_load_from_reader() {
        let text = collection(&format!("{},{}", POINT, POINT), "");
        assert_eq!(load_geo_features(text.as_bytes()).unwrap().len(), 2);
    }

    #[test]
    fn test_load_rejects_invalid_utf8_as_geo_format() {
        let bytes: &[u8] = b"{\"type\": \"FeatureCollection\", \"features\": [\xff\xfe]}";
        let err = load_geo_features(bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GeoFormat);
    }
}
