//! GeoJSON document reader.
//!
//! Reading is lenient at the feature level and strict at the document level:
//! a document that is not a `FeatureCollection` with a `features` array is
//! rejected, while a feature with a missing or unsupported geometry is kept
//! with `geometry = None` and recorded in the [`ValidationReport`]. Entries
//! that are not objects become empty placeholders, so feature `i` of the
//! collection is always entry `i` of the source document.

use crate::error::{Result, RutaverdeError};
use crate::models::{Feature, Geometry, RawCollection, RawProperties};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Per-document findings that never abort a load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub feature_count: usize,
    /// Indices of entries whose `type` is not `Feature`
    pub non_feature_entries: Vec<usize>,
    /// Indices of features with a null or absent geometry
    pub missing_geometry: Vec<usize>,
    /// Indices of features whose geometry could not be read, with the reason
    pub invalid_geometry: Vec<(usize, String)>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.non_feature_entries.is_empty()
            && self.missing_geometry.is_empty()
            && self.invalid_geometry.is_empty()
    }

    /// Emit the report through tracing
    pub fn log(&self, document: &str) {
        if self.is_clean() {
            tracing::debug!(document, features = self.feature_count, "Document is valid");
            return;
        }
        tracing::warn!(
            document,
            features = self.feature_count,
            non_features = self.non_feature_entries.len(),
            missing_geometry = self.missing_geometry.len(),
            invalid_geometry = self.invalid_geometry.len(),
            "Document has defective features"
        );
    }
}

/// A raw collection plus what was found while reading it
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub collection: RawCollection,
    pub report: ValidationReport,
}

/// Read and parse a GeoJSON document from disk.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<ParsedDocument> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let label = path.file_name().and_then(|s| s.to_str()).unwrap_or("document");
    parse_document(label, &content)
}

/// Parse GeoJSON text.
pub fn parse_document(document: &str, text: &str) -> Result<ParsedDocument> {
    let value: Value = serde_json::from_str(text).map_err(|e| malformed(document, format!("invalid JSON: {}", e)))?;
    parse_document_value(document, value)
}

/// Parse an already decoded JSON value.
pub fn parse_document_value(document: &str, value: Value) -> Result<ParsedDocument> {
    let Value::Object(mut root) = value else {
        return Err(malformed(document, "top-level value is not an object"));
    };

    match root.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        Some(other) => {
            return Err(malformed(document, format!("expected FeatureCollection, found {}", other)))
        }
        None => return Err(malformed(document, "missing type")),
    }

    let entries = match root.remove("features") {
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(malformed(document, "features is not an array")),
        None => return Err(malformed(document, "missing features array")),
    };

    let crs_name = root
        .get("crs")
        .and_then(|crs| crs.get("properties"))
        .and_then(|props| props.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let name = root.get("name").and_then(Value::as_str).map(str::to_string);

    let mut report = ValidationReport { feature_count: entries.len(), ..Default::default() };
    let mut features = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let Value::Object(mut entry) = entry else {
            tracing::warn!(document, feature = index, "Feature entry is not an object, keeping an empty placeholder");
            report.non_feature_entries.push(index);
            report.missing_geometry.push(index);
            features.push(Feature::new(None, RawProperties::new()));
            continue;
        };

        if entry.get("type").and_then(Value::as_str) != Some("Feature") {
            report.non_feature_entries.push(index);
        }

        let properties = match entry.remove("properties") {
            Some(Value::Object(props)) => props,
            _ => RawProperties::new(),
        };

        let geometry = match entry.remove("geometry") {
            None | Some(Value::Null) => {
                report.missing_geometry.push(index);
                None
            }
            Some(value) => match read_geometry(value) {
                Ok(geometry) => Some(geometry),
                Err(reason) => {
                    tracing::warn!(document, feature = index, %reason, "Dropping unreadable geometry");
                    report.invalid_geometry.push((index, reason));
                    None
                }
            },
        };

        features.push(Feature::new(geometry, properties));
    }

    let collection = RawCollection { name, crs_name, features };
    Ok(ParsedDocument { collection, report })
}

fn read_geometry(value: Value) -> std::result::Result<Geometry, String> {
    let geometry = geojson::Geometry::from_json_value(value).map_err(|e| e.to_string())?;
    Geometry::from_geojson_value(&geometry.value)
}

fn malformed(document: &str, reason: impl Into<String>) -> RutaverdeError {
    RutaverdeError::MalformedDocument { document: document.to_string(), reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Crs;
    use serde_json::json;

    #[test]
    fn test_parse_feature_collection() {
        let doc = json!({
            "type": "FeatureCollection",
            "name": "macrobarr",
            "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::3857"}},
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [-8245000.0, 513000.0]},
                    "properties": {"IDLOCALID_": "13"}
                }
            ]
        });

        let parsed = parse_document_value("macrobarr.geojson", doc).unwrap();
        assert_eq!(parsed.collection.name.as_deref(), Some("macrobarr"));
        assert_eq!(parsed.collection.declared_crs(), Some(Crs::WebMercator));
        assert_eq!(parsed.collection.features.len(), 1);
        assert_eq!(parsed.collection.features[0].properties["IDLOCALID_"], "13");
        assert!(parsed.report.is_clean());
    }

    #[test]
    fn test_wrong_top_level_type_is_malformed() {
        let doc = json!({"type": "Feature", "geometry": null, "properties": {}});
        let err = parse_document_value("zones", doc).unwrap_err();
        assert!(matches!(err, RutaverdeError::MalformedDocument { .. }));
    }

    #[test]
    fn test_missing_features_is_malformed() {
        let err = parse_document("zones", r#"{"type": "FeatureCollection"}"#).unwrap_err();
        assert!(err.to_string().contains("missing features array"));
        assert!(parse_document("zones", "not json").is_err());
    }

    #[test]
    fn test_defective_features_are_kept_and_reported() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null, "properties": {"a": 1}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}, "properties": {}},
                {"type": "Thing", "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
                42
            ]
        });

        let parsed = parse_document_value("sites", doc).unwrap();
        assert_eq!(parsed.report.feature_count, 4);
        assert_eq!(parsed.report.missing_geometry, vec![0, 3]);
        assert_eq!(parsed.report.invalid_geometry.len(), 1);
        assert_eq!(parsed.report.non_feature_entries, vec![2, 3]);
        assert_eq!(parsed.collection.features.len(), 4);
        assert!(parsed.collection.features[1].geometry.is_none());
        assert_eq!(parsed.collection.features[2].geometry, Some(Geometry::point(1.0, 2.0)));
        assert_eq!(parsed.collection.features[3], Feature::new(None, RawProperties::new()));
    }

    #[test]
    fn test_feature_positions_match_source_entries() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                "not a feature",
                null,
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-74.07, 4.62]}, "properties": {"n": 2}}
            ]
        });

        let parsed = parse_document_value("sites", doc).unwrap();
        assert_eq!(parsed.collection.features.len(), 3);
        assert_eq!(parsed.collection.features[2].properties["n"], 2);
        assert_eq!(parsed.report.non_feature_entries, vec![0, 1]);
    }
}
