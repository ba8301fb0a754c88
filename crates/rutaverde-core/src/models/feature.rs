//! Feature and collection containers.
//!
//! [`RawCollection`] holds features exactly as the source documents publish
//! them: source CRS, free-form property bag. [`FeatureCollection<P>`] holds
//! canonical features in WGS84 whose properties `P` carry the processed
//! marker. Preprocessing turns the former into the latter.

use super::geometry::{BoundingBox, Crs, Geometry};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Free-form GeoJSON property bag
pub type RawProperties = serde_json::Map<String, serde_json::Value>;

/// Property key of the processed marker
pub const PROCESSED_KEY: &str = "_processed";

/// Marker carried by canonical property structs.
///
/// Serializes as `true` and only deserializes from `true`, so a property bag
/// without the marker never parses as canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Processed;

impl Serialize for Processed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(true)
    }
}

impl<'de> Deserialize<'de> for Processed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if bool::deserialize(deserializer)? {
            Ok(Processed)
        } else {
            Err(serde::de::Error::custom("feature is not processed"))
        }
    }
}

/// Whether a raw property bag carries `_processed: true`.
pub fn is_marked_processed(properties: &RawProperties) -> bool {
    matches!(properties.get(PROCESSED_KEY), Some(serde_json::Value::Bool(true)))
}

/// Anything with an optional geometry that can be indexed
pub trait HasGeometry {
    fn geometry(&self) -> Option<&Geometry>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollectionTag {
    #[default]
    FeatureCollection,
}

/// One GeoJSON feature with typed properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature<P> {
    #[serde(rename = "type", default)]
    pub kind: FeatureTag,
    pub geometry: Option<Geometry>,
    pub properties: P,
}

impl<P> Feature<P> {
    pub fn new(geometry: Option<Geometry>, properties: P) -> Self {
        Self { kind: FeatureTag::Feature, geometry, properties }
    }

    /// Keep the geometry, replace the properties
    pub fn with_properties<Q>(self, properties: Q) -> Feature<Q> {
        Feature { kind: self.kind, geometry: self.geometry, properties }
    }
}

impl<P> HasGeometry for Feature<P> {
    fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }
}

/// Canonical collection, always WGS84 `[lng, lat]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection<P> {
    #[serde(rename = "type", default)]
    pub kind: CollectionTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn new(name: Option<String>, features: Vec<Feature<P>>) -> Self {
        Self { kind: CollectionTag::FeatureCollection, name, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Bounding box over every feature geometry
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        bounds_of(self.features.iter().filter_map(|f| f.geometry.as_ref()))
    }
}

/// A collection as read from a source document, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawCollection {
    pub name: Option<String>,
    /// Value of `crs.properties.name`, when the document declares one
    pub crs_name: Option<String>,
    pub features: Vec<Feature<RawProperties>>,
}

impl RawCollection {
    pub fn new(features: Vec<Feature<RawProperties>>) -> Self {
        Self { name: None, crs_name: None, features }
    }

    pub fn with_crs_name(mut self, crs_name: impl Into<String>) -> Self {
        self.crs_name = Some(crs_name.into());
        self
    }

    /// CRS named by the document metadata, if it is one we know.
    pub fn declared_crs(&self) -> Option<Crs> {
        self.crs_name.as_deref().and_then(Crs::from_crs_name)
    }

    /// First vertex of the first feature. `None` when that feature has no
    /// geometry, even if later ones do.
    pub fn first_position(&self) -> Option<[f64; 2]> {
        self.features.first()?.geometry.as_ref()?.first_position()
    }

    /// Whether the first feature already carries the processed marker
    pub fn is_processed(&self) -> bool {
        self.features.first().map(|f| is_marked_processed(&f.properties)).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        bounds_of(self.features.iter().filter_map(|f| f.geometry.as_ref()))
    }
}

fn bounds_of<'a>(geometries: impl Iterator<Item = &'a Geometry>) -> Option<BoundingBox> {
    geometries
        .flat_map(|g| g.positions())
        .filter(|[x, y]| x.is_finite() && y.is_finite())
        .map(|[x, y]| BoundingBox::new(*x, *y, *x, *y))
        .reduce(|a, b| a.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Tagged {
        #[serde(rename = "_processed")]
        processed: Processed,
        name: String,
    }

    #[test]
    fn test_processed_marker_only_accepts_true() {
        let ok: Tagged = serde_json::from_value(json!({"_processed": true, "name": "a"})).unwrap();
        assert_eq!(ok.name, "a");
        assert!(serde_json::from_value::<Tagged>(json!({"_processed": false, "name": "a"})).is_err());
        assert!(serde_json::from_value::<Tagged>(json!({"name": "a"})).is_err());

        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["_processed"], json!(true));
    }

    #[test]
    fn test_feature_serializes_as_geojson() {
        let feature = Feature::new(Some(Geometry::point(-74.07, 4.62)), RawProperties::new());
        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["type"], "Feature");
        assert_eq!(json["geometry"]["type"], "Point");

        let collection = FeatureCollection::new(None, vec![feature]);
        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_raw_collection_processed_flag() {
        let mut properties = RawProperties::new();
        let raw = RawCollection::new(vec![Feature::new(None, properties.clone())]);
        assert!(!raw.is_processed());

        properties.insert(PROCESSED_KEY.to_string(), json!(true));
        let raw = RawCollection::new(vec![Feature::new(None, properties)]);
        assert!(raw.is_processed());
        assert!(!RawCollection::new(vec![]).is_processed());
    }

    #[test]
    fn test_collection_bounding_box() {
        let raw = RawCollection::new(vec![
            Feature::new(Some(Geometry::point(-74.1, 4.6)), RawProperties::new()),
            Feature::new(None, RawProperties::new()),
            Feature::new(Some(Geometry::rectangle(-74.0, 4.7, -73.9, 4.8)), RawProperties::new()),
        ]);
        let bbox = raw.bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox::new(-74.1, 4.6, -73.9, 4.8));
        assert_eq!(raw.first_position(), Some([-74.1, 4.6]));
    }

    #[test]
    fn test_declared_crs() {
        let raw = RawCollection::new(vec![]).with_crs_name("urn:ogc:def:crs:EPSG::3857");
        assert_eq!(raw.declared_crs(), Some(Crs::WebMercator));
        assert_eq!(RawCollection::new(vec![]).declared_crs(), None);
    }
}
