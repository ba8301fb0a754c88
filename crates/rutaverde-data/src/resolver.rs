//! Point → collection zone resolution.

use crate::aliases::{self, LOCALITY_ID};
use chrono::NaiveDate;
use rutaverde_core::catalog::{
    locality_name_or_default, normalize_locality, zone_data_date, Frequency, Operator,
    ZONE_DATA_SOURCE,
};
use rutaverde_core::models::{Feature, FeatureCollection, Geometry, ZoneRecord};
use rutaverde_geo::spatial::contains_point;
use rutaverde_geo::SpatialIndex;
use serde::Serialize;
use std::sync::Arc;

/// Placeholder for fields an unprocessed zone cannot provide
pub const UNAVAILABLE: &str = "unavailable";

/// Locality label for a zone without a locality id
pub const UNKNOWN_LOCALITY: &str = "Unknown zone";

/// Display fields of the zone containing a query point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneResolution {
    pub locality: String,
    pub locality_norm: String,
    pub frequency: String,
    pub shift: String,
    pub schedule: String,
    pub operator_id: Operator,
    pub operator_name: String,
    pub source: String,
    pub data_date: NaiveDate,
    /// Position of the zone in its collection
    pub zone_index: usize,
    #[serde(skip)]
    pub geometry: Option<Geometry>,
}

impl ZoneResolution {
    /// Display fields of `feature`, found at `index` in its collection
    pub fn from_feature(index: usize, feature: &Feature<ZoneRecord>) -> Self {
        let geometry = feature.geometry.clone();
        match &feature.properties {
            ZoneRecord::Processed(props) => Self {
                locality: props.localidad.clone(),
                locality_norm: props.localidad_norm.clone(),
                frequency: props.frequency.label().to_string(),
                shift: props.shift.to_string(),
                schedule: props.schedule_label.clone(),
                operator_id: props.operator_id,
                operator_name: props.operator_id.display_name().to_string(),
                source: ZONE_DATA_SOURCE.to_string(),
                data_date: zone_data_date(),
                zone_index: index,
                geometry,
            },
            ZoneRecord::Unprocessed(raw) => {
                let locality = aliases::lookup(raw, LOCALITY_ID)
                    .and_then(aliases::as_text)
                    .map(|id| locality_name_or_default(&id))
                    .unwrap_or_else(|| UNKNOWN_LOCALITY.to_string());
                Self {
                    locality_norm: normalize_locality(&locality),
                    locality,
                    frequency: Frequency::Unavailable.label().to_string(),
                    shift: UNAVAILABLE.to_string(),
                    schedule: UNAVAILABLE.to_string(),
                    operator_id: Operator::Unknown,
                    operator_name: Operator::Unknown.display_name().to_string(),
                    source: ZONE_DATA_SOURCE.to_string(),
                    data_date: zone_data_date(),
                    zone_index: index,
                    geometry,
                }
            }
        }
    }
}

/// First zone in collection order containing the point, by exhaustive scan
pub fn find_linear(
    features: &[Feature<ZoneRecord>],
    lng: f64,
    lat: f64,
) -> Option<(usize, &Feature<ZoneRecord>)> {
    features.iter().enumerate().find(|(_, feature)| {
        feature.geometry.as_ref().map(|g| contains_point(g, lng, lat)).unwrap_or(false)
    })
}

/// Resolves query points against one zone collection.
///
/// The collection and its index are built together and replaced together.
#[derive(Debug)]
pub struct ZoneResolver {
    zones: Arc<FeatureCollection<ZoneRecord>>,
    index: Option<SpatialIndex>,
}

impl ZoneResolver {
    /// Resolver backed by a spatial index built from `zones`
    pub fn indexed(zones: FeatureCollection<ZoneRecord>) -> Self {
        let index = SpatialIndex::build(&zones.features);
        tracing::info!(zones = zones.len(), indexed = index.len(), "Zone index built");
        Self { zones: Arc::new(zones), index: Some(index) }
    }

    /// Resolver that scans every zone
    pub fn linear(zones: FeatureCollection<ZoneRecord>) -> Self {
        Self { zones: Arc::new(zones), index: None }
    }

    pub fn zones(&self) -> &FeatureCollection<ZoneRecord> {
        &self.zones
    }

    /// Shared handle to the zone collection
    pub fn zones_arc(&self) -> Arc<FeatureCollection<ZoneRecord>> {
        Arc::clone(&self.zones)
    }

    pub fn index(&self) -> Option<&SpatialIndex> {
        self.index.as_ref()
    }

    /// The zone feature containing `(lat, lng)`, with its position
    pub fn find_zone(&self, lat: f64, lng: f64) -> Option<(usize, &Feature<ZoneRecord>)> {
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        match &self.index {
            Some(index) => index.find_containing_feature(&self.zones.features, lng, lat),
            None => find_linear(&self.zones.features, lng, lat),
        }
    }

    /// Display fields of the zone containing `(lat, lng)`. `None` means the
    /// point is outside coverage.
    pub fn resolve(&self, lat: f64, lng: f64) -> Option<ZoneResolution> {
        match self.find_zone(lat, lng) {
            Some((index, feature)) => {
                let resolution = ZoneResolution::from_feature(index, feature);
                tracing::debug!(lat, lng, zone = index, locality = %resolution.locality, "Zone resolved");
                Some(resolution)
            }
            None => {
                tracing::debug!(lat, lng, "Point outside all zones");
                None
            }
        }
    }
}
