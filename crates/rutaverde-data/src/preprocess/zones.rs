use super::PreprocessContext;
use crate::aliases::ZoneInput;
use rutaverde_core::catalog::{locality_name_or_default, normalize_locality, Frequency, Operator};
use rutaverde_core::models::{
    is_marked_processed, schedule_label, Feature, FeatureCollection, Processed, RawCollection,
    RawProperties, Shift, ZoneProperties, ZoneRecord,
};
use rutaverde_core::{Result, RutaverdeError};
use serde_json::Value;

/// Turn a collection into canonical zone records
pub trait PreprocessZones {
    fn preprocess_zones(self, ctx: &mut PreprocessContext) -> FeatureCollection<ZoneRecord>;
}

impl PreprocessZones for FeatureCollection<ZoneRecord> {
    fn preprocess_zones(self, _ctx: &mut PreprocessContext) -> FeatureCollection<ZoneRecord> {
        self
    }
}

impl PreprocessZones for RawCollection {
    fn preprocess_zones(self, ctx: &mut PreprocessContext) -> FeatureCollection<ZoneRecord> {
        if self.is_processed() {
            tracing::debug!(features = self.len(), "Zones already processed");
            let features = self
                .features
                .into_iter()
                .map(|feature| {
                    let record = read_canonical(feature.properties);
                    Feature::new(feature.geometry, record)
                })
                .collect();
            return FeatureCollection::new(self.name, features);
        }

        let total = self.len();
        let features = self
            .features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| {
                let record = if is_marked_processed(&feature.properties) {
                    read_canonical(feature.properties)
                } else {
                    match preprocess_zone(index, &feature.properties, ctx) {
                        Ok(props) => ZoneRecord::Processed(props),
                        Err(e) => {
                            tracing::warn!(feature = index, error = %e, "Keeping zone unprocessed");
                            ctx.note_failure(index);
                            ZoneRecord::Unprocessed(feature.properties)
                        }
                    }
                };
                Feature::new(feature.geometry, record)
            })
            .collect();

        tracing::info!(
            features = total,
            failed = ctx.failed_features().len(),
            "Zones preprocessed"
        );
        FeatureCollection::new(self.name, features)
    }
}

fn read_canonical(properties: RawProperties) -> ZoneRecord {
    // untagged: anything that is not a full canonical record stays unprocessed
    serde_json::from_value(Value::Object(properties.clone()))
        .unwrap_or(ZoneRecord::Unprocessed(properties))
}

/// Derive the canonical properties of one zone feature.
pub fn preprocess_zone(
    index: usize,
    properties: &RawProperties,
    ctx: &mut PreprocessContext,
) -> Result<ZoneProperties> {
    let input = ZoneInput::from_properties(properties)
        .map_err(|reason| RutaverdeError::InvalidFeature { index, reason })?;

    let localidad = locality_name_or_default(&input.locality_id);
    let localidad_norm = normalize_locality(&localidad);
    let operator_id = Operator::for_locality(&localidad_norm);
    if !operator_id.is_known() {
        ctx.note_unresolved_locality(&localidad_norm);
    }

    let frequency = Frequency::from_id(&input.frequency_id);
    if frequency == Frequency::Unavailable {
        tracing::debug!(feature = index, frequency_id = %input.frequency_id, "Unknown frequency id");
    }

    let mut source = properties.clone();
    source.retain(|key, _| !ZoneProperties::CANONICAL_KEYS.contains(&key.as_str()));

    Ok(ZoneProperties {
        localidad,
        localidad_norm,
        locality_id: input.locality_id,
        frequency_id: input.frequency_id,
        operator_id,
        frequency,
        shift: Shift::from_hours(input.start, input.end),
        schedule_label: schedule_label(input.start, input.end),
        start_time: input.start,
        end_time: input.end,
        feature_index: index,
        processed: Processed,
        source,
    })
}
