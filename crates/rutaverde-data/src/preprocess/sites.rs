use super::PreprocessContext;
use crate::aliases::SiteInput;
use rutaverde_core::models::{
    is_marked_processed, Feature, FeatureCollection, Geometry, Processed, RawCollection,
    RawProperties, SiteProperties,
};
use rutaverde_core::{Result, RutaverdeError};
use serde_json::Value;

/// Turn a collection into canonical recycling sites
pub trait PreprocessSites {
    fn preprocess_sites(self, ctx: &mut PreprocessContext) -> FeatureCollection<SiteProperties>;
}

impl PreprocessSites for FeatureCollection<SiteProperties> {
    fn preprocess_sites(self, _ctx: &mut PreprocessContext) -> FeatureCollection<SiteProperties> {
        self
    }
}

impl PreprocessSites for RawCollection {
    /// Sites without a usable point location are dropped: they can never
    /// show up in a distance search.
    fn preprocess_sites(self, ctx: &mut PreprocessContext) -> FeatureCollection<SiteProperties> {
        let already_processed = self.is_processed();
        if already_processed {
            tracing::debug!(features = self.len(), "Sites already processed");
        }

        let total = self.len();
        let mut features = Vec::with_capacity(total);
        for (index, feature) in self.features.into_iter().enumerate() {
            let canonical = if already_processed || is_marked_processed(&feature.properties) {
                serde_json::from_value(Value::Object(feature.properties.clone())).ok()
            } else {
                None
            };

            let properties = match canonical {
                Some(properties) => properties,
                None => match preprocess_site(index, feature.geometry.as_ref(), &feature.properties) {
                    Ok(properties) => properties,
                    Err(e) => {
                        tracing::warn!(feature = index, error = %e, "Dropping site");
                        ctx.note_failure(index);
                        continue;
                    }
                },
            };
            features.push(Feature::new(feature.geometry, properties));
        }

        tracing::info!(
            features = total,
            dropped = ctx.failed_features().len(),
            "Sites preprocessed"
        );
        FeatureCollection::new(self.name, features)
    }
}

/// Derive the canonical properties of one site feature.
pub fn preprocess_site(
    index: usize,
    geometry: Option<&Geometry>,
    properties: &RawProperties,
) -> Result<SiteProperties> {
    let [lng, lat] = match geometry {
        Some(Geometry::Point { coordinates }) => *coordinates,
        Some(other) => {
            return Err(RutaverdeError::InvalidFeature {
                index,
                reason: format!("site geometry must be a Point, found {}", other.geometry_type()),
            })
        }
        None => {
            return Err(RutaverdeError::InvalidFeature {
                index,
                reason: "site has no geometry".to_string(),
            })
        }
    };
    if !lng.is_finite() || !lat.is_finite() {
        return Err(RutaverdeError::InvalidFeature {
            index,
            reason: "site coordinates are not finite".to_string(),
        });
    }

    let input = SiteInput::from_properties(properties);
    let mut source = properties.clone();
    source.retain(|key, _| !SiteProperties::CANONICAL_KEYS.contains(&key.as_str()));

    Ok(SiteProperties {
        name: input.name,
        site_type: input.site_type,
        materials: input.materials,
        address: input.address,
        locality: input.locality,
        lat,
        lng,
        processed: Processed,
        source,
    })
}
