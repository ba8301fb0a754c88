//! In-memory holder for the loaded datasets.
//!
//! Each dataset sits behind its own lock as a whole `Arc` value. Writers swap
//! the `Arc`; readers clone it and never observe a half-replaced collection.
//! A poisoned lock still holds a complete value, so it is read through.

use crate::loader::Loader;
use crate::nearby::{nearest_sites, NearbySite};
use crate::pipeline::Normalized;
use crate::resolver::{ZoneResolution, ZoneResolver};
use rutaverde_core::models::{Crs, FeatureCollection, SiteProperties};
use rutaverde_core::Result;
use std::sync::{Arc, PoisonError, RwLock};

/// Result of loading one document during a refresh
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Loaded { features: usize, source_crs: Crs, was_processed: bool },
    /// The document failed; whatever was loaded before stays in place
    Failed { reason: String },
}

impl DocumentOutcome {
    fn from_result<P>(result: &Result<Normalized<P>>) -> Self {
        match result {
            Ok(normalized) => DocumentOutcome::Loaded {
                features: normalized.collection.len(),
                source_crs: normalized.source_crs,
                was_processed: normalized.was_processed,
            },
            Err(e) => DocumentOutcome::Failed { reason: e.to_string() },
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, DocumentOutcome::Loaded { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub zones: DocumentOutcome,
    pub sites: DocumentOutcome,
}

#[derive(Debug, Default)]
pub struct DataStore {
    zones: RwLock<Option<Arc<ZoneResolver>>>,
    sites: RwLock<Option<Arc<FeatureCollection<SiteProperties>>>>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zone resolver, if zones have been loaded
    pub fn zones(&self) -> Option<Arc<ZoneResolver>> {
        self.zones.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Current site collection, if sites have been loaded
    pub fn sites(&self) -> Option<Arc<FeatureCollection<SiteProperties>>> {
        self.sites.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn replace_zones(&self, resolver: ZoneResolver) {
        *self.zones.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(resolver));
    }

    pub fn replace_sites(&self, sites: FeatureCollection<SiteProperties>) {
        *self.sites.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(sites));
    }

    /// Reload both documents. Each one is swapped in only if it loaded.
    pub async fn refresh(&self, loader: &Loader) -> LoadReport {
        let (zones, sites) = loader.load_all().await;
        let report = LoadReport {
            zones: DocumentOutcome::from_result(&zones),
            sites: DocumentOutcome::from_result(&sites),
        };

        match zones {
            Ok(normalized) => self.replace_zones(ZoneResolver::indexed(normalized.collection)),
            Err(e) => tracing::error!(document = loader.zones_document(), error = %e, "Keeping previous zones"),
        }
        match sites {
            Ok(normalized) => self.replace_sites(normalized.collection),
            Err(e) => tracing::error!(document = loader.sites_document(), error = %e, "Keeping previous sites"),
        }

        tracing::info!(
            zones_loaded = report.zones.is_loaded(),
            sites_loaded = report.sites.is_loaded(),
            "Data refresh finished"
        );
        report
    }

    /// Zone containing the point. `None` when zones are not loaded or the
    /// point is outside coverage.
    pub fn resolve_zone(&self, lat: f64, lng: f64) -> Option<ZoneResolution> {
        self.zones()?.resolve(lat, lng)
    }

    /// Owned nearby search over the current sites: `(index, site, distance_km)`.
    pub fn nearest_sites(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
        limit: Option<usize>,
    ) -> Vec<(usize, SiteProperties, f64)> {
        let Some(sites) = self.sites() else {
            return Vec::new();
        };
        nearest_sites(&sites, lat, lng, radius_km, limit)
            .into_iter()
            .map(|NearbySite { index, site, distance_km }| (index, site.clone(), distance_km))
            .collect()
    }
}
