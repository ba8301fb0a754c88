//! Distance search over recycling sites.
//!
//! The site dataset is small, so this is a plain scan; no index.

use rutaverde_core::models::{FeatureCollection, SiteProperties};
use rutaverde_geo::spatial::haversine_km;
use serde::Serialize;
use std::cmp::Ordering;

/// A site with its distance from the query point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbySite<'a> {
    /// Position of the site in its collection
    pub index: usize,
    pub site: &'a SiteProperties,
    /// Kilometres, rounded to two decimals
    pub distance_km: f64,
}

/// Round to two decimals (10 m resolution)
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}

/// Sites within `radius_km` of `(lat, lng)`, nearest first.
///
/// The radius applies to the rounded distance. Ties keep collection order.
/// `limit` caps the number of results.
pub fn nearest_sites(
    sites: &FeatureCollection<SiteProperties>,
    lat: f64,
    lng: f64,
    radius_km: f64,
    limit: Option<usize>,
) -> Vec<NearbySite<'_>> {
    if !lat.is_finite() || !lng.is_finite() {
        return Vec::new();
    }

    let mut found: Vec<NearbySite<'_>> = sites
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            let site = &feature.properties;
            let distance_km = round_km(haversine_km(lat, lng, site.lat, site.lng));
            NearbySite { index, site, distance_km }
        })
        .filter(|nearby| nearby.distance_km <= radius_km)
        .collect();

    found.sort_by(|a, b| a.distance_km.partial_cmp(&b.distance_km).unwrap_or(Ordering::Equal));
    if let Some(limit) = limit {
        found.truncate(limit);
    }
    found
}

/// Nearest site within the radius, if any
pub fn nearest_site(
    sites: &FeatureCollection<SiteProperties>,
    lat: f64,
    lng: f64,
    radius_km: f64,
) -> Option<NearbySite<'_>> {
    nearest_sites(sites, lat, lng, radius_km, Some(1)).into_iter().next()
}

/// Keep sites accepting a material, matched case-insensitively as a
/// substring of any tag. A blank query keeps everything.
pub fn filter_by_material<'a>(sites: Vec<NearbySite<'a>>, material: &str) -> Vec<NearbySite<'a>> {
    if material.trim().is_empty() {
        return sites;
    }
    sites.into_iter().filter(|nearby| nearby.site.accepts_material(material)).collect()
}
