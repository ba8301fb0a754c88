//! detect → transform → preprocess

use crate::preprocess::{PreprocessContext, PreprocessSites, PreprocessZones};
use rutaverde_core::document::{ParsedDocument, ValidationReport};
use rutaverde_core::models::{Crs, FeatureCollection, RawCollection, SiteProperties, ZoneRecord};
use rutaverde_core::Result;
use rutaverde_geo::projection::transform_collection;
use rutaverde_geo::detect_crs;

/// A canonical collection plus how it was obtained
#[derive(Debug, Clone)]
pub struct Normalized<P> {
    pub collection: FeatureCollection<P>,
    /// CRS the source document was published in
    pub source_crs: Crs,
    /// Whether the document was already canonical on arrival
    pub was_processed: bool,
    pub report: ValidationReport,
}

/// Bring a raw collection into WGS84.
///
/// Documents whose first feature is already marked processed were written
/// by this pipeline and are taken to be WGS84 as they stand.
pub fn to_wgs84(raw: RawCollection, label: &str) -> Result<(RawCollection, Crs)> {
    if raw.is_processed() {
        return Ok((raw, Crs::Wgs84));
    }
    let crs = detect_crs(&raw, label);
    Ok((transform_collection(raw, crs, label)?, crs))
}

/// Run the zone pipeline over a parsed document.
pub fn normalize_zones(
    document: ParsedDocument,
    label: &str,
    ctx: &mut PreprocessContext,
) -> Result<Normalized<ZoneRecord>> {
    document.report.log(label);
    let was_processed = document.collection.is_processed();
    let (raw, source_crs) = to_wgs84(document.collection, label)?;
    Ok(Normalized {
        collection: raw.preprocess_zones(ctx),
        source_crs,
        was_processed,
        report: document.report,
    })
}

/// Run the site pipeline over a parsed document.
pub fn normalize_sites(
    document: ParsedDocument,
    label: &str,
    ctx: &mut PreprocessContext,
) -> Result<Normalized<SiteProperties>> {
    document.report.log(label);
    let was_processed = document.collection.is_processed();
    let (raw, source_crs) = to_wgs84(document.collection, label)?;
    Ok(Normalized {
        collection: raw.preprocess_sites(ctx),
        source_crs,
        was_processed,
        report: document.report,
    })
}
