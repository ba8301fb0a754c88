//! CRS detection and transformation
//!
//! Three systems are supported: WGS84 geographic degrees, spherical Web
//! Mercator and the MAGNA-SIRGAS transverse Mercator with its origin in
//! Bogotá. Conversions are done by PROJ; collections are always brought
//! into WGS84.

use proj::Proj;
use rutaverde_core::error::{Result, RutaverdeError};
use rutaverde_core::models::{Crs, Geometry, Position, RawCollection};

/// Transverse Mercator the district datasets publish under the EPSG:9377
/// label: GRS80, origin at 4.5962°N 74.0775°W, false easting and northing
/// of 1 000 000 m.
pub const ORIGEN_NACIONAL_PROJ: &str = "+proj=tmerc +lat_0=4.596200416666666 +lon_0=-74.07750791666666 \
     +k=1 +x_0=1000000 +y_0=1000000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs +type=crs";

/// Definition handed to PROJ for `crs`
pub fn proj_definition(crs: Crs) -> &'static str {
    match crs {
        Crs::Wgs84 => "EPSG:4326",
        Crs::WebMercator => "EPSG:3857",
        Crs::LocalTransverseMercator => ORIGEN_NACIONAL_PROJ,
    }
}

/// Result of transforming a geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub geometry: Geometry,
    /// Vertices left untouched because they were not finite or PROJ
    /// could not convert them
    pub skipped: usize,
}

/// Converts positions from one supported system into another.
///
/// Build one per (source, target) pair and reuse it for a whole
/// collection; creating the PROJ pipeline is the expensive part.
pub struct Reprojector {
    from: Crs,
    to: Crs,
    /// `None` when source and target are the same system
    proj: Option<Proj>,
}

impl Reprojector {
    pub fn new(from: Crs, to: Crs) -> Result<Self> {
        if from == to {
            return Ok(Self { from, to, proj: None });
        }

        let proj = Proj::new_known_crs(proj_definition(from), proj_definition(to), None).map_err(
            |e| RutaverdeError::Projection {
                from: from.to_string(),
                to: to.to_string(),
                reason: e.to_string(),
            },
        )?;
        Ok(Self { from, to, proj: Some(proj) })
    }

    pub fn source(&self) -> Crs {
        self.from
    }

    pub fn target(&self) -> Crs {
        self.to
    }

    /// Convert one position, `None` if it is not finite or PROJ rejects it.
    pub fn convert(&self, position: Position) -> Option<Position> {
        if !position.iter().all(|v| v.is_finite()) {
            return None;
        }
        let Some(proj) = &self.proj else {
            return Some(position);
        };

        match proj.convert((position[0], position[1])) {
            Ok((x, y)) if x.is_finite() && y.is_finite() => Some([x, y]),
            _ => None,
        }
    }

    /// Transform every vertex of a geometry.
    ///
    /// Vertices that cannot be converted are passed through unchanged and
    /// counted in [`Transformed::skipped`]; a single bad vertex never fails
    /// the geometry.
    pub fn transform_geometry(&self, geometry: &Geometry) -> Transformed {
        if self.proj.is_none() {
            return Transformed { geometry: geometry.clone(), skipped: 0 };
        }

        let mut skipped = 0;
        let geometry = geometry.map_positions(|position| match self.convert(position) {
            Some(converted) => converted,
            None => {
                skipped += 1;
                position
            }
        });
        Transformed { geometry, skipped }
    }
}

/// Transform a single geometry from `from` into `to`.
pub fn transform_geometry(geometry: &Geometry, from: Crs, to: Crs) -> Result<Transformed> {
    Ok(Reprojector::new(from, to)?.transform_geometry(geometry))
}

/// Reproject a whole raw collection into WGS84.
///
/// A collection already in WGS84 is returned as is.
pub fn transform_collection(mut collection: RawCollection, from: Crs, label: &str) -> Result<RawCollection> {
    if from == Crs::Wgs84 {
        return Ok(collection);
    }

    let reprojector = Reprojector::new(from, Crs::Wgs84)?;
    tracing::info!(document = label, from = %from, features = collection.len(), "Reprojecting to WGS84");
    for (index, feature) in collection.features.iter_mut().enumerate() {
        let Some(geometry) = feature.geometry.as_ref() else {
            continue;
        };
        let transformed = reprojector.transform_geometry(geometry);
        if transformed.skipped > 0 {
            tracing::warn!(
                document = label,
                feature = index,
                skipped = transformed.skipped,
                "Left unconvertible coordinates untransformed"
            );
        }
        feature.geometry = Some(transformed.geometry);
    }
    Ok(collection)
}

/// Classify a single position by coordinate magnitude.
pub fn classify_position([x, y]: Position) -> Option<Crs> {
    let in_local_range = |v: f64| v > 80_000.0 && v < 150_000.0;

    if x.abs() > 1_000_000.0 || y.abs() > 1_000_000.0 {
        Some(Crs::WebMercator)
    } else if in_local_range(x) && in_local_range(y) {
        Some(Crs::LocalTransverseMercator)
    } else if x.abs() <= 180.0 && y.abs() <= 90.0 {
        Some(Crs::Wgs84)
    } else {
        None
    }
}

/// Detect the CRS a raw collection is published in.
///
/// Explicit `crs` metadata wins; otherwise the first vertex of the first
/// feature is classified by magnitude. Anything unrecognised falls back to
/// WGS84 with a warning.
pub fn detect_crs(collection: &RawCollection, label: &str) -> Crs {
    if let Some(crs) = collection.declared_crs() {
        tracing::debug!(document = label, crs = %crs, "CRS taken from document metadata");
        return crs;
    }

    if collection.is_empty() {
        tracing::debug!(document = label, "Empty document, assuming WGS84");
        return Crs::default();
    }
    let Some(position) = collection.first_position() else {
        tracing::warn!(document = label, "First feature has no geometry, assuming WGS84");
        return Crs::default();
    };

    match classify_position(position) {
        Some(crs) => {
            tracing::debug!(document = label, crs = %crs, x = position[0], y = position[1], "CRS detected from coordinates");
            crs
        }
        None => {
            tracing::warn!(
                document = label,
                x = position[0],
                y = position[1],
                "Could not detect CRS, assuming WGS84"
            );
            Crs::default()
        }
    }
}
