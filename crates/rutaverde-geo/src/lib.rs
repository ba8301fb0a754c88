//! RutaVerde Geo - projections, spatial predicates and the zone index
//!
//! This crate handles the geospatial side of the pipeline: detecting and
//! undoing the projection a source document was published in, bounding boxes
//! and point-in-polygon tests over the canonical geometry model, and the
//! R-tree backed index used to resolve zones.

pub mod index;
pub mod projection;
pub mod spatial;

pub use index::SpatialIndex;
pub use projection::{detect_crs, transform_geometry, Reprojector, Transformed};
