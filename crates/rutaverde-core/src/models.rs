pub mod feature;
pub mod geometry;
pub mod site;
pub mod zone;

pub use feature::{
    is_marked_processed, Feature, FeatureCollection, HasGeometry, Processed, RawCollection,
    RawProperties, PROCESSED_KEY,
};
pub use geometry::{BoundingBox, Crs, Geometry, GeometryType, Position};
pub use site::{SiteProperties, SiteType, UNNAMED_SITE};
pub use zone::{format_hhmm, schedule_label, DayPeriod, Shift, ZoneProperties, ZoneRecord};
