//! RutaVerde Data - loading, preprocessing and querying the collection datasets
//!
//! Raw zone and site documents are fetched through a [`DocumentSource`],
//! brought into WGS84, enriched into canonical properties and held in a
//! [`DataStore`]. Queries go through the [`ZoneResolver`] and the nearby-site
//! search.

pub mod aliases;
pub mod loader;
pub mod nearby;
pub mod pipeline;
pub mod preprocess;
pub mod resolver;
pub mod schedule;
pub mod session;
pub mod source;
pub mod store;

pub use loader::{Loader, RetryPolicy};
pub use nearby::{filter_by_material, nearest_site, nearest_sites, NearbySite};
pub use pipeline::{normalize_sites, normalize_zones, Normalized};
pub use preprocess::{PreprocessContext, PreprocessSites, PreprocessZones};
pub use resolver::{ZoneResolution, ZoneResolver};
pub use schedule::{estimated_windows, frequency_days, CollectionWindow};
pub use session::{LocationOrigin, LocationState, UserSession};
pub use source::{DocumentSource, FileSource, HttpSource};
pub use store::{DataStore, DocumentOutcome, LoadReport};
