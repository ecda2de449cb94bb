//! Nearest-location lookups over a geohash prefix-trie index.
//!
//! ## Features
//! - **Geohash index**: records filed under fixed-precision geohashes in a
//!   prefix trie; lookups widen into neighboring cells and shorter prefixes
//! - **Exact answers**: the index path always returns a record as close as
//!   the one a linear scan would find
//! - **Brute force**: linear-scan baseline using the same distance function
//! - **Run-once loading**: records are read and indexed once, off the
//!   request path, with cancellation and an optional timeout (`loader`
//!   feature)
//!
//! ```rust
//! use geonear::prelude::*;
//!
//! let records = vec![
//!     GeoRecord::new(1, "New York", "NY", 40.7128, -74.0060),
//!     GeoRecord::new(2, "Los Angeles", "CA", 34.0522, -118.2437),
//! ];
//! let index = build_index(&records, DEFAULT_GEOHASH_PRECISION)?;
//!
//! let by_index = find_nearest_by_index(&index, 34.0, -118.0).unwrap();
//! let by_scan = find_nearest_by_brute_force(&records, 34.0, -118.0).unwrap();
//! assert_eq!(by_index.id, 2);
//! assert_eq!(by_index, by_scan);
//! # Ok::<(), geonear::GeoNearError>(())
//! ```

#[cfg(feature = "loader")]
pub mod builder;
#[cfg(feature = "loader")]
pub mod catalog;
pub mod compute;
pub mod config;
pub mod error;
pub mod index;
pub mod search;

#[cfg(feature = "loader")]
pub use builder::CatalogBuilder;
#[cfg(feature = "loader")]
pub use catalog::{Catalog, JsonFileSource, LoadState, MemorySource, RecordSource, Snapshot};
pub use config::Config;
pub use error::{GeoNearError, Result};

pub use geo::Point;
pub use geonear_types::{CellBounds, GeoRecord};

pub use compute::distance::{distance_between, distance_miles};
pub use compute::geohasher::{DefaultGeohasher, Geohasher};
pub use compute::validation;
pub use index::{DEFAULT_GEOHASH_PRECISION, NearestMatch, SearchArea, SpatialIndex};
pub use search::{
    RecordIndex, SearchMethod, build_index, find_nearest, find_nearest_by_brute_force,
    find_nearest_by_index,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {

    pub use crate::{GeoNearError, Result};

    #[cfg(feature = "loader")]
    pub use crate::{Catalog, CatalogBuilder, JsonFileSource, MemorySource, RecordSource};

    pub use crate::{CellBounds, GeoRecord, Point};

    pub use crate::{Config, DEFAULT_GEOHASH_PRECISION, SearchArea, SearchMethod, SpatialIndex};

    pub use crate::{build_index, find_nearest, find_nearest_by_brute_force, find_nearest_by_index};

    pub use crate::{distance_miles, validation};

    pub use std::time::Duration;
}
