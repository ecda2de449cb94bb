//! # geonear-types
//!
//! Plain data types shared by the geonear engine and its server:
//!
//! - **Records**: `GeoRecord`, one geocoded location
//! - **Cells**: `CellBounds`, the rectangle covered by a geohash
//!
//! All types are serializable with Serde and interoperate with the `geo`
//! crate's primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geonear_types::bbox::CellBounds;
//! use geonear_types::record::GeoRecord;
//!
//! let nyc = GeoRecord::new(1, "New York", "NY", 40.7128, -74.0060);
//! let cell = CellBounds::new(40.0, 41.0, -75.0, -74.0);
//! assert!(cell.contains_point(&nyc.point()));
//! ```

pub mod bbox;
pub mod record;

pub use bbox::CellBounds;
pub use record::GeoRecord;
