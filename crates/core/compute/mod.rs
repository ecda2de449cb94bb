//! Geohashing, distance resolution and coordinate validation.

pub mod distance;
pub mod geohasher;
pub mod validation;

pub use distance::{distance_between, distance_miles, nearest};
pub use geohasher::{DefaultGeohasher, Geohasher, Neighbors};
