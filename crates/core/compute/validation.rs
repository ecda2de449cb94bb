//! Validation for geographic coordinates, records and index parameters.

use crate::error::{GeoNearError, Result};
use geo::Point;
use geonear_types::GeoRecord;

/// Longest geohash the encoder supports.
pub const MAX_GEOHASH_PRECISION: usize = 12;

/// Validates a point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use geonear::compute::validation::validate_geographic_point;
/// use geo::Point;
///
/// let nyc = Point::new(-74.0060, 40.7128);
/// assert!(validate_geographic_point(&nyc).is_ok());
///
/// // Invalid longitude
/// let invalid = Point::new(200.0, 40.0);
/// assert!(validate_geographic_point(&invalid).is_err());
///
/// // Invalid latitude
/// let invalid = Point::new(-74.0, 95.0);
/// assert!(validate_geographic_point(&invalid).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(GeoNearError::InvalidCoordinate(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(GeoNearError::InvalidCoordinate(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(GeoNearError::InvalidCoordinate(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(GeoNearError::InvalidCoordinate(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates every record's coordinates, naming the offending record.
pub fn validate_records(records: &[GeoRecord]) -> Result<()> {
    for (idx, record) in records.iter().enumerate() {
        validate_geographic_point(&record.point()).map_err(|e| {
            GeoNearError::InvalidCoordinate(format!(
                "Record {} (GeoCodeID {}): {}",
                idx, record.id, e
            ))
        })?;
    }
    Ok(())
}

/// Validates a geohash precision (character count).
///
/// # Examples
///
/// ```
/// use geonear::compute::validation::validate_precision;
///
/// assert!(validate_precision(9).is_ok());
/// assert!(validate_precision(0).is_err());
/// assert!(validate_precision(13).is_err());
/// ```
pub fn validate_precision(precision: usize) -> Result<()> {
    if !(1..=MAX_GEOHASH_PRECISION).contains(&precision) {
        return Err(GeoNearError::InvalidInput(format!(
            "Geohash precision must be between 1 and {}, got: {}",
            MAX_GEOHASH_PRECISION, precision
        )));
    }
    Ok(())
}

/// Validates a search radius in miles.
///
/// Ensures radius is non-negative and finite.
///
/// # Examples
///
/// ```
/// use geonear::compute::validation::validate_radius;
///
/// assert!(validate_radius(25.0).is_ok());
/// assert!(validate_radius(0.0).is_ok());
/// assert!(validate_radius(-1.0).is_err());
/// assert!(validate_radius(f64::NAN).is_err());
/// ```
pub fn validate_radius(miles: f64) -> Result<()> {
    if !miles.is_finite() {
        return Err(GeoNearError::InvalidInput(format!(
            "Radius must be finite, got: {}",
            miles
        )));
    }
    if miles < 0.0 {
        return Err(GeoNearError::InvalidInput(format!(
            "Radius must not be negative, got: {}",
            miles
        )));
    }
    Ok(())
}

/// Wrap a longitude into [-180.0, 180.0].
pub fn normalize_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    // rem_euclid maps +180 onto -180; both name the same meridian.
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Clamp a latitude into [-90.0, 90.0].
pub fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0)
}
