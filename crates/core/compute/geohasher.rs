//! Geohash encoding, decoding and neighbor lookup.
//!
//! The bit interleaving itself is delegated to the `geohash` crate; this
//! module wraps it behind the [`Geohasher`] trait the index is generic
//! over, and computes neighbors by re-encoding offset cell centers so the
//! same code path works for any prefix length.

use crate::compute::validation::{clamp_latitude, normalize_longitude, validate_precision};
use crate::error::{GeoNearError, Result};
use geonear_types::CellBounds;
use smallvec::SmallVec;

/// The 32-symbol geohash alphabet (`a`, `i`, `l`, `o` excluded).
pub const GEOHASH_ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Neighbor offsets in (lat, lon) cell units: N, NE, E, SE, S, SW, W, NW.
const COMPASS: [(f64, f64); 8] = [
    (1.0, 0.0),
    (1.0, 1.0),
    (0.0, 1.0),
    (-1.0, 1.0),
    (-1.0, 0.0),
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
];

/// Up to eight adjacent cells.
pub type Neighbors = SmallVec<[String; 8]>;

/// Converts between coordinates and geohash cells.
pub trait Geohasher: Send + Sync {
    /// Encode a coordinate into a geohash of `precision` characters.
    fn encode(&self, lat: f64, lon: f64, precision: usize) -> Result<String>;

    /// Decode a geohash into the rectangle it covers.
    fn decode(&self, hash: &str) -> Result<CellBounds>;

    /// Cells adjacent to `hash` at the same precision.
    ///
    /// Each neighbor is found by shifting the cell center one cell width or
    /// height in a compass direction and re-encoding. Longitude wraps across
    /// the antimeridian. Shifts past a pole have no cell, so cells touching
    /// a pole report fewer than eight neighbors. The empty hash (the whole
    /// world) has none.
    fn neighbors(&self, hash: &str) -> Result<Neighbors> {
        let mut out = Neighbors::new();
        if hash.is_empty() {
            return Ok(out);
        }

        let cell = self.decode(hash)?;
        let center = cell.center();
        let (height, width) = (cell.height(), cell.width());

        for (dlat, dlon) in COMPASS {
            let lat = center.y() + dlat * height;
            if !(-90.0..=90.0).contains(&lat) {
                continue;
            }
            let lon = normalize_longitude(center.x() + dlon * width);
            let neighbor = self.encode(lat, lon, hash.len())?;
            if neighbor != hash && !out.contains(&neighbor) {
                out.push(neighbor);
            }
        }

        Ok(out)
    }
}

/// Standard base-32 geohasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultGeohasher;

impl Geohasher for DefaultGeohasher {
    fn encode(&self, lat: f64, lon: f64, precision: usize) -> Result<String> {
        validate_precision(precision)?;
        if !lat.is_finite() || !lon.is_finite() {
            return Err(GeoNearError::InvalidCoordinate(format!(
                "cannot encode non-finite coordinate ({}, {})",
                lat, lon
            )));
        }
        let coord = geohash::Coord { x: lon, y: lat };
        Ok(geohash::encode(coord, precision)?)
    }

    fn decode(&self, hash: &str) -> Result<CellBounds> {
        if let Some(bad) = hash.bytes().find(|b| !GEOHASH_ALPHABET.contains(b)) {
            return Err(GeoNearError::InvalidGeohash(format!(
                "'{}' contains invalid character '{}'",
                hash, bad as char
            )));
        }
        let rect = geohash::decode_bbox(hash)?;
        Ok(CellBounds::from_rect(rect))
    }
}

/// Encode a possibly out-of-range query coordinate.
///
/// Latitude is clamped and longitude wrapped so that any finite query maps
/// to some cell. Returns `None` for non-finite input.
pub(crate) fn encode_query<H: Geohasher + ?Sized>(
    hasher: &H,
    lat: f64,
    lon: f64,
    precision: usize,
) -> Option<String> {
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    hasher
        .encode(clamp_latitude(lat), normalize_longitude(lon), precision)
        .ok()
}
