//! Nearest-record lookups over a loaded record set.
//!
//! Two interchangeable strategies answer the same question: the geohash
//! index, and a linear scan that serves as the reference answer and the
//! baseline the index is measured against.

use crate::compute::distance;
use crate::error::{GeoNearError, Result};
use crate::index::SpatialIndex;
use geo::Point;
use geonear_types::GeoRecord;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Spatial index over geocoded records.
pub type RecordIndex = SpatialIndex<GeoRecord>;

/// How a nearest-record query is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMethod {
    /// Geohash index lookup.
    #[default]
    Index,
    /// Linear scan over every record.
    BruteForce,
}

impl SearchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMethod::Index => "index",
            SearchMethod::BruteForce => "brute",
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMethod {
    type Err = GeoNearError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "index" => Ok(SearchMethod::Index),
            "brute" => Ok(SearchMethod::BruteForce),
            other => Err(GeoNearError::InvalidInput(format!(
                "Method '{}' not recognized",
                other
            ))),
        }
    }
}

/// Build a spatial index holding a copy of every record.
///
/// Fails if any record has coordinates outside the valid range.
///
/// # Examples
///
/// ```rust
/// use geonear::search::{build_index, find_nearest_by_index};
/// use geonear_types::GeoRecord;
///
/// let records = vec![
///     GeoRecord::new(1, "New York", "NY", 40.7128, -74.0060),
///     GeoRecord::new(2, "Los Angeles", "CA", 34.0522, -118.2437),
/// ];
/// let index = build_index(&records, 9)?;
///
/// let nearest = find_nearest_by_index(&index, 40.0, -74.0).unwrap();
/// assert_eq!(nearest.id, 1);
/// # Ok::<(), geonear::GeoNearError>(())
/// ```
pub fn build_index(records: &[GeoRecord], precision: usize) -> Result<RecordIndex> {
    let started = Instant::now();
    log::info!(
        "Index building from {} records at precision {}...",
        records.len(),
        precision
    );

    let mut index = SpatialIndex::new(precision)?;
    for record in records {
        index.insert(record.point(), record.clone()).map_err(|e| {
            GeoNearError::InvalidCoordinate(format!("GeoCodeID {}: {}", record.id, e))
        })?;
    }

    let stats = index.stats();
    log::info!(
        "Index built: {} records, {} trie nodes in {:?}",
        stats.entries,
        stats.trie_nodes,
        started.elapsed()
    );
    Ok(index)
}

/// Nearest record through the geohash index.
pub fn find_nearest_by_index(index: &RecordIndex, lat: f64, lon: f64) -> Option<&GeoRecord> {
    index
        .nearest(&Point::new(lon, lat))
        .map(|found| found.value)
}

/// Nearest record by scanning every record.
///
/// Ties go to the record listed first.
pub fn find_nearest_by_brute_force(
    records: &[GeoRecord],
    lat: f64,
    lon: f64,
) -> Option<&GeoRecord> {
    let query = Point::new(lon, lat);
    distance::nearest(&query, records.iter().map(|r| (r.point(), r))).map(|(record, _)| record)
}

/// Nearest record using the chosen strategy.
pub fn find_nearest<'a>(
    method: SearchMethod,
    index: &'a RecordIndex,
    records: &'a [GeoRecord],
    lat: f64,
    lon: f64,
) -> Option<&'a GeoRecord> {
    match method {
        SearchMethod::Index => find_nearest_by_index(index, lat, lon),
        SearchMethod::BruteForce => find_nearest_by_brute_force(records, lat, lon),
    }
}
