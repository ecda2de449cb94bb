//! Geohash spatial index over a prefix trie.
//!
//! Every entry is filed under the geohash of its location at the index
//! precision. A lookup starts at the query's own cell and widens in two
//! ways: sideways into the eight neighboring cells, because the nearest
//! entry can sit just across a cell edge without sharing the query's
//! prefix; and upward by dropping trailing geohash characters, because
//! sparse regions may have nothing at full precision.
//!
//! Dropping characters ends at the empty prefix, which is the whole index.
//! For very sparse or badly clustered data a lookup can therefore cost
//! O(number of entries).

use crate::compute::distance::{self, MILES_PER_DEGREE};
use crate::compute::geohasher::{DefaultGeohasher, Geohasher, encode_query};
use crate::compute::validation::{
    normalize_longitude, validate_geographic_point, validate_precision,
};
use crate::error::Result;
use crate::index::trie::PrefixTrie;
use geo::Point;
use geonear_types::CellBounds;
use rustc_hash::FxHashSet;

/// Default geohash precision (about 4.8m x 4.8m cells).
pub const DEFAULT_GEOHASH_PRECISION: usize = 9;

/// Slack on the rounded cosine when deciding whether a searched block
/// provably contains the nearest entry. Covers the 10-place rounding in
/// [`distance::distance_miles`].
const COSINE_SLACK: f64 = 2e-10;

/// Where to search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchArea {
    /// Candidates around a single coordinate.
    Point(Point),
    /// Every entry within `miles` of `center`.
    Radius { center: Point, miles: f64 },
}

impl SearchArea {
    pub fn point(lat: f64, lon: f64) -> Self {
        SearchArea::Point(Point::new(lon, lat))
    }

    pub fn radius(lat: f64, lon: f64, miles: f64) -> Self {
        SearchArea::Radius {
            center: Point::new(lon, lat),
            miles,
        }
    }

    pub fn center(&self) -> Point {
        match self {
            SearchArea::Point(p) => *p,
            SearchArea::Radius { center, .. } => *center,
        }
    }
}

/// A located value stored in the index.
#[derive(Debug, Clone)]
pub struct IndexEntry<T> {
    pub point: Point,
    pub value: T,
}

/// The entry closest to a query, with its distance in miles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestMatch<'a, T> {
    pub point: Point,
    pub value: &'a T,
    pub miles: f64,
}

/// Size and shape of a built index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStats {
    pub precision: usize,
    pub entries: usize,
    pub trie_nodes: usize,
}

/// Read-mostly spatial index keyed by geohash.
///
/// The index is filled once with [`insert`](Self::insert) and then only
/// read. None of the read methods take `&mut self`, so a built index can
/// be shared behind an `Arc` by any number of threads without locking.
///
/// # Examples
///
/// ```rust
/// use geonear::index::{SearchArea, SpatialIndex};
/// use geo::Point;
///
/// let mut index = SpatialIndex::new(9)?;
/// index.insert(Point::new(-74.0060, 40.7128), "New York")?;
/// index.insert(Point::new(-118.2437, 34.0522), "Los Angeles")?;
///
/// let nearest = index.nearest(&Point::new(-74.0, 40.0)).unwrap();
/// assert_eq!(*nearest.value, "New York");
///
/// let candidates = index.query(&SearchArea::point(40.7, -74.0));
/// assert!(candidates.iter().any(|(_, name)| **name == "New York"));
/// # Ok::<(), geonear::GeoNearError>(())
/// ```
pub struct SpatialIndex<T, H = DefaultGeohasher> {
    hasher: H,
    trie: PrefixTrie<usize>,
    entries: Vec<IndexEntry<T>>,
    precision: usize,
}

impl<T> SpatialIndex<T, DefaultGeohasher> {
    /// Create an empty index with the default geohasher.
    pub fn new(precision: usize) -> Result<Self> {
        Self::with_hasher(DefaultGeohasher, precision)
    }
}

impl<T, H: Geohasher> SpatialIndex<T, H> {
    /// Create an empty index with a custom geohasher.
    pub fn with_hasher(hasher: H, precision: usize) -> Result<Self> {
        validate_precision(precision)?;
        Ok(Self {
            hasher,
            trie: PrefixTrie::new(),
            entries: Vec::new(),
            precision,
        })
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry<T>> {
        self.entries.iter()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            precision: self.precision,
            entries: self.entries.len(),
            trie_nodes: self.trie.node_count(),
        }
    }

    /// File `value` under the geohash of `point`.
    ///
    /// Coordinates must be within [-90, 90] latitude and [-180, 180]
    /// longitude.
    pub fn insert(&mut self, point: Point, value: T) -> Result<()> {
        validate_geographic_point(&point)?;
        let hash = self.hasher.encode(point.y(), point.x(), self.precision)?;

        let id = self.entries.len();
        self.entries.push(IndexEntry { point, value });
        self.trie.insert(&hash, id);
        Ok(())
    }

    /// Candidate entries for a search area.
    ///
    /// For [`SearchArea::Point`] this is the cell-expansion candidate set:
    /// the query's cell at full precision plus its neighbors, or, if that
    /// cell is empty, the first shorter prefix that has entries together
    /// with its neighbors. Candidates are close to the query but not ranked;
    /// use [`nearest`](Self::nearest) for the single closest entry.
    ///
    /// For [`SearchArea::Radius`] the result is every entry within the
    /// radius, ordered by distance.
    ///
    /// Non-finite query coordinates produce no candidates. Out-of-range
    /// ones are mapped onto the equivalent point on the sphere.
    pub fn query(&self, area: &SearchArea) -> Vec<(Point, &T)> {
        match area {
            SearchArea::Point(center) => {
                let Some((_, hash)) = self.locate(center) else {
                    return Vec::new();
                };
                let level = self.first_populated_level(&hash);
                self.gather_block(&hash[..level])
                    .into_iter()
                    .map(|id| {
                        let entry = &self.entries[id];
                        (entry.point, &entry.value)
                    })
                    .collect()
            }
            SearchArea::Radius { center, miles } => self
                .within_radius(center, *miles)
                .into_iter()
                .map(|m| (m.point, m.value))
                .collect(),
        }
    }

    /// The entry closest to `query`, or `None` for an empty index.
    ///
    /// Starts from the [`query`](Self::query) candidate set and keeps
    /// widening by one prefix character until the searched 3x3 block of
    /// cells provably contains every entry at least as close as the best
    /// one found. The result therefore always has the same distance as a
    /// linear scan over all entries; with equally distant entries either
    /// one may be returned.
    pub fn nearest(&self, query: &Point) -> Option<NearestMatch<'_, T>> {
        let (probe, hash) = self.locate(query)?;
        let mut level = self.first_populated_level(&hash);

        loop {
            let block = self.gather_block(&hash[..level]);
            let best = distance::nearest(
                query,
                block.into_iter().map(|id| (self.entries[id].point, id)),
            );

            if level == 0 {
                log::debug!(
                    "nearest for ({}, {}) scanned all {} entries",
                    query.y(),
                    query.x(),
                    self.entries.len()
                );
                return best.map(|(id, miles)| self.matched(id, miles));
            }

            if let Some((id, miles)) = best
                && self.block_covers(&hash[..level], &probe, miles)
            {
                return Some(self.matched(id, miles));
            }

            level -= 1;
        }
    }

    /// Every entry within `miles` of `center`, nearest first.
    ///
    /// Searches the smallest 3x3 cell block around `center` that covers the
    /// whole circle, then filters by exact distance. Negative or non-finite
    /// radii match nothing.
    pub fn within_radius(&self, center: &Point, miles: f64) -> Vec<NearestMatch<'_, T>> {
        if !miles.is_finite() || miles < 0.0 {
            return Vec::new();
        }
        let Some((probe, hash)) = self.locate(center) else {
            return Vec::new();
        };

        let level = (1..=self.precision)
            .rev()
            .find(|&level| self.block_covers(&hash[..level], &probe, miles))
            .unwrap_or(0);

        let mut matches: Vec<NearestMatch<'_, T>> = self
            .gather_block(&hash[..level])
            .into_iter()
            .filter_map(|id| {
                let d = distance::distance_between(&self.entries[id].point, center);
                (d <= miles).then(|| self.matched(id, d))
            })
            .collect();

        matches.sort_by(|a, b| a.miles.total_cmp(&b.miles));
        matches
    }

    fn matched(&self, id: usize, miles: f64) -> NearestMatch<'_, T> {
        let entry = &self.entries[id];
        NearestMatch {
            point: entry.point,
            value: &entry.value,
            miles,
        }
    }

    /// Canonical probe point and its full-precision geohash.
    fn locate(&self, query: &Point) -> Option<(Point, String)> {
        if self.entries.is_empty() {
            return None;
        }
        let probe = canonical_point(query)?;
        let hash = encode_query(&self.hasher, probe.y(), probe.x(), self.precision)?;
        Some((probe, hash))
    }

    /// Longest prefix of `hash` that has any entries (0 = whole index).
    fn first_populated_level(&self, hash: &str) -> usize {
        (1..=self.precision)
            .rev()
            .find(|&level| self.trie.contains_prefix(&hash[..level]))
            .unwrap_or(0)
    }

    /// Entry ids in the cell `prefix` and its neighbors, without duplicates.
    fn gather_block(&self, prefix: &str) -> Vec<usize> {
        let mut seen = FxHashSet::default();
        let mut ids = Vec::new();
        let mut collect = |cell: &str| {
            self.trie.for_each_prefixed(cell, |id| {
                if seen.insert(*id) {
                    ids.push(*id);
                }
            })
        };

        collect(prefix);
        if !prefix.is_empty() {
            match self.hasher.neighbors(prefix) {
                Ok(neighbors) => neighbors.iter().for_each(|cell| collect(cell.as_str())),
                Err(e) => log::warn!("neighbor lookup failed for {}: {}", prefix, e),
            }
        }
        ids
    }

    /// Whether the 3x3 block around cell `prefix` contains every point
    /// within `miles` of `probe`, allowing for distance rounding.
    fn block_covers(&self, prefix: &str, probe: &Point, miles: f64) -> bool {
        let Ok(cell) = self.hasher.decode(prefix) else {
            return false;
        };
        let reach = block_reach(&cell.expand(1), probe);
        if reach.is_infinite() {
            return true;
        }
        let threshold = (reach.min(std::f64::consts::PI).cos() + COSINE_SLACK)
            .min(1.0)
            .acos()
            .to_degrees()
            * MILES_PER_DEGREE;
        miles <= threshold
    }
}

impl<T, H> std::fmt::Debug for SpatialIndex<T, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("precision", &self.precision)
            .field("entries", &self.entries.len())
            .field("trie", &self.trie)
            .finish()
    }
}

/// Lower bound, in radians, on the distance from `probe` to anything
/// outside `block`. Infinite when the block has no boundary to cross.
///
/// Leaving through the top or bottom costs at least the latitude gap.
/// Leaving through a side means reaching that side's meridian, which is at
/// least `asin(sin(dlon) * cos(lat))` away.
fn block_reach(block: &CellBounds, probe: &Point) -> f64 {
    let (lat, lon) = (probe.y(), probe.x());
    let mut reach = f64::INFINITY;

    if block.max_lat < 90.0 {
        reach = reach.min((block.max_lat - lat).to_radians());
    }
    if block.min_lat > -90.0 {
        reach = reach.min((lat - block.min_lat).to_radians());
    }
    if block.width() < 360.0 {
        let cos_lat = lat.to_radians().cos();
        for dlon in [block.max_lon - lon, lon - block.min_lon] {
            let side = (dlon.to_radians().sin().abs() * cos_lat).min(1.0).asin();
            reach = reach.min(side);
        }
    }

    reach.max(0.0)
}

/// Map any finite coordinate onto the same point of the sphere with
/// latitude in [-90, 90] and longitude in [-180, 180].
///
/// Latitudes past a pole continue down the opposite meridian, which leaves
/// law-of-cosines distances unchanged.
fn canonical_point(query: &Point) -> Option<Point> {
    let (mut lat, mut lon) = (query.y(), query.x());
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }

    lat = (lat + 180.0).rem_euclid(360.0) - 180.0;
    if lat > 90.0 {
        lat = 180.0 - lat;
        lon += 180.0;
    } else if lat < -90.0 {
        lat = -180.0 - lat;
        lon += 180.0;
    }

    Some(Point::new(normalize_longitude(lon), lat))
}
