use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// The rectangle covered by a geohash cell.
///
/// Latitude and longitude are kept as named bounds rather than x/y so that
/// call sites read in the order people write coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl CellBounds {
    /// Create cell bounds from latitude and longitude ranges.
    ///
    /// # Examples
    ///
    /// ```
    /// use geonear_types::bbox::CellBounds;
    ///
    /// let cell = CellBounds::new(40.0, 41.0, -75.0, -74.0);
    /// assert_eq!(cell.height(), 1.0);
    /// ```
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Create cell bounds from a `geo::Rect` (x = longitude, y = latitude).
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.min().y, rect.max().y, rect.min().x, rect.max().x)
    }

    /// Convert back into a `geo::Rect`.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            geo::coord! { x: self.min_lon, y: self.min_lat },
            geo::coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    /// Center of the cell as a `geo::Point` (x = longitude, y = latitude).
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Check whether a coordinate lies inside the cell, edges included.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Check whether a point lies inside the cell, edges included.
    pub fn contains_point(&self, point: &Point) -> bool {
        self.contains(point.y(), point.x())
    }

    /// Grow the cell by whole cell sizes on every side.
    ///
    /// `expand(1)` yields the 3x3 block centered on this cell. Latitude is
    /// clamped to the poles; longitude is left unwrapped so callers can
    /// tell how far the block reaches past the antimeridian.
    pub fn expand(&self, cells: u32) -> Self {
        let dlat = self.height() * cells as f64;
        let dlon = self.width() * cells as f64;
        Self::new(
            (self.min_lat - dlat).max(-90.0),
            (self.max_lat + dlat).min(90.0),
            self.min_lon - dlon,
            self.max_lon + dlon,
        )
    }
}

impl From<Rect> for CellBounds {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}
