//! The geocoded location record served by the engine.

use geo::Point;
use serde::{Deserialize, Serialize};

/// A single geocoded location.
///
/// Input follows the geocity data files (`GeoCodeID`, `City`, `State`,
/// `Latitude`, `Longitude`) and also accepts camelCase spellings. Output
/// is camelCase (`geoCodeID`, `city`, `state`, `latitude`, `longitude`).
///
/// # Examples
///
/// ```
/// use geonear_types::record::GeoRecord;
///
/// let record: GeoRecord = serde_json::from_str(
///     r#"{"GeoCodeID":1,"City":"New York","State":"NY","Latitude":40.7128,"Longitude":-74.006}"#,
/// ).unwrap();
/// assert_eq!(record.id, 1);
/// assert_eq!(record.point().y(), 40.7128);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    #[serde(
        rename(serialize = "geoCodeID", deserialize = "GeoCodeID"),
        alias = "geoCodeID",
        alias = "id"
    )]
    pub id: i64,
    #[serde(
        rename(serialize = "city", deserialize = "City"),
        alias = "city",
        default
    )]
    pub city: String,
    #[serde(
        rename(serialize = "state", deserialize = "State"),
        alias = "state",
        default
    )]
    pub state: String,
    #[serde(
        rename(serialize = "latitude", deserialize = "Latitude"),
        alias = "latitude"
    )]
    pub latitude: f64,
    #[serde(
        rename(serialize = "longitude", deserialize = "Longitude"),
        alias = "longitude"
    )]
    pub longitude: f64,
}

impl GeoRecord {
    pub fn new(
        id: i64,
        city: impl Into<String>,
        state: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id,
            city: city.into(),
            state: state.into(),
            latitude,
            longitude,
        }
    }

    /// Location as a `geo::Point` (x = longitude, y = latitude).
    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}
