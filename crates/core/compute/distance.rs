//! Great-circle distance and nearest-candidate resolution.
//!
//! Distances use the spherical law of cosines and are reported in statute
//! miles (one arc-minute is one nautical mile, 1.1515 statute miles).

use geo::Point;

/// Statute miles per nautical mile.
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.1515;

/// Decimal places the cosine term is rounded to before `acos`.
const COSINE_ROUNDING_PLACES: i32 = 10;

/// Miles covered by one degree of arc.
pub const MILES_PER_DEGREE: f64 = 60.0 * STATUTE_MILES_PER_NAUTICAL_MILE;

/// Great-circle distance in miles between two coordinates.
///
/// The cosine of the central angle is rounded to 10 decimal places before
/// `acos`. For identical points the unrounded term can come out as
/// `1.0000000000000002`, and `acos` of that is NaN; after rounding it is
/// exactly `1.0` and the distance exactly `0.0`.
///
/// # Examples
///
/// ```rust
/// use geonear::compute::distance::distance_miles;
///
/// let d = distance_miles(40.7128, -74.0060, 34.0522, -118.2437);
/// assert!(d > 2_400.0 && d < 2_500.0);
///
/// assert_eq!(distance_miles(12.5, 99.1, 12.5, 99.1), 0.0);
/// ```
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon1 - lon2).to_radians();

    let cosine = round_places(
        phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * delta_lambda.cos(),
        COSINE_ROUNDING_PLACES,
    );

    cosine.acos().to_degrees() * MILES_PER_DEGREE
}

/// Distance in miles between two `geo` points (x = longitude, y = latitude).
#[inline]
pub fn distance_between(a: &Point, b: &Point) -> f64 {
    distance_miles(a.y(), a.x(), b.y(), b.x())
}

/// Round half-to-even at `places` decimal places.
fn round_places(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

/// Pick the candidate closest to `query`.
///
/// Returns the winning value together with its distance in miles. Ties go to
/// the candidate seen first, and an empty input yields `None`. Candidates
/// whose distance is NaN (non-finite coordinates) never win.
///
/// # Examples
///
/// ```rust
/// use geonear::compute::distance::nearest;
/// use geo::Point;
///
/// let query = Point::new(-74.0, 40.0);
/// let candidates = vec![
///     (Point::new(-118.2437, 34.0522), "Los Angeles"),
///     (Point::new(-74.0060, 40.7128), "New York"),
/// ];
///
/// let (name, miles) = nearest(&query, candidates).unwrap();
/// assert_eq!(name, "New York");
/// assert!(miles < 50.0);
/// ```
pub fn nearest<T, I>(query: &Point, candidates: I) -> Option<(T, f64)>
where
    I: IntoIterator<Item = (Point, T)>,
{
    let mut best: Option<(T, f64)> = None;

    for (point, value) in candidates {
        let miles = distance_between(&point, query);
        if miles.is_nan() {
            continue;
        }
        match &best {
            Some((_, best_miles)) if miles >= *best_miles => {}
            _ => best = Some((value, miles)),
        }
    }

    best
}
