use geonear::{
    GeoRecord, Point, SearchArea, SpatialIndex, build_index, distance_miles,
    find_nearest_by_brute_force, find_nearest_by_index,
};

fn assert_same_distance(records: &[GeoRecord], precision: usize, lat: f64, lon: f64) {
    let index = build_index(records, precision).expect("Failed to build index");
    let by_index = find_nearest_by_index(&index, lat, lon).expect("index returned nothing");
    let by_scan = find_nearest_by_brute_force(records, lat, lon).expect("scan returned nothing");

    assert_eq!(
        distance_miles(lat, lon, by_index.latitude, by_index.longitude),
        distance_miles(lat, lon, by_scan.latitude, by_scan.longitude),
        "query ({}, {}) at precision {}",
        lat,
        lon,
        precision
    );
}

/// Large dataset stays exact and fast enough for CI
#[test]
fn test_large_dataset() {
    let records: Vec<GeoRecord> = (0..10_000)
        .map(|i| {
            let lat = 40.0 + (i % 100) as f64 * 0.01;
            let lon = -74.0 + (i / 100) as f64 * 0.01;
            GeoRecord::new(i, format!("Town {}", i), "NY", lat, lon)
        })
        .collect();

    for (lat, lon) in [(40.5, -73.5), (40.0, -74.0), (41.2, -72.8), (39.0, -75.0)] {
        assert_same_distance(&records, 9, lat, lon);
    }
}

/// Extreme coordinate values index and resolve without panicking
#[test]
fn test_extreme_coordinates() {
    let records = vec![
        GeoRecord::new(1, "North Pole", "", 90.0, 0.0),
        GeoRecord::new(2, "South Pole", "", -90.0, 0.0),
        GeoRecord::new(3, "Date Line West", "", 0.0, 180.0),
        GeoRecord::new(4, "Date Line East", "", 0.0, -180.0),
    ];
    let index = build_index(&records, 9).expect("Failed to build index");
    assert_eq!(index.len(), 4);

    let north = find_nearest_by_index(&index, 89.0, 123.0).unwrap();
    assert_eq!(north.id, 1);
    let south = find_nearest_by_index(&index, -89.5, -45.0).unwrap();
    assert_eq!(south.id, 2);

    // 180 and -180 are the same meridian, so either answer is correct.
    let date_line = find_nearest_by_index(&index, 0.0, 179.9).unwrap();
    assert!(date_line.id == 3 || date_line.id == 4);
    assert_same_distance(&records, 9, 0.0, -179.9);
}

/// Records sharing one location are all kept; the first one wins ties
#[test]
fn test_duplicate_locations() {
    let records: Vec<GeoRecord> = (0..5)
        .map(|i| GeoRecord::new(i, format!("Twin {}", i), "KS", 38.5, -98.0))
        .collect();
    let index = build_index(&records, 9).unwrap();

    assert_eq!(index.len(), 5);
    assert_eq!(find_nearest_by_brute_force(&records, 38.0, -98.0).unwrap().id, 0);
    let by_index = find_nearest_by_index(&index, 38.0, -98.0).unwrap();
    assert_eq!((by_index.latitude, by_index.longitude), (38.5, -98.0));
}

/// A lone record far away is still found through prefix relaxation
#[test]
fn test_single_distant_record() {
    let records = vec![GeoRecord::new(42, "McMurdo", "AQ", -77.85, 166.67)];
    let index = build_index(&records, 12).unwrap();

    assert_eq!(find_nearest_by_index(&index, 64.84, -147.72).unwrap().id, 42);
}

/// Queries outside the coordinate range still get an answer
#[test]
fn test_out_of_range_query() {
    let records = vec![
        GeoRecord::new(1, "Quito", "EC", -0.18, -78.47),
        GeoRecord::new(2, "Nairobi", "KE", -1.29, 36.82),
    ];

    for (lat, lon) in [(0.0, 281.5), (0.0, -438.0), (95.0, 10.0), (-120.0, 0.0)] {
        assert_same_distance(&records, 9, lat, lon);
    }
}

/// Coordinates outside the valid range are rejected at build time
#[test]
fn test_invalid_record_rejected() {
    let records = vec![
        GeoRecord::new(1, "Fine", "OK", 35.0, -97.0),
        GeoRecord::new(2, "Broken", "??", 35.0, -197.0),
    ];
    let err = build_index(&records, 9).unwrap_err();
    assert!(err.to_string().contains("GeoCodeID 2"));
}

/// Radius search returns exactly the records within range
#[test]
fn test_radius_matches_scan() {
    let records: Vec<GeoRecord> = (0..500)
        .map(|i| {
            let lat = 30.0 + (i % 25) as f64 * 0.4;
            let lon = -100.0 + (i / 25) as f64 * 0.45;
            GeoRecord::new(i, "Grid", "TX", lat, lon)
        })
        .collect();

    let mut index = SpatialIndex::new(9).unwrap();
    for record in &records {
        index.insert(record.point(), record.id).unwrap();
    }

    let (lat, lon, miles) = (34.1, -96.3, 75.0);
    let mut expected: Vec<i64> = records
        .iter()
        .filter(|r| distance_miles(lat, lon, r.latitude, r.longitude) <= miles)
        .map(|r| r.id)
        .collect();
    let mut found: Vec<i64> = index
        .query(&SearchArea::radius(lat, lon, miles))
        .into_iter()
        .map(|(_, id)| *id)
        .collect();

    expected.sort_unstable();
    found.sort_unstable();
    assert!(!found.is_empty());
    assert_eq!(found, expected);
}

/// Non-finite queries produce no answer instead of panicking
#[test]
fn test_non_finite_query() {
    let records = vec![GeoRecord::new(1, "Somewhere", "", 10.0, 10.0)];
    let index = build_index(&records, 9).unwrap();

    assert!(find_nearest_by_index(&index, f64::NAN, 10.0).is_none());
    assert!(index.nearest(&Point::new(f64::INFINITY, 0.0)).is_none());
}
