//! The index path and the linear scan must always agree on distance.

use geonear::{
    GeoRecord, build_index, distance_miles, find_nearest_by_brute_force, find_nearest_by_index,
};

fn grid_records() -> Vec<GeoRecord> {
    let mut records = Vec::new();
    let mut id = 0;
    for lat_step in 0..18 {
        for lon_step in 0..36 {
            // Irregular spacing so records do not line up with cell edges.
            let lat = -85.0 + lat_step as f64 * 9.7 + (lon_step % 5) as f64 * 0.37;
            let lon = -179.5 + lon_step as f64 * 9.9 + (lat_step % 3) as f64 * 0.21;
            records.push(GeoRecord::new(id, format!("P{}", id), "ZZ", lat, lon));
            id += 1;
        }
    }
    records
}

fn assert_agreement(records: &[GeoRecord], precision: usize, queries: &[(f64, f64)]) {
    let index = build_index(records, precision).unwrap();

    for &(lat, lon) in queries {
        let by_index = find_nearest_by_index(&index, lat, lon).unwrap();
        let by_scan = find_nearest_by_brute_force(records, lat, lon).unwrap();

        let d_index = distance_miles(lat, lon, by_index.latitude, by_index.longitude);
        let d_scan = distance_miles(lat, lon, by_scan.latitude, by_scan.longitude);
        assert_eq!(
            d_index, d_scan,
            "precision {} query ({}, {}): index found {} at {}, scan found {} at {}",
            precision, lat, lon, by_index.id, d_index, by_scan.id, d_scan
        );
    }
}

fn query_grid() -> Vec<(f64, f64)> {
    let mut queries = Vec::new();
    for lat in (-89..=89).step_by(7) {
        for lon in (-179..=179).step_by(11) {
            queries.push((lat as f64 + 0.123, lon as f64 - 0.456));
        }
    }
    queries
}

#[test]
fn test_global_grid_agreement() {
    let records = grid_records();
    let queries = query_grid();
    for precision in [1, 4, 9, 12] {
        assert_agreement(&records, precision, &queries);
    }
}

#[test]
fn test_dense_cluster_agreement() {
    let records: Vec<GeoRecord> = (0..400)
        .map(|i| {
            let lat = 40.70 + (i % 20) as f64 * 0.0013;
            let lon = -74.02 + (i / 20) as f64 * 0.0017;
            GeoRecord::new(i, "Block", "NY", lat, lon)
        })
        .collect();

    let queries: Vec<(f64, f64)> = (0..50)
        .map(|i| (40.695 + i as f64 * 0.0007, -74.025 + i as f64 * 0.0009))
        .collect();

    assert_agreement(&records, 9, &queries);
    assert_agreement(&records, 6, &queries);
}

#[test]
fn test_antimeridian_and_polar_agreement() {
    let records = vec![
        GeoRecord::new(1, "Date line east", "FJ", -17.0, 179.99),
        GeoRecord::new(2, "Date line west", "WS", -17.0, -179.98),
        GeoRecord::new(3, "Near north pole", "NP", 89.9, 45.0),
        GeoRecord::new(4, "Near south pole", "SP", -89.95, -120.0),
        GeoRecord::new(5, "Greenwich", "UK", 51.48, 0.0),
    ];
    let queries = [
        (-17.0, -179.999),
        (-17.0, 179.999),
        (89.99, -135.0),
        (-89.99, 60.0),
        (51.48, -0.0001),
        (0.0, 0.0),
    ];
    assert_agreement(&records, 9, &queries);
}
