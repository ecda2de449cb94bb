use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use geonear::catalog::{Catalog, JsonFileSource, MemorySource};
use geonear_server::{Handler, router};
use geonear_types::GeoRecord;
use serde_json::Value;
use tower::ServiceExt;

fn sample_catalog() -> Catalog {
    Catalog::new(
        MemorySource::new(vec![
            GeoRecord::new(1, "New York", "NY", 40.7128, -74.0060),
            GeoRecord::new(2, "Los Angeles", "CA", 34.0522, -118.2437),
            GeoRecord::new(3, "Chicago", "IL", 41.8781, -87.6298),
        ]),
        9,
        None,
    )
}

async fn get(catalog: &Catalog, uri: &str) -> (StatusCode, Vec<u8>) {
    let app = router(Handler::new(catalog.clone()));
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(catalog: &Catalog, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(catalog, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_list_locations() {
    let catalog = sample_catalog();
    let (status, body) = get_json(&catalog, "/api/locations").await;

    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["geoCodeID"], 1);
    assert_eq!(records[2]["city"], "Chicago");
    assert!(records[0].get("GeoCodeID").is_none());
}

#[tokio::test]
async fn test_find_defaults_to_index() {
    let catalog = sample_catalog();
    let (status, body) = get_json(&catalog, "/api/locations/find?lat=40.0&lng=-74.0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["geoCodeID"], 1);
    assert_eq!(body["state"], "NY");
    assert_eq!(body["latitude"], 40.7128);
    assert_eq!(body["longitude"], -74.006);
}

#[tokio::test]
async fn test_find_methods_agree() {
    let catalog = sample_catalog();
    let (_, by_index) =
        get_json(&catalog, "/api/locations/find?lat=35&lng=-117&method=index").await;
    let (_, by_scan) = get_json(&catalog, "/api/locations/find?lat=35&lng=-117&method=brute").await;

    assert_eq!(by_index["geoCodeID"], 2);
    assert_eq!(by_index, by_scan);
}

#[tokio::test]
async fn test_find_unknown_method() {
    let catalog = sample_catalog();
    let (status, body) = get(&catalog, "/api/locations/find?lat=1&lng=1&method=kdtree").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(body).unwrap(), "Method 'kdtree' not recognized");
}

#[tokio::test]
async fn test_find_missing_or_invalid_coordinates() {
    let catalog = sample_catalog();

    let (status, body) = get(&catalog, "/api/locations/find?lng=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(body).unwrap(), "The lat field is required.");

    let (status, _) = get(&catalog, "/api/locations/find?lat=north&lng=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_find_on_empty_catalog_is_null() {
    let catalog = Catalog::new(MemorySource::default(), 9, None);
    let (status, body) = get_json(&catalog, "/api/locations/find?lat=0&lng=0").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_within_radius() {
    let catalog = sample_catalog();
    let (status, body) =
        get_json(&catalog, "/api/locations/within?lat=41&lng=-80&miles=700").await;

    assert_eq!(status, StatusCode::OK);
    let found = body.as_array().unwrap();
    assert_eq!(found.len(), 2);
    assert!(found[0]["miles"].as_f64().unwrap() <= found[1]["miles"].as_f64().unwrap());
    assert_eq!(found[0]["city"], "New York");

    let (status, _) = get(&catalog, "/api/locations/within?lat=41&lng=-80&miles=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_initialization_failure_is_503() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::new(JsonFileSource::new(dir.path().join("geocity.json")), 9, None);

    let (status, body) = get(&catalog, "/api/locations").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(String::from_utf8(body).unwrap().contains("record source missing"));

    let (status, _) = get(&catalog, "/api/locations/find?lat=0&lng=0").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
