use anyhow::Result;
use geonear::{CatalogBuilder, Config};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const DATA: &str = r#"[
    {"GeoCodeID": 10, "City": "Seattle", "State": "WA", "Latitude": 47.6062, "Longitude": -122.3321},
    {"GeoCodeID": 11, "City": "Portland", "State": "OR", "Latitude": 45.5152, "Longitude": -122.6784},
    {"GeoCodeID": 12, "City": "Boise", "State": "ID", "Latitude": 43.6150, "Longitude": -116.2023}
]"#;

async fn http_get(addr: std::net::SocketAddr, path: &str) -> Result<String> {
    let mut stream = tokio::net::TcpStream::connect(addr).await?;
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        path
    );
    stream.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response)
}

#[tokio::test]
async fn test_server_round_trip() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(DATA.as_bytes())?;

    let config = Config::default()
        .with_data_path(file.path())
        .with_load_timeout(Duration::from_secs(30));
    let catalog = CatalogBuilder::new().config(config).build()?;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(geonear_server::run_server(listener, catalog, async move {
        let _ = stop_rx.await;
    }));

    let nearest = http_get(addr, "/api/locations/find?lat=45.0&lng=-122.0").await?;
    assert!(nearest.starts_with("HTTP/1.1 200"));
    assert!(nearest.contains("\"city\":\"Portland\""));

    let brute = http_get(addr, "/api/locations/find?lat=44.0&lng=-116.0&method=brute").await?;
    assert!(brute.contains("\"geoCodeID\":12"));

    let bad = http_get(addr, "/api/locations/find?lat=44.0&lng=-116.0&method=rtree").await?;
    assert!(bad.starts_with("HTTP/1.1 400"));
    assert!(bad.ends_with("Method 'rtree' not recognized"));

    let all = http_get(addr, "/api/locations").await?;
    assert!(all.contains("Seattle") && all.contains("Boise"));

    let _ = stop_tx.send(());
    server.await??;
    Ok(())
}
