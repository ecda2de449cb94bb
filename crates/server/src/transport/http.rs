//! HTTP/JSON transport for the geonear server
//!
//! ```text
//! GET /api/locations                              -> [GeoRecord]
//! GET /api/locations/find?lat=&lng=&method=       -> GeoRecord | null
//! GET /api/locations/within?lat=&lng=&miles=      -> [GeoRecord + miles]
//! ```
//!
//! Bad parameters answer 400 with a plain-text message. If the catalog
//! failed to initialize every data endpoint answers 503.

use crate::handler::{ApiError, Handler, RadiusMatch};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use geonear::catalog::Catalog;
use geonear_types::GeoRecord;
use serde::Deserialize;
use std::future::Future;
use tower_http::trace::TraceLayer;
use tracing::info;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, self.to_string()).into_response()
    }
}

/// Query string of `/api/locations/find`.
///
/// Fields are taken as raw strings so that missing or malformed values
/// produce our own 400 message.
#[derive(Debug, Default, Deserialize)]
pub struct FindParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub method: Option<String>,
}

/// Query string of `/api/locations/within`.
#[derive(Debug, Default, Deserialize)]
pub struct WithinParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub miles: Option<String>,
}

fn required_number(name: &str, raw: Option<&str>) -> Result<f64, ApiError> {
    let raw =
        raw.ok_or_else(|| ApiError::BadRequest(format!("The {} field is required.", name)))?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ApiError::BadRequest(format!(
            "The value '{}' is not valid for {}.",
            raw, name
        ))),
    }
}

async fn list_locations(State(handler): State<Handler>) -> Result<Response, ApiError> {
    let snapshot = handler.snapshot().await?;
    Ok(Json(snapshot.list_all_records()).into_response())
}

async fn find_location(
    State(handler): State<Handler>,
    Query(params): Query<FindParams>,
) -> Result<Json<Option<GeoRecord>>, ApiError> {
    let lat = required_number("lat", params.lat.as_deref())?;
    let lng = required_number("lng", params.lng.as_deref())?;
    let method = params.method.as_deref().unwrap_or("index");

    Ok(Json(handler.find(lat, lng, method).await?))
}

async fn locations_within(
    State(handler): State<Handler>,
    Query(params): Query<WithinParams>,
) -> Result<Json<Vec<RadiusMatch>>, ApiError> {
    let lat = required_number("lat", params.lat.as_deref())?;
    let lng = required_number("lng", params.lng.as_deref())?;
    let miles = required_number("miles", params.miles.as_deref())?;

    Ok(Json(handler.within(lat, lng, miles).await?))
}

/// Build the application router.
pub fn router(handler: Handler) -> Router {
    Router::new()
        .route("/api/locations", get(list_locations))
        .route("/api/locations/find", get(find_location))
        .route("/api/locations/within", get(locations_within))
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

/// Serve the HTTP API on `listener` until `shutdown` resolves.
///
/// Catalog initialization starts immediately so that it overlaps with the
/// first requests. On shutdown an unfinished initialization is cancelled.
///
/// # Errors
/// Returns an error if the catalog cannot start or the server fails.
pub async fn run_server(
    listener: tokio::net::TcpListener,
    catalog: Catalog,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    catalog.start()?;
    let app = router(Handler::new(catalog.clone()));

    info!("Geonear HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Shutdown signal received, stopping server...");
            catalog.cancel();
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
