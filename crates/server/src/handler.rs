//! Request handling for the geonear server, independent of transport.

use geonear::catalog::{Catalog, Snapshot};
use geonear::validation::validate_radius;
use geonear::{GeoNearError, SearchMethod};
use geonear_types::GeoRecord;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported to a client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The request itself is wrong.
    #[error("{0}")]
    BadRequest(String),

    /// The catalog failed to initialize and cannot answer.
    #[error("{0}")]
    Unavailable(String),
}

impl From<GeoNearError> for ApiError {
    fn from(err: GeoNearError) -> Self {
        match err {
            GeoNearError::InvalidInput(msg) | GeoNearError::InvalidCoordinate(msg) => {
                ApiError::BadRequest(msg)
            }
            other => ApiError::Unavailable(format!("location catalog unavailable: {}", other)),
        }
    }
}

/// A record found by a radius search, with its distance in miles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadiusMatch {
    #[serde(flatten)]
    pub record: GeoRecord,
    pub miles: f64,
}

#[derive(Clone, Debug)]
pub struct Handler {
    catalog: Catalog,
}

impl Handler {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The loaded snapshot, waiting for initialization if it is still running.
    ///
    /// Any initialization failure, including a rejected record, is reported
    /// as unavailable rather than as a client error.
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>, ApiError> {
        self.catalog
            .ready()
            .await
            .map_err(|e| ApiError::Unavailable(format!("location catalog unavailable: {}", e)))
    }

    /// Nearest record to `(lat, lng)` using the named method.
    ///
    /// An unknown method is rejected before waiting on the catalog.
    pub async fn find(
        &self,
        lat: f64,
        lng: f64,
        method: &str,
    ) -> Result<Option<GeoRecord>, ApiError> {
        let method: SearchMethod = method.parse()?;
        let snapshot = self.snapshot().await?;

        tracing::debug!(lat, lng, %method, "find nearest");
        Ok(snapshot.find_nearest(method, lat, lng).cloned())
    }

    /// Every record within `miles` of `(lat, lng)`, nearest first.
    pub async fn within(
        &self,
        lat: f64,
        lng: f64,
        miles: f64,
    ) -> Result<Vec<RadiusMatch>, ApiError> {
        validate_radius(miles)?;
        let snapshot = self.snapshot().await?;

        Ok(snapshot
            .within_radius(lat, lng, miles)
            .into_iter()
            .map(|m| RadiusMatch {
                record: m.value.clone(),
                miles: m.miles,
            })
            .collect())
    }
}
