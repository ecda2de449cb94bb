//! Error types for geonear.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeoNearError>;

/// Errors surfaced by the engine and its loader.
///
/// The enum is `Clone` so that a single initialization failure can be
/// handed to every caller waiting on the catalog.
#[derive(Debug, Clone, Error)]
pub enum GeoNearError {
    /// The backing record source does not exist or cannot be opened.
    #[error("record source missing: {}", path.display())]
    SourceDataMissing { path: PathBuf },

    /// The record source could not be deserialized, or yielded `null`.
    #[error("record source malformed: {0}")]
    SourceDataMalformed(String),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("invalid geohash: {0}")]
    InvalidGeohash(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// Initialization was cancelled before the index became ready.
    #[error("initialization cancelled")]
    Cancelled,

    #[error("initialization timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for GeoNearError {
    fn from(err: std::io::Error) -> Self {
        GeoNearError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GeoNearError {
    fn from(err: serde_json::Error) -> Self {
        GeoNearError::SourceDataMalformed(err.to_string())
    }
}

impl From<geohash::GeohashError> for GeoNearError {
    fn from(err: geohash::GeohashError) -> Self {
        GeoNearError::InvalidGeohash(err.to_string())
    }
}
