//! Catalog builder for flexible configuration
//!
//! Assembles a [`Catalog`] from a [`Config`], an optional record source
//! and per-field overrides.

use crate::catalog::{Catalog, JsonFileSource, RecordSource};
use crate::config::Config;
use crate::error::{GeoNearError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Builder for a [`Catalog`].
///
/// Without an explicit source the catalog reads the JSON file named by
/// the configuration's `data_path`.
///
/// # Examples
///
/// ```rust
/// use geonear::CatalogBuilder;
/// use geonear::catalog::MemorySource;
/// use geonear_types::GeoRecord;
///
/// let catalog = CatalogBuilder::new()
///     .source(MemorySource::new(vec![GeoRecord::new(1, "Austin", "TX", 30.27, -97.74)]))
///     .precision(7)
///     .build()?;
/// # Ok::<(), geonear::GeoNearError>(())
/// ```
#[derive(Default)]
pub struct CatalogBuilder {
    config: Config,
    source: Option<Arc<dyn RecordSource>>,
}

impl CatalogBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Read records from a JSON file instead of the configured path.
    pub fn data_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.data_path = path.into();
        self.source = None;
        self
    }

    /// Use a custom record source.
    pub fn source<S: RecordSource>(mut self, source: S) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Set the geohash precision used for indexing.
    pub fn precision(mut self, precision: usize) -> Self {
        self.config.geohash_precision = precision;
        self
    }

    /// Fail initialization if it takes longer than `timeout`.
    pub fn load_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_load_timeout(timeout);
        self
    }

    /// Validate the configuration and build the catalog.
    ///
    /// The catalog is returned unstarted; loading begins on the first call
    /// to [`Catalog::start`] or [`Catalog::ready`].
    pub fn build(self) -> Result<Catalog> {
        self.config.validate().map_err(GeoNearError::Config)?;

        let source = match self.source {
            Some(source) => source,
            None => Arc::new(JsonFileSource::new(self.config.data_path.clone())),
        };

        log::debug!(
            "Catalog configured: source={}, precision={}, timeout={:?}",
            source.describe(),
            self.config.geohash_precision,
            self.config.load_timeout()
        );

        Ok(Catalog::from_shared(
            source,
            self.config.geohash_precision,
            self.config.load_timeout(),
        ))
    }
}

impl std::fmt::Debug for CatalogBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogBuilder")
            .field("config", &self.config)
            .field("source", &self.source.as_ref().map(|s| s.describe()))
            .finish()
    }
}
