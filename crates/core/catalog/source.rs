//! Where records come from.

use crate::compute::validation::validate_records;
use crate::error::{GeoNearError, Result};
use futures::future::BoxFuture;
use geonear_types::GeoRecord;
use std::path::{Path, PathBuf};

/// Asynchronous provider of the full record set.
///
/// A source is read once, when the catalog initializes. Implementations
/// return every record or an error; partial results are never indexed.
pub trait RecordSource: Send + Sync + 'static {
    fn load(&self) -> BoxFuture<'_, Result<Vec<GeoRecord>>>;

    /// Short human-readable name used in log lines.
    fn describe(&self) -> String;
}

/// Records stored as a JSON array in a file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<GeoRecord>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GeoNearError::SourceDataMissing {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        parse_records(&bytes)
    }
}

impl RecordSource for JsonFileSource {
    fn load(&self) -> BoxFuture<'_, Result<Vec<GeoRecord>>> {
        Box::pin(self.read())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A fixed record set held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<GeoRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<GeoRecord>) -> Self {
        Self { records }
    }
}

impl From<Vec<GeoRecord>> for MemorySource {
    fn from(records: Vec<GeoRecord>) -> Self {
        Self::new(records)
    }
}

impl RecordSource for MemorySource {
    fn load(&self) -> BoxFuture<'_, Result<Vec<GeoRecord>>> {
        Box::pin(async move {
            validate_records(&self.records)?;
            Ok(self.records.clone())
        })
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }
}

/// Decode a JSON record array. A literal `null` counts as malformed.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<GeoRecord>> {
    let records: Option<Vec<GeoRecord>> = serde_json::from_slice(bytes)?;
    let records = records.ok_or_else(|| {
        GeoNearError::SourceDataMalformed("record source deserialized to null".to_string())
    })?;
    validate_records(&records)?;
    Ok(records)
}
