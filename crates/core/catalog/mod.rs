//! Run-once loading of the record set and its index.
//!
//! A [`Catalog`] moves through `NotStarted -> Loading -> Ready | Failed`
//! exactly once. The first call to [`Catalog::start`] or
//! [`Catalog::ready`] spawns a task that reads the [`RecordSource`] and
//! builds the index on the blocking pool; every other caller waits on the
//! same task through a `watch` channel. Readers only ever observe a
//! complete [`Snapshot`] or no snapshot at all.

mod source;

pub use source::{JsonFileSource, MemorySource, RecordSource, parse_records};

use crate::error::{GeoNearError, Result};
use crate::index::{IndexStats, NearestMatch};
use crate::search::{self, RecordIndex, SearchMethod};
use geo::Point;
use geonear_types::GeoRecord;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Where the catalog is in its lifecycle.
#[derive(Debug, Clone)]
pub enum LoadState {
    NotStarted,
    Loading,
    Ready(Arc<Snapshot>),
    Failed(GeoNearError),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    /// Whether the state can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Ready(_) | LoadState::Failed(_))
    }

    fn outcome(&self) -> Option<Result<Arc<Snapshot>>> {
        match self {
            LoadState::Ready(snapshot) => Some(Ok(Arc::clone(snapshot))),
            LoadState::Failed(err) => Some(Err(err.clone())),
            LoadState::NotStarted | LoadState::Loading => None,
        }
    }
}

/// Immutable records plus the index built over them.
#[derive(Debug)]
pub struct Snapshot {
    records: Vec<GeoRecord>,
    index: RecordIndex,
}

impl Snapshot {
    /// Index `records` at `precision`.
    pub fn build(records: Vec<GeoRecord>, precision: usize) -> Result<Self> {
        let index = search::build_index(&records, precision)?;
        Ok(Self { records, index })
    }

    /// Records in source order.
    pub fn records(&self) -> &[GeoRecord] {
        &self.records
    }

    pub fn list_all_records(&self) -> &[GeoRecord] {
        self.records()
    }

    pub fn index(&self) -> &RecordIndex {
        &self.index
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    pub fn find_nearest_by_index(&self, lat: f64, lon: f64) -> Option<&GeoRecord> {
        search::find_nearest_by_index(&self.index, lat, lon)
    }

    pub fn find_nearest_by_brute_force(&self, lat: f64, lon: f64) -> Option<&GeoRecord> {
        search::find_nearest_by_brute_force(&self.records, lat, lon)
    }

    pub fn find_nearest(&self, method: SearchMethod, lat: f64, lon: f64) -> Option<&GeoRecord> {
        search::find_nearest(method, &self.index, &self.records, lat, lon)
    }

    /// Records within `miles` of the coordinate, nearest first.
    pub fn within_radius(
        &self,
        lat: f64,
        lon: f64,
        miles: f64,
    ) -> Vec<NearestMatch<'_, GeoRecord>> {
        self.index.within_radius(&Point::new(lon, lat), miles)
    }
}

struct Inner {
    source: Arc<dyn RecordSource>,
    precision: usize,
    timeout: Option<Duration>,
    state: watch::Sender<LoadState>,
    task: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

/// Lazily initialized, shareable record catalog.
///
/// Cloning a `Catalog` is cheap; clones share the same state and the same
/// initialization task.
///
/// # Examples
///
/// ```rust
/// use geonear::catalog::{Catalog, MemorySource};
/// use geonear_types::GeoRecord;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), geonear::GeoNearError> {
/// let catalog = Catalog::new(
///     MemorySource::new(vec![GeoRecord::new(1, "New York", "NY", 40.7128, -74.0060)]),
///     9,
///     None,
/// );
/// let snapshot = catalog.ready().await?;
/// assert_eq!(snapshot.find_nearest_by_index(40.0, -74.0).unwrap().id, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<Inner>,
}

impl Catalog {
    pub fn new<S: RecordSource>(source: S, precision: usize, timeout: Option<Duration>) -> Self {
        Self::from_shared(Arc::new(source), precision, timeout)
    }

    pub fn from_shared(
        source: Arc<dyn RecordSource>,
        precision: usize,
        timeout: Option<Duration>,
    ) -> Self {
        let (state, _) = watch::channel(LoadState::NotStarted);
        Self {
            inner: Arc::new(Inner {
                source,
                precision,
                timeout,
                state,
                task: Mutex::new(None),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoadState {
        self.inner.state.borrow().clone()
    }

    /// The snapshot if initialization has already succeeded.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        match &*self.inner.state.borrow() {
            LoadState::Ready(snapshot) => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }

    /// Begin initialization if nobody has yet.
    ///
    /// Must be called from within a Tokio runtime. Further calls, from any
    /// clone, are no-ops.
    pub fn start(&self) -> Result<()> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| GeoNearError::Config(format!("catalog needs a Tokio runtime: {}", e)))?;

        let mut task = self.inner.task.lock();
        if task.is_some() {
            return Ok(());
        }

        let claimed = self.inner.state.send_if_modified(|state| match state {
            LoadState::NotStarted => {
                *state = LoadState::Loading;
                true
            }
            _ => false,
        });
        if !claimed {
            return Ok(());
        }

        let inner = Arc::clone(&self.inner);
        *task = Some(handle.spawn(async move { inner.run().await }));
        Ok(())
    }

    /// Wait for initialization, starting it if needed.
    ///
    /// Every caller gets the same snapshot, or a clone of the same error.
    pub async fn ready(&self) -> Result<Arc<Snapshot>> {
        self.start()?;

        let mut rx = self.inner.state.subscribe();
        let state = rx
            .wait_for(LoadState::is_terminal)
            .await
            .map_err(|_| GeoNearError::Cancelled)?;
        state.outcome().unwrap_or(Err(GeoNearError::Cancelled))
    }

    /// Abort an in-flight initialization.
    ///
    /// Waiters receive [`GeoNearError::Cancelled`]. Has no effect once the
    /// catalog is ready or failed.
    pub fn cancel(&self) {
        self.inner.cancel.cancel();
        self.inner.state.send_if_modified(|state| match state {
            LoadState::NotStarted => {
                *state = LoadState::Failed(GeoNearError::Cancelled);
                true
            }
            _ => false,
        });
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("source", &self.inner.source.describe())
            .field("precision", &self.inner.precision)
            .field("timeout", &self.inner.timeout)
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

impl Inner {
    async fn run(&self) {
        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                log::warn!("Catalog initialization cancelled");
                Err(GeoNearError::Cancelled)
            }
            result = self.initialize() => result,
        };

        let state = match outcome {
            Ok(snapshot) => LoadState::Ready(Arc::new(snapshot)),
            Err(err) => {
                log::error!("Catalog initialization failed: {}", err);
                LoadState::Failed(err)
            }
        };

        // A cancel that raced ahead of the spawn may already have settled
        // the state.
        self.state.send_if_modified(|current| {
            if current.is_terminal() {
                return false;
            }
            *current = state;
            true
        });
    }

    async fn initialize(&self) -> Result<Snapshot> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.load_and_build())
                .await
                .map_err(|_| GeoNearError::Timeout(limit))?,
            None => self.load_and_build().await,
        }
    }

    async fn load_and_build(&self) -> Result<Snapshot> {
        let started = Instant::now();
        log::info!("GeoCity models loading from {}...", self.source.describe());
        let records = self.source.load().await?;
        log::info!(
            "GeoCity models loaded: {} records in {:?}",
            records.len(),
            started.elapsed()
        );

        let precision = self.precision;
        tokio::task::spawn_blocking(move || Snapshot::build(records, precision))
            .await
            .map_err(|e| GeoNearError::Io(format!("index build task failed: {}", e)))?
    }
}
