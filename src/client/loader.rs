//! Remote collection loader
//!
//! Owns one page's cached copy of a backend collection. Each fetch is tagged
//! with a generation number; only the newest fetch may replace the cached
//! records, so a slow response to an old filter can never overwrite the view
//! of a newer one. The loading flag is held by a guard and released on every
//! exit path.

use crate::config::JourneyConfig;
use crate::error::JourneyError;
use crate::traits::{CollectionBackend, JourneyRecord};
use crate::view::{derive_view, DerivedStats, FilterParams, FilterState};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

/// Loader configuration
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Upper bound for each backend call
    pub timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
        }
    }
}

impl From<&JourneyConfig> for LoaderConfig {
    fn from(config: &JourneyConfig) -> Self {
        Self {
            timeout: config.request_timeout(),
        }
    }
}

/// What the page should render for the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing fetched yet
    Idle,
    Loading,
    Ready,
    /// Last fetch failed; render the message with a "Try Again" action
    Failed(String),
}

/// Result of one `fetch` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Records replaced the cached collection
    Applied { generation: u64, count: usize },
    /// Fetch failed; the previous records are kept and the error is exposed
    Failed { generation: u64, error: String },
    /// A newer fetch was issued while this one was in flight; result dropped
    Stale { generation: u64 },
    /// The loader was closed before the fetch completed
    Cancelled,
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied { .. })
    }
}

struct LoaderState<R> {
    records: Arc<Vec<R>>,
    error: Option<String>,
    last_params: FilterParams,
    loaded: bool,
    applied_generation: u64,
}

/// Decrements the in-flight counter when dropped
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Remote collection fetcher for one page
///
/// # Example
///
/// ```rust,ignore
/// let backend: Arc<dyn CollectionBackend<Memory>> = Arc::new(HttpBackend::new(config.clone())?);
/// let loader = CollectionLoader::new(backend, LoaderConfig::from(&config));
///
/// loader.fetch(filter.params()).await;
/// if let LoadStatus::Failed(message) = loader.status().await {
///     // render inline error with a retry button wired to loader.retry()
/// }
/// let records = loader.records().await;
/// let view = derive_view(&records, &filter);
/// ```
pub struct CollectionLoader<R: JourneyRecord> {
    backend: Arc<dyn CollectionBackend<R>>,
    config: LoaderConfig,
    /// Latest generation issued
    generation: AtomicU64,
    in_flight: AtomicUsize,
    state: RwLock<LoaderState<R>>,
    teardown: watch::Sender<bool>,
}

impl<R: JourneyRecord> CollectionLoader<R> {
    pub fn new(backend: Arc<dyn CollectionBackend<R>>, config: LoaderConfig) -> Self {
        let (teardown, _) = watch::channel(false);
        Self {
            backend,
            config,
            generation: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            state: RwLock::new(LoaderState {
                records: Arc::new(Vec::new()),
                error: None,
                last_params: FilterParams::default(),
                loaded: false,
                applied_generation: 0,
            }),
            teardown,
        }
    }

    /// The injected backend (shared with the page's modal controller)
    pub fn backend(&self) -> &Arc<dyn CollectionBackend<R>> {
        &self.backend
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Fetch the collection with the given backend filters.
    ///
    /// Never panics or returns `Err`: failures are reported in the outcome
    /// and exposed through `status()` until the next successful fetch.
    pub async fn fetch(&self, params: FilterParams) -> FetchOutcome {
        let mut teardown = self.teardown.subscribe();
        if *teardown.borrow_and_update() {
            debug!(collection = R::collection(), "Loader closed, refusing fetch");
            return FetchOutcome::Cancelled;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().await.last_params = params.clone();
        let _loading = LoadingGuard::enter(&self.in_flight);

        debug!(collection = R::collection(), generation, "Fetching collection");

        let timeout_ms = self.config.timeout.as_millis() as u64;
        let result = tokio::select! {
            _ = wait_for_teardown(&mut teardown) => {
                warn!(collection = R::collection(), generation, "Fetch cancelled by teardown");
                return FetchOutcome::Cancelled;
            }
            result = tokio::time::timeout(self.config.timeout, self.backend.list(&params)) => {
                result.unwrap_or(Err(JourneyError::Timeout(timeout_ms)))
            }
        };

        // Checked under the write lock so a newer fetch cannot apply in between
        let mut state = self.state.write().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if generation != latest {
            debug!(
                collection = R::collection(),
                generation,
                latest,
                "Discarding stale fetch result"
            );
            return FetchOutcome::Stale { generation };
        }

        match result {
            Ok(records) => {
                let count = records.len();
                state.records = Arc::new(records);
                state.error = None;
                state.loaded = true;
                state.applied_generation = generation;
                debug!(collection = R::collection(), generation, count, "Collection loaded");
                FetchOutcome::Applied { generation, count }
            }
            Err(err) => {
                let error = err.to_string();
                warn!(
                    collection = R::collection(),
                    generation,
                    error = %error,
                    "Collection fetch failed"
                );
                state.error = Some(error.clone());
                FetchOutcome::Failed { generation, error }
            }
        }
    }

    /// Re-issue the last fetch (e.g. after a successful write)
    pub async fn reload(&self) -> FetchOutcome {
        let params = self.state.read().await.last_params.clone();
        self.fetch(params).await
    }

    /// The "Try Again" action of the inline error state
    pub async fn retry(&self) -> FetchOutcome {
        self.reload().await
    }

    /// Cheap snapshot of the cached records
    pub async fn records(&self) -> Arc<Vec<R>> {
        self.state.read().await.records.clone()
    }

    /// Visible records and stats for a filter, computed on a snapshot
    pub async fn view(&self, filter: &FilterState) -> (Vec<R>, DerivedStats) {
        let records = self.records().await;
        let view = derive_view(&records, filter);
        (view.to_owned_records(), view.stats)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn status(&self) -> LoadStatus {
        if self.is_loading() {
            return LoadStatus::Loading;
        }
        let state = self.state.read().await;
        match (&state.error, state.loaded) {
            (Some(error), _) => LoadStatus::Failed(error.clone()),
            (None, true) => LoadStatus::Ready,
            (None, false) => LoadStatus::Idle,
        }
    }

    pub async fn last_params(&self) -> FilterParams {
        self.state.read().await.last_params.clone()
    }

    /// Generation of the fetch whose records are currently cached
    pub async fn applied_generation(&self) -> u64 {
        self.state.read().await.applied_generation
    }

    /// Optimistically insert or replace a record in the cached copy.
    ///
    /// The next fetch overwrites this; the backend stays the source of truth.
    pub async fn replace_local(&self, record: R) {
        let mut state = self.state.write().await;
        let records = Arc::make_mut(&mut state.records);
        let existing = records
            .iter()
            .position(|r| r.record_id() == record.record_id());
        match existing {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
    }

    /// Tear the loader down with its page; in-flight fetches resolve as
    /// `Cancelled` and later fetches are refused.
    pub fn close(&self) {
        self.teardown.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.teardown.borrow()
    }
}

impl<R: JourneyRecord> Drop for CollectionLoader<R> {
    fn drop(&mut self) {
        self.close();
    }
}

async fn wait_for_teardown(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
