//! Per-product request state machine with background retries.
//!
//! Each product id moves through [`QueryState`]s as download attempts are
//! made against the catalog. Products that cannot be fetched right away get a
//! retry job: a tokio task that re-runs the attempt every
//! [`SchedulerConfig::retry_interval`] until the product is settled or the
//! scheduler shuts down.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use sds_core::{
    CatalogError, Credentials, DirectoryCreationStrategy, ProductCatalogPort, ProductRequest,
    QueryState, Schedule, ScheduleRepository, SpectralResolutions, ensure_directory,
};
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::archive::extract_archive;
use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::local::local_state;
use crate::metadata::{find_metadata_file, read_band_resolutions};

/// Catalog message marking a product the hub will never deliver.
const BROKEN_PRODUCT_MARKER: &str = "NullPointerException";

/// Schedules product downloads and tracks their state.
///
/// Cheap to clone; clones share the schedule and the retry jobs.
#[derive(Clone)]
pub struct RequestScheduler {
    inner: Arc<Inner>,
}

struct Inner {
    catalog: Arc<dyn ProductCatalogPort>,
    store: Arc<dyn ScheduleRepository>,
    config: SchedulerConfig,
    schedule: Mutex<Schedule>,
    /// Retry job per product id. Lock before `schedule` when both are needed.
    jobs: Mutex<HashMap<String, CancellationToken>>,
    extraction: Mutex<()>,
    shutdown: CancellationToken,
}

impl RequestScheduler {
    /// Create the products directory if needed and load the stored schedule.
    pub async fn open(
        catalog: Arc<dyn ProductCatalogPort>,
        store: Arc<dyn ScheduleRepository>,
        config: SchedulerConfig,
    ) -> Result<Self, SchedulerError> {
        ensure_directory(&config.products_dir, DirectoryCreationStrategy::AutoCreate)?;
        let schedule = store.load().await?;
        info!(
            products_dir = %config.products_dir.display(),
            requests = schedule.len(),
            "Request scheduler ready"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                catalog,
                store,
                config,
                schedule: Mutex::new(schedule),
                jobs: Mutex::new(HashMap::new()),
                extraction: Mutex::new(()),
                shutdown: CancellationToken::new(),
            }),
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    /// Request a product and try to download it.
    ///
    /// Unknown ids are looked up in the catalog first; ids the catalog does
    /// not know are reported as [`QueryState::Invalid`] and not recorded.
    pub async fn request(
        &self,
        id: &str,
        credentials: &Credentials,
    ) -> Result<QueryState, SchedulerError> {
        let known = self.inner.schedule.lock().await.get(id).map(|r| r.state);
        match known {
            Some(state) => info!(id, %state, "Product already requested"),
            None => {
                let metadata = match self.inner.catalog.product_metadata(id, credentials).await {
                    Ok(metadata) => metadata,
                    Err(CatalogError::NotFound(_)) => {
                        warn!(id, "Product id is unknown to the catalog");
                        return Ok(QueryState::Invalid);
                    }
                    Err(e) => return Err(e.into()),
                };
                info!(id, title = %metadata.title, "Recording new product request");
                let mut schedule = self.inner.schedule.lock().await;
                schedule
                    .entry(id.to_string())
                    .or_insert_with(|| ProductRequest::new(id, metadata.title));
                self.inner.store.save(&schedule).await?;
            }
        }

        self.inner.start_attempts(id, credentials).await?;
        self.state(id).await
    }

    /// Current state of a recorded request.
    pub async fn state(&self, id: &str) -> Result<QueryState, SchedulerError> {
        Ok(self.inner.request_record(id).await?.state)
    }

    /// Every recorded request, ordered by id.
    pub async fn requests(&self) -> Vec<ProductRequest> {
        self.inner.schedule.lock().await.values().cloned().collect()
    }

    /// Whether a retry job is running for `id`.
    pub async fn has_retry_job(&self, id: &str) -> bool {
        self.inner.jobs.lock().await.contains_key(id)
    }

    /// Path of the downloaded archive of an available product.
    pub async fn raw_product_path(&self, id: &str) -> Result<PathBuf, SchedulerError> {
        let request = self.inner.available_request(id).await?;
        let archive = self.inner.archive_path(&request.title);
        if !tokio::fs::try_exists(&archive).await? {
            return Err(SchedulerError::ArchiveMissing(archive));
        }
        Ok(archive)
    }

    /// Extract an available product into its `.SAFE` directory.
    ///
    /// The archive is removed after a successful extraction. An existing
    /// `.SAFE` directory is returned as is.
    pub async fn prepare_product(&self, id: &str) -> Result<PathBuf, SchedulerError> {
        let request = self.inner.available_request(id).await?;
        let _guard = self.inner.extraction.lock().await;

        let dir = self.inner.config.products_dir.clone();
        let safe_dir = dir.join(format!("{}.SAFE", request.title));
        if tokio::fs::try_exists(&safe_dir).await? {
            return Ok(safe_dir);
        }

        let archive = self.inner.archive_path(&request.title);
        if !tokio::fs::try_exists(&archive).await? {
            return Err(SchedulerError::ArchiveMissing(archive));
        }

        info!(id, archive = %archive.display(), "Extracting product");
        let source = archive.clone();
        tokio::task::spawn_blocking(move || extract_archive(&source, &dir))
            .await
            .map_err(|e| SchedulerError::Archive(format!("Extraction task failed: {e}")))??;

        if !tokio::fs::try_exists(&safe_dir).await? {
            return Err(SchedulerError::Archive(format!(
                "{} did not contain {}",
                archive.display(),
                safe_dir.display()
            )));
        }
        tokio::fs::remove_file(&archive).await?;
        Ok(safe_dir)
    }

    /// Spectral resolution per band of an available product.
    pub async fn product_bands(&self, id: &str) -> Result<SpectralResolutions, SchedulerError> {
        let safe_dir = self.prepare_product(id).await?;
        tokio::task::spawn_blocking(move || {
            let path = find_metadata_file(&safe_dir)?;
            read_band_resolutions(&path)
        })
        .await
        .map_err(|e| SchedulerError::Metadata(format!("Metadata task failed: {e}")))?
    }

    /// Stop every retry job.
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();
        let mut jobs = self.inner.jobs.lock().await;
        if !jobs.is_empty() {
            info!(jobs = jobs.len(), "Stopping retry jobs");
        }
        jobs.clear();
    }
}

impl Inner {
    async fn request_record(&self, id: &str) -> Result<ProductRequest, SchedulerError> {
        self.schedule
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SchedulerError::UnknownRequest(id.to_string()))
    }

    async fn available_request(&self, id: &str) -> Result<ProductRequest, SchedulerError> {
        let request = self.request_record(id).await?;
        if request.state != QueryState::Available {
            return Err(SchedulerError::NotAvailable {
                id: id.to_string(),
                state: request.state,
            });
        }
        Ok(request)
    }

    fn archive_path(&self, title: &str) -> PathBuf {
        self.config.products_dir.join(format!("{title}.zip"))
    }

    /// Attempt a download now and keep retrying in the background until settled.
    ///
    /// Does nothing when a retry job already exists or the stored state does
    /// not call for a download.
    async fn start_attempts(
        self: &Arc<Self>,
        id: &str,
        credentials: &Credentials,
    ) -> Result<(), SchedulerError> {
        let token = {
            let mut jobs = self.jobs.lock().await;
            if jobs.contains_key(id) {
                debug!(id, "Retry job already running");
                return Ok(());
            }
            let state = self.request_record(id).await?.state;
            if !state.should_download() {
                return Ok(());
            }
            let token = self.shutdown.child_token();
            jobs.insert(id.to_string(), token.clone());
            token
        };

        match self.attempt(id, credentials).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.spawn_retry_job(id.to_string(), credentials.clone(), token);
                Ok(())
            }
            Err(e) => {
                self.cancel_job(id).await;
                Err(e)
            }
        }
    }

    fn spawn_retry_job(
        self: &Arc<Self>,
        id: String,
        credentials: Credentials,
        token: CancellationToken,
    ) {
        let inner = Arc::clone(self);
        let period = self.config.retry_interval;
        info!(id = %id, interval_secs = period.as_secs(), "Scheduling download retries");

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!(id = %id, "Retry job stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        match inner.attempt(&id, &credentials).await {
                            Ok(true) => break,
                            Ok(false) => debug!(id = %id, "Product still not available"),
                            Err(e) => warn!(id = %id, error = %e, "Retry attempt failed"),
                        }
                    }
                }
            }
        });
    }

    async fn cancel_job(&self, id: &str) {
        if let Some(token) = self.jobs.lock().await.remove(id) {
            token.cancel();
        }
    }

    /// One download attempt. Returns `true` once no further attempts are needed,
    /// after stopping the retry job of `id`.
    async fn attempt(&self, id: &str, credentials: &Credentials) -> Result<bool, SchedulerError> {
        let request = self.request_record(id).await?;
        let dir = self.config.products_dir.as_path();
        let previous = local_state(dir, &request.title, request.state).await;

        if !previous.should_download() {
            debug!(id, state = %previous, "No download needed");
            self.update(id, previous, false).await?;
            self.cancel_job(id).await;
            return Ok(true);
        }

        self.update(id, QueryState::Incomplete, false).await?;
        let outcome = self.catalog.download(id, dir, credentials).await;
        let state = self.settle(id, &request.title, previous, outcome).await;
        let state = local_state(dir, &request.title, state).await;
        self.update(id, state, true).await?;

        let settled = !state.should_download();
        if settled {
            self.cancel_job(id).await;
        }
        Ok(settled)
    }

    /// State following a download outcome.
    async fn settle(
        &self,
        id: &str,
        title: &str,
        previous: QueryState,
        outcome: Result<PathBuf, CatalogError>,
    ) -> QueryState {
        match outcome {
            Ok(path) => {
                info!(id, path = %path.display(), "Product downloaded");
                QueryState::Available
            }
            Err(CatalogError::LtaTriggered(_)) => {
                info!(id, "Retrieval from the long-term archive triggered");
                QueryState::Pending
            }
            Err(CatalogError::LtaError(message)) => {
                warn!(id, %message, "Long-term archive refused the request");
                QueryState::Unavailable
            }
            Err(CatalogError::Server(message)) if message.contains(BROKEN_PRODUCT_MARKER) => {
                error!(id, %message, "Catalog cannot provide the product");
                QueryState::Unavailable
            }
            Err(CatalogError::InvalidChecksum { expected, actual }) => {
                error!(id, %expected, %actual, "Checksum mismatch");
                self.discard_archive(title, previous).await
            }
            Err(e) => {
                error!(id, error = %e, "Download failed");
                previous
            }
        }
    }

    async fn discard_archive(&self, title: &str, previous: QueryState) -> QueryState {
        let archive = self.archive_path(title);
        match tokio::fs::remove_file(&archive).await {
            Ok(()) => previous,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => QueryState::Unavailable,
            Err(e) => {
                warn!(path = %archive.display(), error = %e, "Could not remove corrupt archive");
                previous
            }
        }
    }

    /// Set the state of `id` and persist when anything changed.
    async fn update(
        &self,
        id: &str,
        state: QueryState,
        queried: bool,
    ) -> Result<(), SchedulerError> {
        let mut schedule = self.schedule.lock().await;
        let request = schedule
            .get_mut(id)
            .ok_or_else(|| SchedulerError::UnknownRequest(id.to_string()))?;

        if request.state == state && !queried {
            return Ok(());
        }
        if request.state != state {
            debug!(id, from = %request.state, to = %state, "Request state changed");
        }
        request.state = state;
        if queried {
            request.last_query = Some(Utc::now());
        }
        self.store.save(&schedule).await?;
        Ok(())
    }
}

