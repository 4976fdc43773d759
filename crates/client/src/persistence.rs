//! Catalog persistence: boot-time rehydration and background write-behind.
//!
//! Only the catalog partition is durable. It is stored as one JSON blob under a
//! fixed key:
//!
//! ```text
//! { "product": { "products": [ { "id", "name", "price", "image" }, ... ] } }
//! ```
//!
//! There is no version field and no migration path: a blob that does not
//! parse into this shape is treated as absent.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use yip_catalog::{Catalog, CatalogAction};
use yip_store::{StateStore, Subscription};

use crate::storage::{KeyValueStorage, StorageError};

/// Key of the persisted root record.
pub const DEFAULT_STORAGE_KEY: &str = "persist:root";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read persisted state: {0}")]
    Read(#[source] StorageError),
    #[error("persisted state is malformed: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write persisted state: {0}")]
    Write(#[source] StorageError),
}

#[derive(Serialize)]
struct PersistedRootRef<'a> {
    product: &'a Catalog,
}

#[derive(Deserialize)]
struct PersistedRoot {
    product: Catalog,
}

/// Serialize the durable partition.
pub fn encode(catalog: &Catalog) -> Result<String, PersistenceError> {
    serde_json::to_string(&PersistedRootRef { product: catalog })
        .map_err(PersistenceError::Serialize)
}

/// Parse a persisted blob back into a catalog.
pub fn decode(raw: &str) -> Result<Catalog, PersistenceError> {
    serde_json::from_str::<PersistedRoot>(raw)
        .map(|root| root.product)
        .map_err(PersistenceError::Malformed)
}

/// What rehydration found in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RehydrateOutcome {
    /// A well-formed blob was loaded; carries the number of products.
    Restored(usize),
    /// Nothing stored under the key.
    Empty,
    /// A blob existed but could not be read or parsed; the catalog stays empty.
    Discarded,
}

/// Outcome of one background write, handed to a [`WriteObserver`].
#[derive(Debug)]
pub struct WriteReport {
    pub key: String,
    pub products: usize,
    pub completed_at: DateTime<Utc>,
    pub result: Result<(), PersistenceError>,
}

/// Completion callback for background writes.
///
/// Reports never flow back into the store; the in-memory state stays
/// authoritative whatever the outcome.
pub trait WriteObserver: Send + Sync {
    fn on_write(&self, report: &WriteReport);
}

impl<F> WriteObserver for F
where
    F: Fn(&WriteReport) + Send + Sync,
{
    fn on_write(&self, report: &WriteReport) {
        self(report)
    }
}

/// Default observer: log and move on.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWriteObserver;

impl WriteObserver for LogWriteObserver {
    fn on_write(&self, report: &WriteReport) {
        match &report.result {
            Ok(()) => tracing::debug!(
                key = %report.key,
                products = report.products,
                "catalog persisted"
            ),
            Err(err) => tracing::error!(
                key = %report.key,
                products = report.products,
                error = %err,
                "failed to persist catalog; keeping in-memory state"
            ),
        }
    }
}

enum WriteRequest {
    Write(Arc<Catalog>),
    Flush(oneshot::Sender<()>),
}

struct Attached {
    sender: mpsc::UnboundedSender<WriteRequest>,
    subscription: Subscription,
    task: JoinHandle<()>,
}

/// Bridges the store's catalog partition and durable storage.
pub struct PersistenceGateway {
    key: String,
    storage: Arc<dyn KeyValueStorage>,
    observer: Arc<dyn WriteObserver>,
    attached: Option<Attached>,
}

impl core::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("key", &self.key)
            .field("attached", &self.attached.is_some())
            .finish()
    }
}

impl PersistenceGateway {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            storage,
            observer: Arc::new(LogWriteObserver),
            attached: None,
        }
    }

    /// Replace the write completion callback. Must be set before `attach`.
    pub fn with_observer(mut self, observer: Arc<dyn WriteObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Read the persisted catalog, if any.
    pub async fn load(&self) -> Result<Option<Catalog>, PersistenceError> {
        let raw = self
            .storage
            .get_item(&self.key)
            .await
            .map_err(PersistenceError::Read)?;

        raw.as_deref().map(decode).transpose()
    }

    /// Load the persisted catalog into `store` via `ReplaceAll`.
    ///
    /// Never fails: unreadable or malformed data is logged and the catalog is
    /// left as it was (empty at boot).
    pub async fn rehydrate(&self, store: &mut StateStore) -> RehydrateOutcome {
        match self.load().await {
            Ok(Some(catalog)) => {
                let count = catalog.len();
                store.dispatch(CatalogAction::ReplaceAll(catalog.into_products()));
                tracing::info!(key = %self.key, products = count, "catalog rehydrated");
                RehydrateOutcome::Restored(count)
            }
            Ok(None) => {
                tracing::debug!(key = %self.key, "no persisted catalog; starting empty");
                RehydrateOutcome::Empty
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "discarding persisted catalog");
                RehydrateOutcome::Discarded
            }
        }
    }

    /// Start persisting every catalog change committed to `store`.
    ///
    /// Must be called from within a tokio runtime. Changes are detected by
    /// partition identity; each one is queued for a background writer that
    /// serializes and stores snapshots in order. The store is never blocked.
    pub fn attach(&mut self, store: &StateStore) {
        if self.attached.is_some() {
            tracing::warn!(key = %self.key, "persistence gateway already attached");
            return;
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_writer(
            Arc::clone(&self.storage),
            self.key.clone(),
            receiver,
            Arc::clone(&self.observer),
        ));

        let last_seen = Mutex::new(Arc::clone(&store.state().catalog));
        let queue = sender.clone();
        let subscription = store.subscribe(move |state| {
            {
                let mut last = last_seen.lock().unwrap_or_else(PoisonError::into_inner);
                if Arc::ptr_eq(&last, &state.catalog) {
                    return;
                }
                *last = Arc::clone(&state.catalog);
            }

            if queue.send(WriteRequest::Write(Arc::clone(&state.catalog))).is_err() {
                tracing::warn!("persistence writer has stopped; dropping catalog snapshot");
            }
        });

        self.attached = Some(Attached {
            sender,
            subscription,
            task,
        });
    }

    /// Wait until every write queued so far has been attempted.
    pub async fn flush(&self) {
        let Some(attached) = &self.attached else {
            return;
        };

        let (done, wait) = oneshot::channel();
        if attached.sender.send(WriteRequest::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    /// Stop observing the store, drain queued writes, and stop the writer.
    pub async fn shutdown(mut self) {
        let Some(Attached {
            sender,
            subscription,
            task,
        }) = self.attached.take()
        else {
            return;
        };

        subscription.unsubscribe();
        drop(sender);

        if let Err(err) = task.await {
            tracing::error!(error = %err, "persistence writer task failed");
        }
    }
}

async fn run_writer(
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    mut receiver: mpsc::UnboundedReceiver<WriteRequest>,
    observer: Arc<dyn WriteObserver>,
) {
    tracing::debug!(key = %key, "persistence writer started");

    while let Some(request) = receiver.recv().await {
        match request {
            WriteRequest::Write(catalog) => {
                let result = match encode(&catalog) {
                    Ok(payload) => storage
                        .set_item(&key, &payload)
                        .await
                        .map_err(PersistenceError::Write),
                    Err(err) => Err(err),
                };

                observer.on_write(&WriteReport {
                    key: key.clone(),
                    products: catalog.len(),
                    completed_at: Utc::now(),
                    result,
                });
            }
            WriteRequest::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    tracing::debug!(key = %key, "persistence writer stopped");
}
