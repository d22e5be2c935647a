//! Firebase REST backend.
//!
//! Firestore documents, Identity Toolkit sign-in and Cloud Storage uploads
//! over plain HTTPS. The REST API has no push channel, so live collections
//! are emulated by one polling task per subscribed collection. A task only
//! publishes when the collection actually changed, and is woken right after
//! this client's own writes so mutations show up without waiting a full
//! interval.

pub mod auth;
pub mod firestore;
pub mod storage;
pub mod value;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use secrecy::SecretString;
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use venus_gecko_core::Email;

use super::{
    AuthError, AuthProvider, BackendError, BlobStorage, Collection, Fields, RecordStore,
    Session, Snapshot, WriteMode,
};
use crate::config::StorefrontConfig;
use firestore::FirestoreClient;
use storage::StorageClient;

/// Refresh the ID token when it expires within this many seconds.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Firebase-backed implementation of all three service contracts.
///
/// Cheap to clone; clones share sessions and polling tasks.
#[derive(Clone)]
pub struct FirebaseBackend {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    api_key: SecretString,
    firestore: FirestoreClient,
    storage: StorageClient,
    poll_interval: Duration,
    session: watch::Sender<Option<Session>>,
    /// Serializes token refreshes.
    refresh_lock: tokio::sync::Mutex<()>,
    feeds: Mutex<HashMap<Collection, Feed>>,
}

struct Feed {
    sender: watch::Sender<Option<Snapshot>>,
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read a response body, mapping non-success statuses to errors.
///
/// 401/403 become [`BackendError::PermissionDenied`], 404
/// [`BackendError::NotFound`].
async fn read_body(response: reqwest::Response) -> Result<String, BackendError> {
    let status = response.status();
    let url = response.url().path().to_owned();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    tracing::error!(
        status = %status,
        path = %url,
        body = %body.chars().take(500).collect::<String>(),
        "Firebase returned non-success status"
    );
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_owned))
        .unwrap_or_else(|| body.chars().take(200).collect());

    Err(match status.as_u16() {
        401 | 403 => BackendError::PermissionDenied(message),
        404 => BackendError::NotFound(message),
        429 | 503 => BackendError::Unavailable(message),
        code => BackendError::Status {
            status: code,
            message,
        },
    })
}

impl FirebaseBackend {
    /// Create a backend from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                firestore: FirestoreClient::new(http.clone(), &config.firebase.project_id),
                storage: StorageClient::new(http.clone(), config.firebase.storage_bucket.clone()),
                http,
                api_key: config.firebase.api_key.clone(),
                poll_interval: config.poll_interval,
                session: watch::Sender::new(None),
                refresh_lock: tokio::sync::Mutex::new(()),
                feeds: Mutex::new(HashMap::new()),
            }),
        })
    }

    /// A valid ID token for the current session, refreshing it first when
    /// it is about to expire. `None` when signed out.
    async fn id_token(&self) -> Result<Option<SecretString>, BackendError> {
        let Some(session) = self.current_session() else {
            return Ok(None);
        };
        if session.expires_at - chrono::Utc::now().timestamp() > REFRESH_MARGIN_SECS {
            return Ok(Some(session.id_token));
        }

        let _guard = self.inner.refresh_lock.lock().await;
        // Another caller may have refreshed while we waited.
        let Some(session) = self.current_session() else {
            return Ok(None);
        };
        if session.expires_at - chrono::Utc::now().timestamp() > REFRESH_MARGIN_SECS {
            return Ok(Some(session.id_token));
        }

        let refreshed = auth::refresh(&self.inner.http, &self.inner.api_key, &session).await?;
        debug!(uid = %refreshed.uid, "refreshed ID token");
        let token = refreshed.id_token.clone();
        self.inner.session.send_replace(Some(refreshed));
        Ok(Some(token))
    }

    /// Token for a write; writes never go out anonymously.
    async fn write_token(&self) -> Result<SecretString, BackendError> {
        self.id_token().await?.ok_or_else(|| {
            BackendError::PermissionDenied("missing or insufficient permissions".to_string())
        })
    }

    /// Wake the polling task of `collection` so it re-reads now.
    fn wake(&self, collection: Collection) {
        if let Some(feed) = lock(&self.inner.feeds).get(&collection) {
            feed.wake.notify_one();
        }
    }

    fn spawn_feed(&self, collection: Collection) -> Feed {
        let (sender, _) = watch::channel(None);
        let wake = Arc::new(Notify::new());
        let task = tokio::spawn(poll_collection(
            self.clone(),
            collection,
            sender.clone(),
            Arc::clone(&wake),
        ));
        Feed { sender, wake, task }
    }
}

/// Re-read `collection` until every subscriber is gone.
async fn poll_collection(
    backend: FirebaseBackend,
    collection: Collection,
    sender: watch::Sender<Option<Snapshot>>,
    wake: Arc<Notify>,
) {
    debug!(%collection, "polling started");
    loop {
        let token = match backend.id_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(%collection, error = %e, "token refresh failed, reading anonymously");
                None
            }
        };
        match backend.inner.firestore.list(collection, token.as_ref()).await {
            Ok(snapshot) => {
                let changed = sender.send_if_modified(|current| {
                    if current.as_ref() == Some(&snapshot) {
                        return false;
                    }
                    *current = Some(snapshot);
                    true
                });
                if changed {
                    debug!(%collection, "published snapshot");
                }
            }
            Err(e) => warn!(%collection, error = %e, "poll failed"),
        }

        tokio::select! {
            () = tokio::time::sleep(backend.inner.poll_interval) => {}
            () = wake.notified() => {}
            () = sender.closed() => break,
        }
    }
    debug!(%collection, "polling stopped");
}

impl RecordStore for FirebaseBackend {
    /// Subscribe to a collection, starting its polling task if needed.
    ///
    /// Must be called within a Tokio runtime.
    fn subscribe(&self, collection: Collection) -> watch::Receiver<Option<Snapshot>> {
        let mut feeds = lock(&self.inner.feeds);
        if let Some(feed) = feeds.get(&collection)
            && !feed.task.is_finished()
        {
            return feed.sender.subscribe();
        }
        let feed = self.spawn_feed(collection);
        let receiver = feed.sender.subscribe();
        feeds.insert(collection, feed);
        receiver
    }

    #[instrument(skip(self, payload), fields(collection = %collection, id = ?id, mode = ?mode))]
    async fn write(
        &self,
        collection: Collection,
        id: Option<&str>,
        payload: Fields,
        mode: WriteMode,
    ) -> Result<String, BackendError> {
        let token = self.write_token().await?;
        let id = match id {
            Some(id) => {
                self.inner
                    .firestore
                    .patch(collection, id, &payload, mode, Some(&token))
                    .await?;
                id.to_owned()
            }
            None => {
                self.inner
                    .firestore
                    .create(collection, &payload, Some(&token))
                    .await?
            }
        };
        self.wake(collection);
        Ok(id)
    }

    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), BackendError> {
        let token = self.write_token().await?;
        self.inner.firestore.delete(collection, id, Some(&token)).await?;
        self.wake(collection);
        Ok(())
    }
}

impl AuthProvider for FirebaseBackend {
    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<Session, AuthError> {
        let session = auth::sign_in(&self.inner.http, &self.inner.api_key, email, password).await?;
        info!(email = %email, "signed in");
        self.inner.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    fn sign_out(&self) {
        if self.inner.session.send_replace(None).is_some() {
            info!("signed out");
        }
    }

    fn session(&self) -> watch::Receiver<Option<Session>> {
        self.inner.session.subscribe()
    }
}

impl BlobStorage for FirebaseBackend {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BackendError> {
        let token = self.write_token().await?;
        self.inner
            .storage
            .upload(path, bytes, content_type, Some(&token))
            .await
    }
}
