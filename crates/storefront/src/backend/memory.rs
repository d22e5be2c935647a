//! In-process backend for tests, demos and offline runs.
//!
//! Behaves like the hosted services as far as the storefront can observe:
//! every write publishes a full snapshot of the affected collection, writes
//! need a signed-in session, and uploads return stable URLs.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, info};
use venus_gecko_core::Email;

use super::{
    AuthError, AuthProvider, BackendError, BlobStorage, Collection, Document, Fields,
    RecordStore, Session, Snapshot, WriteMode,
};

/// URL scheme of uploaded blobs.
pub const BLOB_URL_PREFIX: &str = "memory://blobs/";

const SESSION_LIFETIME_SECS: i64 = 3600;

/// A stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// In-memory backend. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

struct Inner {
    collections: Mutex<HashMap<Collection, BTreeMap<String, Fields>>>,
    feeds: HashMap<Collection, watch::Sender<Option<Snapshot>>>,
    session: watch::Sender<Option<Session>>,
    admin: Mutex<Option<(Email, SecretString)>>,
    blobs: Mutex<BTreeMap<String, Blob>>,
    fail_next_upload: AtomicBool,
    fail_next_write: AtomicBool,
}

impl Default for Inner {
    fn default() -> Self {
        let feeds = [Collection::Geckos, Collection::Morphs, Collection::Settings]
            .into_iter()
            .map(|collection| (collection, watch::Sender::new(Some(Snapshot::default()))))
            .collect();
        Self {
            collections: Mutex::default(),
            feeds,
            session: watch::Sender::new(None),
            admin: Mutex::default(),
            blobs: Mutex::default(),
            fail_next_upload: AtomicBool::new(false),
            fail_next_write: AtomicBool::new(false),
        }
    }
}

/// Poisoning only means another thread panicked mid-update; the maps are
/// still structurally valid.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryBackend {
    /// Empty backend with no admin account.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the single admin account.
    #[must_use]
    pub fn with_admin(self, email: Email, password: impl Into<String>) -> Self {
        *lock(&self.inner.admin) = Some((email, SecretString::from(password.into())));
        self
    }

    /// Insert a record directly, bypassing authentication.
    ///
    /// Used to seed fixtures. Publishes like a regular write.
    pub fn insert(&self, collection: Collection, id: impl Into<String>, fields: Fields) {
        let id = id.into();
        {
            let mut collections = lock(&self.inner.collections);
            collections.entry(collection).or_default().insert(id, fields);
        }
        self.publish(collection);
    }

    /// Serialize a record and insert it under its own id.
    ///
    /// # Errors
    ///
    /// Returns an error if `record` does not serialize to a JSON object.
    pub fn insert_record<T: serde::Serialize>(
        &self,
        collection: Collection,
        id: impl Into<String>,
        record: &T,
    ) -> Result<(), BackendError> {
        let serde_json::Value::Object(mut fields) = serde_json::to_value(record)? else {
            return Err(BackendError::Decode("record is not an object".to_string()));
        };
        fields.remove("id");
        self.insert(collection, id, fields);
        Ok(())
    }

    /// Fields of a stored record.
    #[must_use]
    pub fn get(&self, collection: Collection, id: &str) -> Option<Fields> {
        lock(&self.inner.collections)
            .get(&collection)
            .and_then(|records| records.get(id))
            .cloned()
    }

    /// Number of records in a collection.
    #[must_use]
    pub fn count(&self, collection: Collection) -> usize {
        lock(&self.inner.collections)
            .get(&collection)
            .map_or(0, BTreeMap::len)
    }

    /// A previously uploaded blob.
    #[must_use]
    pub fn blob(&self, path: &str) -> Option<Blob> {
        lock(&self.inner.blobs).get(path).cloned()
    }

    /// Paths of all uploaded blobs, sorted.
    #[must_use]
    pub fn blob_paths(&self) -> Vec<String> {
        lock(&self.inner.blobs).keys().cloned().collect()
    }

    /// Make the next upload fail with [`BackendError::Unavailable`].
    pub fn fail_next_upload(&self) {
        self.inner.fail_next_upload.store(true, Ordering::SeqCst);
    }

    /// Make the next record write or delete fail with
    /// [`BackendError::Unavailable`].
    pub fn fail_next_write(&self) {
        self.inner.fail_next_write.store(true, Ordering::SeqCst);
    }

    fn publish(&self, collection: Collection) {
        let snapshot = {
            let collections = lock(&self.inner.collections);
            Snapshot {
                documents: collections
                    .get(&collection)
                    .map(|records| {
                        records
                            .iter()
                            .map(|(id, fields)| Document {
                                id: id.clone(),
                                fields: fields.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            }
        };
        if let Some(feed) = self.inner.feeds.get(&collection) {
            feed.send_replace(Some(snapshot));
        }
    }

    fn require_session(&self) -> Result<(), BackendError> {
        if self.inner.session.borrow().is_some() {
            Ok(())
        } else {
            Err(BackendError::PermissionDenied(
                "missing or insufficient permissions".to_string(),
            ))
        }
    }

    fn take_injected(flag: &AtomicBool, what: &str) -> Result<(), BackendError> {
        if flag.swap(false, Ordering::SeqCst) {
            return Err(BackendError::Unavailable(format!("injected {what} failure")));
        }
        Ok(())
    }
}

impl RecordStore for MemoryBackend {
    fn subscribe(&self, collection: Collection) -> watch::Receiver<Option<Snapshot>> {
        match self.inner.feeds.get(&collection) {
            Some(feed) => feed.subscribe(),
            None => watch::channel(None).1,
        }
    }

    async fn write(
        &self,
        collection: Collection,
        id: Option<&str>,
        fields: Fields,
        mode: WriteMode,
    ) -> Result<String, BackendError> {
        self.require_session()?;
        Self::take_injected(&self.inner.fail_next_write, "write")?;

        let id = id.map_or_else(|| uuid::Uuid::new_v4().simple().to_string(), str::to_owned);
        {
            let mut collections = lock(&self.inner.collections);
            let records = collections.entry(collection).or_default();
            match (mode, records.get_mut(&id)) {
                (WriteMode::Merge | WriteMode::Update, Some(existing)) => existing.extend(fields),
                (WriteMode::Update, None) => {
                    return Err(BackendError::NotFound(format!("{collection}/{id}")));
                }
                _ => {
                    records.insert(id.clone(), fields);
                }
            }
        }
        debug!(%collection, %id, ?mode, "memory write");
        self.publish(collection);
        Ok(id)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), BackendError> {
        self.require_session()?;
        Self::take_injected(&self.inner.fail_next_write, "delete")?;

        let removed = lock(&self.inner.collections)
            .get_mut(&collection)
            .and_then(|records| records.remove(id))
            .is_some();
        debug!(%collection, %id, removed, "memory delete");
        self.publish(collection);
        Ok(())
    }
}

impl AuthProvider for MemoryBackend {
    async fn sign_in(&self, email: &Email, password: &SecretString) -> Result<Session, AuthError> {
        let matches = lock(&self.inner.admin)
            .as_ref()
            .is_some_and(|(admin, secret)| {
                admin.as_str().eq_ignore_ascii_case(email.as_str())
                    && secret.expose_secret() == password.expose_secret()
            });
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            uid: format!("memory-{}", uuid::Uuid::new_v4().simple()),
            email: email.clone(),
            id_token: SecretString::from(uuid::Uuid::new_v4().to_string()),
            refresh_token: None,
            expires_at: chrono::Utc::now().timestamp() + SESSION_LIFETIME_SECS,
        };
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

impl BlobStorage for MemoryBackend {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BackendError> {
        self.require_session()?;
        Self::take_injected(&self.inner.fail_next_upload, "upload")?;

        debug!(path, size = bytes.len(), "memory upload");
        lock(&self.inner.blobs).insert(
            path.to_owned(),
            Blob {
                content_type: content_type.to_owned(),
                bytes,
            },
        );
        Ok(format!("{BLOB_URL_PREFIX}{path}"))
    }
}
