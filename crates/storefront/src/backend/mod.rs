//! Contracts of the managed backend the storefront consumes.
//!
//! The storefront never persists anything itself. Records, sessions and
//! photos live in an external service reached through three small traits:
//!
//! - [`RecordStore`] - subscribable document collections
//! - [`AuthProvider`] - email/password sign-in with a session broadcast
//! - [`BlobStorage`] - file upload returning a durable URL
//!
//! Two implementations ship with the crate: [`firebase::FirebaseBackend`]
//! talks to Firestore, Identity Toolkit and Cloud Storage over REST, and
//! [`memory::MemoryBackend`] keeps everything in process for tests and
//! offline demos.

pub mod firebase;
pub mod memory;

use std::fmt;
use std::future::Future;

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::watch;
use venus_gecko_core::{Email, EmailError};

/// Field map of a stored document.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Collections the storefront reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Geckos,
    Morphs,
    /// Holds the single [`SETTINGS_DOCUMENT`].
    Settings,
}

/// Id of the singleton settings document.
pub const SETTINGS_DOCUMENT: &str = "site";

impl Collection {
    /// Collection name in the document store.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Geckos => "geckos",
            Self::Morphs => "morphs",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Decode into a typed record, injecting the document id as `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields do not match the record's shape.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_owned(), serde_json::Value::String(self.id.clone()));
        serde_json::from_value(serde_json::Value::Object(fields))
    }
}

/// A full copy of one collection at a point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub documents: Vec<Document>,
}

impl Snapshot {
    /// Find a document by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// How a write treats fields that are not in the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// The payload becomes the whole record.
    Replace,
    /// Only the payload's fields are updated; the record is created if
    /// missing.
    Merge,
    /// Like [`WriteMode::Merge`], but fails with
    /// [`BackendError::NotFound`] when the record does not exist.
    Update,
}

/// An authenticated admin session.
///
/// Implements `Debug` manually to redact tokens.
#[derive(Clone)]
pub struct Session {
    /// Provider-assigned user id.
    pub uid: String,
    pub email: Email,
    /// Bearer token for record and blob writes.
    pub id_token: SecretString,
    /// Token used to mint a new `id_token`.
    pub refresh_token: Option<SecretString>,
    /// Unix timestamp when `id_token` expires.
    pub expires_at: i64,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Errors from record, blob or token calls.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status without a more specific mapping.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The caller is not allowed to perform the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Record or object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A response parsed but did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The service could not be reached or refused to serve.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors from signing in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Wrong password, unknown account or disabled account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The auth service failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Subscribable document collections.
pub trait RecordStore: Send + Sync {
    /// Subscribe to full snapshots of `collection`.
    ///
    /// The receiver holds `None` until the first snapshot arrives. Every
    /// published value replaces the previous one entirely.
    fn subscribe(&self, collection: Collection) -> watch::Receiver<Option<Snapshot>>;

    /// Write a record and return its id.
    ///
    /// With `id: None` the store assigns a fresh id.
    fn write(
        &self,
        collection: Collection,
        id: Option<&str>,
        fields: Fields,
        mode: WriteMode,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Delete a record. Deleting a missing record succeeds.
    fn delete(
        &self,
        collection: Collection,
        id: &str,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Email/password authentication with a session broadcast.
pub trait AuthProvider: Send + Sync {
    /// Sign in and broadcast the new session.
    fn sign_in(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;

    /// Drop the current session and broadcast `None`.
    fn sign_out(&self);

    /// Session-state-changed channel.
    fn session(&self) -> watch::Receiver<Option<Session>>;

    /// The session right now.
    fn current_session(&self) -> Option<Session> {
        self.session().borrow().clone()
    }
}

/// File storage with durable public URLs.
pub trait BlobStorage: Send + Sync {
    /// Upload `bytes` under `path` and return the durable URL.
    fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;
}

/// Everything the storefront needs from the managed backend.
pub trait Backend: RecordStore + AuthProvider + BlobStorage {}

impl<T: RecordStore + AuthProvider + BlobStorage> Backend for T {}
