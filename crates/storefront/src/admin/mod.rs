//! Admin mutation gateway.
//!
//! The only write path to the backend. Every operation requires a signed-in
//! session, validates its input before any network call, and reports
//! failures as a [`MutationError`]. Results are never applied to local state
//! directly: writes loop back through the live collections.

pub mod draft;
pub mod form;

use std::sync::Arc;

use futures::future::try_join_all;
use secrecy::SecretString;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, instrument};
use venus_gecko_core::{Email, Gecko, GeckoId, Language, Morph, MorphId, Status};

use crate::backend::{
    AuthError, Backend, BackendError, Collection, Fields, SETTINGS_DOCUMENT, Session, WriteMode,
};
use crate::i18n::translations;

pub use draft::{GeckoDraft, LocalPhoto, PhotoSlot, ValidatedDraft};
pub use form::GeckoForm;

/// Input rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No morph selected for a gecko.
    #[error("a morph must be selected")]
    MissingMorph,

    /// A morph name is blank in one language.
    #[error("morph name missing for {locale}")]
    MissingMorphName { locale: Language },

    /// Photo index past the end of the list.
    #[error("photo {index} out of range (have {len})")]
    PhotoOutOfRange { index: usize, len: usize },
}

/// Why a mutation did not happen.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No session, or the backend refused the signed-in account.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The backend call failed.
    #[error("network error: {0}")]
    Network(BackendError),

    /// Another save of the same form is still running.
    #[error("a save is already in progress")]
    SaveInProgress,
}

impl From<BackendError> for MutationError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::PermissionDenied(message) => Self::PermissionDenied(message),
            other => Self::Network(other),
        }
    }
}

impl MutationError {
    /// Localized detail text.
    #[must_use]
    pub fn detail(&self, language: Language) -> String {
        let t = translations(language);
        match self {
            Self::Validation(ValidationError::MissingMorph) => t.select_morph.to_string(),
            Self::Validation(ValidationError::MissingMorphName { .. }) => {
                t.morph_names_required.to_string()
            }
            Self::Validation(err) => err.to_string(),
            Self::PermissionDenied(_) => t.login_required.to_string(),
            Self::Network(err) => err.to_string(),
            Self::SaveInProgress => t.save_in_progress.to_string(),
        }
    }
}

/// The user-facing action a mutation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Save,
    Delete,
    StatusChange,
    SetLandingImage,
    UpdateOrder,
    SignIn,
}

impl Operation {
    /// Prefix of the failure message.
    #[must_use]
    pub const fn failure_label(self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Save, Language::Ko) => "저장 실패",
            (Self::Save, Language::En) => "Save failed",
            (Self::Delete, Language::Ko) => "삭제 실패",
            (Self::Delete, Language::En) => "Delete failed",
            (Self::StatusChange, Language::Ko) => "상태 변경 실패",
            (Self::StatusChange, Language::En) => "Status change failed",
            (Self::SetLandingImage, Language::Ko) => "설정 실패",
            (Self::SetLandingImage, Language::En) => "Setting failed",
            (Self::UpdateOrder, Language::Ko) => "순서 업데이트 실패",
            (Self::UpdateOrder, Language::En) => "Order update failed",
            (Self::SignIn, Language::Ko) => "로그인 실패",
            (Self::SignIn, Language::En) => "Sign-in failed",
        }
    }
}

/// A failed mutation, ready to show to the user.
#[derive(Debug, Error)]
#[error("{}: {error}", operation.failure_label(Language::En))]
pub struct MutationFailure {
    pub operation: Operation,
    #[source]
    pub error: MutationError,
}

impl MutationFailure {
    #[must_use]
    pub const fn new(operation: Operation, error: MutationError) -> Self {
        Self { operation, error }
    }

    /// "저장 실패: …" style message in `language`.
    #[must_use]
    pub fn message(&self, language: Language) -> String {
        format!(
            "{}: {}",
            self.operation.failure_label(language),
            self.error.detail(language)
        )
    }
}

/// Extension to tag a mutation result with its operation.
pub trait MutationResultExt<T> {
    /// Wrap the error as a [`MutationFailure`] for `operation`.
    ///
    /// # Errors
    ///
    /// Returns the wrapped failure when `self` is an error.
    fn during(self, operation: Operation) -> Result<T, MutationFailure>;
}

impl<T> MutationResultExt<T> for Result<T, MutationError> {
    fn during(self, operation: Operation) -> Result<T, MutationFailure> {
        self.map_err(|error| MutationFailure::new(operation, error))
    }
}

/// Write path for admin actions.
pub struct MutationGateway<B> {
    backend: Arc<B>,
}

impl<B> Clone for MutationGateway<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend> MutationGateway<B> {
    #[must_use]
    pub const fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Whether an admin session is present.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.backend.current_session().is_some()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed email, rejected credentials or a
    /// backend failure.
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;
        self.backend.sign_in(&email, password).await
    }

    pub fn sign_out(&self) {
        self.backend.sign_out();
    }

    fn require_admin(&self) -> Result<(), MutationError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(MutationError::PermissionDenied("not signed in".to_string()))
        }
    }

    // -------------------------------------------------------------------------
    // Geckos
    // -------------------------------------------------------------------------

    /// Create a gecko from a draft and return its new id.
    ///
    /// # Errors
    ///
    /// See [`MutationGateway::save_gecko`].
    pub async fn create_gecko(
        &self,
        draft: GeckoDraft,
        morphs: &[Morph],
    ) -> Result<GeckoId, MutationError> {
        self.save_gecko(None, draft, morphs).await
    }

    /// Update an existing gecko from a draft.
    ///
    /// # Errors
    ///
    /// See [`MutationGateway::save_gecko`].
    pub async fn update_gecko(
        &self,
        id: &GeckoId,
        draft: GeckoDraft,
        morphs: &[Morph],
    ) -> Result<GeckoId, MutationError> {
        self.save_gecko(Some(id), draft, morphs).await
    }

    /// Validate, upload local photos, then write the record.
    ///
    /// Uploads run concurrently and are awaited together. If any upload
    /// fails nothing is written. Uploaded URLs take the place of their local
    /// previews, so the photo order is exactly the draft's order.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` without a session, `Validation` for an
    /// incomplete draft (before any network call), `Network` when an upload
    /// or the write fails.
    #[instrument(skip(self, draft, morphs), fields(id = ?id.map(GeckoId::as_str)))]
    pub async fn save_gecko(
        &self,
        id: Option<&GeckoId>,
        draft: GeckoDraft,
        morphs: &[Morph],
    ) -> Result<GeckoId, MutationError> {
        self.require_admin()?;
        let validated = draft.validate(morphs)?;

        let uploads = validated.local_photos().map(|(index, photo)| {
            let path = photo.storage_path();
            let backend = Arc::clone(&self.backend);
            let bytes = photo.bytes.clone();
            let content_type = photo.content_type.clone();
            async move {
                let url = backend.upload(&path, bytes, &content_type).await?;
                Ok::<_, BackendError>((index, url))
            }
        });
        let uploaded = try_join_all(uploads).await?;
        let upload_count = uploaded.len();

        let record = validated.into_record(uploaded)?;
        let fields = record_fields(&record)?;
        let saved = match id {
            Some(id) => {
                self.backend
                    .write(Collection::Geckos, Some(id.as_str()), fields, WriteMode::Update)
                    .await?
            }
            None => {
                self.backend
                    .write(Collection::Geckos, None, fields, WriteMode::Replace)
                    .await?
            }
        };

        info!(id = %saved, uploads = upload_count, "saved gecko");
        Ok(GeckoId::new(saved))
    }

    /// Delete a gecko. Records naming it as a parent keep the dangling id.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` without a session, `Network` on failure.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_gecko(&self, id: &GeckoId) -> Result<(), MutationError> {
        self.require_admin()?;
        self.backend.delete(Collection::Geckos, id.as_str()).await?;
        info!("deleted gecko");
        Ok(())
    }

    /// Flip Available and Sold.
    ///
    /// Breeder records and unknown ids are left alone without a network
    /// call; the result is then `Ok(None)`. Otherwise returns the new status.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` without a session, `Network` on failure.
    #[instrument(skip(self, all), fields(id = %id))]
    pub async fn toggle_status(
        &self,
        id: &GeckoId,
        all: &[Gecko],
    ) -> Result<Option<Status>, MutationError> {
        self.require_admin()?;
        let Some(next) = venus_gecko_core::resolve(id, all).and_then(|g| g.status.toggled()) else {
            return Ok(None);
        };

        let mut fields = Fields::new();
        fields.insert("status".to_owned(), Value::String(next.as_str().to_owned()));
        self.backend
            .write(Collection::Geckos, Some(id.as_str()), fields, WriteMode::Update)
            .await?;
        info!(status = %next, "changed status");
        Ok(Some(next))
    }

    // -------------------------------------------------------------------------
    // Site settings
    // -------------------------------------------------------------------------

    /// Override the landing page image, keeping other settings.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` without a session, `Network` on failure.
    #[instrument(skip(self))]
    pub async fn set_landing_image(&self, url: &str) -> Result<(), MutationError> {
        self.require_admin()?;
        let mut fields = Fields::new();
        fields.insert("landingImageUrl".to_owned(), Value::String(url.to_owned()));
        self.backend
            .write(
                Collection::Settings,
                Some(SETTINGS_DOCUMENT),
                fields,
                WriteMode::Merge,
            )
            .await?;
        info!("updated landing image");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Morphs
    // -------------------------------------------------------------------------

    /// Add a morph definition. Both names are trimmed and required.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` without a session, `Validation` for a
    /// blank name, `Network` on failure.
    #[instrument(skip(self))]
    pub async fn add_morph(&self, ko: &str, en: &str, order: i64) -> Result<MorphId, MutationError> {
        self.require_admin()?;
        let ko = ko.trim();
        let en = en.trim();
        if ko.is_empty() {
            return Err(ValidationError::MissingMorphName {
                locale: Language::Ko,
            }
            .into());
        }
        if en.is_empty() {
            return Err(ValidationError::MissingMorphName {
                locale: Language::En,
            }
            .into());
        }

        let fields = object(json!({ "ko": ko, "en": en, "order": order }));
        let id = self
            .backend
            .write(Collection::Morphs, None, fields, WriteMode::Replace)
            .await?;
        info!(id = %id, "added morph");
        Ok(MorphId::new(id))
    }

    /// Change only the display order of a morph.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` without a session, `Network` on failure.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn update_morph_order(&self, id: &MorphId, order: i64) -> Result<(), MutationError> {
        self.require_admin()?;
        let fields = object(json!({ "order": order }));
        self.backend
            .write(Collection::Morphs, Some(id.as_str()), fields, WriteMode::Update)
            .await?;
        info!("updated morph order");
        Ok(())
    }

    /// Delete a morph. Geckos using it fall back to their stored name.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` without a session, `Network` on failure.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_morph(&self, id: &MorphId) -> Result<(), MutationError> {
        self.require_admin()?;
        self.backend.delete(Collection::Morphs, id.as_str()).await?;
        info!("deleted morph");
        Ok(())
    }
}

/// Stored fields of a gecko; the id lives in the document name.
fn record_fields(record: &Gecko) -> Result<Fields, MutationError> {
    let Value::Object(mut fields) = serde_json::to_value(record).map_err(BackendError::from)? else {
        return Err(MutationError::Network(BackendError::Decode(
            "gecko did not serialize to an object".to_string(),
        )));
    };
    fields.remove("id");
    Ok(fields)
}

fn object(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::backend::{AuthProvider, RecordStore};

    const EMAIL: &str = "admin@venusgecko.kr";

    fn backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::new().with_admin(Email::parse(EMAIL).unwrap(), "pw"))
    }

    async fn signed_in() -> (Arc<MemoryBackend>, MutationGateway<MemoryBackend>) {
        let backend = backend();
        let gateway = MutationGateway::new(Arc::clone(&backend));
        gateway.sign_in(EMAIL, &SecretString::from("pw")).await.unwrap();
        (backend, gateway)
    }

    fn draft_with_morph() -> GeckoDraft {
        let mut draft = GeckoDraft::new();
        draft.name = Some("Luna".into());
        draft.morph_id = Some(MorphId::new("m1"));
        draft
    }

    #[tokio::test]
    async fn test_unauthenticated_calls_are_denied() {
        let backend = backend();
        let gateway = MutationGateway::new(Arc::clone(&backend));
        assert!(!gateway.is_admin());

        let err = gateway.create_gecko(draft_with_morph(), &[]).await.unwrap_err();
        assert!(matches!(err, MutationError::PermissionDenied(_)));
        let err = gateway.set_landing_image("https://x").await.unwrap_err();
        assert!(matches!(err, MutationError::PermissionDenied(_)));
        let err = gateway.add_morph("a", "b", 1).await.unwrap_err();
        assert!(matches!(err, MutationError::PermissionDenied(_)));
        assert_eq!(backend.count(Collection::Geckos), 0);
    }

    #[tokio::test]
    async fn test_missing_morph_blocks_before_upload() {
        let (backend, gateway) = signed_in().await;
        let mut draft = GeckoDraft::new();
        draft.add_local_photo("a.jpg", "image/jpeg", vec![1]);

        let err = gateway.create_gecko(draft, &[]).await.unwrap_err();
        assert!(matches!(err, MutationError::Validation(ValidationError::MissingMorph)));
        assert!(backend.blob_paths().is_empty());
        assert_eq!(backend.count(Collection::Geckos), 0);
    }

    #[tokio::test]
    async fn test_create_uploads_and_substitutes_in_place() {
        let (backend, gateway) = signed_in().await;
        let mut draft = draft_with_morph();
        draft.add_local_photo("first.jpg", "image/jpeg", vec![1]);
        draft.add_photo_url("https://cdn/kept.jpg");
        draft.add_local_photo("third.png", "image/png", vec![3]);

        let id = gateway.create_gecko(draft, &[]).await.unwrap();
        let stored = backend.get(Collection::Geckos, id.as_str()).unwrap();
        let photos: Vec<&str> = stored["photos"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(photos.len(), 3);
        assert!(photos[0].starts_with("memory://blobs/geckos/") && photos[0].ends_with("_first.jpg"));
        assert_eq!(photos[1], "https://cdn/kept.jpg");
        assert!(photos[2].ends_with("_third.png"));
        assert_eq!(stored["sireId"], "");
        assert!(stored.get("id").is_none());
    }

    #[tokio::test]
    async fn test_failed_upload_writes_nothing() {
        let (backend, gateway) = signed_in().await;
        let mut draft = draft_with_morph();
        draft.add_local_photo("a.jpg", "image/jpeg", vec![1]);
        backend.fail_next_upload();

        let err = gateway.create_gecko(draft, &[]).await.unwrap_err();
        assert!(matches!(err, MutationError::Network(_)));
        assert_eq!(backend.count(Collection::Geckos), 0);
    }

    #[tokio::test]
    async fn test_update_merges_into_existing_record() {
        let (backend, gateway) = signed_in().await;
        backend.insert(
            Collection::Geckos,
            "g1",
            object(json!({"name": "Old", "legacyField": true})),
        );
        let id = gateway
            .update_gecko(&GeckoId::new("g1"), draft_with_morph(), &[])
            .await
            .unwrap();
        assert_eq!(id.as_str(), "g1");
        let stored = backend.get(Collection::Geckos, "g1").unwrap();
        assert_eq!(stored["name"], "Luna");
        assert_eq!(stored["legacyField"], true);
    }

    #[tokio::test]
    async fn test_update_of_deleted_record_does_not_recreate_it() {
        let (backend, gateway) = signed_in().await;
        let all: Vec<Gecko> =
            vec![serde_json::from_value(json!({"id": "gone", "status": "Available"})).unwrap()];

        let err = gateway
            .update_gecko(&GeckoId::new("gone"), draft_with_morph(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, MutationError::Network(BackendError::NotFound(_))));

        let err = gateway.toggle_status(&GeckoId::new("gone"), &all).await.unwrap_err();
        assert!(matches!(err, MutationError::Network(BackendError::NotFound(_))));

        let err = gateway.update_morph_order(&MorphId::new("gone"), 2).await.unwrap_err();
        assert!(matches!(err, MutationError::Network(BackendError::NotFound(_))));

        assert_eq!(backend.count(Collection::Geckos), 0);
        assert_eq!(backend.count(Collection::Morphs), 0);
    }

    #[tokio::test]
    async fn test_toggle_status_transitions() {
        let (backend, gateway) = signed_in().await;
        let all: Vec<Gecko> = vec![
            serde_json::from_value(json!({"id": "a", "status": "Available"})).unwrap(),
            serde_json::from_value(json!({"id": "b", "status": "Breeder"})).unwrap(),
        ];
        backend.insert(Collection::Geckos, "a", object(json!({"status": "Available"})));
        backend.insert(Collection::Geckos, "b", object(json!({"status": "Breeder"})));

        let next = gateway.toggle_status(&GeckoId::new("a"), &all).await.unwrap();
        assert_eq!(next, Some(Status::Sold));
        assert_eq!(backend.get(Collection::Geckos, "a").unwrap()["status"], "Sold");

        backend.fail_next_write();
        assert_eq!(gateway.toggle_status(&GeckoId::new("b"), &all).await.unwrap(), None);
        assert_eq!(gateway.toggle_status(&GeckoId::new("zz"), &all).await.unwrap(), None);
        // The injected failure was never consumed: no call reached the backend.
        assert!(backend.delete(Collection::Geckos, "nothing").await.is_err());
    }

    #[tokio::test]
    async fn test_landing_image_merges_settings() {
        let (backend, gateway) = signed_in().await;
        backend.insert(Collection::Settings, "site", object(json!({"other": 1})));
        gateway.set_landing_image("https://cdn/hero.jpg").await.unwrap();
        let stored = backend.get(Collection::Settings, "site").unwrap();
        assert_eq!(stored["landingImageUrl"], "https://cdn/hero.jpg");
        assert_eq!(stored["other"], 1);
    }

    #[tokio::test]
    async fn test_morph_crud() {
        let (backend, gateway) = signed_in().await;
        let err = gateway.add_morph(" ", "Lilly", 1).await.unwrap_err();
        assert!(matches!(
            err,
            MutationError::Validation(ValidationError::MissingMorphName { locale: Language::Ko })
        ));

        let id = gateway.add_morph(" 릴리 ", "Lilly White", 3).await.unwrap();
        let stored = backend.get(Collection::Morphs, id.as_str()).unwrap();
        assert_eq!(stored["ko"], "릴리");
        assert_eq!(stored["order"], 3);

        gateway.update_morph_order(&id, 1).await.unwrap();
        let stored = backend.get(Collection::Morphs, id.as_str()).unwrap();
        assert_eq!(stored["order"], 1);
        assert_eq!(stored["en"], "Lilly White");

        gateway.delete_morph(&id).await.unwrap();
        assert_eq!(backend.count(Collection::Morphs), 0);
    }

    #[tokio::test]
    async fn test_writes_loop_back_through_subscription() {
        let (backend, gateway) = signed_in().await;
        let mut rx = backend.subscribe(Collection::Morphs);
        rx.borrow_and_update();
        gateway.add_morph("a", "b", 1).await.unwrap();
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_sign_out_revokes_admin() {
        let (backend, gateway) = signed_in().await;
        assert!(gateway.is_admin());
        gateway.sign_out();
        assert!(!gateway.is_admin());
        assert!(backend.current_session().is_none());
    }

    #[test]
    fn test_failure_messages_name_the_operation() {
        let failure = MutationFailure::new(
            Operation::Save,
            MutationError::Network(BackendError::Unavailable("timeout".into())),
        );
        assert_eq!(failure.message(Language::Ko), "저장 실패: backend unavailable: timeout");
        assert_eq!(failure.to_string(), "Save failed: network error: backend unavailable: timeout");

        let denied: Result<(), MutationError> =
            Err(BackendError::PermissionDenied("rules".into()).into());
        let failure = denied.during(Operation::SetLandingImage).unwrap_err();
        assert_eq!(failure.message(Language::Ko), "설정 실패: 관리자 로그인이 필요합니다.");
    }
}
