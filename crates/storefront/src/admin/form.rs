//! One editing session of the gecko form.

use std::sync::atomic::{AtomicBool, Ordering};

use venus_gecko_core::{Gecko, GeckoId, Language, Morph};

use super::{GeckoDraft, MutationError, MutationGateway};
use crate::backend::Backend;
use crate::i18n::translations;

/// Target record, draft and save guard of an open form.
///
/// `save` takes `&self` so a form shared between tasks can be saved from
/// any of them; the guard turns every overlapping call into
/// [`MutationError::SaveInProgress`]. Editing the draft needs `&mut self`
/// and therefore cannot race a save.
#[derive(Debug)]
pub struct GeckoForm {
    target: Option<GeckoId>,
    draft: GeckoDraft,
    saving: AtomicBool,
    closed: AtomicBool,
}

/// Clears the saving flag when the save ends, however it ends.
struct SaveGuard<'a>(&'a AtomicBool);

impl<'a> SaveGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl GeckoForm {
    /// Form for a new record.
    #[must_use]
    pub fn create() -> Self {
        Self::with_draft(None, GeckoDraft::new())
    }

    /// Form pre-filled from an existing record.
    #[must_use]
    pub fn edit(gecko: &Gecko) -> Self {
        Self::with_draft(Some(gecko.id.clone()), GeckoDraft::from_gecko(gecko))
    }

    #[must_use]
    pub const fn with_draft(target: Option<GeckoId>, draft: GeckoDraft) -> Self {
        Self {
            target,
            draft,
            saving: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// `None` when creating.
    #[must_use]
    pub const fn target(&self) -> Option<&GeckoId> {
        self.target.as_ref()
    }

    #[must_use]
    pub const fn draft(&self) -> &GeckoDraft {
        &self.draft
    }

    pub const fn draft_mut(&mut self) -> &mut GeckoDraft {
        &mut self.draft
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    /// The close affordance is disabled while a save is running.
    #[must_use]
    pub fn is_closable(&self) -> bool {
        !self.is_saving()
    }

    /// Set once a save succeeded.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Submit the draft through `gateway`.
    ///
    /// On success the form is closed and the persisted id returned. On
    /// failure the form stays open with the draft untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::SaveInProgress`] while another save of this
    /// form runs, otherwise whatever the gateway reports.
    pub async fn save<B: Backend>(
        &self,
        gateway: &MutationGateway<B>,
        morphs: &[Morph],
    ) -> Result<GeckoId, MutationError> {
        let Some(_guard) = SaveGuard::acquire(&self.saving) else {
            return Err(MutationError::SaveInProgress);
        };
        let id = gateway
            .save_gecko(self.target.as_ref(), self.draft.clone(), morphs)
            .await?;
        self.closed.store(true, Ordering::Release);
        Ok(id)
    }
}

// =============================================================================
// Parent pickers
// =============================================================================

fn name_matches(gecko: &Gecko, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || gecko.name.to_lowercase().contains(&query)
}

/// Breeder males whose name contains `query`, case-insensitively.
#[must_use]
pub fn sire_candidates<'a>(all: &'a [Gecko], query: &str) -> Vec<&'a Gecko> {
    all.iter()
        .filter(|g| g.is_sire_candidate() && name_matches(g, query))
        .collect()
}

/// Breeder females whose name contains `query`, case-insensitively.
#[must_use]
pub fn dam_candidates<'a>(all: &'a [Gecko], query: &str) -> Vec<&'a Gecko> {
    all.iter()
        .filter(|g| g.is_dam_candidate() && name_matches(g, query))
        .collect()
}

/// Label of a picked parent; unset or dangling ids read as "unknown".
#[must_use]
pub fn parent_label<'a>(id: Option<&GeckoId>, all: &'a [Gecko], language: Language) -> &'a str {
    id.and_then(|id| venus_gecko_core::resolve(id, all))
        .map_or(translations(language).unknown, |g| g.name.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use secrecy::SecretString;
    use serde_json::json;
    use venus_gecko_core::{Email, MorphId};

    use super::*;
    use crate::backend::Collection;
    use crate::backend::memory::MemoryBackend;

    fn gecko(value: serde_json::Value) -> Gecko {
        serde_json::from_value(value).unwrap()
    }

    fn breeders() -> Vec<Gecko> {
        vec![
            gecko(json!({"id": "m1", "name": "Apollo", "gender": "Male", "status": "Breeder"})),
            gecko(json!({"id": "m2", "name": "Zeus", "gender": "Male", "status": "Available"})),
            gecko(json!({"id": "f1", "name": "Athena", "gender": "Female", "status": "Breeder"})),
            gecko(json!({"id": "f2", "name": "apricot", "gender": "Female", "status": "Breeder"})),
        ]
    }

    #[test]
    fn test_parent_candidates() {
        let all = breeders();
        let sires: Vec<&str> = sire_candidates(&all, "").iter().map(|g| g.id.as_str()).collect();
        assert_eq!(sires, vec!["m1"]);
        let dams: Vec<&str> = dam_candidates(&all, "AP").iter().map(|g| g.id.as_str()).collect();
        assert_eq!(dams, vec!["f2"]);
    }

    #[test]
    fn test_parent_label_falls_back() {
        let all = breeders();
        assert_eq!(parent_label(Some(&GeckoId::new("f1")), &all, Language::En), "Athena");
        assert_eq!(parent_label(Some(&GeckoId::new("gone")), &all, Language::Ko), "알 수 없음");
        assert_eq!(parent_label(None, &all, Language::En), "Unknown");
    }

    #[test]
    fn test_guard_rejects_overlap() {
        let flag = AtomicBool::new(false);
        let first = SaveGuard::acquire(&flag).unwrap();
        assert!(SaveGuard::acquire(&flag).is_none());
        drop(first);
        assert!(SaveGuard::acquire(&flag).is_some());
    }

    #[tokio::test]
    async fn test_save_closes_form() {
        let email = "admin@venusgecko.kr";
        let backend = Arc::new(MemoryBackend::new().with_admin(Email::parse(email).unwrap(), "pw"));
        let gateway = MutationGateway::new(Arc::clone(&backend));
        gateway.sign_in(email, &SecretString::from("pw")).await.unwrap();

        let mut form = GeckoForm::create();
        assert!(form.target().is_none());
        let err = form.save(&gateway, &[]).await.unwrap_err();
        assert!(matches!(err, MutationError::Validation(_)));
        assert!(!form.is_closed());
        assert!(form.is_closable());

        form.draft_mut().morph_id = Some(MorphId::new("m1"));
        let id = form.save(&gateway, &[]).await.unwrap();
        assert!(form.is_closed());
        assert!(backend.get(Collection::Geckos, id.as_str()).is_some());
    }

    #[tokio::test]
    async fn test_save_refused_while_in_flight() {
        let email = "admin@venusgecko.kr";
        let backend = Arc::new(MemoryBackend::new().with_admin(Email::parse(email).unwrap(), "pw"));
        let gateway = MutationGateway::new(Arc::clone(&backend));
        gateway.sign_in(email, &SecretString::from("pw")).await.unwrap();

        let mut form = GeckoForm::create();
        form.draft_mut().morph_id = Some(MorphId::new("m1"));

        let in_flight = SaveGuard::acquire(&form.saving).unwrap();
        assert!(!form.is_closable());
        let err = form.save(&gateway, &[]).await.unwrap_err();
        assert!(matches!(err, MutationError::SaveInProgress));
        assert_eq!(backend.count(Collection::Geckos), 0);

        drop(in_flight);
        form.save(&gateway, &[]).await.unwrap();
        assert_eq!(backend.count(Collection::Geckos), 1);
    }
}
