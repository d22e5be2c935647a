//! Top-level application context.
//!
//! [`Storefront`] is the single owner of the live collections, the current
//! view selection and the open details session. Front ends read derived
//! state from it and send admin actions through its gateway.

use std::sync::Arc;

use venus_gecko_core::{
    CatalogSection, Gecko, GeckoId, Language, LineageNavigator, ParentRole, Selection, Status,
    derive_catalog,
};

use crate::admin::{GeckoForm, MutationGateway, MutationResultExt, Operation};
use crate::backend::Backend;
use crate::error::{AppError, Result};
use crate::store::{LiveStore, StoreSnapshot};
use crate::views::{DetailsView, FilterBar, GeckoCard, LandingView, MorphManagerView};

/// Application state over a backend `B`.
pub struct Storefront<B> {
    store: LiveStore,
    gateway: MutationGateway<B>,
    current: StoreSnapshot,
    selection: Selection,
    details: Option<LineageNavigator>,
}

impl<B: Backend> Storefront<B> {
    /// Subscribe to `backend` and start in `language`.
    pub fn new(backend: Arc<B>, language: Language) -> Self {
        let store = LiveStore::subscribe(backend.as_ref());
        let current = store.snapshot();
        Self {
            store,
            gateway: MutationGateway::new(backend),
            current,
            selection: Selection {
                language,
                ..Selection::default()
            },
            details: None,
        }
    }

    // -------------------------------------------------------------------------
    // Live data
    // -------------------------------------------------------------------------

    /// The snapshot all derived views are computed from.
    #[must_use]
    pub const fn snapshot(&self) -> &StoreSnapshot {
        &self.current
    }

    /// Re-read the latest collections.
    pub fn refresh(&mut self) {
        self.current = self.store.snapshot();
    }

    /// Wait for the next published change, then refresh.
    ///
    /// # Errors
    ///
    /// Returns an error once the backend closes its subscriptions.
    pub async fn next_change(&mut self) -> Result<()> {
        self.store.changed().await?;
        self.refresh();
        Ok(())
    }

    /// Wait until the catalog has loaded once, then refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend closes its subscriptions first.
    pub async fn wait_loaded(&mut self) -> Result<()> {
        self.store.loaded().await?;
        self.refresh();
        Ok(())
    }

    /// Wait until every collection has loaded once, then refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend closes its subscriptions first.
    pub async fn wait_synced(&mut self) -> Result<()> {
        self.store.synced().await?;
        self.refresh();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    pub const fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub const fn select_tab(&mut self, tab: Status) {
        self.selection.tab = tab;
    }

    pub const fn toggle_language(&mut self) {
        self.selection.language = self.selection.language.toggled();
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.selection.language
    }

    // -------------------------------------------------------------------------
    // Derived views
    // -------------------------------------------------------------------------

    /// Catalog sections for the current selection.
    #[must_use]
    pub fn catalog(&self) -> Vec<CatalogSection<'_>> {
        derive_catalog(&self.current.geckos, &self.current.morphs, &self.selection)
    }

    /// Card for one record of the catalog.
    #[must_use]
    pub fn card<'a>(&'a self, gecko: &'a Gecko) -> GeckoCard<'a> {
        GeckoCard::new(gecko, &self.current.morphs, self.language(), self.is_admin())
    }

    #[must_use]
    pub fn filter_bar(&self) -> FilterBar {
        FilterBar::new(
            &self.current.geckos,
            &self.current.morphs,
            &self.selection,
            &self.catalog(),
        )
    }

    #[must_use]
    pub fn landing(&self) -> LandingView<'_> {
        LandingView::new(&self.current.geckos, &self.current.settings)
    }

    #[must_use]
    pub fn morph_manager(&self) -> MorphManagerView<'_> {
        MorphManagerView::new(&self.current.morphs)
    }

    // -------------------------------------------------------------------------
    // Details session
    // -------------------------------------------------------------------------

    /// Open the details view on a record, replacing any open session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id.
    pub fn open_details(&mut self, id: &str) -> Result<&LineageNavigator> {
        let gecko = self
            .current
            .gecko(id)
            .ok_or_else(|| AppError::NotFound(format!("gecko {id}")))?
            .clone();
        Ok(self.details.insert(LineageNavigator::open(gecko)))
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }

    #[must_use]
    pub const fn navigator(&self) -> Option<&LineageNavigator> {
        self.details.as_ref()
    }

    pub const fn navigator_mut(&mut self) -> Option<&mut LineageNavigator> {
        self.details.as_mut()
    }

    /// Follow a parent of the displayed record. Returns whether it resolved.
    pub fn follow_parent(&mut self, role: ParentRole) -> bool {
        let Some(navigator) = self.details.as_mut() else {
            return false;
        };
        navigator.follow(role, &self.current.geckos)
    }

    /// Go back one step. Returns whether anything changed.
    pub fn go_back(&mut self) -> bool {
        self.details.as_mut().is_some_and(LineageNavigator::go_back)
    }

    #[must_use]
    pub fn details(&self) -> Option<DetailsView<'_>> {
        self.details.as_ref().map(|navigator| {
            DetailsView::new(
                navigator,
                &self.current.geckos,
                &self.current.morphs,
                self.language(),
                self.is_admin(),
            )
        })
    }

    // -------------------------------------------------------------------------
    // Admin
    // -------------------------------------------------------------------------

    #[must_use]
    pub const fn gateway(&self) -> &MutationGateway<B> {
        &self.gateway
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.gateway.is_admin()
    }

    /// Form editing an existing record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown id.
    pub fn edit_form(&self, id: &str) -> Result<GeckoForm> {
        self.current
            .gecko(id)
            .map(GeckoForm::edit)
            .ok_or_else(|| AppError::NotFound(format!("gecko {id}")))
    }

    /// Save a form against the current morph list.
    ///
    /// # Errors
    ///
    /// Returns the save failure, labelled for display.
    pub async fn save_form(&self, form: &GeckoForm) -> Result<GeckoId> {
        Ok(form
            .save(&self.gateway, &self.current.morphs)
            .await
            .during(Operation::Save)?)
    }

    /// Toggle Available/Sold on a record of the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns the mutation failure, labelled for display.
    pub async fn toggle_status(&self, id: &GeckoId) -> Result<Option<Status>> {
        Ok(self
            .gateway
            .toggle_status(id, &self.current.geckos)
            .await
            .during(Operation::StatusChange)?)
    }

    /// Delete the record the details view was opened with.
    ///
    /// Does nothing and returns `false` when no details view is open or the
    /// visitor has navigated away from the root record. Closes the details
    /// view on success.
    ///
    /// # Errors
    ///
    /// Returns the mutation failure, labelled for display.
    pub async fn delete_from_details(&mut self) -> Result<bool> {
        let Some(id) = self
            .details
            .as_ref()
            .and_then(LineageNavigator::deletable)
            .cloned()
        else {
            return Ok(false);
        };
        self.gateway
            .delete_gecko(&id)
            .await
            .during(Operation::Delete)?;
        self.details = None;
        Ok(true)
    }

    /// Use the active details photo as the landing image.
    ///
    /// Returns `false` when there is no photo to use.
    ///
    /// # Errors
    ///
    /// Returns the mutation failure, labelled for display.
    pub async fn set_landing_from_details(&self) -> Result<bool> {
        let Some(url) = self
            .details
            .as_ref()
            .and_then(LineageNavigator::active_photo_url)
        else {
            return Ok(false);
        };
        self.gateway
            .set_landing_image(url)
            .await
            .during(Operation::SetLandingImage)?;
        Ok(true)
    }
}
