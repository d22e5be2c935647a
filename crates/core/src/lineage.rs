//! Lineage navigation inside the details view.
//!
//! The details view starts on one record and lets the visitor drill into its
//! sire or dam, then walk back. Previously shown records are kept on a LIFO
//! stack. Parents are looked up by id against the full collection every time
//! they are needed, so a deleted parent simply stops resolving.
//!
//! There is no cycle detection: if the data says A's sire is B and B's sire
//! is A, the navigator keeps following it and the stack keeps growing.

use serde::{Deserialize, Serialize};

use crate::types::{Gecko, GeckoId};

/// Which parent to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentRole {
    Sire,
    Dam,
}

impl ParentRole {
    /// Resolve this parent of `child` against `all`.
    #[must_use]
    pub fn resolve<'a>(self, child: &Gecko, all: &'a [Gecko]) -> Option<&'a Gecko> {
        match self {
            Self::Sire => child.sire(all),
            Self::Dam => child.dam(all),
        }
    }
}

/// Back-stack navigator for one details-view session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageNavigator {
    current: Gecko,
    history: Vec<Gecko>,
    active_photo: usize,
}

impl LineageNavigator {
    /// Start a session on `record` with an empty history.
    #[must_use]
    pub const fn open(record: Gecko) -> Self {
        Self {
            current: record,
            history: Vec::new(),
            active_photo: 0,
        }
    }

    /// The record currently displayed.
    #[must_use]
    pub const fn current(&self) -> &Gecko {
        &self.current
    }

    /// Previously displayed records, most recent last.
    #[must_use]
    pub fn history(&self) -> &[Gecko] {
        &self.history
    }

    /// Resolve a parent of the current record.
    #[must_use]
    pub fn parent<'a>(&self, role: ParentRole, all: &'a [Gecko]) -> Option<&'a Gecko> {
        role.resolve(&self.current, all)
    }

    /// Show `parent`, pushing the current record onto the history.
    ///
    /// A `None` parent (unresolved reference) is rejected and leaves the
    /// state untouched. Returns whether navigation happened.
    pub fn navigate_to_parent(&mut self, parent: Option<&Gecko>) -> bool {
        let Some(parent) = parent else {
            return false;
        };
        let previous = std::mem::replace(&mut self.current, parent.clone());
        self.history.push(previous);
        self.active_photo = 0;
        true
    }

    /// Resolve `role` against `all` and navigate to it if found.
    pub fn follow(&mut self, role: ParentRole, all: &[Gecko]) -> bool {
        let parent = self.parent(role, all);
        self.navigate_to_parent(parent)
    }

    /// Return to the previously displayed record.
    ///
    /// No-op on an empty history. Returns whether navigation happened.
    pub fn go_back(&mut self) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        self.current = previous;
        self.active_photo = 0;
        true
    }

    /// Whether the back affordance is shown.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Deletion is only offered on the record the session was opened with.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.history.is_empty()
    }

    /// The id that may be deleted from this view, if any.
    #[must_use]
    pub fn deletable(&self) -> Option<&GeckoId> {
        self.can_delete().then_some(&self.current.id)
    }

    // -------------------------------------------------------------------------
    // Photo carousel
    // -------------------------------------------------------------------------

    /// Index of the photo being shown.
    #[must_use]
    pub const fn active_photo(&self) -> usize {
        self.active_photo
    }

    /// URL of the photo being shown.
    #[must_use]
    pub fn active_photo_url(&self) -> Option<&str> {
        self.current.photos.get(self.active_photo).map(String::as_str)
    }

    /// Advance to the next photo, wrapping around.
    pub fn next_photo(&mut self) {
        let count = self.current.photos.len();
        if count > 1 {
            self.active_photo = (self.active_photo + 1) % count;
        }
    }

    /// Go to the previous photo, wrapping around.
    pub fn previous_photo(&mut self) {
        let count = self.current.photos.len();
        if count > 1 {
            self.active_photo = (self.active_photo + count - 1) % count;
        }
    }

    /// Jump to a thumbnail. Out-of-range indices are ignored.
    pub fn select_photo(&mut self, index: usize) -> bool {
        if index < self.current.photos.len() {
            self.active_photo = index;
            return true;
        }
        false
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{Gender, Price, Status};

    fn gecko(id: &str, sire: Option<&str>, dam: Option<&str>) -> Gecko {
        Gecko {
            id: GeckoId::new(id),
            name: id.to_owned(),
            morph_id: None,
            morph_name: None,
            gender: Gender::Unknown,
            hatch_date: String::new(),
            price: Price::default(),
            status: Status::Breeder,
            description: String::new(),
            photos: vec![format!("{id}-1.jpg"), format!("{id}-2.jpg")],
            sire_id: sire.map(GeckoId::new),
            dam_id: dam.map(GeckoId::new),
        }
    }

    #[test]
    fn test_open_starts_at_root() {
        let nav = LineageNavigator::open(gecko("a", None, None));
        assert_eq!(nav.current().id.as_str(), "a");
        assert!(nav.history().is_empty());
        assert_eq!(nav.active_photo(), 0);
        assert!(nav.can_delete());
        assert!(!nav.can_go_back());
    }

    #[test]
    fn test_navigate_then_back_restores_root() {
        let all = vec![gecko("a", Some("b"), None), gecko("b", None, None)];
        let mut nav = LineageNavigator::open(all[0].clone());
        nav.next_photo();

        assert!(nav.follow(ParentRole::Sire, &all));
        assert_eq!(nav.current().id.as_str(), "b");
        assert_eq!(nav.history().len(), 1);
        assert_eq!(nav.active_photo(), 0);

        assert!(nav.go_back());
        assert_eq!(nav.current().id.as_str(), "a");
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_go_back_on_empty_history_is_noop() {
        let mut nav = LineageNavigator::open(gecko("a", None, None));
        nav.select_photo(1);
        let before = nav.clone();
        assert!(!nav.go_back());
        assert_eq!(nav, before);
    }

    #[test]
    fn test_dangling_parent_is_rejected() {
        let all = vec![gecko("a", Some("x"), None)];
        let mut nav = LineageNavigator::open(all[0].clone());
        assert!(nav.parent(ParentRole::Sire, &all).is_none());
        let before = nav.clone();
        assert!(!nav.navigate_to_parent(None));
        assert!(!nav.follow(ParentRole::Dam, &all));
        assert_eq!(nav, before);
    }

    #[test]
    fn test_delete_only_at_root() {
        let all = vec![gecko("a", None, Some("d")), gecko("d", None, None)];
        let mut nav = LineageNavigator::open(all[0].clone());
        assert_eq!(nav.deletable().map(GeckoId::as_str), Some("a"));

        nav.follow(ParentRole::Dam, &all);
        assert!(!nav.can_delete());
        assert_eq!(nav.deletable(), None);
    }

    #[test]
    fn test_history_is_lifo_over_several_generations() {
        let all = vec![
            gecko("kid", Some("dad"), None),
            gecko("dad", None, Some("grandma")),
            gecko("grandma", None, None),
        ];
        let mut nav = LineageNavigator::open(all[0].clone());
        assert!(nav.follow(ParentRole::Sire, &all));
        assert!(nav.follow(ParentRole::Dam, &all));
        let trail: Vec<&str> = nav.history().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(trail, vec!["kid", "dad"]);

        nav.go_back();
        assert_eq!(nav.current().id.as_str(), "dad");
        nav.go_back();
        assert_eq!(nav.current().id.as_str(), "kid");
    }

    #[test]
    fn test_reference_cycle_is_followed_without_limit() {
        let all = vec![gecko("a", Some("b"), None), gecko("b", Some("a"), None)];
        let mut nav = LineageNavigator::open(all[0].clone());
        for _ in 0..10 {
            assert!(nav.follow(ParentRole::Sire, &all));
        }
        assert_eq!(nav.history().len(), 10);
        assert_eq!(nav.current().id.as_str(), "a");
    }

    #[test]
    fn test_photo_carousel_wraps() {
        let mut nav = LineageNavigator::open(gecko("a", None, None));
        assert_eq!(nav.active_photo_url(), Some("a-1.jpg"));
        nav.previous_photo();
        assert_eq!(nav.active_photo(), 1);
        nav.next_photo();
        assert_eq!(nav.active_photo(), 0);
        assert!(!nav.select_photo(5));
        assert_eq!(nav.active_photo(), 0);
    }

    #[test]
    fn test_carousel_without_photos() {
        let mut bare = gecko("a", None, None);
        bare.photos.clear();
        let mut nav = LineageNavigator::open(bare);
        nav.next_photo();
        nav.previous_photo();
        assert_eq!(nav.active_photo(), 0);
        assert_eq!(nav.active_photo_url(), None);
    }
}
