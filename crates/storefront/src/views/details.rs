//! Details modal: current record, lineage panel, carousel and actions.

use venus_gecko_core::{Gecko, Language, LineageNavigator, Morph, ParentRole, Status};

use super::card::cover_or_placeholder;
use crate::i18n::translations;

/// One row of the lineage panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentPanel<'a> {
    pub role: ParentRole,
    pub role_label: &'static str,
    /// `None` when the reference is unset or dangling; the row is then not
    /// navigable.
    pub parent: Option<&'a Gecko>,
    /// Parent name or localized "unknown".
    pub name: &'a str,
    pub thumbnail: Option<&'a str>,
}

impl<'a> ParentPanel<'a> {
    fn new(role: ParentRole, current: &Gecko, all: &'a [Gecko], language: Language) -> Self {
        let t = translations(language);
        let parent = role.resolve(current, all);
        Self {
            role,
            role_label: match role {
                ParentRole::Sire => t.sire,
                ParentRole::Dam => t.dam,
            },
            parent,
            name: parent.map_or(t.unknown, |p| p.name.as_str()),
            thumbnail: parent.and_then(Gecko::cover_photo),
        }
    }

    #[must_use]
    pub const fn is_navigable(&self) -> bool {
        self.parent.is_some()
    }
}

/// Everything the details modal renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsView<'a> {
    pub gecko: &'a Gecko,
    pub morph: &'a str,
    pub gender: &'static str,
    /// `NFS` for breeders, otherwise the formatted price.
    pub price: String,
    pub sold: bool,
    pub photo: &'a str,
    /// "i / n", 1-based; `None` without photos.
    pub photo_counter: Option<String>,
    pub thumbnails: &'a [String],
    pub sire: ParentPanel<'a>,
    pub dam: ParentPanel<'a>,
    pub show_back: bool,
    pub show_delete: bool,
    /// URL the "set as main image" button would use.
    pub landing_candidate: Option<&'a str>,
}

impl<'a> DetailsView<'a> {
    #[must_use]
    pub fn new(
        navigator: &'a LineageNavigator,
        all: &'a [Gecko],
        morphs: &'a [Morph],
        language: Language,
        is_admin: bool,
    ) -> Self {
        let t = translations(language);
        let gecko = navigator.current();
        let count = gecko.photos.len();
        Self {
            gecko,
            morph: gecko.morph_label(morphs, language),
            gender: t.gender(gecko.gender),
            price: if gecko.status == Status::Breeder {
                t.not_for_sale.to_string()
            } else {
                gecko.price.display(language)
            },
            sold: gecko.status == Status::Sold,
            photo: navigator
                .active_photo_url()
                .unwrap_or_else(|| cover_or_placeholder(gecko)),
            photo_counter: (count > 0).then(|| format!("{} / {count}", navigator.active_photo() + 1)),
            thumbnails: &gecko.photos,
            sire: ParentPanel::new(ParentRole::Sire, gecko, all, language),
            dam: ParentPanel::new(ParentRole::Dam, gecko, all, language),
            show_back: navigator.can_go_back(),
            show_delete: is_admin && navigator.can_delete(),
            landing_candidate: if is_admin { navigator.active_photo_url() } else { None },
        }
    }
}
