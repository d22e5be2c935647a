//! Catalog derivation.
//!
//! Turns the full gecko collection plus the current view selection into the
//! ordered sections the storefront renders:
//!
//! 1. **Filter** - keep records in the active tab that match every active
//!    filter. [`Filter::All`] is the identity for its dimension.
//! 2. **Sort** - stable sort by hatch date or price, or keep collection order.
//! 3. **Group** - stable partition by morph id; records without a morph id
//!    share the `"unknown"` group.
//! 4. **Order** - sections by morph display order (missing morph sorts last
//!    at [`MISSING_MORPH_ORDER`]), ties broken by label.
//!
//! The whole pipeline is a pure function of its inputs and is recomputed from
//! the latest full snapshot on every change.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Gecko, GeckoId, Gender, Language, Morph, MorphId, SortOption, Status};

/// Section order assigned when a group's morph id does not resolve.
pub const MISSING_MORPH_ORDER: i64 = 999;

/// Group key shared by records without a morph id.
pub const UNKNOWN_GROUP_KEY: &str = "unknown";

/// Literal used for the identity filter in URLs and dropdowns.
pub const ALL_LITERAL: &str = "All";

/// A single filter dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter<T> {
    /// No restriction.
    All,
    /// Keep only records whose field equals the value.
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Filter<T> {
    /// Whether a record field passes this filter. An absent field only
    /// passes [`Filter::All`].
    #[must_use]
    pub fn matches(&self, value: Option<&T>) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => value == Some(expected),
        }
    }

    /// The selected value, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<&T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case(ALL_LITERAL) {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// The view state that drives derivation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub tab: Status,
    pub morph: Filter<MorphId>,
    pub sire: Filter<GeckoId>,
    pub dam: Filter<GeckoId>,
    pub gender: Filter<Gender>,
    pub sort: SortOption,
    pub language: Language,
}

impl Selection {
    /// Whether `gecko` passes the tab and every filter.
    #[must_use]
    pub fn admits(&self, gecko: &Gecko) -> bool {
        gecko.status == self.tab
            && self.morph.matches(gecko.morph_id.as_ref())
            && self.sire.matches(gecko.sire_id.as_ref())
            && self.dam.matches(gecko.dam_id.as_ref())
            && self.gender.matches(Some(&gecko.gender))
    }
}

/// One rendered group of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSection<'a> {
    /// Localized morph name, or the fallback of the first record seen.
    pub label: String,
    /// The morph id shared by the group; `None` for the unknown group.
    pub morph_id: Option<&'a MorphId>,
    /// Morph display order used to place the section.
    pub order: i64,
    /// Members in post-sort order.
    pub geckos: Vec<&'a Gecko>,
}

/// Run the full pipeline.
///
/// Returns an empty list when nothing passes the filters; callers render
/// their empty state for that case.
#[must_use]
pub fn derive_catalog<'a>(
    geckos: &'a [Gecko],
    morphs: &[Morph],
    selection: &Selection,
) -> Vec<CatalogSection<'a>> {
    let mut filtered = filter_geckos(geckos, selection);
    sort_geckos(&mut filtered, selection.sort);
    group_by_morph(filtered, morphs, selection.language)
}

/// Step 1: keep records admitted by the selection, in collection order.
#[must_use]
pub fn filter_geckos<'a>(geckos: &'a [Gecko], selection: &Selection) -> Vec<&'a Gecko> {
    geckos.iter().filter(|g| selection.admits(g)).collect()
}

/// Step 2: stable sort by the chosen key.
///
/// Dates compare as strings, which orders correctly only for ISO
/// `YYYY-MM-DD` values.
pub fn sort_geckos(geckos: &mut [&Gecko], sort: SortOption) {
    match sort {
        SortOption::DateDesc => geckos.sort_by(|a, b| b.hatch_date.cmp(&a.hatch_date)),
        SortOption::DateAsc => geckos.sort_by(|a, b| a.hatch_date.cmp(&b.hatch_date)),
        SortOption::PriceDesc => geckos.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOption::PriceAsc => geckos.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOption::Unsorted => {}
    }
}

/// Steps 3 and 4: stable partition by morph id, then order the sections.
#[must_use]
pub fn group_by_morph<'a>(
    sorted: Vec<&'a Gecko>,
    morphs: &[Morph],
    language: Language,
) -> Vec<CatalogSection<'a>> {
    let mut sections: Vec<CatalogSection<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for gecko in sorted {
        let key = gecko
            .morph_id
            .as_ref()
            .map_or(UNKNOWN_GROUP_KEY, MorphId::as_str);

        if let Some(&at) = index.get(key)
            && let Some(section) = sections.get_mut(at)
        {
            section.geckos.push(gecko);
            continue;
        }

        // Label and order are fixed by the first record of the group.
        let morph = gecko.morph(morphs);
        index.insert(key, sections.len());
        sections.push(CatalogSection {
            label: gecko.morph_label(morphs, language).to_owned(),
            morph_id: gecko.morph_id.as_ref(),
            order: morph.map_or(MISSING_MORPH_ORDER, |m| m.order),
            geckos: vec![gecko],
        });
    }

    sections.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.label.cmp(&b.label)));
    sections
}
