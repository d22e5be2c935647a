//! Filter bar options.

use venus_gecko_core::{
    CatalogSection, Gecko, Gender, Language, Morph, Selection, SortOption, Status,
};

use crate::i18n::translations;

/// Literal value of the "All" entry of every filter.
pub const ALL_VALUE: &str = "All";

/// One entry of a filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    /// `"All"` or the id/literal to filter by.
    pub value: String,
    pub label: String,
}

impl FilterOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Contents of every control in the filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBar {
    /// Status tabs with their labels.
    pub tabs: Vec<(Status, &'static str)>,
    pub morphs: Vec<FilterOption>,
    pub sires: Vec<FilterOption>,
    pub dams: Vec<FilterOption>,
    pub genders: Vec<FilterOption>,
    pub sorts: Vec<(SortOption, &'static str)>,
    /// Section labels of the current catalog, in order.
    pub quick_jump: Vec<String>,
}

impl FilterBar {
    #[must_use]
    pub fn new(
        geckos: &[Gecko],
        morphs: &[Morph],
        selection: &Selection,
        sections: &[CatalogSection<'_>],
    ) -> Self {
        let language = selection.language;
        let t = translations(language);
        let all = || FilterOption::new(ALL_VALUE, t.all);

        let mut sorted_morphs: Vec<&Morph> = morphs.iter().collect();
        sorted_morphs.sort_by(|a, b| a.ko.cmp(&b.ko));
        let morph_options: Vec<FilterOption> = std::iter::once(all())
            .chain(
                sorted_morphs
                    .into_iter()
                    .map(|m| FilterOption::new(m.id.as_str(), m.name(language))),
            )
            .collect();

        let parents = |pick: fn(&Gecko) -> bool| {
            std::iter::once(all())
                .chain(
                    geckos
                        .iter()
                        .filter(|g| pick(g))
                        .map(|g| FilterOption::new(g.id.as_str(), g.name.as_str())),
                )
                .collect::<Vec<_>>()
        };

        Self {
            tabs: Status::TABS.iter().map(|&s| (s, t.tab(s))).collect(),
            morphs: morph_options,
            sires: parents(Gecko::is_sire_candidate),
            dams: parents(Gecko::is_dam_candidate),
            genders: std::iter::once(all())
                .chain(
                    Gender::ALL
                        .iter()
                        .map(|&g| FilterOption::new(g.as_str(), gender_filter_label(g, language))),
                )
                .collect(),
            sorts: SortOption::CHOICES.iter().map(|&s| (s, t.sort(s))).collect(),
            quick_jump: sections.iter().map(|s| s.label.clone()).collect(),
        }
    }
}

/// The gender filter says "unknown" rather than "unsexed".
fn gender_filter_label(gender: Gender, language: Language) -> &'static str {
    let t = translations(language);
    match gender {
        Gender::Unknown => t.unknown,
        other => t.gender(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;
    use venus_gecko_core::derive_catalog;

    use super::*;

    #[test]
    fn test_options() {
        let geckos: Vec<Gecko> = serde_json::from_value(json!([
            {"id": "s", "name": "Sire", "gender": "Male", "status": "Breeder"},
            {"id": "d", "name": "Dam", "gender": "Female", "status": "Breeder"},
            {"id": "k", "name": "Kid", "gender": "Male", "status": "Available", "morphId": "m2"},
        ]))
        .unwrap();
        let morphs: Vec<Morph> = serde_json::from_value(json!([
            {"id": "m1", "ko": "하", "en": "Ha", "order": 1},
            {"id": "m2", "ko": "가", "en": "Ga", "order": 2},
        ]))
        .unwrap();
        let selection = Selection {
            language: Language::En,
            ..Selection::default()
        };
        let sections = derive_catalog(&geckos, &morphs, &selection);
        let bar = FilterBar::new(&geckos, &morphs, &selection, &sections);

        let morph_values: Vec<&str> = bar.morphs.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(morph_values, vec!["All", "m2", "m1"]);
        assert_eq!(bar.morphs[1].label, "Ga");
        assert_eq!(bar.sires.len(), 2);
        assert_eq!(bar.sires[1].value, "s");
        assert_eq!(bar.dams[1].label, "Dam");
        assert_eq!(bar.genders.len(), 4);
        assert_eq!(bar.genders[3].label, "Unknown");
        assert_eq!(bar.tabs[0], (Status::Available, "For Sale"));
        assert_eq!(bar.quick_jump, vec!["Ga"]);
    }
}
