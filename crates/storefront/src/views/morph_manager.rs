//! Morph manager listing.

use venus_gecko_core::Morph;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphManagerView<'a> {
    /// Sorted by order, then Korean name.
    pub morphs: Vec<&'a Morph>,
    /// Pre-filled order for the next morph.
    pub suggested_order: i64,
}

impl<'a> MorphManagerView<'a> {
    #[must_use]
    pub fn new(morphs: &'a [Morph]) -> Self {
        let mut sorted: Vec<&Morph> = morphs.iter().collect();
        sorted.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.ko.cmp(&b.ko)));
        Self {
            suggested_order: i64::try_from(morphs.len()).map_or(i64::MAX, |n| n.saturating_add(1)),
            morphs: sorted,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sorted_listing() {
        let morphs: Vec<Morph> = serde_json::from_value(json!([
            {"id": "z", "ko": "제드", "en": "Zed", "order": 5},
            {"id": "b", "ko": "베타", "en": "Beta", "order": 1},
            {"id": "a", "ko": "가", "en": "Alpha", "order": 1},
        ]))
        .unwrap();
        let view = MorphManagerView::new(&morphs);
        let ids: Vec<&str> = view.morphs.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "z"]);
        assert_eq!(view.suggested_order, 4);
    }

    #[test]
    fn test_empty_suggests_one() {
        assert_eq!(MorphManagerView::new(&[]).suggested_order, 1);
    }
}
