//! Catalog card.

use venus_gecko_core::{Gecko, Language, Morph, Status};

use crate::i18n::translations;

/// Shown when a record has no photos.
pub const PLACEHOLDER_PHOTO: &str = "https://picsum.photos/seed/placeholder/800/800";

/// Cover photo of `gecko`, or the placeholder.
#[must_use]
pub fn cover_or_placeholder(gecko: &Gecko) -> &str {
    gecko.cover_photo().unwrap_or(PLACEHOLDER_PHOTO)
}

/// One card in a catalog section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeckoCard<'a> {
    pub gecko: &'a Gecko,
    pub name: &'a str,
    pub cover: &'a str,
    pub morph: &'a str,
    pub gender: &'static str,
    /// Only available records show a price.
    pub price: Option<String>,
    /// Sold records get a "SOLD" overlay.
    pub sold: bool,
    /// Edit and status toggle buttons.
    pub admin_actions: bool,
    pub view_details: &'static str,
}

impl<'a> GeckoCard<'a> {
    #[must_use]
    pub fn new(gecko: &'a Gecko, morphs: &'a [Morph], language: Language, is_admin: bool) -> Self {
        let t = translations(language);
        Self {
            gecko,
            name: &gecko.name,
            cover: cover_or_placeholder(gecko),
            morph: gecko.morph_label(morphs, language),
            gender: t.gender(gecko.gender),
            price: (gecko.status == Status::Available).then(|| gecko.price.display(language)),
            sold: gecko.status == Status::Sold,
            admin_actions: is_admin,
            view_details: t.view_details,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn gecko(value: serde_json::Value) -> Gecko {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_available_card_shows_price() {
        let g = gecko(json!({"id": "a", "name": "Luna", "price": 1_250_000, "status": "Available"}));
        let card = GeckoCard::new(&g, &[], Language::Ko, false);
        assert_eq!(card.price.as_deref(), Some("₩1,250,000"));
        assert_eq!(card.cover, PLACEHOLDER_PHOTO);
        assert_eq!(card.gender, "미구분");
        assert_eq!(card.morph, "Unknown");
        assert!(!card.admin_actions);
    }

    #[test]
    fn test_sold_card_hides_price() {
        let g = gecko(json!({
            "id": "a",
            "price": 1300,
            "status": "Sold",
            "gender": "Male",
            "photos": ["https://cdn/a.jpg"],
        }));
        let card = GeckoCard::new(&g, &[], Language::En, true);
        assert_eq!(card.price, None);
        assert!(card.sold);
        assert_eq!(card.cover, "https://cdn/a.jpg");
        assert_eq!(card.gender, "Male");
        assert!(card.admin_actions);
    }
}
