//! Catalog records: geckos, morph definitions and site settings.
//!
//! Records are decoded from loosely-typed documents written by several
//! generations of the admin form, so deserialization tolerates missing
//! fields and treats empty reference strings as absent.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Gender, GeckoId, Language, MorphId, Price, Status};
use super::reference::{Record, resolve};

/// Label used when neither a morph definition nor a stored fallback name
/// is available.
pub const UNKNOWN_MORPH: &str = "Unknown";

/// A single animal listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gecko {
    pub id: GeckoId,
    #[serde(default)]
    pub name: String,
    /// Weak reference to a [`Morph`]; may dangle after a morph is deleted.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub morph_id: Option<MorphId>,
    /// Morph name stored with older records, shown when `morph_id` does not
    /// resolve.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub morph_name: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    /// ISO `YYYY-MM-DD`; compared as a string.
    #[serde(default)]
    pub hatch_date: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub description: String,
    /// Photo URLs; index 0 is the cover.
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub sire_id: Option<GeckoId>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub dam_id: Option<GeckoId>,
}

impl Gecko {
    /// The primary photo, if any.
    #[must_use]
    pub fn cover_photo(&self) -> Option<&str> {
        self.photos.first().map(String::as_str)
    }

    /// Resolve the morph definition this record points at.
    #[must_use]
    pub fn morph<'a>(&self, morphs: &'a [Morph]) -> Option<&'a Morph> {
        self.morph_id.as_ref().and_then(|id| resolve(id, morphs))
    }

    /// Effective morph display name.
    ///
    /// The resolved morph's localized name, else the stored fallback name,
    /// else [`UNKNOWN_MORPH`].
    #[must_use]
    pub fn morph_label<'a>(&'a self, morphs: &'a [Morph], language: Language) -> &'a str {
        self.morph(morphs).map_or_else(
            || self.fallback_morph_name(),
            |morph| morph.name(language),
        )
    }

    /// The stored morph name, or [`UNKNOWN_MORPH`].
    #[must_use]
    pub fn fallback_morph_name(&self) -> &str {
        self.morph_name.as_deref().unwrap_or(UNKNOWN_MORPH)
    }

    /// Look up the sire among `all`. `None` when unset or dangling.
    #[must_use]
    pub fn sire<'a>(&self, all: &'a [Self]) -> Option<&'a Self> {
        self.sire_id.as_ref().and_then(|id| resolve(id, all))
    }

    /// Look up the dam among `all`. `None` when unset or dangling.
    #[must_use]
    pub fn dam<'a>(&self, all: &'a [Self]) -> Option<&'a Self> {
        self.dam_id.as_ref().and_then(|id| resolve(id, all))
    }

    /// Whether this record can be offered as a sire in pickers and filters.
    #[must_use]
    pub fn is_sire_candidate(&self) -> bool {
        self.status == Status::Breeder && self.gender == Gender::Male
    }

    /// Whether this record can be offered as a dam in pickers and filters.
    #[must_use]
    pub fn is_dam_candidate(&self) -> bool {
        self.status == Status::Breeder && self.gender == Gender::Female
    }
}

impl Record for Gecko {
    type Id = GeckoId;
    const COLLECTION: &'static str = "geckos";

    fn id(&self) -> &GeckoId {
        &self.id
    }
}

/// A morph (color/pattern variety) definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morph {
    pub id: MorphId,
    #[serde(default)]
    pub ko: String,
    #[serde(default)]
    pub en: String,
    /// Section order; lower sorts first.
    #[serde(default, deserialize_with = "lenient_order")]
    pub order: i64,
}

impl Morph {
    /// The name in the given language.
    #[must_use]
    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::Ko => &self.ko,
            Language::En => &self.en,
        }
    }
}

impl Record for Morph {
    type Id = MorphId;
    const COLLECTION: &'static str = "morphs";

    fn id(&self) -> &MorphId {
        &self.id
    }
}

/// Singleton site settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    /// Override for the landing page hero image.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub landing_image_url: Option<String>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()).map(T::from))
}

/// Orders typed into the morph manager may be stored as floats; they round
/// to the nearest integer and saturate at the `i64` bounds. Null decodes as 0.
fn lenient_order<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(0);
    };
    if let Some(order) = value.as_i64() {
        return Ok(order);
    }
    if value.as_u64().is_some() {
        return Ok(i64::MAX);
    }
    let float = value.as_f64().unwrap_or_default();
    #[allow(clippy::cast_possible_truncation)] // float-to-int casts saturate; NaN becomes 0
    Ok(float.round() as i64)
}

#[allow(clippy::ref_option)] // serde's serialize_with hands us &Option<T>
fn none_as_empty<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: AsRef<str>,
{
    serializer.serialize_str(value.as_ref().map_or("", AsRef::as_ref))
}
