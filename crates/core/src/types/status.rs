//! Enumerations for gecko records and catalog view state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a literal does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enumeration was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Sex of an animal.
///
/// Deserialization is lenient: anything other than `Male` or `Female`
/// becomes [`Gender::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    /// All genders in filter-bar order.
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Unknown];

    /// The stored literal.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" | "male" => Ok(Self::Male),
            "Female" | "female" => Ok(Self::Female),
            "Unknown" | "unknown" => Ok(Self::Unknown),
            _ => Err(ParseEnumError::new("gender", s)),
        }
    }
}

/// Sales status of an animal.
///
/// Partitions the catalog into the three display tabs; a record has exactly
/// one status at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Status {
    #[default]
    Available,
    Sold,
    Breeder,
}

impl Status {
    /// Tabs in header order.
    pub const TABS: [Self; 3] = [Self::Available, Self::Breeder, Self::Sold];

    /// The stored literal.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Sold => "Sold",
            Self::Breeder => "Breeder",
        }
    }

    /// The status a quick toggle moves to.
    ///
    /// Only `Available` and `Sold` flip into each other. Breeders have no
    /// toggle transition and yield `None`.
    #[must_use]
    pub const fn toggled(self) -> Option<Self> {
        match self {
            Self::Available => Some(Self::Sold),
            Self::Sold => Some(Self::Available),
            Self::Breeder => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" | "available" => Ok(Self::Available),
            "Sold" | "sold" => Ok(Self::Sold),
            "Breeder" | "breeder" => Ok(Self::Breeder),
            _ => Err(ParseEnumError::new("status", s)),
        }
    }
}

/// Ordering applied to the filtered catalog before grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    /// Newest hatch date first.
    #[default]
    DateDesc,
    /// Oldest hatch date first.
    DateAsc,
    /// Most expensive first.
    PriceDesc,
    /// Cheapest first.
    PriceAsc,
    /// Keep the collection order.
    Unsorted,
}

impl SortOption {
    /// Options offered in the sort dropdown.
    pub const CHOICES: [Self; 4] = [
        Self::DateDesc,
        Self::DateAsc,
        Self::PriceDesc,
        Self::PriceAsc,
    ];

    /// Parse a sort literal, treating anything unrecognized as
    /// [`SortOption::Unsorted`].
    #[must_use]
    pub fn from_literal(s: &str) -> Self {
        s.parse().unwrap_or(Self::Unsorted)
    }

    /// The literal used in URLs and stored preferences.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "dateDesc",
            Self::DateAsc => "dateAsc",
            Self::PriceDesc => "priceDesc",
            Self::PriceAsc => "priceAsc",
            Self::Unsorted => "unsorted",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dateDesc" | "date-desc" => Ok(Self::DateDesc),
            "dateAsc" | "date-asc" => Ok(Self::DateAsc),
            "priceDesc" | "price-desc" => Ok(Self::PriceDesc),
            "priceAsc" | "price-asc" => Ok(Self::PriceAsc),
            "unsorted" => Ok(Self::Unsorted),
            _ => Err(ParseEnumError::new("sort option", s)),
        }
    }
}

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl Language {
    /// The other language, for the header toggle.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ko => Self::En,
            Self::En => Self::Ko,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ko => "ko",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ko" => Ok(Self::Ko),
            "en" => Ok(Self::En),
            _ => Err(ParseEnumError::new("language", s)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_deserialize_is_lenient() {
        let g: Gender = serde_json::from_str("\"Male\"").expect("male");
        assert_eq!(g, Gender::Male);
        let g: Gender = serde_json::from_str("\"Hermaphrodite\"").expect("fallback");
        assert_eq!(g, Gender::Unknown);
    }

    #[test]
    fn test_gender_serializes_as_literal() {
        assert_eq!(
            serde_json::to_string(&Gender::Female).expect("serialize"),
            "\"Female\""
        );
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(Status::Available.toggled(), Some(Status::Sold));
        assert_eq!(Status::Sold.toggled(), Some(Status::Available));
        assert_eq!(Status::Breeder.toggled(), None);
    }

    #[test]
    fn test_sort_option_literals() {
        assert_eq!(SortOption::from_literal("dateAsc"), SortOption::DateAsc);
        assert_eq!(SortOption::from_literal("priceDesc"), SortOption::PriceDesc);
        assert_eq!(SortOption::from_literal("byColor"), SortOption::Unsorted);
        assert!("byColor".parse::<SortOption>().is_err());
        assert_eq!(
            serde_json::to_string(&SortOption::PriceAsc).expect("serialize"),
            "\"priceAsc\""
        );
    }

    #[test]
    fn test_language_toggle_and_parse() {
        assert_eq!(Language::Ko.toggled(), Language::En);
        assert_eq!(Language::En.toggled(), Language::Ko);
        assert_eq!("EN".parse::<Language>(), Ok(Language::En));
        let err = "fr".parse::<Language>().unwrap_err();
        assert_eq!(err.to_string(), "invalid language: fr");
    }
}
