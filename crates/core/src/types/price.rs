//! Asking price of an animal.
//!
//! Prices are stored as whole won. The English storefront shows a rough
//! dollar figure converted at a fixed rate; nothing here does currency
//! arithmetic beyond that display conversion.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::Language;

/// Fixed KRW per USD rate used for the English display price.
pub const KRW_PER_USD: u64 = 1300;

/// A non-negative, currency-agnostic integer price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// The raw amount.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Format for display in the given language.
    ///
    /// Korean shows won with thousands separators (`₩1,250,000`); English
    /// shows the amount divided by [`KRW_PER_USD`], rounded half up (`$962`).
    #[must_use]
    pub fn display(self, language: Language) -> String {
        match language {
            Language::Ko => format!("₩{}", group_thousands(self.0)),
            Language::En => {
                let dollars =
                    self.0 / KRW_PER_USD + u64::from(self.0 % KRW_PER_USD >= KRW_PER_USD / 2);
                format!("${dollars}")
            }
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

/// Stored prices may arrive as integers or floats; negatives clamp to zero
/// and fractions round to the nearest unit.
impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Number::deserialize(deserializer)?;
        if let Some(amount) = value.as_u64() {
            return Ok(Self(amount));
        }
        if value.as_i64().is_some() {
            return Ok(Self(0));
        }
        let float = value.as_f64().unwrap_or_default();
        if float.is_finite() && float > 0.0 {
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss
            )] // clamped to a positive finite value above
            return Ok(Self(float.round() as u64));
        }
        Ok(Self(0))
    }
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
