//! Money helpers: currency codes and minor-unit conversion.
//!
//! Unit prices are carried as [`rust_decimal::Decimal`] in major units
//! (e.g. 49.99). Payment providers want integer amounts in the smallest
//! currency unit, so checkout assembly converts with [`to_minor_units`].

use core::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes accepted at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyCode {
    #[default]
    Usd,
    Eur,
    Gbp,
    Zar,
}

impl CurrencyCode {
    /// Lowercase ISO code as expected by the Stripe API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Eur => "eur",
            Self::Gbp => "gbp",
            Self::Zar => "zar",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "usd" => Ok(Self::Usd),
            "eur" => Ok(Self::Eur),
            "gbp" => Ok(Self::Gbp),
            "zar" => Ok(Self::Zar),
            other => Err(format!("unsupported currency code: {other}")),
        }
    }
}

/// Convert a major-unit amount to integer minor units (`round(amount * 100)`).
///
/// Midpoints round away from zero, so 0.125 becomes 13 minor units.
/// Returns `None` if the result does not fit in an `i64` (never the case
/// for plausible catalog prices).
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_cents() {
        assert_eq!(to_minor_units(Decimal::new(5000, 2)), Some(5000));
        assert_eq!(to_minor_units(Decimal::new(1, 2)), Some(1));
        assert_eq!(to_minor_units(Decimal::ZERO), Some(0));
    }

    #[test]
    fn sub_cent_amounts_round_half_away_from_zero() {
        // 0.125 -> 12.5 -> 13
        assert_eq!(to_minor_units(Decimal::new(125, 3)), Some(13));
        // 19.994 -> 1999.4 -> 1999
        assert_eq!(to_minor_units(Decimal::new(19994, 3)), Some(1999));
        // 19.995 -> 1999.5 -> 2000
        assert_eq!(to_minor_units(Decimal::new(19995, 3)), Some(2000));
    }

    #[test]
    fn currency_parse_is_case_insensitive() {
        assert_eq!("USD".parse::<CurrencyCode>(), Ok(CurrencyCode::Usd));
        assert_eq!("zar".parse::<CurrencyCode>(), Ok(CurrencyCode::Zar));
        assert!("doubloons".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn currency_display_is_lowercase() {
        assert_eq!(CurrencyCode::Gbp.to_string(), "gbp");
    }
}
