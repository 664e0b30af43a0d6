//! Reporting currency definitions.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` everywhere; this type carries the
//! display conventions (symbol, fraction digits) for a currency.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    #[default]
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Canadian Dollar
    Cad,
}

impl Currency {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Usd | Self::Cad => "$",
            Self::Eur => "\u{20ac}",
            Self::Gbp => "\u{a3}",
        }
    }

    /// Number of fraction digits in the smallest displayed unit.
    #[must_use]
    pub const fn decimal_places(self) -> u32 {
        match self {
            Self::Usd | Self::Eur | Self::Gbp | Self::Cad => 2,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
            Self::Gbp => write!(f, "GBP"),
            Self::Cad => write!(f, "CAD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "CAD" => Ok(Self::Cad),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(Currency::Usd, "$", "USD")]
    #[case(Currency::Eur, "€", "EUR")]
    #[case(Currency::Gbp, "£", "GBP")]
    #[case(Currency::Cad, "$", "CAD")]
    fn test_currency_symbol_and_display(
        #[case] currency: Currency,
        #[case] symbol: &str,
        #[case] code: &str,
    ) {
        assert_eq!(currency.symbol(), symbol);
        assert_eq!(currency.to_string(), code);
        assert_eq!(Currency::from_str(code).unwrap(), currency);
    }

    #[test]
    fn test_currency_from_str_case_insensitive() {
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("eur").unwrap(), Currency::Eur);
    }

    #[test]
    fn test_currency_from_str_unknown() {
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_currency_decimal_places() {
        assert_eq!(Currency::Usd.decimal_places(), 2);
    }
}
