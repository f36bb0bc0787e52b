//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., reais, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Format for display, e.g. `R$ 1.234,50` or `$1,234.50`.
    ///
    /// Amounts are rounded half away from zero to two decimal places and
    /// grouped by thousands using the currency's customary separators.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{:.2}", rounded.abs());
        let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let (group_sep, decimal_sep) = self.currency_code.separators();
        let grouped = group_thousands(whole, group_sep);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        format!(
            "{sign}{}{grouped}{decimal_sep}{cents}",
            self.currency_code.symbol_prefix()
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

fn group_thousands(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Serialize a decimal amount as a JSON number rather than a string.
///
/// The catalog backend stores prices as plain numbers. The amount goes
/// through `f64`, so it is exact only up to about 15 significant digits;
/// larger amounts are written as the nearest double.
///
/// # Errors
///
/// Returns the serializer's error if the amount cannot be represented.
pub fn serialize_amount_as_number<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use rust_decimal::prelude::ToPrimitive;

    amount
        .to_f64()
        .ok_or_else(|| serde::ser::Error::custom(format!("amount {amount} is out of range")))
        .and_then(|value| serializer.serialize_f64(value))
}

/// Error returned when a currency code is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// The three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BRL => "BRL",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Currency symbol (e.g., "R$").
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::CAD => "CA$",
            Self::AUD => "A$",
        }
    }

    const fn symbol_prefix(self) -> &'static str {
        match self {
            Self::BRL => "R$ ",
            Self::EUR => "€ ",
            _ => self.symbol(),
        }
    }

    /// `(thousands, decimal)` separators.
    const fn separators(self) -> (char, char) {
        match self {
            Self::BRL | Self::EUR => ('.', ','),
            _ => (',', '.'),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRL" => Ok(Self::BRL),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(amount: &str, currency: CurrencyCode) -> Price {
        Price::new(amount.parse().unwrap(), currency)
    }

    #[test]
    fn test_display_brl() {
        assert_eq!(price("89.9", CurrencyCode::BRL).display(), "R$ 89,90");
        assert_eq!(price("8500", CurrencyCode::BRL).display(), "R$ 8.500,00");
        assert_eq!(
            price("1234567.891", CurrencyCode::BRL).display(),
            "R$ 1.234.567,89"
        );
    }

    #[test]
    fn test_display_usd() {
        assert_eq!(price("19.99", CurrencyCode::USD).display(), "$19.99");
        assert_eq!(price("1000", CurrencyCode::USD).display(), "$1,000.00");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(price("0.005", CurrencyCode::USD).display(), "$0.01");
        assert_eq!(price("-2.345", CurrencyCode::USD).display(), "-$2.35");
    }

    #[test]
    fn test_display_zero() {
        assert_eq!(Price::zero(CurrencyCode::BRL).to_string(), "R$ 0,00");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("brl".parse::<CurrencyCode>().unwrap(), CurrencyCode::BRL);
        assert_eq!(" USD ".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!(matches!(
            "XYZ".parse::<CurrencyCode>(),
            Err(UnknownCurrency(code)) if code == "XYZ"
        ));
    }

    #[derive(Serialize)]
    struct Wire {
        #[serde(serialize_with = "serialize_amount_as_number")]
        amount: Decimal,
    }

    fn wire(amount: &str) -> serde_json::Value {
        serde_json::to_value(Wire {
            amount: amount.parse().unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn test_serialize_amount_as_number() {
        assert_eq!(wire("89.90")["amount"], serde_json::json!(89.9));
        assert_eq!(wire("1234567.89")["amount"], serde_json::json!(1_234_567.89));
        assert_eq!(wire("0")["amount"], serde_json::json!(0.0));
    }

    #[test]
    fn test_serialize_amount_beyond_f64_precision_is_rounded() {
        let amount = wire("12345678901234567.89")["amount"].as_f64().unwrap();
        // Neighbouring doubles are 2.0 apart at this magnitude.
        assert!((amount - 12_345_678_901_234_568.0).abs() <= 2.0);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1", ','), "1");
        assert_eq!(group_thousands("123", ','), "123");
        assert_eq!(group_thousands("1234", ','), "1,234");
        assert_eq!(group_thousands("123456", '.'), "123.456");
    }
}
