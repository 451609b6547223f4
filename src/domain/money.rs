use crate::utils::error::{MollieError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places Mollie expects on every amount.
pub const AMOUNT_SCALE: u32 = 2;

static CURRENCY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid currency regex"));

/// Three-letter ISO-4217 currency code, always upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub fn parse(code: &str) -> Result<Self> {
        let normalized = code.trim().to_ascii_uppercase();
        if !CURRENCY_PATTERN.is_match(&normalized) {
            return Err(MollieError::InvalidCurrency {
                value: code.to_string(),
            });
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Currency {
    type Err = MollieError;

    fn from_str(s: &str) -> Result<Self> {
        Currency::parse(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = MollieError;

    fn try_from(value: String) -> Result<Self> {
        Currency::parse(&value)
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An amount in a given currency.
///
/// The amount keeps whatever precision it was created with; rounding to
/// [`AMOUNT_SCALE`] happens only when the value is rendered for the wire,
/// half-up (midpoint away from zero), so `49.985` becomes `"49.99"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Parses a plain decimal string such as `"49.98"` or `"-10"`.
    pub fn parse(amount: &str, currency: Currency) -> Result<Self> {
        let parsed = Decimal::from_str(amount.trim()).map_err(|e| MollieError::InvalidAmount {
            value: amount.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(parsed, currency))
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// The wire value: exactly two decimals, as a string.
    pub fn value(&self) -> String {
        format_amount(self.amount)
    }

    pub fn times(&self, quantity: u32) -> Result<Self> {
        let amount = self
            .amount
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| MollieError::InvalidAmount {
                value: self.amount.to_string(),
                reason: format!("overflows when multiplied by {}", quantity),
            })?;
        Ok(Self::new(amount, self.currency.clone()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value(), self.currency)
    }
}

pub fn round_amount(amount: Decimal) -> Decimal {
    let rounded =
        amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = round_amount(amount);
    rounded.rescale(AMOUNT_SCALE);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd() -> Currency {
        Currency::parse("USD").unwrap()
    }

    #[test]
    fn test_currency_is_normalized() {
        assert_eq!(Currency::parse("eur").unwrap().as_str(), "EUR");
        assert!(Currency::parse("EURO").is_err());
        assert!(Currency::parse("").is_err());
        assert!(Currency::parse("E1R").is_err());
    }

    #[test]
    fn test_value_always_has_two_decimals() {
        assert_eq!(Money::new(dec!(49.98), usd()).value(), "49.98");
        assert_eq!(Money::new(dec!(49.9), usd()).value(), "49.90");
        assert_eq!(Money::new(dec!(50), usd()).value(), "50.00");
        assert_eq!(Money::new(dec!(0), usd()).value(), "0.00");
    }

    #[test]
    fn test_half_up_rounding() {
        assert_eq!(Money::new(dec!(49.984), usd()).value(), "49.98");
        assert_eq!(Money::new(dec!(49.985), usd()).value(), "49.99");
        assert_eq!(Money::new(dec!(0.125), usd()).value(), "0.13");
        assert_eq!(Money::new(dec!(-10.005), usd()).value(), "-10.01");
    }

    #[test]
    fn test_rounding_to_zero_drops_sign() {
        assert_eq!(Money::new(dec!(-0.001), usd()).value(), "0.00");
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(Money::parse(" 12.5 ", usd()).unwrap().value(), "12.50");
        let err = Money::parse("12,50 EUR", usd()).unwrap_err();
        assert!(matches!(err, MollieError::InvalidAmount { .. }));
    }

    #[test]
    fn test_times_and_sign() {
        let unit = Money::new(dec!(-10.00), usd());
        assert!(unit.is_negative());
        assert_eq!(unit.times(3).unwrap().value(), "-30.00");
        assert!(!Money::zero(usd()).is_negative());
    }

    #[test]
    fn test_times_overflow_is_invalid_amount() {
        let huge = Money::new(Decimal::MAX, usd());
        let err = huge.times(2).unwrap_err();
        assert!(matches!(err, MollieError::InvalidAmount { .. }));
    }

    #[test]
    fn test_serde_roundtrip_keeps_currency_validation() {
        let money: Money =
            serde_json::from_value(serde_json::json!({"amount": "49.98", "currency": "usd"}))
                .unwrap();
        assert_eq!(money.currency().as_str(), "USD");

        let bad = serde_json::from_value::<Money>(
            serde_json::json!({"amount": "1.00", "currency": "dollars"}),
        );
        assert!(bad.is_err());
    }
}
