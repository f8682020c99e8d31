//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors.
//! Reported figures are rounded half away from zero, so 0.005 becomes 0.01.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decimal places used for reported money figures
pub const MONEY_DP: u32 = 2;

/// Decimal places used for reported exchange rates
pub const RATE_DP: u32 = 6;

/// Rounds a money figure to 2 decimal places, half away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an exchange rate to 6 decimal places, half away from zero
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RATE_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Sums `values`, failing instead of overflowing past [`Decimal::MAX`]
pub fn checked_sum<I>(values: I) -> Result<Decimal, MoneyError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v).ok_or(MoneyError::Overflow))
}

/// An ISO 4217 currency code
///
/// Fund rows arrive with whatever currency the applicant banks in, so the
/// code is stored as three uppercase ASCII letters rather than a closed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Currency([u8; 3]);

impl Currency {
    pub const GBP: Currency = Currency(*b"GBP");
    pub const USD: Currency = Currency(*b"USD");
    pub const EUR: Currency = Currency(*b"EUR");
    pub const INR: Currency = Currency(*b"INR");
    pub const JPY: Currency = Currency(*b"JPY");
    pub const NGN: Currency = Currency(*b"NGN");
    pub const PKR: Currency = Currency(*b"PKR");
    pub const CNY: Currency = Currency(*b"CNY");

    /// Parses a currency code, trimming whitespace and uppercasing
    pub fn from_code(code: &str) -> Result<Self, MoneyError> {
        let trimmed = code.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(MoneyError::InvalidCurrency(trimmed.to_string()));
        }
        Ok(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("???")
    }

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match &self.0 {
            b"JPY" | b"KRW" | b"VND" => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol, falling back to the code
    pub fn symbol(&self) -> &str {
        match &self.0 {
            b"GBP" => "£",
            b"USD" => "$",
            b"EUR" => "€",
            b"INR" => "₹",
            b"JPY" | b"CNY" => "¥",
            b"NGN" => "₦",
            b"PKR" => "Rs",
            _ => self.code(),
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::GBP
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Currency::from_code(&s).map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Amount out of range")]
    Overflow,
}

/// A monetary amount with associated currency
///
/// Amounts keep full precision through conversion; use
/// [`Money::round_to_currency`] or [`round_money`] for reported figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a GBP amount
    pub fn gbp(amount: Decimal) -> Self {
        Self::new(amount, Currency::GBP)
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Rounds to the currency's standard decimal places, half away from zero
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp_with_strategy(
                self.currency.decimal_places(),
                RoundingStrategy::MidpointAwayFromZero,
            ),
            currency: self.currency,
        }
    }

    /// Converts into another currency at `rate` units of `to` per unit of `self`
    pub fn convert(&self, rate: Decimal, to: Currency) -> Result<Self, MoneyError> {
        let amount = self.amount.checked_mul(rate).ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, to))
    }

    /// Converts back from `to` using the same rate that produced this value
    pub fn convert_back(&self, rate: Decimal, to: Currency) -> Result<Self, MoneyError> {
        if rate.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        let amount = self.amount.checked_div(rate).ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, to))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn conversion_round_trip_within_a_penny(
            minor in 1i64..10_000_000_000i64,
            rate_micro in 10_000i64..500_000_000i64,
        ) {
            let original = Money::new(Decimal::new(minor, 2), Currency::USD);
            let rate = Decimal::new(rate_micro, 6);

            let there = original.convert(rate, Currency::GBP).unwrap();
            let back = there.convert_back(rate, Currency::USD).unwrap();

            let diff = (round_money(back.amount()) - round_money(original.amount())).abs();
            prop_assert!(diff <= Decimal::new(1, 2));
        }
    }
}
