//! Request/response bodies
//!
//! Form submissions are loose: numbers may arrive as strings, dates may be
//! blank. The deserializers here treat anything unusable as absent rather
//! than rejecting the whole request.

pub mod report;
pub mod fx;

use chrono::NaiveDate;
use core_kernel::parse_date_lenient;
use domain_funds::effective_dependants;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// A number or numeric string; zero otherwise
pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_decimal(deserializer)?.unwrap_or_default())
}

/// A number or numeric string; `None` otherwise
pub(crate) fn lenient_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

/// An ISO date string; `None` when blank, malformed or not a string
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_date_lenient(&s),
        _ => None,
    })
}

pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()
        }
        Value::String(s) => {
            let trimmed = s.trim();
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .ok()
        }
        _ => None,
    }
}

/// Whole, non-negative count from a possibly fractional number
pub(crate) fn whole_count(value: Decimal) -> u32 {
    effective_dependants(value)
}
