//! Funds domain errors

use core_kernel::{Currency, MoneyError, PortError};
use thiserror::Error;

/// Errors that abort a funds-required calculation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FundsError {
    #[error("Unknown route: {0}")]
    UnknownRoute(String),

    #[error("Course start and course end dates are required")]
    MissingCourseDates,

    #[error("Course end {end} is before course start {start}")]
    InvalidCoursePeriod { start: String, end: String },

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

/// Errors from currency conversion
///
/// These never abort a report; the affected fund row is marked ineligible.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("No rate available for {from}->{to}: {reason}")]
    Unavailable {
        from: Currency,
        to: Currency,
        reason: String,
    },

    #[error("Rate lookup for {from}->{to} failed: {source}")]
    Port {
        from: Currency,
        to: Currency,
        #[source]
        source: PortError,
    },
}

impl FxError {
    pub fn unavailable(from: Currency, to: Currency, reason: impl Into<String>) -> Self {
        FxError::Unavailable {
            from,
            to,
            reason: reason.into(),
        }
    }

    /// The non-base currency that could not be converted
    pub fn currency(&self) -> Currency {
        match self {
            FxError::Unavailable { from, .. } | FxError::Port { from, .. } => *from,
        }
    }
}
