//! IHS domain errors

use core_kernel::TemporalError;
use thiserror::Error;

/// Errors that can occur while deriving the visa window
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IhsError {
    #[error("Date arithmetic failed: {0}")]
    Temporal(#[from] TemporalError),

    #[error("Unknown visa service tier: {0}")]
    UnknownServiceTier(String),
}
