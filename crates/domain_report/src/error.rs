//! Report errors

use domain_funds::FundsError;
use domain_ihs::IhsError;
use thiserror::Error;

/// Structural input errors that abort a report
///
/// Exchange-rate problems never appear here; they are reported per fund row.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error(transparent)]
    Funds(#[from] FundsError),

    #[error(transparent)]
    Ihs(#[from] IhsError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
