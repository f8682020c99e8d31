//! Funds Domain
//!
//! This crate answers the two money questions of a student visa application:
//! how much the applicant must show, and how much of what they submitted
//! actually counts.
//!
//! # Key Concepts
//!
//! - **Route**: a visa route with capped maintenance months and regional rates
//! - **Funds required**: unpaid tuition + maintenance (student and dependants) + buffer
//! - **Fund row**: one piece of evidence (bank statement, fixed deposit, loan letter)
//! - **Eligible funds**: rows that pass the holding-period and freshness rules
//!
//! # Rounding
//!
//! Reported GBP figures are rounded half away from zero to 2 decimal places
//! and exchange rates to 6. Totals are summed before rounding.

pub mod route;
pub mod rules;
pub mod required;
pub mod fund_row;
pub mod fx;
pub mod available;
pub mod error;

pub use route::{Region, RegionalRates, EligibilityRoute, RouteTable};
pub use rules::FundRules;
pub use required::{FundsRequest, FundsRequiredResult, calculate_funds_required, effective_dependants};
pub use fund_row::{FundEvidence, FundRow, FundRowResult, FundIssue};
pub use fx::{
    RateProvider, RateCache, RateKey, InMemoryRateCache, ManualFxOverrides, FxConverter,
    FxQuote, RateSource, DEFAULT_FX_TIMEOUT,
};
pub use available::{FundsAvailableValidator, FundsAvailableResult, FundsAvailableSummary, check_evidence};
pub use error::{FundsError, FxError};
