//! Submitted fund evidence and per-row outcomes

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Evidence type with the dates each type is judged on
///
/// Dates are optional because they come from free-form input; a missing date
/// makes the row ineligible rather than rejecting the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fundType", rename_all = "lowercase")]
pub enum FundEvidence {
    /// Bank statement covering a holding period
    #[serde(rename_all = "camelCase")]
    Bank {
        statement_start: Option<NaiveDate>,
        statement_end: Option<NaiveDate>,
    },
    /// Fixed deposit
    #[serde(rename_all = "camelCase")]
    Fd { maturity_date: Option<NaiveDate> },
    /// Education loan sanction letter
    #[serde(rename_all = "camelCase")]
    Loan { disbursement_date: Option<NaiveDate> },
}

impl FundEvidence {
    pub fn bank(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        FundEvidence::Bank {
            statement_start: start,
            statement_end: end,
        }
    }

    /// True when a date this evidence type depends on is absent
    pub fn is_missing_dates(&self) -> bool {
        match self {
            FundEvidence::Bank {
                statement_start,
                statement_end,
            } => statement_start.is_none() || statement_end.is_none(),
            FundEvidence::Fd { maturity_date } => maturity_date.is_none(),
            FundEvidence::Loan { disbursement_date } => disbursement_date.is_none(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FundEvidence::Bank { .. } => "bank",
            FundEvidence::Fd { .. } => "fd",
            FundEvidence::Loan { .. } => "loan",
        }
    }
}

/// One line of submitted funds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundRow {
    #[serde(flatten)]
    pub evidence: FundEvidence,
    /// Whose account, e.g. "Student", "Father"
    pub account_type: String,
    /// Bank or lender name
    pub source: String,
    /// Amount in the row's own currency
    #[serde(flatten)]
    pub amount: Money,
}

impl FundRow {
    pub fn new(evidence: FundEvidence, currency: Currency, amount: Decimal) -> Self {
        Self {
            evidence,
            account_type: "Student".to_string(),
            source: String::new(),
            amount: Money::new(amount, currency),
        }
    }

    pub fn currency(&self) -> Currency {
        self.amount.currency()
    }

    pub fn with_account_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = account_type.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// A reason a row fails (or may fail) the evidence rules
///
/// Serialised as the human-readable message shown to counsellors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundIssue {
    FxUnavailable { currency: Currency },
    /// The converted amount does not fit the totals
    AmountOutOfRange,
    MissingStatementDates,
    StatementPeriodTooShort { days: i64, required: i64 },
    StatementEndAfterApplication,
    StatementTooOld { age_days: i64, max_days: i64 },
    /// Advisory only: freshness could not be checked
    NoApplicationDate { freshness_days: i64 },
    MissingMaturityDate,
    MissingDisbursementDate,
    LoanLetterAfterApplication,
    LoanLetterTooOld { age_days: i64, max_days: i64 },
}

impl FundIssue {
    /// Advisory issues are reported but do not make a row ineligible
    pub fn is_advisory(&self) -> bool {
        matches!(self, FundIssue::NoApplicationDate { .. })
    }
}

impl fmt::Display for FundIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FundIssue::FxUnavailable { currency } => write!(f, "FX unavailable for {currency}"),
            FundIssue::AmountOutOfRange => write!(f, "Amount is too large to convert"),
            FundIssue::MissingStatementDates => write!(f, "Missing/invalid statement dates"),
            FundIssue::StatementPeriodTooShort { days, required } => {
                write!(f, "Statement period is {days} days (< {required})")
            }
            FundIssue::StatementEndAfterApplication => {
                write!(f, "Statement end is after application date")
            }
            FundIssue::StatementTooOld { age_days, max_days } => write!(
                f,
                "Statement end is {age_days} days before application (> {max_days})"
            ),
            FundIssue::NoApplicationDate { freshness_days } => write!(
                f,
                "No application date ({freshness_days}-day freshness not checked)"
            ),
            FundIssue::MissingMaturityDate => write!(f, "Missing/invalid FD maturity date"),
            FundIssue::MissingDisbursementDate => {
                write!(f, "Missing/invalid loan disbursement date")
            }
            FundIssue::LoanLetterAfterApplication => {
                write!(f, "Loan letter is dated after application date")
            }
            FundIssue::LoanLetterTooOld { age_days, max_days } => {
                write!(f, "Loan letter is {age_days} days old (> {max_days})")
            }
        }
    }
}

impl Serialize for FundIssue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Outcome for one submitted row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundRowResult {
    #[serde(flatten)]
    pub row: FundRow,
    /// Rate to GBP, 6 dp; 0 when no rate was available
    pub fx_to_gbp: Decimal,
    pub amount_gbp: Decimal,
    pub eligible: bool,
    pub issues: Vec<FundIssue>,
}

impl FundRowResult {
    pub fn is_missing_dates(&self) -> bool {
        self.row.evidence.is_missing_dates()
    }
}
