//! Available-funds validation
//!
//! Each submitted row is converted to GBP and checked against the evidence
//! rules for its type. Rows that fail are still reported and still count
//! towards the all-rows total; only eligible rows count towards the total
//! used for the gap.

use chrono::NaiveDate;
use core_kernel::{round_money, round_rate, Money};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::fund_row::{FundEvidence, FundIssue, FundRow, FundRowResult};
use crate::fx::FxConverter;
use crate::rules::FundRules;

/// Totals and flags over the validated rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundsAvailableSummary {
    pub total_all_gbp: Decimal,
    pub total_eligible_gbp: Decimal,
    pub funds_hold_days: i64,
    pub statement_age_days: i64,
    pub loan_letter_max_age_days: i64,
    pub has_application_date: bool,
    pub any_row_missing_dates: bool,
    pub any_ineligible_rows: bool,
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundsAvailableResult {
    pub summary: FundsAvailableSummary,
    pub rows: Vec<FundRowResult>,
}

impl FundsAvailableResult {
    /// The result when the applicant has not arranged funds yet
    pub fn skipped(rules: &FundRules, application_date: Option<NaiveDate>) -> Self {
        Self {
            summary: FundsAvailableSummary {
                total_all_gbp: Decimal::ZERO,
                total_eligible_gbp: Decimal::ZERO,
                funds_hold_days: rules.funds_hold_days,
                statement_age_days: rules.statement_age_days,
                loan_letter_max_age_days: rules.loan_letter_max_age_days,
                has_application_date: application_date.is_some(),
                any_row_missing_dates: false,
                any_ineligible_rows: false,
                skipped: true,
            },
            rows: Vec::new(),
        }
    }
}

/// Checks submitted funds against [`FundRules`], converting through an [`FxConverter`]
pub struct FundsAvailableValidator<'a> {
    rules: &'a FundRules,
    fx: &'a FxConverter,
}

impl<'a> FundsAvailableValidator<'a> {
    pub fn new(rules: &'a FundRules, fx: &'a FxConverter) -> Self {
        Self { rules, fx }
    }

    /// Validates `rows`; with `skip` set the rows are ignored entirely
    ///
    /// Never fails: an unavailable rate zeroes and disqualifies that row only.
    #[instrument(skip_all, fields(rows = rows.len(), skip = skip))]
    pub async fn validate(
        &self,
        rows: &[FundRow],
        application_date: Option<NaiveDate>,
        skip: bool,
    ) -> FundsAvailableResult {
        if skip {
            debug!("Funds section skipped by caller");
            return FundsAvailableResult::skipped(self.rules, application_date);
        }

        let counted: Vec<&FundRow> = rows
            .iter()
            .filter(|r| r.amount.amount() > Decimal::ZERO)
            .collect();
        let base = self.fx.base();
        let rates = self
            .fx
            .rates_to(counted.iter().map(|r| r.currency()), base)
            .await;

        let mut total_all = Decimal::ZERO;
        let mut total_eligible = Decimal::ZERO;
        let mut results = Vec::with_capacity(counted.len());

        for row in counted {
            let mut issues = Vec::new();
            let (rate, converted) = match rates.get(&row.currency()) {
                Some(Ok(quote)) => (quote.rate, row.amount.convert(quote.rate, base).ok()),
                _ => {
                    issues.push(FundIssue::FxUnavailable { currency: row.currency() });
                    (Decimal::ZERO, Some(Money::new(Decimal::ZERO, base)))
                }
            };
            issues.extend(check_evidence(&row.evidence, application_date, self.rules));

            // A row whose GBP figure cannot be represented counts as zero
            let mut amount_gbp = Decimal::ZERO;
            match converted.and_then(|m| total_all.checked_add(m.amount()).map(|t| (m, t))) {
                Some((money, total)) => {
                    amount_gbp = money.amount();
                    total_all = total;
                }
                None => issues.push(FundIssue::AmountOutOfRange),
            }

            let eligible = issues.iter().all(FundIssue::is_advisory);
            if eligible {
                // Eligible amounts are a subset of `total_all`, which fit
                total_eligible = total_eligible.saturating_add(amount_gbp);
            }

            debug!(
                fund_type = row.evidence.kind(),
                currency = %row.currency(),
                eligible,
                issues = issues.len(),
                "Validated fund row"
            );

            results.push(FundRowResult {
                row: row.clone(),
                fx_to_gbp: round_rate(rate),
                amount_gbp: round_money(amount_gbp),
                eligible,
                issues,
            });
        }

        let summary = FundsAvailableSummary {
            total_all_gbp: round_money(total_all),
            total_eligible_gbp: round_money(total_eligible),
            funds_hold_days: self.rules.funds_hold_days,
            statement_age_days: self.rules.statement_age_days,
            loan_letter_max_age_days: self.rules.loan_letter_max_age_days,
            has_application_date: application_date.is_some(),
            any_row_missing_dates: results.iter().any(FundRowResult::is_missing_dates),
            any_ineligible_rows: results.iter().any(|r| !r.eligible),
            skipped: false,
        };

        info!(
            rows = results.len(),
            total_all = %summary.total_all_gbp,
            total_eligible = %summary.total_eligible_gbp,
            "Validated available funds"
        );

        FundsAvailableResult {
            summary,
            rows: results,
        }
    }
}

/// Evidence-rule issues for one row, excluding conversion
pub fn check_evidence(
    evidence: &FundEvidence,
    application_date: Option<NaiveDate>,
    rules: &FundRules,
) -> Vec<FundIssue> {
    let mut issues = Vec::new();
    let no_application_date = FundIssue::NoApplicationDate {
        freshness_days: rules.statement_age_days,
    };

    match evidence {
        FundEvidence::Bank {
            statement_start,
            statement_end,
        } => {
            match (statement_start, statement_end) {
                (Some(start), Some(end)) => {
                    let span = (*end - *start).num_days() + 1;
                    if span < rules.funds_hold_days {
                        issues.push(FundIssue::StatementPeriodTooShort {
                            days: span,
                            required: rules.funds_hold_days,
                        });
                    }
                }
                _ => issues.push(FundIssue::MissingStatementDates),
            }

            match (application_date, statement_end) {
                (Some(applied), Some(end)) => {
                    let age = (applied - *end).num_days();
                    if age < 0 {
                        issues.push(FundIssue::StatementEndAfterApplication);
                    } else if age > rules.statement_age_days {
                        issues.push(FundIssue::StatementTooOld {
                            age_days: age,
                            max_days: rules.statement_age_days,
                        });
                    }
                }
                (None, _) => issues.push(no_application_date),
                (Some(_), None) => {}
            }
        }
        FundEvidence::Fd { maturity_date } => {
            if maturity_date.is_none() {
                issues.push(FundIssue::MissingMaturityDate);
            }
        }
        FundEvidence::Loan { disbursement_date } => match (disbursement_date, application_date) {
            (None, None) => {
                issues.push(FundIssue::MissingDisbursementDate);
                issues.push(no_application_date);
            }
            (None, Some(_)) => issues.push(FundIssue::MissingDisbursementDate),
            (Some(_), None) => issues.push(no_application_date),
            (Some(letter), Some(applied)) => {
                let age = (applied - *letter).num_days();
                if age < 0 {
                    issues.push(FundIssue::LoanLetterAfterApplication);
                } else if age > rules.loan_letter_max_age_days {
                    issues.push(FundIssue::LoanLetterTooOld {
                        age_days: age,
                        max_days: rules.loan_letter_max_age_days,
                    });
                }
            }
        },
    }

    issues
}
