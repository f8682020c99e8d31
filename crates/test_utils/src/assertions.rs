//! Custom Test Assertions
//!
//! Assertion helpers for report results that print the offending row or
//! figure instead of a bare `false`.

use domain_funds::{FundRowResult, FundsAvailableResult};
use rust_decimal::Decimal;

/// Asserts that two GBP figures are within `tolerance` of each other
pub fn assert_gbp_approx_eq(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "GBP amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Asserts that a figure has at most 2 decimal places
pub fn assert_rounded_to_pence(value: Decimal) {
    assert_eq!(
        value,
        value.round_dp(2),
        "Expected a value rounded to pence, got {}",
        value
    );
}

/// Asserts that a row is eligible
pub fn assert_row_eligible(row: &FundRowResult) {
    assert!(
        row.eligible,
        "Expected eligible row, got issues {:?} for {:?}",
        row.issues, row.row
    );
}

/// Asserts that a row is ineligible and one of its issues reads `message`
pub fn assert_row_has_issue(row: &FundRowResult, message: &str) {
    let messages: Vec<String> = row.issues.iter().map(ToString::to_string).collect();
    assert!(
        messages.iter().any(|m| m == message),
        "Expected issue {:?}, got {:?}",
        message,
        messages
    );
}

/// Asserts the eligible total never exceeds the all-rows total
pub fn assert_totals_consistent(result: &FundsAvailableResult) {
    let summary = &result.summary;
    assert!(
        summary.total_eligible_gbp <= summary.total_all_gbp,
        "Eligible total {} exceeds all-rows total {}",
        summary.total_eligible_gbp,
        summary.total_all_gbp
    );
    assert_eq!(
        summary.any_ineligible_rows,
        result.rows.iter().any(|r| !r.eligible),
        "anyIneligibleRows disagrees with rows"
    );
}
