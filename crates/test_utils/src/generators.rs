//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::NaiveDate;
use core_kernel::Currency;
use domain_funds::{FundEvidence, FundRow, FundsRequest, Region};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for currencies the fakes know how to price
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::GBP),
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::INR),
        Just(Currency::NGN),
    ]
}

pub fn region_strategy() -> impl Strategy<Value = Region> {
    prop_oneof![Just(Region::London), Just(Region::OutsideLondon)]
}

/// Strategy for dates between 2024 and 2030
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..(6 * 365)).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .map(|base| base + chrono::Duration::days(offset))
            .unwrap_or_default()
    })
}

/// Strategy for (start, end) with end on or after start, up to 4 years apart
pub fn course_period_strategy() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (date_strategy(), 0i64..(4 * 365))
        .prop_map(|(start, length)| (start, start + chrono::Duration::days(length)))
}

/// Strategy for non-negative GBP amounts with pence
pub fn gbp_amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|pence| Decimal::new(pence, 2))
}

/// Strategy for fund-row amounts, including zero and negative values
pub fn row_amount_strategy() -> impl Strategy<Value = Decimal> {
    (-100_000i64..5_000_000i64).prop_map(|pence| Decimal::new(pence, 2))
}

/// Strategy for fund evidence with possibly missing dates
pub fn evidence_strategy() -> impl Strategy<Value = FundEvidence> {
    prop_oneof![
        (
            proptest::option::of(date_strategy()),
            proptest::option::of(date_strategy())
        )
            .prop_map(|(start, end)| FundEvidence::bank(start, end)),
        proptest::option::of(date_strategy())
            .prop_map(|maturity_date| FundEvidence::Fd { maturity_date }),
        proptest::option::of(date_strategy())
            .prop_map(|disbursement_date| FundEvidence::Loan { disbursement_date }),
    ]
}

pub fn fund_row_strategy() -> impl Strategy<Value = FundRow> {
    (evidence_strategy(), currency_strategy(), row_amount_strategy())
        .prop_map(|(evidence, currency, amount)| FundRow::new(evidence, currency, amount))
}

/// Strategy for valid funds requests on the "student" route
pub fn funds_request_strategy() -> impl Strategy<Value = FundsRequest> {
    (
        region_strategy(),
        course_period_strategy(),
        gbp_amount_strategy(),
        gbp_amount_strategy(),
        gbp_amount_strategy(),
        0u32..5u32,
        gbp_amount_strategy(),
    )
        .prop_map(
            |(region, (start, end), total, paid, scholarship, dependants, buffer)| FundsRequest {
                route_key: "student".to_string(),
                region,
                course_start: Some(start),
                course_end: Some(end),
                tuition_total_gbp: total,
                tuition_paid_gbp: paid,
                scholarship_gbp: scholarship,
                dependants_count: Decimal::from(dependants),
                buffer_gbp: buffer,
            },
        )
}
