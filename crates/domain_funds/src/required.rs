//! Funds-required calculation
//!
//! The amount an applicant must show is the unpaid tuition plus living costs
//! for the course (capped at the route's month limit), for the student and any
//! dependants, plus an optional safety buffer.

use chrono::NaiveDate;
use core_kernel::{checked_sum, months_approx, round_money, MoneyError};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FundsError;
use crate::route::{Region, RouteTable};

/// Inputs to the funds-required calculation; money is in GBP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundsRequest {
    pub route_key: String,
    pub region: Region,
    pub course_start: Option<NaiveDate>,
    pub course_end: Option<NaiveDate>,
    pub tuition_total_gbp: Decimal,
    pub tuition_paid_gbp: Decimal,
    pub scholarship_gbp: Decimal,
    /// May arrive fractional from a form; floored before use
    pub dependants_count: Decimal,
    pub buffer_gbp: Decimal,
}

impl Default for FundsRequest {
    fn default() -> Self {
        Self {
            route_key: "student".to_string(),
            region: Region::OutsideLondon,
            course_start: None,
            course_end: None,
            tuition_total_gbp: Decimal::ZERO,
            tuition_paid_gbp: Decimal::ZERO,
            scholarship_gbp: Decimal::ZERO,
            dependants_count: Decimal::ZERO,
            buffer_gbp: Decimal::ZERO,
        }
    }
}

/// Breakdown of the funds an applicant must hold, in GBP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundsRequiredResult {
    pub route_key: String,
    pub region: Region,
    pub months_required: u32,
    pub tuition_due_gbp: Decimal,
    pub maintenance_student_gbp: Decimal,
    pub maintenance_dependants_gbp: Decimal,
    pub buffer_gbp: Decimal,
    pub funds_required_gbp: Decimal,
    pub dependants_count_effective: u32,
}

/// Computes the funds required for `request` against the configured routes
///
/// # Errors
///
/// * [`FundsError::UnknownRoute`] when the route key is not configured
/// * [`FundsError::MissingCourseDates`] when either course date is absent
/// * [`FundsError::InvalidCoursePeriod`] when the course ends before it starts
/// * [`FundsError::Money`] when an amount is too large to represent
pub fn calculate_funds_required(
    routes: &RouteTable,
    request: &FundsRequest,
) -> Result<FundsRequiredResult, FundsError> {
    let route = routes.get(&request.route_key)?;

    let (start, end) = match (request.course_start, request.course_end) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(FundsError::MissingCourseDates),
    };
    if end < start {
        return Err(FundsError::InvalidCoursePeriod {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let months = months_approx(start, end, route.max_months);
    let months_dec = Decimal::from(months);

    let tuition_due = request
        .tuition_total_gbp
        .checked_sub(request.tuition_paid_gbp)
        .and_then(|due| due.checked_sub(request.scholarship_gbp))
        .ok_or(MoneyError::Overflow)?
        .max(Decimal::ZERO);

    let maintenance_student = months_dec
        .checked_mul(route.maintenance_monthly_gbp.for_region(request.region))
        .ok_or(MoneyError::Overflow)?;

    let dependants = if route.dependants_allowed {
        effective_dependants(request.dependants_count)
    } else {
        0
    };
    let maintenance_dependants = months_dec
        .checked_mul(route.dependant_monthly_gbp.for_region(request.region))
        .and_then(|monthly| monthly.checked_mul(Decimal::from(dependants)))
        .ok_or(MoneyError::Overflow)?;

    let total = checked_sum([
        tuition_due,
        maintenance_student,
        maintenance_dependants,
        request.buffer_gbp,
    ])?;

    debug!(
        route = %request.route_key,
        region = %request.region,
        months,
        dependants,
        funds_required = %total,
        "Calculated funds required"
    );

    Ok(FundsRequiredResult {
        route_key: request.route_key.clone(),
        region: request.region,
        months_required: months,
        tuition_due_gbp: round_money(tuition_due),
        maintenance_student_gbp: round_money(maintenance_student),
        maintenance_dependants_gbp: round_money(maintenance_dependants),
        buffer_gbp: round_money(request.buffer_gbp),
        funds_required_gbp: round_money(total),
        dependants_count_effective: dependants,
    })
}

/// Floors a form-supplied dependant count; negatives are 0 and counts past
/// `u32::MAX` saturate
pub fn effective_dependants(count: Decimal) -> u32 {
    count.floor().max(Decimal::ZERO).to_u32().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{EligibilityRoute, RegionalRates};
    use rust_decimal_macros::dec;

    fn routes(dependants_allowed: bool) -> RouteTable {
        RouteTable::new().with_route(
            "student",
            EligibilityRoute {
                max_months: 9,
                maintenance_monthly_gbp: RegionalRates {
                    london: dec!(1483),
                    outside_london: dec!(1136),
                },
                dependant_monthly_gbp: RegionalRates {
                    london: dec!(845),
                    outside_london: dec!(680),
                },
                dependants_allowed,
            },
        )
    }

    fn d(y: i32, m: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, day)
    }

    fn request() -> FundsRequest {
        FundsRequest {
            course_start: d(2026, 9, 1),
            course_end: d(2027, 6, 30),
            ..Default::default()
        }
    }

    #[test]
    fn test_maintenance_capped_at_route_months() {
        let result = calculate_funds_required(&routes(false), &request()).unwrap();
        assert_eq!(result.months_required, 9);
        assert_eq!(result.maintenance_student_gbp, dec!(10224));
    }

    #[test]
    fn test_london_rate_selected() {
        let req = FundsRequest {
            region: Region::London,
            ..request()
        };
        let result = calculate_funds_required(&routes(false), &req).unwrap();
        assert_eq!(result.maintenance_student_gbp, dec!(13347));
    }

    #[test]
    fn test_dependants_ignored_when_route_disallows() {
        let req = FundsRequest {
            dependants_count: dec!(2),
            ..request()
        };
        let result = calculate_funds_required(&routes(false), &req).unwrap();
        assert_eq!(result.dependants_count_effective, 0);
        assert_eq!(result.maintenance_dependants_gbp, Decimal::ZERO);
    }

    #[test]
    fn test_dependants_floored() {
        let req = FundsRequest {
            dependants_count: dec!(1.7),
            ..request()
        };
        let result = calculate_funds_required(&routes(true), &req).unwrap();
        assert_eq!(result.dependants_count_effective, 1);
        assert_eq!(result.maintenance_dependants_gbp, dec!(6120));
    }

    #[test]
    fn test_negative_dependants_are_zero() {
        let req = FundsRequest {
            dependants_count: dec!(-3),
            ..request()
        };
        let result = calculate_funds_required(&routes(true), &req).unwrap();
        assert_eq!(result.dependants_count_effective, 0);
    }

    #[test]
    fn test_oversized_dependants_saturate() {
        let req = FundsRequest {
            dependants_count: dec!(1000000000000),
            ..request()
        };
        let result = calculate_funds_required(&routes(true), &req).unwrap();
        assert_eq!(result.dependants_count_effective, u32::MAX);
        assert!(result.maintenance_dependants_gbp > Decimal::ZERO);
    }

    #[test]
    fn test_unrepresentable_total_is_an_error() {
        let req = FundsRequest {
            tuition_total_gbp: Decimal::MAX,
            buffer_gbp: Decimal::MAX,
            ..request()
        };
        assert_eq!(
            calculate_funds_required(&routes(false), &req),
            Err(FundsError::Money(MoneyError::Overflow))
        );
    }

    #[test]
    fn test_unrepresentable_tuition_balance_is_an_error() {
        let req = FundsRequest {
            tuition_total_gbp: Decimal::MAX,
            scholarship_gbp: Decimal::MIN,
            ..request()
        };
        assert_eq!(
            calculate_funds_required(&routes(false), &req),
            Err(FundsError::Money(MoneyError::Overflow))
        );
    }

    #[test]
    fn test_overpaid_tuition_is_zero_due() {
        let req = FundsRequest {
            tuition_total_gbp: dec!(10000),
            tuition_paid_gbp: dec!(8000),
            scholarship_gbp: dec!(5000),
            ..request()
        };
        let result = calculate_funds_required(&routes(false), &req).unwrap();
        assert_eq!(result.tuition_due_gbp, Decimal::ZERO);
    }

    #[test]
    fn test_total_rounds_half_away_from_zero() {
        let req = FundsRequest {
            buffer_gbp: dec!(0.125),
            ..request()
        };
        let result = calculate_funds_required(&routes(false), &req).unwrap();
        assert_eq!(result.buffer_gbp, dec!(0.13));
        assert_eq!(result.funds_required_gbp, dec!(10224.13));
    }

    #[test]
    fn test_missing_dates_rejected() {
        let req = FundsRequest {
            course_end: None,
            ..request()
        };
        assert_eq!(
            calculate_funds_required(&routes(false), &req),
            Err(FundsError::MissingCourseDates)
        );
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let req = FundsRequest {
            course_start: d(2027, 1, 1),
            course_end: d(2026, 1, 1),
            ..Default::default()
        };
        assert!(matches!(
            calculate_funds_required(&routes(false), &req),
            Err(FundsError::InvalidCoursePeriod { .. })
        ));
    }

    #[test]
    fn test_unknown_route_rejected() {
        let req = FundsRequest {
            route_key: "graduate".to_string(),
            ..request()
        };
        assert!(matches!(
            calculate_funds_required(&routes(false), &req),
            Err(FundsError::UnknownRoute(_))
        ));
    }
}
