//! IHS calculation for one application

use chrono::NaiveDate;
use core_kernel::{add_working_days, DateRange};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charge::{stay_months, IhsCharge, IhsRates};
use crate::error::IhsError;
use crate::visa::{CourseCategory, ServiceDecisionDays, VisaServiceTier, VisaWindow, WrapPeriod};

/// Inputs to the surcharge calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IhsRequest {
    pub course_start: Option<NaiveDate>,
    pub course_end: Option<NaiveDate>,
    #[serde(default)]
    pub pre_sessional: bool,
    pub application_date: NaiveDate,
    pub intended_travel_date: Option<NaiveDate>,
    #[serde(default)]
    pub service_tier: VisaServiceTier,
    /// Overrides the tier's decision time when positive
    pub decision_days: Option<u32>,
    /// Dependants paying the surcharge alongside the student
    #[serde(default)]
    pub dependants: u32,
}

impl IhsRequest {
    pub fn new(application_date: NaiveDate) -> Self {
        Self {
            course_start: None,
            course_end: None,
            pre_sessional: false,
            application_date,
            intended_travel_date: None,
            service_tier: VisaServiceTier::Standard,
            decision_days: None,
            dependants: 0,
        }
    }

    pub fn with_course(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.course_start = Some(start);
        self.course_end = Some(end);
        self
    }

    pub fn persons(&self) -> u32 {
        self.dependants.saturating_add(1)
    }
}

/// Visa window and surcharge for an application
///
/// Dates are absent when the course dates were absent or inverted; the cost
/// is then zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IhsResult {
    pub course_category: Option<CourseCategory>,
    pub course_months: u32,
    pub wrap: Option<WrapPeriod>,
    pub service_tier: VisaServiceTier,
    pub decision_days: u32,
    pub estimated_grant_date: Option<NaiveDate>,
    pub intended_travel_date: Option<NaiveDate>,
    pub visa_start_date: Option<NaiveDate>,
    pub visa_end_date: Option<NaiveDate>,
    pub total_stay_months: u32,
    pub chargeable_units: u32,
    pub full_years: u32,
    pub half_year_charges: u32,
    pub rate_yearly_gbp: Decimal,
    pub rate_half_year_gbp: Decimal,
    pub ihs_per_person_gbp: Decimal,
    pub persons: u32,
    pub ihs_total_gbp: Decimal,
}

/// Calculates the visa window and surcharge
///
/// # Errors
///
/// Only fails when a derived date falls outside the supported calendar.
pub fn calculate_ihs(
    request: &IhsRequest,
    rates: &IhsRates,
    decision_sla: &ServiceDecisionDays,
) -> Result<IhsResult, IhsError> {
    let decision_days = request
        .decision_days
        .filter(|days| *days > 0)
        .unwrap_or_else(|| decision_sla.for_tier(request.service_tier));
    let persons = request.persons();

    let course = match (request.course_start, request.course_end) {
        (Some(start), Some(end)) => DateRange::new(start, end).ok(),
        _ => None,
    };
    let Some(course) = course else {
        debug!("Course dates missing or inverted; no surcharge computed");
        return Ok(empty_result(request, rates, decision_days, persons));
    };

    let course_months = course.inclusive_calendar_months();
    let category = CourseCategory::classify(course_months, request.pre_sessional);
    let wrap = category.wrap();

    let grant = add_working_days(request.application_date, decision_days)?;
    let window = VisaWindow::derive(
        course.start,
        course.end,
        wrap,
        grant,
        request.intended_travel_date,
    )?;

    let months = stay_months(window.visa_start_date, window.visa_end_date);
    let charge = IhsCharge::for_months(months, rates);

    debug!(
        ?category,
        course_months,
        decision_days,
        visa_start = %window.visa_start_date,
        visa_end = %window.visa_end_date,
        stay_months = months,
        "Derived visa window"
    );

    Ok(IhsResult {
        course_category: Some(category),
        course_months,
        wrap: Some(wrap),
        service_tier: request.service_tier,
        decision_days,
        estimated_grant_date: Some(window.estimated_grant_date),
        intended_travel_date: Some(window.intended_travel_date),
        visa_start_date: Some(window.visa_start_date),
        visa_end_date: Some(window.visa_end_date),
        total_stay_months: charge.total_stay_months,
        chargeable_units: charge.chargeable_units,
        full_years: charge.full_years,
        half_year_charges: charge.half_year_charges,
        rate_yearly_gbp: rates.yearly_gbp,
        rate_half_year_gbp: rates.half_year_gbp,
        ihs_per_person_gbp: charge.per_person_gbp,
        persons,
        ihs_total_gbp: charge.total_for(persons),
    })
}

fn empty_result(
    request: &IhsRequest,
    rates: &IhsRates,
    decision_days: u32,
    persons: u32,
) -> IhsResult {
    let charge = IhsCharge::none();
    IhsResult {
        course_category: None,
        course_months: 0,
        wrap: None,
        service_tier: request.service_tier,
        decision_days,
        estimated_grant_date: None,
        intended_travel_date: None,
        visa_start_date: None,
        visa_end_date: None,
        total_stay_months: charge.total_stay_months,
        chargeable_units: charge.chargeable_units,
        full_years: charge.full_years,
        half_year_charges: charge.half_year_charges,
        rate_yearly_gbp: rates.yearly_gbp,
        rate_half_year_gbp: rates.half_year_gbp,
        ihs_per_person_gbp: Decimal::ZERO,
        persons,
        ihs_total_gbp: Decimal::ZERO,
    }
}
