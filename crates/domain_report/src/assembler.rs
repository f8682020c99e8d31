//! Report assembly

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{round_money, Clock, MoneyError, ReportId, SystemClock, Timezone};
use domain_funds::{
    calculate_funds_required, effective_dependants, FundRules, FundsAvailableResult,
    FundsAvailableValidator, FundsError, FundsRequiredResult, FxConverter,
};
use domain_ihs::{calculate_ihs, IhsRequest, IhsResult};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::EligibilityConfig;
use crate::error::ReportError;
use crate::request::ReportRequest;

/// A complete eligibility report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_id: ReportId,
    pub generated_at: DateTime<Utc>,
    pub application_date: NaiveDate,
    /// True when no application date was supplied and today was used
    pub application_date_defaulted: bool,
    pub funds_required: FundsRequiredResult,
    pub funds_available: FundsAvailableResult,
    pub ihs: IhsResult,
    /// Eligible funds minus funds required; negative is a shortfall
    pub gap_gbp: Decimal,
    /// All submitted funds minus funds required
    pub gap_all_funds_gbp: Decimal,
    pub rules: FundRules,
}

impl Report {
    pub fn is_sufficient(&self) -> bool {
        self.gap_gbp >= Decimal::ZERO
    }
}

/// Produces reports from requests against a fixed configuration
pub struct ReportAssembler {
    config: Arc<EligibilityConfig>,
    fx: FxConverter,
    clock: Arc<dyn Clock>,
    timezone: Timezone,
}

impl ReportAssembler {
    pub fn new(config: Arc<EligibilityConfig>, fx: FxConverter) -> Self {
        Self {
            config,
            fx,
            clock: Arc::new(SystemClock),
            timezone: Timezone::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn config(&self) -> &EligibilityConfig {
        &self.config
    }

    pub fn fx(&self) -> &FxConverter {
        &self.fx
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today(&self.timezone)
    }

    /// The supplied application date, or today with the defaulted flag set
    pub fn resolve_application_date(&self, supplied: Option<NaiveDate>) -> (NaiveDate, bool) {
        match supplied {
            Some(date) => (date, false),
            None => (self.today(), true),
        }
    }

    pub fn funds_required(&self, request: &ReportRequest) -> Result<FundsRequiredResult, ReportError> {
        let funds_request = request.funds_request(self.config.fees.default_buffer_gbp);
        Ok(calculate_funds_required(&self.config.routes, &funds_request)?)
    }

    /// Surcharge for the request; `dependants_effective` is the maintenance
    /// dependant count, used unless the request names an IHS-specific count
    pub fn ihs(
        &self,
        request: &ReportRequest,
        application_date: NaiveDate,
        dependants_effective: u32,
    ) -> Result<IhsResult, ReportError> {
        let ihs_request = IhsRequest {
            course_start: request.course_start,
            course_end: request.course_end,
            pre_sessional: request.ihs.pre_sessional,
            application_date,
            intended_travel_date: request.ihs.intended_travel_date,
            service_tier: request.ihs.service_tier,
            decision_days: request.ihs.decision_days,
            dependants: request.ihs.dependants_count.unwrap_or(dependants_effective),
        };
        Ok(calculate_ihs(
            &ihs_request,
            &self.config.ihs.rates,
            &self.config.ihs.service_decision_days,
        )?)
    }

    /// Surcharge only, for a quick estimate while the form is incomplete
    ///
    /// Unlike [`assemble`](Self::assemble) this tolerates missing course
    /// dates; the route is still required to know whether dependants count.
    pub fn estimate_ihs(&self, request: &ReportRequest) -> Result<IhsResult, ReportError> {
        let route = self.config.routes.get(&request.route_key).map_err(ReportError::from)?;
        let dependants = if route.dependants_allowed {
            effective_dependants(request.dependants_count)
        } else {
            0
        };
        let (application_date, _) = self.resolve_application_date(request.application_date);
        self.ihs(request, application_date, dependants)
    }

    /// Builds the full report
    ///
    /// # Errors
    ///
    /// Fails only on structural input errors (unknown route, missing or
    /// inverted course dates). Unavailable exchange rates degrade the
    /// affected rows instead.
    #[instrument(skip_all, fields(route = %request.route_key, rows = request.fund_rows.len()))]
    pub async fn assemble(&self, request: &ReportRequest) -> Result<Report, ReportError> {
        // Today stands in for the grant estimate only; freshness needs a real date
        let (application_date, defaulted) = self.resolve_application_date(request.application_date);

        let funds_required = self.funds_required(request)?;

        let fx = self
            .fx
            .clone()
            .with_overrides(self.config.fx.manual_rates.clone().merge(&request.manual_fx.overrides()));
        let funds_available = FundsAvailableValidator::new(&self.config.rules, &fx)
            .validate(&request.fund_rows, request.application_date, request.funds_skip)
            .await;

        let ihs = self.ihs(request, application_date, funds_required.dependants_count_effective)?;

        let required = funds_required.funds_required_gbp;
        let gap = gap_between(funds_available.summary.total_eligible_gbp, required)?;
        let gap_all = gap_between(funds_available.summary.total_all_gbp, required)?;

        let report = Report {
            report_id: ReportId::new_v7(),
            generated_at: self.clock.now(),
            application_date,
            application_date_defaulted: defaulted,
            funds_required,
            funds_available,
            ihs,
            gap_gbp: gap,
            gap_all_funds_gbp: gap_all,
            rules: self.config.rules,
        };

        info!(
            report_id = %report.report_id,
            funds_required = %report.funds_required.funds_required_gbp,
            eligible = %report.funds_available.summary.total_eligible_gbp,
            gap = %report.gap_gbp,
            ihs_total = %report.ihs.ihs_total_gbp,
            "Assembled eligibility report"
        );

        Ok(report)
    }
}

fn gap_between(available: Decimal, required: Decimal) -> Result<Decimal, ReportError> {
    let gap = available
        .checked_sub(required)
        .ok_or(FundsError::Money(MoneyError::Overflow))?;
    Ok(round_money(gap))
}

impl std::fmt::Debug for ReportAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportAssembler")
            .field("fx", &self.fx)
            .field("timezone", &self.timezone)
            .finish()
    }
}
