//! Test Data Builders
//!
//! Builder patterns for fund rows and report requests. Tests set only the
//! fields they care about; everything else comes from the reference case.

use chrono::NaiveDate;
use core_kernel::Currency;
use domain_funds::{FundEvidence, FundRow, ManualFxOverrides, Region};
use domain_ihs::VisaServiceTier;
use domain_report::ReportRequest;
use rust_decimal::Decimal;

use crate::fixtures::{date, RequestFixtures};

/// Builder for fund rows, defaulting to a compliant GBP bank statement
pub struct FundRowBuilder {
    evidence: FundEvidence,
    currency: Currency,
    amount: Decimal,
    account_type: String,
    source: String,
}

impl Default for FundRowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FundRowBuilder {
    pub fn new() -> Self {
        Self {
            evidence: FundEvidence::bank(Some(date(2025, 12, 15)), Some(date(2026, 1, 12))),
            currency: Currency::GBP,
            amount: Decimal::from(10_000),
            account_type: "Student".to_string(),
            source: "Test Bank".to_string(),
        }
    }

    /// Bank statement with the given period
    pub fn bank(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.evidence = FundEvidence::bank(start, end);
        self
    }

    /// Bank statement of `days` inclusive days ending on `end`
    pub fn bank_held_for(self, days: i64, end: NaiveDate) -> Self {
        let start = end - chrono::Duration::days(days - 1);
        self.bank(Some(start), Some(end))
    }

    pub fn fixed_deposit(mut self, maturity: Option<NaiveDate>) -> Self {
        self.evidence = FundEvidence::Fd {
            maturity_date: maturity,
        };
        self
    }

    pub fn loan(mut self, disbursement: Option<NaiveDate>) -> Self {
        self.evidence = FundEvidence::Loan {
            disbursement_date: disbursement,
        };
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_account_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = account_type.into();
        self
    }

    pub fn build(self) -> FundRow {
        FundRow::new(self.evidence, self.currency, self.amount)
            .with_account_type(self.account_type)
            .with_source(self.source)
    }
}

/// Builder for report requests, starting from the reference case
pub struct ReportRequestBuilder {
    request: ReportRequest,
}

impl Default for ReportRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: RequestFixtures::smoke(),
        }
    }

    pub fn with_route(mut self, route_key: impl Into<String>) -> Self {
        self.request.route_key = route_key.into();
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.request.region = region;
        self
    }

    pub fn with_course(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.request.course_start = start;
        self.request.course_end = end;
        self
    }

    pub fn with_application_date(mut self, date: Option<NaiveDate>) -> Self {
        self.request.application_date = date;
        self
    }

    pub fn with_tuition(mut self, total: Decimal, paid: Decimal, scholarship: Decimal) -> Self {
        self.request.tuition_total_gbp = total;
        self.request.tuition_paid_gbp = paid;
        self.request.scholarship_gbp = scholarship;
        self
    }

    pub fn with_dependants(mut self, count: Decimal) -> Self {
        self.request.dependants_count = count;
        self
    }

    pub fn with_buffer(mut self, buffer: Option<Decimal>) -> Self {
        self.request.buffer_gbp = buffer;
        self
    }

    pub fn with_rows(mut self, rows: Vec<FundRow>) -> Self {
        self.request.fund_rows = rows;
        self
    }

    pub fn add_row(mut self, row: FundRow) -> Self {
        self.request.fund_rows.push(row);
        self
    }

    pub fn skip_funds(mut self) -> Self {
        self.request.funds_skip = true;
        self
    }

    pub fn with_service_tier(mut self, tier: VisaServiceTier) -> Self {
        self.request.ihs.service_tier = tier;
        self
    }

    pub fn with_decision_days(mut self, days: Option<u32>) -> Self {
        self.request.ihs.decision_days = days;
        self
    }

    pub fn with_travel_date(mut self, date: Option<NaiveDate>) -> Self {
        self.request.ihs.intended_travel_date = date;
        self
    }

    pub fn pre_sessional(mut self) -> Self {
        self.request.ihs.pre_sessional = true;
        self
    }

    pub fn with_ihs_dependants(mut self, count: Option<u32>) -> Self {
        self.request.ihs.dependants_count = count;
        self
    }

    pub fn with_manual_rates(mut self, rates: ManualFxOverrides) -> Self {
        self.request.manual_fx.enabled = true;
        self.request.manual_fx.rates = rates;
        self
    }

    pub fn with_inr_per_gbp(mut self, inr_per_gbp: Decimal) -> Self {
        self.request.manual_fx.enabled = true;
        self.request.manual_fx.inr_per_gbp = Some(inr_per_gbp);
        self
    }

    pub fn build(self) -> ReportRequest {
        self.request
    }
}
