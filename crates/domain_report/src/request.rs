//! Report request

use chrono::NaiveDate;
use domain_funds::{FundRow, FundsRequest, ManualFxOverrides, Region};
use domain_ihs::VisaServiceTier;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// IHS-specific inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IhsOptions {
    pub pre_sessional: bool,
    pub service_tier: VisaServiceTier,
    pub decision_days: Option<u32>,
    pub intended_travel_date: Option<NaiveDate>,
    /// Persons paying the surcharge besides the student, when it differs
    /// from the dependants counted for maintenance
    pub dependants_count: Option<u32>,
}

/// Rates typed in by a counsellor for when the live source is down
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualFx {
    pub enabled: bool,
    /// GBP per one unit of each currency
    pub rates: ManualFxOverrides,
    /// Rupees per pound, as quoted by Indian banks
    pub inr_per_gbp: Option<Decimal>,
}

impl Default for ManualFx {
    fn default() -> Self {
        Self {
            enabled: true,
            rates: ManualFxOverrides::default(),
            inr_per_gbp: None,
        }
    }
}

impl ManualFx {
    pub fn overrides(&self) -> ManualFxOverrides {
        if !self.enabled {
            return ManualFxOverrides::default();
        }
        match self.inr_per_gbp {
            Some(inr) => self.rates.clone().with_inr_per_gbp(inr),
            None => self.rates.clone(),
        }
    }
}

/// Everything needed to produce one eligibility report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub route_key: String,
    pub region: Region,
    pub course_start: Option<NaiveDate>,
    pub course_end: Option<NaiveDate>,
    /// Defaults to today in the configured timezone
    pub application_date: Option<NaiveDate>,
    pub tuition_total_gbp: Decimal,
    pub tuition_paid_gbp: Decimal,
    pub scholarship_gbp: Decimal,
    pub dependants_count: Decimal,
    /// Defaults to the configured buffer
    pub buffer_gbp: Option<Decimal>,
    #[serde(default)]
    pub fund_rows: Vec<FundRow>,
    #[serde(default)]
    pub funds_skip: bool,
    #[serde(default)]
    pub ihs: IhsOptions,
    #[serde(default)]
    pub manual_fx: ManualFx,
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self {
            route_key: "student".to_string(),
            region: Region::OutsideLondon,
            course_start: None,
            course_end: None,
            application_date: None,
            tuition_total_gbp: Decimal::ZERO,
            tuition_paid_gbp: Decimal::ZERO,
            scholarship_gbp: Decimal::ZERO,
            dependants_count: Decimal::ZERO,
            buffer_gbp: None,
            fund_rows: Vec::new(),
            funds_skip: false,
            ihs: IhsOptions::default(),
            manual_fx: ManualFx::default(),
        }
    }
}

impl ReportRequest {
    /// The funds-required inputs, with `default_buffer` applied when no buffer was given
    pub fn funds_request(&self, default_buffer: Decimal) -> FundsRequest {
        FundsRequest {
            route_key: self.route_key.clone(),
            region: self.region,
            course_start: self.course_start,
            course_end: self.course_end,
            tuition_total_gbp: self.tuition_total_gbp,
            tuition_paid_gbp: self.tuition_paid_gbp,
            scholarship_gbp: self.scholarship_gbp,
            dependants_count: self.dependants_count,
            buffer_gbp: self.buffer_gbp.unwrap_or(default_buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_manual_fx_disabled_ignores_rates() {
        let manual = ManualFx {
            enabled: false,
            rates: ManualFxOverrides::new().with_rate(Currency::USD, dec!(0.79)),
            inr_per_gbp: Some(dec!(105)),
        };
        assert!(manual.overrides().is_empty());
    }

    #[test]
    fn test_manual_fx_legacy_inr() {
        let manual = ManualFx {
            inr_per_gbp: Some(dec!(100)),
            ..Default::default()
        };
        let overrides = manual.overrides();
        assert_eq!(
            overrides.rate(Currency::INR, Currency::GBP, Currency::GBP),
            Some(dec!(0.01))
        );
    }

    #[test]
    fn test_buffer_default_applies_only_when_absent() {
        let request = ReportRequest::default();
        assert_eq!(request.funds_request(dec!(500)).buffer_gbp, dec!(500));

        let request = ReportRequest {
            buffer_gbp: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert_eq!(request.funds_request(dec!(500)).buffer_gbp, Decimal::ZERO);
    }
}
