//! Report and IHS DTOs

use chrono::NaiveDate;
use core_kernel::Currency;
use domain_funds::{FundEvidence, FundRow, ManualFxOverrides, Region};
use domain_ihs::{IhsResult, VisaServiceTier};
use domain_report::{IhsOptions, ManualFx, ReportRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::{decimal_from_value, lenient_date, lenient_decimal, lenient_optional_decimal, whole_count};
use crate::error::ApiError;

/// One row of the funds table as the form submits it
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FundRowDto {
    pub fund_type: Option<String>,
    pub account_type: Option<String>,
    pub source: Option<String>,
    pub currency: Option<String>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub amount: Decimal,
    #[serde(deserialize_with = "lenient_date")]
    pub statement_start: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date")]
    pub statement_end: Option<NaiveDate>,
    #[serde(alias = "maturityDate", deserialize_with = "lenient_date")]
    pub fd_maturity: Option<NaiveDate>,
    #[serde(alias = "disbursementDate", deserialize_with = "lenient_date")]
    pub loan_disbursement: Option<NaiveDate>,
}

impl FundRowDto {
    /// Unknown or missing fund types are treated as bank statements
    pub fn into_row(self) -> Result<FundRow, ApiError> {
        let evidence = match self.fund_type.as_deref().map(|t| t.trim().to_lowercase()).as_deref() {
            Some("fd") => FundEvidence::Fd {
                maturity_date: self.fd_maturity,
            },
            Some("loan") => FundEvidence::Loan {
                disbursement_date: self.loan_disbursement,
            },
            _ => FundEvidence::bank(self.statement_start, self.statement_end),
        };

        let currency = match self.currency.as_deref().map(str::trim) {
            None | Some("") => Currency::GBP,
            Some(code) => Currency::from_code(code)?,
        };

        let account_type = self
            .account_type
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| "Student".to_string());

        Ok(FundRow::new(evidence, currency, self.amount)
            .with_account_type(account_type)
            .with_source(self.source.unwrap_or_default()))
    }
}

/// Manual exchange rates typed into the form
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualFxDto {
    pub enabled: Option<bool>,
    #[serde(deserialize_with = "lenient_optional_decimal")]
    pub inr_per_gbp: Option<Decimal>,
    /// Currency code to GBP per unit
    #[serde(alias = "rates")]
    pub overrides: HashMap<String, Value>,
}

impl ManualFxDto {
    pub fn into_manual_fx(self) -> Result<ManualFx, ApiError> {
        let mut rates = ManualFxOverrides::new();
        for (code, value) in &self.overrides {
            let currency = Currency::from_code(code)?;
            if let Some(rate) = decimal_from_value(value) {
                rates = rates.with_rate(currency, rate);
            }
        }

        Ok(ManualFx {
            enabled: self.enabled.unwrap_or(true),
            rates,
            inr_per_gbp: self.inr_per_gbp.filter(|r| *r > Decimal::ZERO),
        })
    }
}

/// Body of `POST /api/report` and `POST /api/ihs`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRequestDto {
    pub route_key: Option<String>,
    #[serde(alias = "studyLocation")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient_date")]
    pub course_start: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date")]
    pub course_end: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date")]
    pub application_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub tuition_fee_total_gbp: Decimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub tuition_fee_paid_gbp: Decimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub scholarship_gbp: Decimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub dependants_count: Decimal,
    #[serde(deserialize_with = "lenient_optional_decimal")]
    pub buffer_gbp: Option<Decimal>,
    pub funds_rows: Vec<FundRowDto>,
    pub funds_skip: bool,
    pub manual_fx: Option<ManualFxDto>,

    pub pre_sessional: bool,
    pub service_tier: Option<String>,
    #[serde(deserialize_with = "lenient_optional_decimal")]
    pub decision_days: Option<Decimal>,
    #[serde(deserialize_with = "lenient_date")]
    pub intended_travel_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_optional_decimal")]
    pub ihs_dependants_count: Option<Decimal>,
}

impl ReportRequestDto {
    pub fn into_request(self) -> Result<ReportRequest, ApiError> {
        let route_key = self
            .route_key
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "student".to_string());

        let service_tier = match self.service_tier {
            Some(tier) => tier.parse::<VisaServiceTier>()?,
            None => VisaServiceTier::default(),
        };

        let fund_rows = self
            .funds_rows
            .into_iter()
            .map(FundRowDto::into_row)
            .collect::<Result<Vec<_>, _>>()?;

        let manual_fx = match self.manual_fx {
            Some(dto) => dto.into_manual_fx()?,
            None => ManualFx::default(),
        };

        Ok(ReportRequest {
            route_key,
            region: Region::normalize(self.region.as_deref().unwrap_or_default()),
            course_start: self.course_start,
            course_end: self.course_end,
            application_date: self.application_date,
            tuition_total_gbp: self.tuition_fee_total_gbp,
            tuition_paid_gbp: self.tuition_fee_paid_gbp,
            scholarship_gbp: self.scholarship_gbp,
            dependants_count: self.dependants_count,
            buffer_gbp: self.buffer_gbp,
            fund_rows,
            funds_skip: self.funds_skip,
            ihs: IhsOptions {
                pre_sessional: self.pre_sessional,
                service_tier,
                decision_days: self.decision_days.map(whole_count),
                intended_travel_date: self.intended_travel_date,
                dependants_count: self.ihs_dependants_count.map(whole_count),
            },
            manual_fx,
        })
    }
}

/// Body returned by `POST /api/ihs`
#[derive(Debug, Serialize)]
pub struct IhsResponse {
    pub ihs: IhsResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn parse(value: Value) -> ReportRequest {
        serde_json::from_value::<ReportRequestDto>(value)
            .unwrap()
            .into_request()
            .unwrap()
    }

    #[test]
    fn test_blank_and_invalid_dates_are_absent() {
        let request = parse(json!({
            "courseStart": "",
            "courseEnd": "not a date",
            "applicationDate": "2026-01-15T10:00:00Z"
        }));
        assert_eq!(request.course_start, None);
        assert_eq!(request.course_end, None);
        assert_eq!(request.application_date, NaiveDate::from_ymd_opt(2026, 1, 15));
    }

    #[test]
    fn test_defaults_for_empty_body() {
        let request = parse(json!({}));
        assert_eq!(request.route_key, "student");
        assert_eq!(request.region, Region::OutsideLondon);
        assert_eq!(request.buffer_gbp, None);
        assert!(request.manual_fx.enabled);
        assert!(request.fund_rows.is_empty());
    }

    #[test]
    fn test_numbers_as_strings() {
        let request = parse(json!({
            "tuitionFeeTotalGbp": "18000",
            "tuitionFeePaidGbp": 4000,
            "dependantsCount": "x",
            "bufferGbp": ""
        }));
        assert_eq!(request.tuition_total_gbp, dec!(18000));
        assert_eq!(request.tuition_paid_gbp, dec!(4000));
        assert_eq!(request.dependants_count, Decimal::ZERO);
        assert_eq!(request.buffer_gbp, None);
    }

    #[test]
    fn test_fund_row_types() {
        let request = parse(json!({
            "region": "London",
            "fundsRows": [
                {"currency": "inr", "amount": "1500000", "fundType": "FD", "fdMaturity": "2027-03-31"},
                {"fundType": "loan", "loanDisbursement": "", "amount": 1},
                {"amount": 10}
            ]
        }));
        assert_eq!(request.region, Region::London);
        let rows = &request.fund_rows;
        assert_eq!(rows[0].currency(), Currency::INR);
        assert_eq!(
            rows[0].evidence,
            FundEvidence::Fd {
                maturity_date: NaiveDate::from_ymd_opt(2027, 3, 31)
            }
        );
        assert_eq!(rows[1].evidence, FundEvidence::Loan { disbursement_date: None });
        assert_eq!(rows[2].evidence, FundEvidence::bank(None, None));
        assert_eq!(rows[2].currency(), Currency::GBP);
        assert_eq!(rows[2].account_type, "Student");
    }

    #[test]
    fn test_invalid_currency_is_rejected() {
        let dto: ReportRequestDto =
            serde_json::from_value(json!({"fundsRows": [{"currency": "POUNDS", "amount": 1}]})).unwrap();
        assert!(matches!(dto.into_request(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_manual_fx() {
        let request = parse(json!({
            "manualFx": {"enabled": true, "inrPerGbp": 0, "overrides": {"USD": "0.79", "EUR": 0}}
        }));
        assert_eq!(request.manual_fx.inr_per_gbp, None);
        let overrides = request.manual_fx.overrides();
        assert_eq!(overrides.rate(Currency::USD, Currency::GBP, Currency::GBP), Some(dec!(0.79)));
        assert_eq!(overrides.rate(Currency::EUR, Currency::GBP, Currency::GBP), None);
    }

    #[test]
    fn test_ihs_options() {
        let request = parse(json!({
            "serviceTier": "Super Priority",
            "decisionDays": "3",
            "ihsDependantsCount": 1.9,
            "preSessional": true
        }));
        assert_eq!(request.ihs.service_tier, VisaServiceTier::SuperPriority);
        assert_eq!(request.ihs.decision_days, Some(3));
        assert_eq!(request.ihs.dependants_count, Some(1));
        assert!(request.ihs.pre_sessional);
    }
}
