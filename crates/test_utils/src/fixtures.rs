//! Pre-built Test Fixtures
//!
//! Provides ready-to-use configuration, dates, and requests. Values match the
//! shipped `config/ukvi_config.json` so tests read like real cases.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use core_kernel::Currency;
use domain_funds::{EligibilityRoute, FundEvidence, FundRow, FundRules, RegionalRates, Region, RouteTable};
use domain_ihs::IhsRates;
use domain_report::{EligibilityConfig, ReportRequest};
use rust_decimal_macros::dec;

/// Builds a date, panicking on invalid input
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

/// Fixture for route configuration
pub struct RouteFixtures;

impl RouteFixtures {
    /// Student route: 12-month cap, dependants allowed
    pub fn student() -> EligibilityRoute {
        EligibilityRoute {
            max_months: 12,
            maintenance_monthly_gbp: RegionalRates {
                london: dec!(1483),
                outside_london: dec!(1136),
            },
            dependant_monthly_gbp: RegionalRates {
                london: dec!(845),
                outside_london: dec!(680),
            },
            dependants_allowed: true,
        }
    }

    /// A route without dependants and a 9-month cap
    pub fn student_no_dependants() -> EligibilityRoute {
        EligibilityRoute {
            max_months: 9,
            dependants_allowed: false,
            ..Self::student()
        }
    }

    pub fn table() -> RouteTable {
        RouteTable::new()
            .with_route("student", Self::student())
            .with_route("student_no_dependants", Self::student_no_dependants())
    }
}

/// Fixture for configuration aggregates
pub struct ConfigFixtures;

impl ConfigFixtures {
    pub fn ihs_rates() -> IhsRates {
        IhsRates {
            yearly_gbp: dec!(776),
            half_year_gbp: dec!(388),
        }
    }

    pub fn rules() -> FundRules {
        FundRules::default()
    }

    pub fn eligibility() -> EligibilityConfig {
        EligibilityConfig {
            routes: RouteFixtures::table(),
            ..EligibilityConfig::default()
        }
    }
}

/// Fixture for instants and dates used across scenarios
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// 2026-01-15 09:00 UTC, a Thursday
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0)
            .single()
            .expect("valid fixture instant")
    }

    pub fn application_date() -> NaiveDate {
        date(2026, 1, 15)
    }

    pub fn course_start() -> NaiveDate {
        date(2026, 1, 1)
    }

    pub fn course_end() -> NaiveDate {
        date(2026, 12, 31)
    }
}

/// Fixture for submitted fund rows
pub struct FundFixtures;

impl FundFixtures {
    /// GBP 20,000 held 2025-12-15 to 2026-01-12 (29 days)
    pub fn smoke_bank_row() -> FundRow {
        FundRow::new(
            FundEvidence::bank(Some(date(2025, 12, 15)), Some(date(2026, 1, 12))),
            Currency::GBP,
            dec!(20000),
        )
        .with_source("Test Bank")
    }

    pub fn inr_fixed_deposit() -> FundRow {
        FundRow::new(
            FundEvidence::Fd {
                maturity_date: Some(date(2027, 3, 31)),
            },
            Currency::INR,
            dec!(1500000),
        )
        .with_account_type("Father")
        .with_source("State Bank of India")
    }

    pub fn inr_loan() -> FundRow {
        FundRow::new(
            FundEvidence::Loan {
                disbursement_date: Some(date(2025, 11, 20)),
            },
            Currency::INR,
            dec!(2000000),
        )
        .with_source("HDFC Credila")
    }
}

/// Fixture for whole requests
pub struct RequestFixtures;

impl RequestFixtures {
    /// The reference case: outside London, 12-month course, one GBP bank row
    pub fn smoke() -> ReportRequest {
        ReportRequest {
            route_key: "student".to_string(),
            region: Region::OutsideLondon,
            course_start: Some(TemporalFixtures::course_start()),
            course_end: Some(TemporalFixtures::course_end()),
            application_date: Some(TemporalFixtures::application_date()),
            tuition_total_gbp: dec!(18000),
            tuition_paid_gbp: dec!(4000),
            scholarship_gbp: dec!(0),
            dependants_count: dec!(0),
            buffer_gbp: Some(dec!(0)),
            fund_rows: vec![FundFixtures::smoke_bank_row()],
            ..ReportRequest::default()
        }
    }

    /// The reference case as the HTTP API receives it
    pub fn smoke_json() -> serde_json::Value {
        serde_json::json!({
            "routeKey": "student",
            "universityName": "University of Manchester",
            "region": "outside_london",
            "courseStart": "2026-01-01",
            "courseEnd": "2026-12-31",
            "applicationDate": "2026-01-15",
            "tuitionFeeTotalGbp": 18000,
            "tuitionFeePaidGbp": 4000,
            "scholarshipGbp": 0,
            "dependantsCount": 0,
            "bufferGbp": 0,
            "fundsRows": [{
                "accountType": "Student",
                "source": "Test Bank",
                "currency": "GBP",
                "amount": 20000,
                "statementStart": "2025-12-15",
                "statementEnd": "2026-01-12"
            }],
            "manualFx": { "enabled": false, "inrPerGbp": 0 }
        })
    }
}
