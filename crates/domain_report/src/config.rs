//! Eligibility configuration
//!
//! Rates and thresholds published by the Home Office. The engine treats this
//! as read-only input; it is loaded once at startup.

use domain_funds::{EligibilityRoute, FundRules, ManualFxOverrides, RegionalRates, RouteTable};
use domain_ihs::{IhsRates, ServiceDecisionDays};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Surcharge settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IhsConfig {
    #[serde(flatten)]
    pub rates: IhsRates,
    #[serde(default)]
    pub service_decision_days: ServiceDecisionDays,
}

/// Defaults for fee fields the caller may omit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeDefaults {
    pub default_buffer_gbp: Decimal,
}

/// Exchange-rate settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FxSettings {
    /// Fallback rates used when neither the live source nor the request has one
    pub manual_rates: ManualFxOverrides,
}

/// Everything the engine needs to know about current Home Office rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub routes: RouteTable,
    #[serde(default)]
    pub rules: FundRules,
    pub ihs: IhsConfig,
    #[serde(default)]
    pub fees: FeeDefaults,
    #[serde(default)]
    pub fx: FxSettings,
}

impl EligibilityConfig {
    /// Checks the values a report cannot be computed without
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.routes.is_empty() {
            return Err(ReportError::InvalidConfig("no routes configured".to_string()));
        }
        if self.ihs.rates.yearly_gbp < Decimal::ZERO || self.ihs.rates.half_year_gbp < Decimal::ZERO {
            return Err(ReportError::InvalidConfig("IHS rates must not be negative".to_string()));
        }
        let rules = &self.rules;
        if rules.funds_hold_days <= 0
            || rules.statement_age_days < 0
            || rules.loan_letter_max_age_days < 0
        {
            return Err(ReportError::InvalidConfig(format!("invalid fund rules: {rules:?}")));
        }
        Ok(())
    }
}

impl Default for EligibilityConfig {
    /// Student route rates in force for 2025/26 applications
    fn default() -> Self {
        let student = EligibilityRoute {
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
        };

        Self {
            routes: RouteTable::new().with_route("student", student),
            rules: FundRules::default(),
            ihs: IhsConfig {
                rates: IhsRates {
                    yearly_gbp: dec!(776),
                    half_year_gbp: dec!(388),
                },
                service_decision_days: ServiceDecisionDays::default(),
            },
            fees: FeeDefaults::default(),
            fx: FxSettings::default(),
        }
    }
}
