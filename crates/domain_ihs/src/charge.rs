//! Surcharge pricing for a visa stay
//!
//! The stay is billed in 6-month units. Pairs of units are charged at the
//! yearly rate; a leftover single unit is charged at the half-year rate.

use chrono::{Datelike, NaiveDate};
use core_kernel::{calendar_months_elapsed, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Months in one chargeable unit
pub const UNIT_MONTHS: u32 = 6;

/// Surcharge rates in GBP per person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IhsRates {
    #[serde(rename = "student_yearly_gbp")]
    pub yearly_gbp: Decimal,
    pub half_year_gbp: Decimal,
}

/// Breakdown of the per-person charge for a stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IhsCharge {
    pub total_stay_months: u32,
    pub chargeable_units: u32,
    pub full_years: u32,
    pub half_year_charges: u32,
    pub per_person_gbp: Decimal,
}

impl IhsCharge {
    pub fn none() -> Self {
        Self {
            total_stay_months: 0,
            chargeable_units: 0,
            full_years: 0,
            half_year_charges: 0,
            per_person_gbp: Decimal::ZERO,
        }
    }

    /// Prices a stay of `months` months
    pub fn for_months(months: u32, rates: &IhsRates) -> Self {
        let units = months.div_ceil(UNIT_MONTHS);
        let full_years = units / 2;
        let half_year_charges = units % 2;
        let per_person = Decimal::from(full_years) * rates.yearly_gbp
            + Decimal::from(half_year_charges) * rates.half_year_gbp;

        Self {
            total_stay_months: months,
            chargeable_units: units,
            full_years,
            half_year_charges,
            per_person_gbp: round_money(per_person),
        }
    }

    pub fn total_for(&self, persons: u32) -> Decimal {
        round_money(self.per_person_gbp * Decimal::from(persons))
    }
}

/// Months of a stay, counting a trailing part month as a whole month
///
/// 1 February to 30 April is 3 months; 1 February to 1 May is 4.
pub fn stay_months(visa_start: NaiveDate, visa_end: NaiveDate) -> u32 {
    if visa_end < visa_start {
        return 0;
    }
    let whole = calendar_months_elapsed(visa_start, visa_end);
    if visa_end.day() >= visa_start.day() {
        whole + 1
    } else {
        whole
    }
}
