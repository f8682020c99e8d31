//! Visa validity window
//!
//! A student visa covers the course plus a "wrap" before and after it. How
//! long the wraps are depends on the course length:
//!
//! | Course                    | Before   | After    |
//! |---------------------------|----------|----------|
//! | 12 months or more         | 1 month  | 4 months |
//! | 6 to 12 months            | 1 month  | 2 months |
//! | pre-sessional, < 6 months | 1 month  | 1 month  |
//! | other, < 6 months         | 7 days   | 7 days   |

use chrono::NaiveDate;
use core_kernel::{add_calendar_days, add_calendar_months, TemporalError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IhsError;

/// Course-length band that fixes the wrap periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseCategory {
    TwelveMonthsOrMore,
    SixToTwelveMonths,
    PreSessionalUnderSixMonths,
    UnderSixMonths,
}

impl CourseCategory {
    pub fn classify(course_months: u32, pre_sessional: bool) -> Self {
        match course_months {
            12.. => CourseCategory::TwelveMonthsOrMore,
            6..=11 => CourseCategory::SixToTwelveMonths,
            _ if pre_sessional => CourseCategory::PreSessionalUnderSixMonths,
            _ => CourseCategory::UnderSixMonths,
        }
    }

    pub fn wrap(&self) -> WrapPeriod {
        use WrapLength::{Days, Months};
        let (pre, post) = match self {
            CourseCategory::TwelveMonthsOrMore => (Months(1), Months(4)),
            CourseCategory::SixToTwelveMonths => (Months(1), Months(2)),
            CourseCategory::PreSessionalUnderSixMonths => (Months(1), Months(1)),
            CourseCategory::UnderSixMonths => (Days(7), Days(7)),
        };
        WrapPeriod { pre, post }
    }
}

/// A wrap length, either calendar months or days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum WrapLength {
    Months(u32),
    Days(u32),
}

impl WrapLength {
    pub fn before(&self, date: NaiveDate) -> Result<NaiveDate, TemporalError> {
        match *self {
            WrapLength::Months(n) => add_calendar_months(date, -(n as i32)),
            WrapLength::Days(n) => add_calendar_days(date, -i64::from(n)),
        }
    }

    pub fn after(&self, date: NaiveDate) -> Result<NaiveDate, TemporalError> {
        match *self {
            WrapLength::Months(n) => add_calendar_months(date, n as i32),
            WrapLength::Days(n) => add_calendar_days(date, i64::from(n)),
        }
    }
}

impl fmt::Display for WrapLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WrapLength::Months(1) => write!(f, "1 month"),
            WrapLength::Months(n) => write!(f, "{n} months"),
            WrapLength::Days(1) => write!(f, "1 day"),
            WrapLength::Days(n) => write!(f, "{n} days"),
        }
    }
}

/// Leave granted before and after the course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapPeriod {
    pub pre: WrapLength,
    pub post: WrapLength,
}

/// Visa processing speed purchased by the applicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisaServiceTier {
    #[default]
    Standard,
    Priority,
    SuperPriority,
}

impl FromStr for VisaServiceTier {
    type Err = IhsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "" | "standard" => Ok(VisaServiceTier::Standard),
            "priority" => Ok(VisaServiceTier::Priority),
            "superpriority" => Ok(VisaServiceTier::SuperPriority),
            _ => Err(IhsError::UnknownServiceTier(s.to_string())),
        }
    }
}

impl fmt::Display for VisaServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VisaServiceTier::Standard => "standard",
            VisaServiceTier::Priority => "priority",
            VisaServiceTier::SuperPriority => "super_priority",
        };
        write!(f, "{name}")
    }
}

/// Working days to a decision, per service tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDecisionDays {
    pub standard: u32,
    pub priority: u32,
    pub super_priority: u32,
}

impl Default for ServiceDecisionDays {
    fn default() -> Self {
        Self {
            standard: 20,
            priority: 5,
            super_priority: 1,
        }
    }
}

impl ServiceDecisionDays {
    pub fn for_tier(&self, tier: VisaServiceTier) -> u32 {
        match tier {
            VisaServiceTier::Standard => self.standard,
            VisaServiceTier::Priority => self.priority,
            VisaServiceTier::SuperPriority => self.super_priority,
        }
    }
}

/// Derived visa dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaWindow {
    pub estimated_grant_date: NaiveDate,
    pub intended_travel_date: NaiveDate,
    pub visa_start_date: NaiveDate,
    pub visa_end_date: NaiveDate,
}

impl VisaWindow {
    /// Derives the window for a course
    ///
    /// Travel defaults to the start of the pre-course wrap and can never be
    /// earlier than the grant. The visa starts at the pre-course wrap when the
    /// grant arrives at least a month before the course, otherwise a week
    /// before travel if the grant allows, otherwise on the grant date.
    pub fn derive(
        course_start: NaiveDate,
        course_end: NaiveDate,
        wrap: WrapPeriod,
        estimated_grant_date: NaiveDate,
        travel_date: Option<NaiveDate>,
    ) -> Result<Self, TemporalError> {
        let wrap_start = wrap.pre.before(course_start)?;
        let intended_travel_date = travel_date.unwrap_or(wrap_start).max(estimated_grant_date);

        let month_before_course = add_calendar_months(course_start, -1)?;
        let week_before_travel = add_calendar_days(intended_travel_date, -7)?;

        let visa_start_date = if estimated_grant_date <= month_before_course {
            wrap_start
        } else if estimated_grant_date <= week_before_travel {
            week_before_travel
        } else {
            estimated_grant_date
        };

        Ok(Self {
            estimated_grant_date,
            intended_travel_date,
            visa_start_date,
            visa_end_date: wrap.post.after(course_end)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_classification_bands() {
        assert_eq!(CourseCategory::classify(24, false), CourseCategory::TwelveMonthsOrMore);
        assert_eq!(CourseCategory::classify(12, true), CourseCategory::TwelveMonthsOrMore);
        assert_eq!(CourseCategory::classify(11, false), CourseCategory::SixToTwelveMonths);
        assert_eq!(CourseCategory::classify(6, true), CourseCategory::SixToTwelveMonths);
        assert_eq!(CourseCategory::classify(5, true), CourseCategory::PreSessionalUnderSixMonths);
        assert_eq!(CourseCategory::classify(5, false), CourseCategory::UnderSixMonths);
        assert_eq!(CourseCategory::classify(0, false), CourseCategory::UnderSixMonths);
    }

    #[test]
    fn test_wraps() {
        let wrap = CourseCategory::TwelveMonthsOrMore.wrap();
        assert_eq!(wrap.pre, WrapLength::Months(1));
        assert_eq!(wrap.post, WrapLength::Months(4));

        let wrap = CourseCategory::UnderSixMonths.wrap();
        assert_eq!(wrap.pre, WrapLength::Days(7));
        assert_eq!(wrap.post, WrapLength::Days(7));
    }

    #[test]
    fn test_service_tier_parsing() {
        assert_eq!("Super-Priority".parse::<VisaServiceTier>().unwrap(), VisaServiceTier::SuperPriority);
        assert_eq!("super_priority".parse::<VisaServiceTier>().unwrap(), VisaServiceTier::SuperPriority);
        assert_eq!(" PRIORITY ".parse::<VisaServiceTier>().unwrap(), VisaServiceTier::Priority);
        assert_eq!("".parse::<VisaServiceTier>().unwrap(), VisaServiceTier::Standard);
        assert!("express".parse::<VisaServiceTier>().is_err());
    }

    #[test]
    fn test_early_grant_starts_at_wrap() {
        let wrap = CourseCategory::TwelveMonthsOrMore.wrap();
        let window = VisaWindow::derive(d(2026, 9, 21), d(2027, 9, 20), wrap, d(2026, 7, 1), None)
            .unwrap();
        assert_eq!(window.visa_start_date, d(2026, 8, 21));
        assert_eq!(window.intended_travel_date, d(2026, 8, 21));
        assert_eq!(window.visa_end_date, d(2028, 1, 20));
    }

    #[test]
    fn test_grant_within_month_starts_week_before_travel() {
        let wrap = CourseCategory::TwelveMonthsOrMore.wrap();
        // Grant after the month-before point but a week clear of travel
        let window = VisaWindow::derive(
            d(2026, 9, 21),
            d(2027, 9, 20),
            wrap,
            d(2026, 8, 25),
            Some(d(2026, 9, 10)),
        )
        .unwrap();
        assert_eq!(window.visa_start_date, d(2026, 9, 3));
    }

    #[test]
    fn test_late_grant_starts_on_grant() {
        let wrap = CourseCategory::TwelveMonthsOrMore.wrap();
        let window = VisaWindow::derive(d(2026, 9, 21), d(2027, 9, 20), wrap, d(2026, 9, 15), None)
            .unwrap();
        // Default travel (21 Aug) is clamped forward to the grant
        assert_eq!(window.intended_travel_date, d(2026, 9, 15));
        assert_eq!(window.visa_start_date, d(2026, 9, 15));
    }

    #[test]
    fn test_short_course_day_wraps() {
        let wrap = CourseCategory::UnderSixMonths.wrap();
        let window = VisaWindow::derive(d(2026, 6, 1), d(2026, 8, 31), wrap, d(2026, 3, 1), None)
            .unwrap();
        assert_eq!(window.visa_start_date, d(2026, 5, 25));
        assert_eq!(window.visa_end_date, d(2026, 9, 7));
    }
}
