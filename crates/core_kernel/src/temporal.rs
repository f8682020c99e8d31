//! Calendar arithmetic for course, statement, and visa periods
//!
//! All domain dates are `NaiveDate`s: a course starts on a calendar day, not
//! at an instant. The only place an instant matters is "today", which depends
//! on the caller's timezone and is resolved through [`Timezone`] and [`Clock`].

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Average month length used by the maintenance month approximation
pub const AVERAGE_MONTH_DAYS: Decimal = dec!(30.44);

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Date arithmetic out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Timezone wrapper used to resolve "today" for the caller
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timezone::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s.trim())
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Returns the local calendar date at the given instant
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }

    /// Returns the first instant of the local day after `instant`, in UTC
    ///
    /// Used as the expiry of anything memoised "for today". When the local
    /// midnight does not exist (DST gap) the next day starts 24 hours later.
    pub fn next_midnight(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let tomorrow = self.date_at(instant).succ_opt();
        tomorrow
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .and_then(|naive| naive.and_local_timezone(self.0).earliest())
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| instant + Duration::hours(24))
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Source of the current instant
///
/// Injected wherever "now" matters so tests can pin the date.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Today's date in the given timezone
    fn today(&self, tz: &Timezone) -> NaiveDate {
        tz.date_at(self.now())
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// An inclusive calendar date range, e.g. a course from CAS start to end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Calendar months covered, counting the last day as part of the range
    ///
    /// A range from 1 January to 31 December is 12 months.
    pub fn inclusive_calendar_months(&self) -> u32 {
        match self.end.succ_opt() {
            Some(day_after) => calendar_months_elapsed(self.start, day_after),
            None => calendar_months_elapsed(self.start, self.end),
        }
    }
}

/// Non-negative whole days from `a` to `b`
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().max(0)
}

/// Month count approximated as `ceil(days / 30.44)`, at least 1, at most `cap`
///
/// This mirrors the Home Office maintenance guidance and is not a calendar
/// month count; use [`calendar_months_elapsed`] for that.
pub fn months_approx(a: NaiveDate, b: NaiveDate, cap: u32) -> u32 {
    let days = Decimal::from(days_between(a, b));
    let months = (days / AVERAGE_MONTH_DAYS).ceil().to_u32().unwrap_or(u32::MAX);
    months.max(1).min(cap)
}

/// Whole calendar months from `a` to `b`, like spreadsheet `DATEDIF(a, b, "m")`
///
/// A month only counts once the day-of-month has been reached again, so
/// 15 January to 14 March is 1 month. Returns 0 when `b` precedes `a`.
pub fn calendar_months_elapsed(a: NaiveDate, b: NaiveDate) -> u32 {
    if b < a {
        return 0;
    }
    let mut months = (b.year() - a.year()) * 12 + b.month() as i32 - a.month() as i32;
    if b.day() < a.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// Adds `n` calendar months (negative subtracts), clamping the day to the
/// target month's last day: 31 January + 1 month is 28 or 29 February.
pub fn add_calendar_months(date: NaiveDate, n: i32) -> Result<NaiveDate, TemporalError> {
    let shifted = if n >= 0 {
        date.checked_add_months(Months::new(n as u32))
    } else {
        date.checked_sub_months(Months::new(n.unsigned_abs()))
    };
    shifted.ok_or_else(|| TemporalError::OutOfRange(format!("{date} {n:+} months")))
}

/// Adds `n` business days (Monday to Friday), skipping weekends
///
/// Zero returns `date` unchanged even when it falls on a weekend. Whole
/// weeks are added in one step, so large counts fail fast with `OutOfRange`.
pub fn add_working_days(date: NaiveDate, n: u32) -> Result<NaiveDate, TemporalError> {
    if n == 0 {
        return Ok(date);
    }
    let out_of_range = || TemporalError::OutOfRange(format!("{date} + {n} working days"));

    // From a weekend the next working day is Monday, as it is from Friday
    let mut current = match date.weekday() {
        Weekday::Sat => date.pred_opt().ok_or_else(out_of_range)?,
        Weekday::Sun => date
            .pred_opt()
            .and_then(|d| d.pred_opt())
            .ok_or_else(out_of_range)?,
        _ => date,
    };

    current = current
        .checked_add_days(Days::new(u64::from(n / 5) * 7))
        .ok_or_else(out_of_range)?;

    let mut added = 0;
    while added < n % 5 {
        current = current.succ_opt().ok_or_else(out_of_range)?;
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            added += 1;
        }
    }
    Ok(current)
}

/// Adds `n` calendar days; negative values move backwards
pub fn add_calendar_days(date: NaiveDate, n: i64) -> Result<NaiveDate, TemporalError> {
    Duration::try_days(n)
        .and_then(|d| date.checked_add_signed(d))
        .ok_or_else(|| TemporalError::OutOfRange(format!("{date} {n:+} days")))
}

/// Parses a form-supplied date, treating blank or malformed input as absent
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time part
/// (`2026-01-15T00:00:00Z`), which is ignored.
pub fn parse_date_lenient(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_days_between_clamps_negative() {
        assert_eq!(days_between(d(2026, 1, 1), d(2026, 1, 31)), 30);
        assert_eq!(days_between(d(2026, 1, 31), d(2026, 1, 1)), 0);
    }

    #[test]
    fn test_months_approx_full_year() {
        assert_eq!(months_approx(d(2026, 1, 1), d(2026, 12, 31), 12), 12);
        assert_eq!(months_approx(d(2026, 1, 1), d(2026, 12, 31), 9), 9);
    }

    #[test]
    fn test_months_approx_minimum_one() {
        assert_eq!(months_approx(d(2026, 1, 1), d(2026, 1, 1), 9), 1);
    }

    #[test]
    fn test_calendar_months_day_rollover() {
        assert_eq!(calendar_months_elapsed(d(2026, 1, 15), d(2026, 3, 14)), 1);
        assert_eq!(calendar_months_elapsed(d(2026, 1, 15), d(2026, 3, 15)), 2);
        assert_eq!(calendar_months_elapsed(d(2026, 1, 1), d(2026, 12, 31)), 11);
        assert_eq!(calendar_months_elapsed(d(2026, 3, 1), d(2026, 1, 1)), 0);
    }

    #[test]
    fn test_add_calendar_months_clamps() {
        assert_eq!(add_calendar_months(d(2026, 1, 31), 1).unwrap(), d(2026, 2, 28));
        assert_eq!(add_calendar_months(d(2028, 1, 31), 1).unwrap(), d(2028, 2, 29));
        assert_eq!(add_calendar_months(d(2026, 3, 31), -1).unwrap(), d(2026, 2, 28));
    }

    #[test]
    fn test_add_working_days_skips_weekend() {
        // 2026-01-16 is a Friday
        assert_eq!(add_working_days(d(2026, 1, 16), 1).unwrap(), d(2026, 1, 19));
        assert_eq!(add_working_days(d(2026, 1, 16), 5).unwrap(), d(2026, 1, 23));
        assert_eq!(add_working_days(d(2026, 1, 17), 0).unwrap(), d(2026, 1, 17));
    }

    #[test]
    fn test_add_calendar_days_signed() {
        assert_eq!(add_calendar_days(d(2026, 1, 1), -7).unwrap(), d(2025, 12, 25));
        assert_eq!(add_calendar_days(d(2026, 12, 31), 7).unwrap(), d(2027, 1, 7));
    }

    #[test]
    fn test_parse_date_lenient() {
        assert_eq!(parse_date_lenient("2026-01-15"), Some(d(2026, 1, 15)));
        assert_eq!(parse_date_lenient("2026-01-15T10:00:00Z"), Some(d(2026, 1, 15)));
        assert_eq!(parse_date_lenient("  "), None);
        assert_eq!(parse_date_lenient("15/01/2026"), None);
    }

    #[test]
    fn test_inclusive_calendar_months() {
        let year = DateRange::new(d(2026, 1, 1), d(2026, 12, 31)).unwrap();
        assert_eq!(year.inclusive_calendar_months(), 12);
    }

    #[test]
    fn test_timezone_today_and_midnight() {
        let tz = Timezone::from_str("Asia/Kolkata").unwrap();
        // 20:00 UTC is already the next day in India (UTC+5:30)
        let instant = Utc.with_ymd_and_hms(2026, 1, 14, 20, 0, 0).unwrap();
        assert_eq!(tz.date_at(instant), d(2026, 1, 15));
        assert_eq!(
            tz.next_midnight(instant),
            Utc.with_ymd_and_hms(2026, 1, 15, 18, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_fixed_clock_today() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap());
        assert_eq!(clock.today(&Timezone::default()), d(2026, 1, 15));
    }
}
