//! Unit tests for the temporal module
//!
//! Tests cover day and month counting, month/working-day arithmetic,
//! DateRange, Timezone, and lenient parsing.

use core_kernel::{
    DateRange, Timezone, TemporalError, add_calendar_days, add_calendar_months,
    add_working_days, calendar_months_elapsed, days_between, months_approx,
    parse_date_lenient,
};
use chrono::{Datelike, NaiveDate, TimeZone, Utc, Weekday};
use proptest::prelude::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

mod day_counts {
    use super::*;

    #[test]
    fn test_days_between_same_day_is_zero() {
        assert_eq!(days_between(d(2026, 1, 1), d(2026, 1, 1)), 0);
    }

    #[test]
    fn test_days_between_crosses_leap_day() {
        assert_eq!(days_between(d(2028, 2, 28), d(2028, 3, 1)), 2);
    }

    #[test]
    fn test_days_between_reversed_is_zero() {
        assert_eq!(days_between(d(2026, 6, 1), d(2026, 1, 1)), 0);
    }
}

mod month_counts {
    use super::*;

    #[test]
    fn test_months_approx_rounds_up() {
        // 31 days / 30.44 = 1.02 -> 2
        assert_eq!(months_approx(d(2026, 1, 1), d(2026, 2, 1), 9), 2);
        // 30 days -> 1
        assert_eq!(months_approx(d(2026, 4, 1), d(2026, 5, 1), 9), 1);
    }

    #[test]
    fn test_months_approx_never_exceeds_cap() {
        for cap in 1..=12 {
            let m = months_approx(d(2026, 1, 1), d(2029, 1, 1), cap);
            assert_eq!(m, cap);
        }
    }

    #[test]
    fn test_months_approx_reversed_dates_is_one() {
        assert_eq!(months_approx(d(2026, 6, 1), d(2026, 1, 1), 9), 1);
    }

    #[test]
    fn test_calendar_months_month_end_start() {
        assert_eq!(calendar_months_elapsed(d(2026, 1, 31), d(2026, 2, 28)), 0);
        assert_eq!(calendar_months_elapsed(d(2026, 1, 31), d(2026, 3, 31)), 2);
    }

    #[test]
    fn test_calendar_months_across_years() {
        assert_eq!(calendar_months_elapsed(d(2025, 12, 1), d(2027, 4, 30)), 16);
        assert_eq!(calendar_months_elapsed(d(2025, 9, 20), d(2026, 9, 19)), 11);
        assert_eq!(calendar_months_elapsed(d(2025, 9, 20), d(2026, 9, 20)), 12);
    }
}

mod month_arithmetic {
    use super::*;

    #[test]
    fn test_add_months_across_year_boundary() {
        assert_eq!(add_calendar_months(d(2026, 12, 31), 4).unwrap(), d(2027, 4, 30));
        assert_eq!(add_calendar_months(d(2026, 1, 1), -1).unwrap(), d(2025, 12, 1));
    }

    #[test]
    fn test_add_zero_months_is_identity() {
        assert_eq!(add_calendar_months(d(2026, 5, 17), 0).unwrap(), d(2026, 5, 17));
    }

    #[test]
    fn test_add_months_out_of_range() {
        let result = add_calendar_months(NaiveDate::MAX, 1);
        assert!(matches!(result, Err(TemporalError::OutOfRange(_))));
    }
}

mod working_days {
    use super::*;

    #[test]
    fn test_twenty_working_days_is_four_weeks_from_monday() {
        // 2026-01-05 is a Monday
        assert_eq!(add_working_days(d(2026, 1, 5), 20).unwrap(), d(2026, 2, 2));
    }

    #[test]
    fn test_from_saturday_next_working_day_is_monday() {
        assert_eq!(add_working_days(d(2026, 1, 17), 1).unwrap(), d(2026, 1, 19));
    }

    #[test]
    fn test_thursday_plus_one_is_friday() {
        assert_eq!(add_working_days(d(2026, 1, 15), 1).unwrap(), d(2026, 1, 16));
    }

    #[test]
    fn test_whole_weeks_from_weekend_land_on_friday() {
        // Saturday and Sunday 17/18 January 2026
        assert_eq!(add_working_days(d(2026, 1, 17), 5).unwrap(), d(2026, 1, 23));
        assert_eq!(add_working_days(d(2026, 1, 18), 10).unwrap(), d(2026, 1, 30));
    }

    #[test]
    fn test_huge_count_is_out_of_range() {
        let result = add_working_days(d(2026, 1, 15), u32::MAX);
        assert!(matches!(result, Err(TemporalError::OutOfRange(_))));
    }

    /// One day at a time, for comparison
    fn stepwise(date: NaiveDate, n: u32) -> NaiveDate {
        let mut current = date;
        let mut added = 0;
        while added < n {
            current = current.succ_opt().unwrap();
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                added += 1;
            }
        }
        current
    }

    proptest! {
        #[test]
        fn prop_matches_stepwise(offset in 0i64..3650, n in 0u32..400) {
            let start = d(2024, 1, 1) + chrono::Duration::days(offset);
            prop_assert_eq!(add_working_days(start, n).unwrap(), stepwise(start, n));
        }
    }
}

mod calendar_days {
    use super::*;

    #[test]
    fn test_add_and_subtract() {
        assert_eq!(add_calendar_days(d(2026, 2, 27), 2).unwrap(), d(2026, 3, 1));
        assert_eq!(add_calendar_days(d(2026, 3, 1), -2).unwrap(), d(2026, 2, 27));
    }

    #[test]
    fn test_out_of_range() {
        assert!(add_calendar_days(NaiveDate::MIN, -1).is_err());
    }
}

mod date_range {
    use super::*;

    #[test]
    fn test_rejects_inverted_range() {
        let result = DateRange::new(d(2026, 12, 31), d(2026, 1, 1));
        assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_single_day_range() {
        let r = DateRange::new(d(2026, 1, 1), d(2026, 1, 1)).unwrap();
        assert_eq!(r.inclusive_calendar_months(), 0);
    }

    #[test]
    fn test_inclusive_months_short_course() {
        let r = DateRange::new(d(2026, 1, 15), d(2026, 7, 14)).unwrap();
        assert_eq!(r.inclusive_calendar_months(), 6);
        let r = DateRange::new(d(2026, 1, 15), d(2026, 7, 13)).unwrap();
        assert_eq!(r.inclusive_calendar_months(), 5);
    }
}

mod timezone {
    use super::*;

    #[test]
    fn test_parse_and_serialize() {
        let tz: Timezone = "Europe/London".parse().unwrap();
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"Europe/London\"");
    }

    #[test]
    fn test_invalid_timezone() {
        let result: Result<Timezone, _> = "Mars/Olympus".parse();
        assert!(matches!(result, Err(TemporalError::InvalidTimezone(_))));
    }

    #[test]
    fn test_london_midnight_in_summer() {
        let tz: Timezone = "Europe/London".parse().unwrap();
        let instant = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        // BST is UTC+1, so local midnight is 23:00 UTC the previous evening
        assert_eq!(
            tz.next_midnight(instant),
            Utc.with_ymd_and_hms(2026, 7, 1, 23, 0, 0).unwrap()
        );
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_blank_is_absent() {
        assert_eq!(parse_date_lenient(""), None);
    }

    #[test]
    fn test_impossible_date_is_absent() {
        assert_eq!(parse_date_lenient("2026-02-30"), None);
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(parse_date_lenient(" 2026-12-31 "), Some(d(2026, 12, 31)));
    }
}
