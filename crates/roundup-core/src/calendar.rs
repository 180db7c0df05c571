//! Working-day calendar with a fixed Friday/Saturday weekend.
//!
//! No holidays are modeled: every day that is not a weekend day is a
//! working day.

use crate::error::{Result, RoundupError};
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// The two weekend days. Everything else is a working day.
pub const WEEKEND: [Weekday; 2] = [Weekday::Fri, Weekday::Sat];

/// Returns false iff `day` falls on a weekend day.
pub fn is_working_day(day: NaiveDate) -> bool {
    !WEEKEND.contains(&day.weekday())
}

/// Move `n` working days away from `start`, forward for positive `n` and
/// backward for negative `n`.
///
/// Only days that land on a working day are counted. `n == 0` returns
/// `start` as-is, even when `start` itself is a weekend day. Walking off
/// either end of the representable calendar is
/// [`RoundupError::DateOutOfRange`].
pub fn add_working_days(start: NaiveDate, n: i64) -> Result<NaiveDate> {
    let out_of_range = || RoundupError::DateOutOfRange { start, n };
    let forward = n >= 0;
    let mut remaining = n.unsigned_abs();

    // Any 7 consecutive days hold exactly 5 working days. Leave at least one
    // day to step so the walk still ends on a working day.
    let weeks = remaining.saturating_sub(1) / 5;
    let jump = Days::new(weeks.checked_mul(7).ok_or_else(out_of_range)?);
    let mut current = if forward {
        start.checked_add_days(jump)
    } else {
        start.checked_sub_days(jump)
    }
    .ok_or_else(out_of_range)?;
    remaining -= weeks * 5;

    while remaining > 0 {
        let next = if forward {
            current.succ_opt()
        } else {
            current.pred_opt()
        };
        current = next.ok_or_else(out_of_range)?;
        if is_working_day(current) {
            remaining -= 1;
        }
    }
    Ok(current)
}

/// First working day on or after `day`.
pub fn next_working_day(day: NaiveDate) -> Result<NaiveDate> {
    let mut current = day;
    while !is_working_day(current) {
        current = current
            .succ_opt()
            .ok_or(RoundupError::DateOutOfRange { start: day, n: 1 })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn add(start: NaiveDate, n: i64) -> NaiveDate {
        add_working_days(start, n).unwrap()
    }

    #[test]
    fn weekend_is_friday_and_saturday() {
        // 2025-03-02 is a Sunday.
        let sunday = d(2025, 3, 2);
        for offset in 0..7 {
            let day = sunday + TimeDelta::days(offset);
            let expected = !matches!(day.weekday(), Weekday::Fri | Weekday::Sat);
            assert_eq!(is_working_day(day), expected, "{day}");
        }
    }

    #[test]
    fn zero_offset_does_not_snap() {
        let saturday = d(2025, 3, 1);
        assert!(!is_working_day(saturday));
        assert_eq!(add(saturday, 0), saturday);
        let monday = d(2025, 3, 3);
        assert_eq!(add(monday, 0), monday);
    }

    #[test]
    fn forward_skips_weekend() {
        // Thu 2025-03-06 + 1 lands on Sun 2025-03-09.
        assert_eq!(add(d(2025, 3, 6), 1), d(2025, 3, 9));
        assert_eq!(add(d(2025, 3, 2), 10), d(2025, 3, 16));
    }

    #[test]
    fn backward_skips_weekend() {
        assert_eq!(add(d(2025, 3, 9), -1), d(2025, 3, 6));
    }

    #[test]
    fn crosses_year_boundary() {
        assert_eq!(add(d(2025, 12, 30), 3), d(2026, 1, 4));
        assert_eq!(add(d(2026, 1, 4), -3), d(2025, 12, 30));
    }

    #[test]
    fn counts_exactly_n_working_days() {
        let start = d(2024, 2, 27);
        for n in 1..40 {
            let end = add(start, n);
            assert!(is_working_day(end));
            let mut counted = 0;
            let mut day = start;
            while day < end {
                day += TimeDelta::days(1);
                if is_working_day(day) {
                    counted += 1;
                }
            }
            assert_eq!(counted, n, "n={n}");
        }
    }

    #[test]
    fn round_trip_from_working_day() {
        let start = d(2025, 5, 12);
        assert!(is_working_day(start));
        for n in -20..=20 {
            assert_eq!(add(add(start, n), -n), start);
        }
    }

    #[test]
    fn round_trip_from_weekend_does_not_return() {
        let saturday = d(2025, 3, 1);
        let there = add(saturday, 1);
        assert_eq!(there, d(2025, 3, 2));
        assert_eq!(add(there, -1), d(2025, 2, 27));
    }

    #[test]
    fn beyond_calendar_range_is_an_error() {
        let start = d(2025, 3, 2);
        assert!(matches!(
            add_working_days(start, 100_000_000),
            Err(RoundupError::DateOutOfRange { n: 100_000_000, .. })
        ));
        assert!(matches!(
            add_working_days(start, -100_000_000),
            Err(RoundupError::DateOutOfRange { .. })
        ));
        assert!(add_working_days(NaiveDate::MAX, 1).is_err());
        assert!(add_working_days(NaiveDate::MIN, -1).is_err());
        assert!(add_working_days(start, i64::MAX).is_err());
        assert!(add_working_days(start, i64::MIN).is_err());
    }

    #[test]
    fn long_walks_match_single_steps() {
        for start in [d(2025, 3, 1), d(2025, 3, 2), d(2025, 3, 7)] {
            for n in [-400i64, -37, -6, 6, 11, 250, 1000] {
                let mut day = start;
                let mut left = n.abs();
                while left > 0 {
                    day += TimeDelta::days(n.signum());
                    if is_working_day(day) {
                        left -= 1;
                    }
                }
                assert_eq!(add(start, n), day, "start={start} n={n}");
            }
        }
    }

    #[test]
    fn next_working_day_snaps_forward() {
        assert_eq!(next_working_day(d(2025, 8, 1)).unwrap(), d(2025, 8, 3));
        assert_eq!(next_working_day(d(2025, 8, 4)).unwrap(), d(2025, 8, 4));
    }
}
