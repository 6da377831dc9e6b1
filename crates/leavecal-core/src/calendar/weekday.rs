use chrono::Weekday;

use super::month_length::check_month;
use crate::error::CalendarError;

/// Sunday-first week; index is days since Sunday.
const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Per-month shift of Sakamoto's weekday formula.
const MONTH_SHIFT: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

/// Length of the Gregorian cycle in years. 146097 days, a whole number of weeks.
const GREGORIAN_CYCLE_YEARS: i64 = 400;

/// Weekday on which the 1st of `month` falls in the proleptic Gregorian calendar.
pub fn first_weekday_of_month(month: u32, year: i64) -> Result<Weekday, CalendarError> {
    check_month(month)?;

    // Weekdays repeat every cycle, so only the year's position inside one matters.
    // Shifted by a full cycle so that `y - 1` below stays non-negative.
    let mut y = year.rem_euclid(GREGORIAN_CYCLE_YEARS) + GREGORIAN_CYCLE_YEARS;
    if month < 3 {
        y -= 1;
    }
    let index = (y + y / 4 - y / 100 + y / 400 + MONTH_SHIFT[(month - 1) as usize] + 1).rem_euclid(7);

    Ok(SUNDAY_FIRST[index as usize])
}

/// Zero-based column of the 1st of `month`, 0 = Sunday .. 6 = Saturday.
pub fn weekday_offset(month: u32, year: i64) -> Result<u32, CalendarError> {
    let weekday = first_weekday_of_month(month, year)?;
    Ok(weekday.num_days_from_sunday())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate};
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn known_first_weekdays() {
        assert_eq!(first_weekday_of_month(1, 2024), Ok(Weekday::Mon));
        assert_eq!(first_weekday_of_month(1, 2023), Ok(Weekday::Sun));
        assert_eq!(first_weekday_of_month(2, 2024), Ok(Weekday::Thu));
        assert_eq!(first_weekday_of_month(3, 2024), Ok(Weekday::Fri));
        assert_eq!(first_weekday_of_month(9, 2001), Ok(Weekday::Sat));
    }

    #[test]
    fn offsets_are_sunday_based() {
        assert_eq!(weekday_offset(1, 2024), Ok(1));
        assert_eq!(weekday_offset(1, 2023), Ok(0));
        assert_eq!(weekday_offset(2, 2024), Ok(4));
        assert_eq!(weekday_offset(6, 2024), Ok(6));
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert_eq!(weekday_offset(0, 2024), Err(CalendarError::InvalidMonth { month: 0 }));
        assert_eq!(
            first_weekday_of_month(42, 2024),
            Err(CalendarError::InvalidMonth { month: 42 })
        );
    }

    #[test]
    fn extreme_years_do_not_panic() {
        for month in 1..=12 {
            assert!(weekday_offset(month, i64::MIN).is_ok());
            assert!(weekday_offset(month, i64::MAX).is_ok());
        }
    }

    proptest! {
        #[test]
        fn matches_chrono(year in -200_000_i32..200_000, month in 1_u32..=12) {
            let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid date");
            prop_assert_eq!(
                weekday_offset(month, i64::from(year)),
                Ok(first.weekday().num_days_from_sunday())
            );
        }

        #[test]
        fn repeats_every_cycle(year in -1_000_000_000_i64..1_000_000_000, month in 1_u32..=12) {
            prop_assert_eq!(
                weekday_offset(month, year),
                weekday_offset(month, year + GREGORIAN_CYCLE_YEARS)
            );
        }
    }
}
