use crate::error::CalendarError;

const MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Gregorian leap year rule, valid for negative (BCE, astronomical) years too.
#[must_use]
pub fn is_leap_year(year: i64) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

pub(crate) fn check_month(month: u32) -> Result<(), CalendarError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(CalendarError::InvalidMonth { month })
    }
}

/// Number of days in `month` (1-based) of `year`.
pub fn days_in_month(month: u32, year: i64) -> Result<u32, CalendarError> {
    check_month(month)?;
    let base = MONTH_LENGTHS[(month - 1) as usize];
    if month == 2 && is_leap_year(year) {
        Ok(base + 1)
    } else {
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate};
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn known_month_lengths() {
        assert_eq!(days_in_month(2, 2024), Ok(29));
        assert_eq!(days_in_month(2, 2023), Ok(28));
        assert_eq!(days_in_month(4, 2024), Ok(30));
        assert_eq!(days_in_month(1, 2024), Ok(31));
        assert_eq!(days_in_month(12, 2024), Ok(31));
    }

    #[test]
    fn century_leap_rule() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2100));
        assert!(is_leap_year(2400));
        assert_eq!(days_in_month(2, 1900), Ok(28));
        assert_eq!(days_in_month(2, 2000), Ok(29));
    }

    #[test]
    fn negative_years_follow_proleptic_rule() {
        // Astronomical year 0 is 1 BCE and is a leap year.
        assert!(is_leap_year(0));
        assert!(is_leap_year(-4));
        assert!(!is_leap_year(-100));
        assert!(is_leap_year(-400));
        assert_eq!(days_in_month(2, -400), Ok(29));
    }

    #[test]
    fn extreme_years_do_not_panic() {
        assert!(days_in_month(2, i64::MIN).is_ok());
        assert!(days_in_month(2, i64::MAX).is_ok());
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert_eq!(days_in_month(0, 2024), Err(CalendarError::InvalidMonth { month: 0 }));
        assert_eq!(days_in_month(13, 2024), Err(CalendarError::InvalidMonth { month: 13 }));
    }

    fn chrono_month_length(year: i32, month: u32) -> u32 {
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .expect("valid date")
            .day()
    }

    proptest! {
        #[test]
        fn matches_chrono(year in -9999_i32..9999, month in 1_u32..=12) {
            prop_assert_eq!(
                days_in_month(month, i64::from(year)),
                Ok(chrono_month_length(year, month))
            );
        }

        #[test]
        fn always_between_28_and_31(year in any::<i64>(), month in 1_u32..=12) {
            let days = days_in_month(month, year).expect("valid month");
            prop_assert!((28..=31).contains(&days));
        }
    }
}
