//! Error types for the calendar core.

/// Error type for the fallible calendar operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a month number is outside `1..=12`.
    #[error("month must be in 1..=12, got {month}")]
    InvalidMonth {
        /// The rejected month number.
        month: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_month() {
        let e = CalendarError::InvalidMonth { month: 13 };
        assert_eq!(e.to_string(), "month must be in 1..=12, got 13");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<CalendarError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<CalendarError>();
    }

    #[test]
    fn error_converts_into_anyhow() {
        fn fails() -> anyhow::Result<u32> {
            let days = crate::calendar::days_in_month(0, 2024)?;
            Ok(days)
        }
        let err = fails().expect_err("should fail");
        assert!(err.downcast_ref::<CalendarError>().is_some());
    }
}
