//! Cross-field checks shared by create DTOs and merged updates.

use anyhow::anyhow;
use campus_erp_core::AppError;
use chrono::NaiveDate;
use validator::ValidationError;

/// Fails when `end` falls before `start`.
pub fn date_order(
    start: NaiveDate,
    end: NaiveDate,
    fields: (&'static str, &'static str),
) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::new("date_order")
            .with_message(format!("{} must not be before {}", fields.1, fields.0).into()));
    }
    Ok(())
}

/// [`date_order`] for values assembled in a service, where a failure is a 422.
pub fn ensure_date_order(
    start: NaiveDate,
    end: NaiveDate,
    fields: (&'static str, &'static str),
) -> Result<(), AppError> {
    date_order(start, end, fields).map_err(unprocessable)
}

/// Turns a rule failure found outside the extractor into a 422.
pub fn unprocessable(err: ValidationError) -> AppError {
    let message = err
        .message
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string());
    AppError::unprocessable(anyhow!("{}", message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_same_day_is_allowed() {
        assert!(date_order(day(5), day(5), ("start_date", "end_date")).is_ok());
    }

    #[test]
    fn test_reversed_dates_fail() {
        let err = date_order(day(6), day(5), ("borrow_date", "due_date")).unwrap_err();
        assert_eq!(
            err.message.unwrap(),
            "due_date must not be before borrow_date"
        );
    }

    #[test]
    fn test_ensure_date_order_is_unprocessable() {
        let err = ensure_date_order(day(6), day(5), ("start_date", "end_date")).unwrap_err();
        assert_eq!(err.status.as_u16(), 422);
        assert_eq!(err.message(), "end_date must not be before start_date");
    }
}
