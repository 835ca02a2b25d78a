//! Field validators shared by request DTOs.
//!
//! Each returns a `ValidationError` with a human-readable message so the API
//! layer can surface it verbatim in the `details` array.

use chrono::NaiveDate;
use validator::ValidationError;

use crate::datetime::parse_time;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "This field cannot be blank"))
    } else {
        Ok(())
    }
}

/// Accepts `HH:MM` in 24-hour time.
pub fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    match parse_time(value) {
        Some(_) => Ok(()),
        None => Err(error("time_format", "Time must use the HH:MM format")),
    }
}

/// Checks that `end` is not before `start`.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        Err(error(
            "date_range",
            "The end date must be a date after or equal to start date",
        ))
    } else {
        Ok(())
    }
}

/// Canonical form for stored and compared e-mail addresses.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Annual").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_time_of_day() {
        assert!(validate_time_of_day("00:00").is_ok());
        assert!(validate_time_of_day("23:59").is_ok());
        assert!(validate_time_of_day("24:00").is_err());
        assert!(validate_time_of_day("9am").is_err());
    }

    #[test]
    fn test_date_range() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        assert!(validate_date_range(a, b).is_ok());
        assert!(validate_date_range(a, a).is_ok());

        let err = validate_date_range(b, a).unwrap_err();
        assert_eq!(err.code, "date_range");
        assert!(err.message.is_some());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }
}
