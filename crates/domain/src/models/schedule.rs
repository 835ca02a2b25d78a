//! Shared company calendar.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How far ahead `/schedules/upcoming` looks, in days.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Inclusive `[today, today + 7 days]` window.
pub fn upcoming_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today, today + Duration::days(UPCOMING_WINDOW_DAYS))
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScheduleRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,
    pub date: NaiveDate,
    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub time: String,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateScheduleRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    #[validate(custom(function = "shared::validation::validate_time_of_day"))]
    pub time: Option<String>,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub time: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upcoming_window() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        let (from, to) = upcoming_window(today);
        assert_eq!(from, today);
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
    }

    #[test]
    fn test_create_validates_time() {
        let mut req = CreateScheduleRequest {
            title: "All hands".into(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            time: "09:30".into(),
            description: None,
        };
        assert!(req.validate().is_ok());

        req.time = "9:30 am".into();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("time"));
    }

    #[test]
    fn test_partial_update_accepts_empty_body() {
        let req: UpdateScheduleRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
        assert!(req.title.is_none());
    }

    #[test]
    fn test_partial_update_checks_present_fields() {
        let req = UpdateScheduleRequest {
            time: Some("noon".into()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
