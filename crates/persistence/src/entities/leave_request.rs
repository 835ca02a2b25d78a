//! Leave request entities (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::leave_request::{LeaveRequestResponse, LeaveStatus};
use shared::datetime::{format_date, format_datetime, inclusive_days};
use sqlx::FromRow;

/// Database enum for `leave_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "leave_status", rename_all = "lowercase")]
pub enum LeaveStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<LeaveStatusDb> for LeaveStatus {
    fn from(status: LeaveStatusDb) -> Self {
        match status {
            LeaveStatusDb::Pending => LeaveStatus::Pending,
            LeaveStatusDb::Approved => LeaveStatus::Approved,
            LeaveStatusDb::Rejected => LeaveStatus::Rejected,
        }
    }
}

impl From<LeaveStatus> for LeaveStatusDb {
    fn from(status: LeaveStatus) -> Self {
        match status {
            LeaveStatus::Pending => LeaveStatusDb::Pending,
            LeaveStatus::Approved => LeaveStatusDb::Approved,
            LeaveStatus::Rejected => LeaveStatusDb::Rejected,
        }
    }
}

/// Row of the `leave_requests` table.
#[derive(Debug, Clone, FromRow)]
pub struct LeaveRequestEntity {
    pub id: i64,
    pub employee_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub leave_type: String,
    pub status: LeaveStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Leave request joined with the owning employee and user.
#[derive(Debug, Clone, FromRow)]
pub struct LeaveRequestWithEmployeeEntity {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub employee_code: Option<String>,
    pub user_id: i64,
    pub user_email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub leave_type: String,
    pub status: LeaveStatusDb,
    pub created_at: DateTime<Utc>,
}

impl LeaveRequestWithEmployeeEntity {
    pub fn days(&self) -> i64 {
        inclusive_days(self.start_date, self.end_date)
    }
}

impl From<LeaveRequestWithEmployeeEntity> for LeaveRequestResponse {
    fn from(entity: LeaveRequestWithEmployeeEntity) -> Self {
        let days = entity.days();
        Self {
            id: entity.id,
            employee_id: entity.employee_id,
            employee_name: entity.employee_name,
            employee_code: entity.employee_code,
            start_date: format_date(entity.start_date),
            end_date: format_date(entity.end_date),
            reason: entity.reason,
            status: entity.status.into(),
            leave_type: entity.leave_type,
            days,
            created_at: format_datetime(entity.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entity(start: NaiveDate, end: NaiveDate) -> LeaveRequestWithEmployeeEntity {
        LeaveRequestWithEmployeeEntity {
            id: 1,
            employee_id: 2,
            employee_name: "Jane".into(),
            employee_code: Some("EMP-00002".into()),
            user_id: 3,
            user_email: "jane@example.com".into(),
            start_date: start,
            end_date: end,
            reason: "Rest".into(),
            leave_type: "annual".into(),
            status: LeaveStatusDb::Pending,
            created_at: Utc.with_ymd_and_hms(2024, 4, 2, 14, 5, 0).unwrap(),
        }
    }

    #[test]
    fn test_response_fields() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 4, 12).unwrap();
        let response = LeaveRequestResponse::from(entity(start, end));

        assert_eq!(response.days, 3);
        assert_eq!(response.start_date, "10/04/2024");
        assert_eq!(response.end_date, "12/04/2024");
        assert_eq!(response.created_at, "02/04/2024 14:05");
        assert_eq!(response.status, LeaveStatus::Pending);
    }

    #[test]
    fn test_single_day() {
        let day = NaiveDate::from_ymd_opt(2024, 4, 10).unwrap();
        assert_eq!(entity(day, day).days(), 1);
    }
}
