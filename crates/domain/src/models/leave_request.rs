//! Leave requests and their approval state machine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

use shared::datetime::inclusive_days;
use shared::validation::validate_date_range;

/// `pending -> approved | rejected`. Both targets are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }

    /// Whether an admin decision may move a request from `self` to `target`.
    pub fn can_transition_to(&self, target: LeaveStatus) -> bool {
        matches!(
            (self, target),
            (LeaveStatus::Pending, LeaveStatus::Approved)
                | (LeaveStatus::Pending, LeaveStatus::Rejected)
        )
    }
}

impl FromStr for LeaveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "rejected" => Ok(LeaveStatus::Rejected),
            _ => Err(format!("Invalid leave status: {}", s)),
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employee submission. The owner is always the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitLeaveRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1, max = 500, message = "Reason must be 1-500 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub reason: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100, message = "Type must be 1-100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub leave_type: String,
}

impl SubmitLeaveRequest {
    /// Field validation plus the `end_date >= start_date` rule, reported
    /// against `end_date`.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Err(err) = validate_date_range(self.start_date, self.end_date) {
            errors.add("end_date", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn days(&self) -> i64 {
        inclusive_days(self.start_date, self.end_date)
    }
}

fn validate_decision(value: &str) -> Result<(), ValidationError> {
    match value {
        "approved" | "rejected" => Ok(()),
        _ => {
            let mut err = ValidationError::new("leave_decision");
            err.message = Some("The status must be either approved or rejected".into());
            Err(err)
        }
    }
}

/// Admin decision on a pending request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLeaveStatusRequest {
    #[validate(custom(function = "validate_decision"))]
    pub status: String,
}

impl UpdateLeaveStatusRequest {
    /// The requested terminal status, if the input names one.
    pub fn decision(&self) -> Option<LeaveStatus> {
        LeaveStatus::from_str(&self.status)
            .ok()
            .filter(|s| s.is_terminal())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveRequestResponse {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub employee_code: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
    pub status: LeaveStatus,
    #[serde(rename = "type")]
    pub leave_type: String,
    pub days: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListLeaveRequestsQuery {
    pub status: Option<LeaveStatus>,
    #[serde(rename = "type")]
    pub leave_type: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
