//! Domain models for StaffHub.

pub mod dashboard;
pub mod employee;
pub mod leave_request;
pub mod notification;
pub mod profile;
pub mod salary;
pub mod schedule;
pub mod user;

use serde::{Deserialize, Serialize};

pub use employee::{EmployeeStatus, EmployeeSummary};
pub use leave_request::LeaveStatus;
pub use notification::NotificationDraft;
pub use user::{CurrentUser, Role, UserSummary};

lazy_static::lazy_static! {
    static ref PHONE_REGEX: regex::Regex =
        regex::Regex::new(r"^[0-9+()\-\s]{3,50}$").unwrap();
    static ref EMPLOYEE_CODE_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9-]+$").unwrap();
}

/// `page` / `per_page` for list endpoints with no other filters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// `{data, count}` envelope for short, unpaginated lists.
#[derive(Debug, Clone, Serialize)]
pub struct Collection<T> {
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> Collection<T> {
    pub fn new(data: Vec<T>) -> Self {
        let count = data.len();
        Self { data, count }
    }
}

/// `{message, data}` envelope for mutations.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// `{data}` envelope for single reads.
#[derive(Debug, Clone, Serialize)]
pub struct Data<T> {
    pub data: T,
}

/// `{message}` body for deletes and other bodiless successes.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
