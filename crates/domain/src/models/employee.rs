//! Employee directory models.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::user::Role;
use super::{EMPLOYEE_CODE_REGEX, PHONE_REGEX};

/// Prefix of generated employee codes.
pub const EMPLOYEE_CODE_PREFIX: &str = "EMP-";

/// Employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Terminated,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Terminated => "terminated",
        }
    }
}

impl Default for EmployeeStatus {
    fn default() -> Self {
        EmployeeStatus::Active
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `EMP-` followed by `sequence` zero-padded to five digits.
///
/// ```
/// assert_eq!(domain::models::employee::format_employee_code(42), "EMP-00042");
/// ```
pub fn format_employee_code(sequence: i64) -> String {
    format!("{}{:05}", EMPLOYEE_CODE_PREFIX, sequence)
}

/// Employee fields embedded in profile and identity responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeSummary {
    pub id: i64,
    pub employee_code: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub status: EmployeeStatus,
}

/// Directory entry: employee joined with its user account.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub employee_code: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub status: EmployeeStatus,
    pub created_at: String,
}

/// Hire: creates the user account and its employee profile together.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    #[validate(email(message = "The email must be a valid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,
    /// When omitted a one-time password is generated and the account must
    /// change it on first use.
    #[validate(length(min = 6, message = "The password must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
    #[validate(length(min = 1, max = 50, message = "Employee code must be 1-50 characters"))]
    #[validate(regex(path = *EMPLOYEE_CODE_REGEX, message = "Employee code may only contain letters, digits and dashes"))]
    pub employee_code: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Position must be 1-255 characters"))]
    pub position: String,
    #[validate(length(min = 1, max = 255, message = "Department must be 1-255 characters"))]
    pub department: String,
    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    #[validate(regex(path = *PHONE_REGEX, message = "Phone may only contain digits, spaces and + ( ) -"))]
    pub phone: Option<String>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    #[validate(email(message = "The email must be a valid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,
    #[validate(length(min = 6, message = "The password must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
    #[validate(length(min = 1, max = 50, message = "Employee code must be 1-50 characters"))]
    #[validate(regex(path = *EMPLOYEE_CODE_REGEX, message = "Employee code may only contain letters, digits and dashes"))]
    pub employee_code: String,
    #[validate(length(min = 1, max = 255, message = "Position must be 1-255 characters"))]
    pub position: String,
    #[validate(length(min = 1, max = 255, message = "Department must be 1-255 characters"))]
    pub department: String,
    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    #[validate(regex(path = *PHONE_REGEX, message = "Phone may only contain digits, spaces and + ( ) -"))]
    pub phone: Option<String>,
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateEmployeeResponse {
    pub message: String,
    pub data: EmployeeResponse,
    /// Present only when the server generated the password. Shown once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEmployeesQuery {
    pub status: Option<EmployeeStatus>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl ListEmployeesQuery {
    /// Search term with surrounding whitespace removed; blank counts as absent.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            password: None,
            role: None,
            employee_code: None,
            position: "Engineer".into(),
            department: "R&D".into(),
            phone: Some("+1 (555) 010-2030".into()),
            status: None,
        }
    }

    #[test]
    fn test_employee_code_format() {
        assert_eq!(format_employee_code(1), "EMP-00001");
        assert_eq!(format_employee_code(12345), "EMP-12345");
        assert_eq!(format_employee_code(123456), "EMP-123456");
    }

    #[test]
    fn test_create_without_password_is_valid() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_create_rejects_short_password() {
        let mut req = valid_create();
        req.password = Some("12345".into());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_rejects_bad_code() {
        let mut req = valid_create();
        req.employee_code = Some("EMP 001".into());
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("employee_code"));
    }

    #[test]
    fn test_create_requires_position() {
        let mut req = valid_create();
        req.position = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_status_serde() {
        let status: EmployeeStatus = serde_json::from_str("\"terminated\"").unwrap();
        assert_eq!(status, EmployeeStatus::Terminated);
        assert_eq!(EmployeeStatus::default().to_string(), "active");
    }

    #[test]
    fn test_search_term_trimmed() {
        let query = ListEmployeesQuery {
            search: Some("  eng ".into()),
            ..Default::default()
        };
        assert_eq!(query.search_term(), Some("eng"));

        let blank = ListEmployeesQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(blank.search_term(), None);
    }

    #[test]
    fn test_create_response_hides_absent_password() {
        let response = CreateEmployeeResponse {
            message: "Employee created".into(),
            data: EmployeeResponse {
                id: 1,
                user_id: 1,
                name: "Jane".into(),
                email: "jane@example.com".into(),
                role: Role::Employee,
                employee_code: Some("EMP-00001".into()),
                position: None,
                department: None,
                phone: None,
                status: EmployeeStatus::Active,
                created_at: "01/01/2024 09:00".into(),
            },
            temporary_password: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("temporary_password").is_none());
    }
}
