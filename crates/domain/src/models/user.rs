//! Accounts, credentials and the authenticated identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::employee::EmployeeSummary;

/// Account role. Admins run the directory and approve leave; employees
/// manage their own requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Employee
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of the caller, resolved once per request by the auth middleware
/// and handed explicitly to every handler and service that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Linked employee profile, if one exists.
    pub employee_id: Option<i64>,
    pub password_reset_required: bool,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "The email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required"))]
    pub password: String,
}

/// Self-registration. The role is always `employee`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    #[validate(email(message = "The email must be a valid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,
    #[validate(length(min = 8, message = "The password must be at least 8 characters"))]
    #[validate(must_match(
        other = "password_confirmation",
        message = "The password confirmation does not match"
    ))]
    pub password: String,
    pub password_confirmation: String,
}

/// Token issued by login and register.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserSummary,
    pub password_reset_required: bool,
}

/// `GET /api/user`
#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: UserSummary,
    pub employee: Option<EmployeeSummary>,
    pub password_reset_required: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(Role::from_str("Admin").unwrap(), Role::Admin);
        assert_eq!(Role::Employee.to_string(), "employee");
        assert!(Role::from_str("manager").is_err());
        assert_eq!(
            serde_json::to_string(&Role::Admin).unwrap(),
            "\"admin\""
        );
    }

    #[test]
    fn test_register_requires_matching_confirmation() {
        let req = RegisterRequest {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            password: "password123".into(),
            password_confirmation: "password124".into(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_register_short_password() {
        let req = RegisterRequest {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            password: "short".into(),
            password_confirmation: "short".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_valid() {
        let req = RegisterRequest {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            password: "password123".into(),
            password_confirmation: "password123".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_login_rejects_bad_email() {
        let req = LoginRequest {
            email: "nope".into(),
            password: "x".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_me_response_flattens_user() {
        let me = MeResponse {
            user: UserSummary {
                id: 3,
                name: "Jane".into(),
                email: "jane@example.com".into(),
                role: Role::Employee,
            },
            employee: None,
            password_reset_required: false,
        };
        let json = serde_json::to_value(&me).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["role"], "employee");
        assert!(json["employee"].is_null());
    }
}
