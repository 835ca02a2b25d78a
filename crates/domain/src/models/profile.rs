//! Self-service profile for the calling user.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::employee::EmployeeSummary;
use super::user::Role;
use super::PHONE_REGEX;

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub employee: Option<EmployeeSummary>,
    pub password_reset_required: bool,
}

/// `PUT /api/profile`. Missing profile fields leave the stored value alone;
/// if the user has no employee row yet one is created.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    #[validate(email(message = "The email must be a valid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,
    #[validate(length(max = 50, message = "Phone must be at most 50 characters"))]
    #[validate(regex(path = *PHONE_REGEX, message = "Phone may only contain digits, spaces and + ( ) -"))]
    pub phone: Option<String>,
    #[validate(length(max = 255, message = "Position must be at most 255 characters"))]
    pub position: Option<String>,
    #[validate(length(max = 255, message = "Department must be at most 255 characters"))]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "The current password field is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "The new password must be at least 6 characters"))]
    #[validate(must_match(
        other = "new_password_confirmation",
        message = "The new password confirmation does not match"
    ))]
    pub new_password: String,
    pub new_password_confirmation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_password_confirmation() {
        let req = ChangePasswordRequest {
            current_password: "old-secret".into(),
            new_password: "new-secret".into(),
            new_password_confirmation: "new-secrex".into(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("new_password"));
    }

    #[test]
    fn test_change_password_min_length() {
        let req = ChangePasswordRequest {
            current_password: "old-secret".into(),
            new_password: "abc".into(),
            new_password_confirmation: "abc".into(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_profile_optional_fields() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"name":"Jane","email":"jane@example.com"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.phone.is_none());
    }

    #[test]
    fn test_update_profile_rejects_letters_in_phone() {
        let req: UpdateProfileRequest = serde_json::from_str(
            r#"{"name":"Jane","email":"jane@example.com","phone":"call me"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }
}
