//! Self-service profile routes.

use axum::{extract::State, Json};
use domain::models::profile::{ChangePasswordRequest, ProfileResponse, UpdateProfileRequest};
use domain::models::{CurrentUser, Data, Envelope, MessageResponse};
use persistence::repositories::{EmployeeRepository, ProfileUpdate, UserRepository};
use shared::validation::normalize_email;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonBody;

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// GET /api/profile
pub async fn show(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Data<ProfileResponse>>, ApiError> {
    let stored = UserRepository::new(state.pool.clone())
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unauthenticated.".into()))?;
    let employee = EmployeeRepository::new(state.pool.clone())
        .find_by_user_id(user.user_id)
        .await?;

    Ok(Json(Data {
        data: ProfileResponse {
            id: stored.id,
            name: stored.name,
            email: stored.email,
            role: stored.role.into(),
            employee: employee.map(Into::into),
            password_reset_required: stored.password_reset_required,
        },
    }))
}

/// Updates the caller's name, email and employee profile fields.
///
/// PUT /api/profile
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(request): JsonBody<UpdateProfileRequest>,
) -> Result<Json<Envelope<ProfileResponse>>, ApiError> {
    request.validate()?;

    let update = ProfileUpdate {
        name: request.name.trim().to_string(),
        email: normalize_email(&request.email),
        phone: trimmed(request.phone),
        position: trimmed(request.position),
        department: trimmed(request.department),
    };

    let (stored, employee) = EmployeeRepository::new(state.pool.clone())
        .update_profile(user.user_id, &update)
        .await
        .map_err(|e| match e {
            persistence::WriteError::EmailTaken => ApiError::field("email", e.to_string()),
            other => other.into(),
        })?;

    tracing::info!(user_id = user.user_id, "Profile updated");

    Ok(Json(Envelope::new(
        "Profile updated successfully",
        ProfileResponse {
            id: stored.id,
            name: stored.name,
            email: stored.email,
            role: stored.role.into(),
            employee: Some(employee.into()),
            password_reset_required: stored.password_reset_required,
        },
    )))
}

/// Replaces the caller's password and clears a pending forced reset.
///
/// POST /api/profile/change-password
pub async fn change_password(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(request): JsonBody<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;
    state
        .auth
        .change_password(&user, &request.current_password, &request.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
