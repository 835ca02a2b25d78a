//! Login, registration and session routes.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::user::{AuthResponse, LoginRequest, MeResponse, RegisterRequest};
use domain::models::{CurrentUser, MessageResponse};
use persistence::repositories::EmployeeRepository;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonBody;

/// Exchange credentials for a bearer token.
///
/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    request.validate()?;
    let response = state.auth.login(&request).await?;
    Ok(Json(response))
}

/// Self-registration. Always creates an `employee` account.
///
/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;
    let response = state.auth.register(&request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// The caller and their employee profile, if any.
///
/// GET /api/user
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MeResponse>, ApiError> {
    let employee = EmployeeRepository::new(state.pool.clone())
        .find_by_user_id(user.user_id)
        .await?
        .map(Into::into);

    Ok(Json(MeResponse {
        user: user.summary(),
        employee,
        password_reset_required: user.password_reset_required,
    }))
}

/// Revokes every token issued to the caller.
///
/// POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MessageResponse>, ApiError> {
    state.auth.logout(&user).await?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}
