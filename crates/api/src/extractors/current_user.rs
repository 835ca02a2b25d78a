//! Extractor for the caller resolved by `require_auth`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::CurrentUser;

use crate::app::AppState;
use crate::error::ApiError;

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Unauthenticated.".into()))
    }
}

/// The caller's employee profile id, or 404 when the account has none.
pub fn require_employee_id(user: &CurrentUser) -> Result<i64, ApiError> {
    user.employee_id.ok_or_else(ApiError::employee_profile_missing)
}
