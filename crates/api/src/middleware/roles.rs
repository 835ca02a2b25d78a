//! Route-level gates evaluated after `require_auth`.
//!
//! Each gate reads the [`CurrentUser`] placed in the extensions by
//! `require_auth` and rejects with 403 before the handler runs.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::{CurrentUser, Role};

use crate::error::ApiError;

async fn gate(
    req: Request<Body>,
    next: Next,
    check: impl FnOnce(&CurrentUser) -> Result<(), ApiError>,
) -> Response {
    let Some(user) = req.extensions().get::<CurrentUser>() else {
        return ApiError::Unauthorized("Unauthenticated.".into()).into_response();
    };

    match check(user) {
        Ok(()) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}

fn require_role(user: &CurrentUser, role: Role) -> Result<(), ApiError> {
    if user.has_role(role) {
        Ok(())
    } else {
        tracing::debug!(user_id = user.user_id, required = %role, "Role check failed");
        Err(ApiError::Forbidden(format!(
            "This action requires the {} role.",
            role
        )))
    }
}

pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    gate(req, next, |user| require_role(user, Role::Admin)).await
}

pub async fn require_employee(req: Request<Body>, next: Next) -> Response {
    gate(req, next, |user| require_role(user, Role::Employee)).await
}

/// Blocks accounts that still carry a one-time password.
pub async fn require_password_current(req: Request<Body>, next: Next) -> Response {
    gate(req, next, |user| {
        if user.password_reset_required {
            Err(ApiError::Forbidden(
                "You must change your temporary password before continuing.".into(),
            ))
        } else {
            Ok(())
        }
    })
    .await
}
