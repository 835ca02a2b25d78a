//! Bearer token authentication.
//!
//! `require_auth` resolves the `Authorization: Bearer <jwt>` header to a
//! [`CurrentUser`] through the session table and stores it in the request
//! extensions. Handlers receive it through the `CurrentUser` extractor.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::trace_id::RequestSpan;

/// Extracts the token from an `Authorization` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
    {
        Some(token) => token.to_string(),
        None => {
            return ApiError::Unauthorized("Unauthenticated.".into()).into_response();
        }
    };

    match state.auth.authenticate(&token).await {
        Ok(user) => {
            if let Some(RequestSpan(span)) = req.extensions().get::<RequestSpan>() {
                span.record("user_id", user.user_id);
            }
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Bearer token rejected");
            ApiError::from(e).into_response()
        }
    }
}
