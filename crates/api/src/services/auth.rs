//! Authentication service: credential checks, token issuing and sessions.

use domain::models::user::{AuthResponse, LoginRequest, RegisterRequest};
use domain::models::CurrentUser;
use persistence::entities::{UserEntity, UserRoleDb};
use persistence::repositories::{SessionRepository, UserRepository};
use persistence::WriteError;
use shared::crypto::session_token_hash;
use shared::jwt::{IssuedToken, JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::normalize_email;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

use crate::error::ApiError;
use crate::middleware::metrics::record_login;

pub const TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("The provided credentials are incorrect.")]
    InvalidCredentials,

    #[error("The current password is incorrect.")]
    WrongCurrentPassword,

    #[error("The email has already been taken.")]
    EmailAlreadyExists,

    #[error("Session expired or revoked")]
    SessionNotFound,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<WriteError> for AuthError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::EmailTaken => AuthError::EmailAlreadyExists,
            WriteError::Database(e) => AuthError::Database(e),
            other => AuthError::Database(sqlx::Error::Protocol(other.to_string())),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::field("email", err.to_string()),
            AuthError::WrongCurrentPassword => {
                ApiError::field("current_password", err.to_string())
            }
            AuthError::EmailAlreadyExists => ApiError::field("email", err.to_string()),
            AuthError::SessionNotFound => ApiError::Unauthorized("Invalid or expired token".into()),
            AuthError::Token(e) => e.into(),
            AuthError::Password(e) => e.into(),
            AuthError::Database(e) => e.into(),
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    sessions: SessionRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool),
            jwt,
        }
    }

    /// Checks credentials and opens a new session. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&request.email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            record_login("rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(&request.password, &user.password_hash)? {
            record_login("rejected");
            tracing::info!(user_id = user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.open_session(user.id).await?;
        record_login("accepted");
        tracing::info!(user_id = user.id, "User logged in");

        Ok(auth_response("Login successful", &user, issued))
    }

    /// Self-registration always yields an `employee` account without a
    /// profile; the profile is created on the first profile update.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&request.email);

        if self.users.email_taken(&email, None).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .users
            .create(request.name.trim(), &email, &password_hash, UserRoleDb::Employee)
            .await?;

        let issued = self.open_session(user.id).await?;
        tracing::info!(user_id = user.id, "User registered");

        Ok(auth_response("Registration successful", &user, issued))
    }

    /// Resolves a bearer token to the caller. The token must verify and its
    /// session must still exist.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let claims = self.jwt.validate(token)?;
        let user_id = claims.user_id()?;

        let context = self
            .sessions
            .find_auth_context(&session_token_hash(&claims.jti))
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if context.user_id != user_id {
            return Err(AuthError::SessionNotFound);
        }

        Ok(context.into())
    }

    /// Revokes every session of the caller.
    pub async fn logout(&self, user: &CurrentUser) -> Result<u64, AuthError> {
        let revoked = self.sessions.delete_all_for_user(user.user_id).await?;
        tracing::info!(user_id = user.user_id, revoked, "User logged out");
        Ok(revoked)
    }

    /// Verifies the current password, stores the new one and clears a
    /// pending forced reset.
    pub async fn change_password(
        &self,
        user: &CurrentUser,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let stored = self
            .users
            .find_by_id(user.user_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if !verify_password(current_password, &stored.password_hash)? {
            return Err(AuthError::WrongCurrentPassword);
        }

        let hash = hash_password(new_password)?;
        self.users.update_password(user.user_id, &hash).await?;
        tracing::info!(user_id = user.user_id, "Password changed");
        Ok(())
    }

    async fn open_session(&self, user_id: i64) -> Result<IssuedToken, AuthError> {
        let issued = self.jwt.issue(user_id)?;
        self.sessions
            .create(user_id, &session_token_hash(&issued.jti), issued.expires_at)
            .await?;
        Ok(issued)
    }
}

fn auth_response(message: &str, user: &UserEntity, issued: IssuedToken) -> AuthResponse {
    AuthResponse {
        message: message.to_string(),
        token: issued.token,
        token_type: TOKEN_TYPE,
        expires_in: issued.expires_in,
        user: user.summary(),
        password_reset_required: user.password_reset_required,
    }
}
