//! User repository for database operations.

use sqlx::PgPool;

use crate::entities::{AdminContactEntity, UserEntity, UserRoleDb};
use crate::error::WriteError;
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, password_reset_required, created_at, updated_at";

/// Repository for user account operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a user without an employee profile (self-registration).
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: UserRoleDb,
    ) -> Result<UserEntity, WriteError> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result.map_err(WriteError::from_constraint)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Looks up by normalized (lower-case) email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// True when `email` belongs to a user other than `except_user_id`.
    pub async fn email_taken(
        &self,
        email: &str,
        except_user_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("user_email_taken");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(except_user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Everyone who receives new-leave-request notifications.
    pub async fn list_admin_contacts(&self) -> Result<Vec<AdminContactEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_admin_contacts");
        let result = sqlx::query_as::<_, AdminContactEntity>(
            "SELECT id, name, email FROM users WHERE role = 'admin' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Stores a new password hash and clears any pending forced reset.
    pub async fn update_password(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_user_password");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, password_reset_required = FALSE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
