//! Session repository: server-side record of issued bearer tokens.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::AuthContextEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("create_session");
        let result = sqlx::query(
            r#"
            INSERT INTO user_sessions (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|_| ())
    }

    /// Resolves a live session to the caller's identity. Expired or revoked
    /// sessions resolve to `None`.
    pub async fn find_auth_context(
        &self,
        token_hash: &str,
    ) -> Result<Option<AuthContextEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_auth_context");
        let result = sqlx::query_as::<_, AuthContextEntity>(
            r#"
            SELECT u.id AS user_id, u.name, u.email, u.role, u.password_reset_required,
                   e.id AS employee_id
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            LEFT JOIN employees e ON e.user_id = u.id
            WHERE s.token_hash = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Revokes every session of `user_id`. Returns the number revoked.
    pub async fn delete_all_for_user(&self, user_id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_user_sessions");
        let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Drops sessions whose token has expired anyway.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_expired_sessions");
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}
