//! Notification repository: the per-user inbox.

use domain::models::NotificationDraft;
use sqlx::{PgConnection, PgPool, Row};

use crate::entities::NotificationEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first.
    pub async fn list_for_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_notifications");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT id, user_id, title, content, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// `(total, unread)` for the user's inbox.
    pub async fn counts_for_user(&self, user_id: i64) -> Result<(i64, i64), sqlx::Error> {
        let timer = QueryTimer::new("count_notifications");
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE is_read = FALSE) AS unread
            FROM notifications
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        let row = row?;
        Ok((row.get::<i64, _>("total"), row.get::<i64, _>("unread")))
    }

    pub async fn unread_count(&self, user_id: i64) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("unread_notification_count");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Marks one notification read. `false` when it does not exist or
    /// belongs to someone else.
    pub async fn mark_read(&self, id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("mark_notification_read");
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Returns how many unread notifications were flipped.
    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_all_notifications_read");
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}

/// Bulk insert on an existing connection or transaction.
pub(crate) async fn insert_drafts(
    conn: &mut PgConnection,
    drafts: &[NotificationDraft],
) -> Result<u64, sqlx::Error> {
    if drafts.is_empty() {
        return Ok(0);
    }

    let timer = QueryTimer::new("insert_notifications");
    let user_ids: Vec<i64> = drafts.iter().map(|d| d.user_id).collect();
    let titles: Vec<String> = drafts.iter().map(|d| d.title.clone()).collect();
    let contents: Vec<String> = drafts.iter().map(|d| d.content.clone()).collect();

    let result = sqlx::query(
        r#"
        INSERT INTO notifications (user_id, title, content)
        SELECT * FROM UNNEST($1::BIGINT[], $2::TEXT[], $3::TEXT[])
        "#,
    )
    .bind(&user_ids)
    .bind(&titles)
    .bind(&contents)
    .execute(conn)
    .await;
    timer.record();
    Ok(result?.rows_affected())
}
