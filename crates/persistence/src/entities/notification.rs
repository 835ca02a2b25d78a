//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::notification::NotificationResponse;
use shared::datetime::format_datetime;
use sqlx::FromRow;

/// Row of the `notifications` table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for NotificationResponse {
    fn from(entity: NotificationEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            content: entity.content,
            date: format_datetime(entity.created_at),
            is_read: entity.is_read,
        }
    }
}
