//! Per-user notification inbox.

use serde::Serialize;

use shared::pagination::PageMeta;

/// Number of items returned by `/notifications/recent`.
pub const RECENT_LIMIT: i64 = 5;

/// A notification about to be written for `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub user_id: i64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date: String,
    pub is_read: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationListResponse {
    pub data: Vec<NotificationResponse>,
    pub meta: PageMeta,
    pub unread_count: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkAllReadResponse {
    pub message: String,
    pub updated: u64,
}
