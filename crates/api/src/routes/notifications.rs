//! Per-user notification inbox. Every query is scoped to the caller.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::notification::{
    MarkAllReadResponse, NotificationListResponse, NotificationResponse, UnreadCountResponse,
    RECENT_LIMIT,
};
use domain::models::{Collection, CurrentUser, MessageResponse, PageQuery};
use persistence::repositories::NotificationRepository;
use shared::pagination::PageMeta;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::QueryParams;

/// Inbox page, newest first, with the unread total.
///
/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    QueryParams(query): QueryParams<PageQuery>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let page = state.page(query.page, query.per_page);
    let repo = NotificationRepository::new(state.pool.clone());

    let rows = repo
        .list_for_user(user.user_id, page.limit(), page.offset())
        .await?;
    let (total, unread) = repo.counts_for_user(user.user_id).await?;

    Ok(Json(NotificationListResponse {
        data: rows.into_iter().map(Into::into).collect(),
        meta: PageMeta::new(page, total),
        unread_count: unread,
    }))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UnreadCountResponse>, ApiError> {
    let unread_count = NotificationRepository::new(state.pool.clone())
        .unread_count(user.user_id)
        .await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

/// GET /api/notifications/recent
pub async fn recent(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Collection<NotificationResponse>>, ApiError> {
    let rows = NotificationRepository::new(state.pool.clone())
        .list_for_user(user.user_id, RECENT_LIMIT, 0)
        .await?;
    Ok(Json(Collection::new(rows.into_iter().map(Into::into).collect())))
}

/// 404 unless the notification belongs to the caller.
///
/// POST /api/notifications/:id/mark-as-read
pub async fn mark_as_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let found = NotificationRepository::new(state.pool.clone())
        .mark_read(id, user.user_id)
        .await?;
    if !found {
        return Err(ApiError::NotFound("Notification not found".into()));
    }
    Ok(Json(MessageResponse::new("Notification marked as read")))
}

/// POST /api/notifications/mark-all-as-read
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let updated = NotificationRepository::new(state.pool.clone())
        .mark_all_read(user.user_id)
        .await?;
    tracing::debug!(user_id = user.user_id, updated, "Marked all notifications read");

    Ok(Json(MarkAllReadResponse {
        message: "All notifications marked as read".to_string(),
        updated,
    }))
}
