//! Leave request routes: the admin queue and the employee's own requests.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::leave_request::{
    LeaveRequestResponse, ListLeaveRequestsQuery, SubmitLeaveRequest, UpdateLeaveStatusRequest,
};
use domain::models::{CurrentUser, Envelope, MessageResponse, PageQuery};
use persistence::repositories::{LeaveRequestFilter, LeaveRequestRepository};
use shared::pagination::Paginated;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::current_user::require_employee_id;
use crate::extractors::{JsonBody, QueryParams};

/// All requests, newest first, optionally filtered by `status` and `type`.
///
/// GET /api/leave-requests
pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListLeaveRequestsQuery>,
) -> Result<Json<Paginated<LeaveRequestResponse>>, ApiError> {
    let page = state.page(query.page, query.per_page);
    let filter = LeaveRequestFilter {
        status: query.status.map(Into::into),
        leave_type: query
            .leave_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        employee_id: None,
    };

    let repo = LeaveRequestRepository::new(state.pool.clone());
    let rows = repo.list(&filter, page.limit(), page.offset()).await?;
    let total = repo.count(&filter).await?;

    Ok(Json(Paginated::new(
        rows.into_iter().map(Into::into).collect(),
        page,
        total,
    )))
}

/// Approve or reject a pending request.
///
/// POST /api/leave-requests/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<UpdateLeaveStatusRequest>,
) -> Result<Json<Envelope<LeaveRequestResponse>>, ApiError> {
    let decided = state.leave_workflow().update_status(id, request).await?;
    let message = format!("Leave request {} successfully", decided.status);
    Ok(Json(Envelope::new(message, decided)))
}

/// DELETE /api/leave-requests/:id
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = LeaveRequestRepository::new(state.pool.clone())
        .delete(id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Leave request not found".into()));
    }

    info!(leave_request_id = id, "Leave request deleted");
    Ok(Json(MessageResponse::new("Leave request deleted successfully")))
}

/// The caller's own requests, newest first.
///
/// GET /api/my-leaves
pub async fn my_leaves(
    State(state): State<AppState>,
    user: CurrentUser,
    QueryParams(query): QueryParams<PageQuery>,
) -> Result<Json<Paginated<LeaveRequestResponse>>, ApiError> {
    let employee_id = require_employee_id(&user)?;
    let page = state.page(query.page, query.per_page);
    let filter = LeaveRequestFilter {
        employee_id: Some(employee_id),
        ..Default::default()
    };

    let repo = LeaveRequestRepository::new(state.pool.clone());
    let rows = repo.list(&filter, page.limit(), page.offset()).await?;
    let total = repo.count(&filter).await?;

    Ok(Json(Paginated::new(
        rows.into_iter().map(Into::into).collect(),
        page,
        total,
    )))
}

/// File a new request for the caller.
///
/// POST /api/my-leaves
pub async fn submit(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(request): JsonBody<SubmitLeaveRequest>,
) -> Result<(StatusCode, Json<Envelope<LeaveRequestResponse>>), ApiError> {
    let created = state.leave_workflow().submit(&user, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("Leave request submitted successfully", created)),
    ))
}
