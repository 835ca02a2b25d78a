//! Admin dashboard rollups.

use axum::{extract::State, Json};
use domain::models::dashboard::{AdminStats, EmployeeBreakdown, RECENT_EMPLOYEES_LIMIT};
use domain::models::employee::EmployeeResponse;
use domain::models::leave_request::LeaveRequestResponse;
use domain::models::{Collection, CurrentUser, LeaveStatus};
use persistence::repositories::{
    DashboardRepository, EmployeeRepository, LeaveRequestFilter, LeaveRequestRepository,
    NotificationRepository,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Directory counters plus the caller's own inbox counts.
///
/// GET /api/admin/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AdminStats>, ApiError> {
    let dashboard = DashboardRepository::new(state.pool.clone());
    let notifications = NotificationRepository::new(state.pool.clone());

    let (counts, (total_notifications, unread_notifications)) = tokio::try_join!(
        dashboard.directory_counts(),
        notifications.counts_for_user(user.user_id),
    )?;

    Ok(Json(AdminStats {
        total_employees: counts.total_employees,
        pending_leaves: counts.pending_leaves,
        active_staff: counts.active_staff,
        total_notifications,
        unread_notifications,
    }))
}

/// GET /api/admin/dashboard/recent-employees
pub async fn recent_employees(
    State(state): State<AppState>,
) -> Result<Json<Collection<EmployeeResponse>>, ApiError> {
    let rows = EmployeeRepository::new(state.pool.clone())
        .recent(RECENT_EMPLOYEES_LIMIT)
        .await?;
    Ok(Json(Collection::new(rows.into_iter().map(Into::into).collect())))
}

/// Every pending request, newest first.
///
/// GET /api/admin/dashboard/pending-leaves
pub async fn pending_leaves(
    State(state): State<AppState>,
) -> Result<Json<Collection<LeaveRequestResponse>>, ApiError> {
    let filter = LeaveRequestFilter {
        status: Some(LeaveStatus::Pending.into()),
        ..Default::default()
    };
    let rows = LeaveRequestRepository::new(state.pool.clone())
        .list_all(&filter)
        .await?;
    Ok(Json(Collection::new(rows.into_iter().map(Into::into).collect())))
}

/// GET /api/admin/dashboard/employee-stats
pub async fn employee_stats(
    State(state): State<AppState>,
) -> Result<Json<EmployeeBreakdown>, ApiError> {
    let breakdown = DashboardRepository::new(state.pool.clone())
        .employee_breakdown()
        .await?;
    Ok(Json(breakdown))
}
