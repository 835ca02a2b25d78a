//! Employee dashboard. Every route needs a linked employee profile.

use axum::{extract::State, Json};
use domain::models::dashboard::{EmployeeDashboardStats, LeaveBreakdown};
use domain::models::leave_request::LeaveRequestResponse;
use domain::models::{Collection, CurrentUser};
use persistence::repositories::{
    DashboardRepository, EmployeeRepository, LeaveRequestFilter, LeaveRequestRepository,
    NotificationRepository,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::current_user::require_employee_id;

/// GET /api/employee/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<EmployeeDashboardStats>, ApiError> {
    let employee_id = require_employee_id(&user)?;

    let employees = EmployeeRepository::new(state.pool.clone());
    let dashboard = DashboardRepository::new(state.pool.clone());
    let notifications = NotificationRepository::new(state.pool.clone());

    let (employee, leaves, (total_notifications, unread_notifications)) = tokio::try_join!(
        employees.find_by_id(employee_id),
        dashboard.employee_leave_counts(employee_id),
        notifications.counts_for_user(user.user_id),
    )?;
    let employee = employee.ok_or_else(ApiError::employee_profile_missing)?;

    Ok(Json(EmployeeDashboardStats {
        pending_leaves: leaves.pending,
        approved_leaves: leaves.approved,
        position: employee.position,
        department: employee.department,
        status: employee.status.into(),
        employee_code: employee.employee_code,
        total_notifications,
        unread_notifications,
    }))
}

/// All of the caller's requests, newest first.
///
/// GET /api/employee/dashboard/my-leaves
pub async fn my_leaves(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Collection<LeaveRequestResponse>>, ApiError> {
    let employee_id = require_employee_id(&user)?;
    let filter = LeaveRequestFilter {
        employee_id: Some(employee_id),
        ..Default::default()
    };
    let rows = LeaveRequestRepository::new(state.pool.clone())
        .list_all(&filter)
        .await?;
    Ok(Json(Collection::new(rows.into_iter().map(Into::into).collect())))
}

/// GET /api/employee/dashboard/leave-stats
pub async fn leave_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<LeaveBreakdown>, ApiError> {
    let employee_id = require_employee_id(&user)?;
    let breakdown = DashboardRepository::new(state.pool.clone())
        .leave_breakdown(employee_id)
        .await?;
    Ok(Json(breakdown))
}
