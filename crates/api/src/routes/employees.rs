//! Employee directory routes (admin only).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::employee::{
    CreateEmployeeRequest, CreateEmployeeResponse, EmployeeResponse, EmployeeStatus,
    ListEmployeesQuery, UpdateEmployeeRequest,
};
use domain::models::{CurrentUser, Data, Envelope, MessageResponse, Role};
use persistence::repositories::{EmployeeFilter, EmployeeRepository, EmployeeUpdate, NewEmployee};
use shared::pagination::Paginated;
use shared::password::{generate_temporary_password, hash_password};
use shared::validation::normalize_email;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, QueryParams};

fn not_found() -> ApiError {
    ApiError::NotFound("Employee not found".into())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// List employees, newest first.
///
/// GET /api/employees
pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListEmployeesQuery>,
) -> Result<Json<Paginated<EmployeeResponse>>, ApiError> {
    let page = state.page(query.page, query.per_page);
    let filter = EmployeeFilter {
        status: query.status.map(Into::into),
        search: query.search_term().map(str::to_string),
    };

    let repo = EmployeeRepository::new(state.pool.clone());
    let rows = repo.list(&filter, page.limit(), page.offset()).await?;
    let total = repo.count(&filter).await?;

    Ok(Json(Paginated::new(
        rows.into_iter().map(Into::into).collect(),
        page,
        total,
    )))
}

/// Hire: creates the user account and employee profile together.
///
/// POST /api/employees
///
/// Without a `password` a one-time password is generated, returned once as
/// `temporary_password`, and the account must change it before doing
/// anything else.
pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<CreateEmployeeResponse>), ApiError> {
    request.validate()?;

    let (password, temporary_password) = match request.password {
        Some(password) => (password, None),
        None => {
            let generated = generate_temporary_password();
            (generated.clone(), Some(generated))
        }
    };

    let new = NewEmployee {
        name: request.name.trim().to_string(),
        email: normalize_email(&request.email),
        password_hash: hash_password(&password)?,
        role: request.role.unwrap_or(Role::Employee).into(),
        password_reset_required: temporary_password.is_some(),
        employee_code: optional(request.employee_code),
        position: Some(request.position.trim().to_string()),
        department: Some(request.department.trim().to_string()),
        phone: optional(request.phone),
        status: request.status.unwrap_or(EmployeeStatus::Active).into(),
    };

    let created = EmployeeRepository::new(state.pool.clone())
        .create_with_user(&new)
        .await?;

    info!(
        employee_id = created.id,
        user_id = created.user_id,
        generated_password = temporary_password.is_some(),
        "Employee created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateEmployeeResponse {
            message: "Employee created successfully".to_string(),
            data: created.into(),
            temporary_password,
        }),
    ))
}

/// GET /api/employees/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Data<EmployeeResponse>>, ApiError> {
    let employee = EmployeeRepository::new(state.pool.clone())
        .find_with_user(id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(Data {
        data: employee.into(),
    }))
}

/// PUT /api/employees/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<UpdateEmployeeRequest>,
) -> Result<Json<Envelope<EmployeeResponse>>, ApiError> {
    request.validate()?;

    let password_hash = request
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;

    let update = EmployeeUpdate {
        name: request.name.trim().to_string(),
        email: normalize_email(&request.email),
        password_hash,
        role: request.role.map(Into::into),
        employee_code: request.employee_code.trim().to_string(),
        position: request.position.trim().to_string(),
        department: request.department.trim().to_string(),
        phone: optional(request.phone),
        status: request.status.into(),
    };

    let updated = EmployeeRepository::new(state.pool.clone())
        .update_with_user(id, &update)
        .await
        .map_err(|e| match e {
            persistence::WriteError::NotFound => not_found(),
            other => other.into(),
        })?;

    info!(employee_id = id, "Employee updated");

    Ok(Json(Envelope::new(
        "Employee updated successfully",
        updated.into(),
    )))
}

/// Deletes the employee together with its user account.
///
/// DELETE /api/employees/:id
pub async fn destroy(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = EmployeeRepository::new(state.pool.clone());
    let employee = repo.find_by_id(id).await?.ok_or_else(not_found)?;

    if employee.user_id == user.user_id {
        return Err(ApiError::Forbidden(
            "Cannot delete your own account".into(),
        ));
    }

    if !repo.delete_with_user(id).await? {
        return Err(not_found());
    }

    info!(employee_id = id, deleted_by = user.user_id, "Employee deleted");
    Ok(Json(MessageResponse::new("Employee deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_normalizes_blank() {
        assert_eq!(optional(Some(" EMP-7 ".into())), Some("EMP-7".into()));
        assert_eq!(optional(Some("".into())), None);
    }
}
