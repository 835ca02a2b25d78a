//! Salary ledger routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::salary::{
    CreateSalaryRequest, ListSalariesQuery, MySalariesQuery, SalaryFigures, SalaryResponse,
    UpdateSalaryRequest,
};
use domain::models::{CurrentUser, Envelope, MessageResponse};
use persistence::repositories::{SalaryFilter, SalaryRepository};
use persistence::WriteError;
use shared::pagination::{PageRequest, Paginated};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::current_user::require_employee_id;
use crate::extractors::{JsonBody, QueryParams};

fn not_found() -> ApiError {
    ApiError::NotFound("Salary record not found".into())
}

async fn paginate(
    repo: &SalaryRepository,
    filter: SalaryFilter,
    page: PageRequest,
) -> Result<Paginated<SalaryResponse>, ApiError> {
    let rows = repo.list(filter, page.limit(), page.offset()).await?;
    let total = repo.count(filter).await?;
    Ok(Paginated::new(
        rows.into_iter().map(Into::into).collect(),
        page,
        total,
    ))
}

/// Salary records, most recent period first.
///
/// GET /api/salaries
pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListSalariesQuery>,
) -> Result<Json<Paginated<SalaryResponse>>, ApiError> {
    let page = state.page(query.page, query.per_page);
    let filter = SalaryFilter {
        employee_id: query.employee_id,
        month: query.month,
        year: query.year,
    };

    let repo = SalaryRepository::new(state.pool.clone());
    Ok(Json(paginate(&repo, filter, page).await?))
}

/// Record a month's pay. `total` is always `base_salary + bonus`.
///
/// POST /api/salaries
pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateSalaryRequest>,
) -> Result<(StatusCode, Json<Envelope<SalaryResponse>>), ApiError> {
    request.validate()?;

    let figures = SalaryFigures::from(&request);
    figures.validate_total()?;
    let created = SalaryRepository::new(state.pool.clone())
        .create(request.employee_id, &figures)
        .await?;

    info!(
        salary_id = created.id,
        employee_id = created.employee_id,
        month = figures.month,
        year = figures.year,
        "Salary recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("Salary record created successfully", created.into())),
    ))
}

/// PUT /api/salaries/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<UpdateSalaryRequest>,
) -> Result<Json<Envelope<SalaryResponse>>, ApiError> {
    request.validate()?;

    let figures = SalaryFigures::from(&request);
    figures.validate_total()?;
    let updated = SalaryRepository::new(state.pool.clone())
        .update(id, &figures)
        .await
        .map_err(|e| match e {
            WriteError::NotFound => not_found(),
            other => other.into(),
        })?;

    info!(salary_id = id, "Salary updated");
    Ok(Json(Envelope::new(
        "Salary record updated successfully",
        updated.into(),
    )))
}

/// DELETE /api/salaries/:id
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !SalaryRepository::new(state.pool.clone()).delete(id).await? {
        return Err(not_found());
    }

    info!(salary_id = id, "Salary deleted");
    Ok(Json(MessageResponse::new("Salary record deleted successfully")))
}

/// The caller's own salary records.
///
/// GET /api/my-salaries
pub async fn my_salaries(
    State(state): State<AppState>,
    user: CurrentUser,
    QueryParams(query): QueryParams<MySalariesQuery>,
) -> Result<Json<Paginated<SalaryResponse>>, ApiError> {
    let employee_id = require_employee_id(&user)?;
    let page = state.page(query.page, query.per_page);
    let filter = SalaryFilter {
        employee_id: Some(employee_id),
        month: query.month,
        year: query.year,
    };

    let repo = SalaryRepository::new(state.pool.clone());
    Ok(Json(paginate(&repo, filter, page).await?))
}
