//! Company calendar routes. Reads are open to every signed-in user;
//! writes are admin only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveTime, Utc};
use domain::models::schedule::{
    upcoming_window, CreateScheduleRequest, ScheduleResponse, UpdateScheduleRequest,
};
use domain::models::{Collection, Data, Envelope, MessageResponse, PageQuery};
use persistence::repositories::{ScheduleChanges, ScheduleRepository};
use shared::datetime::parse_time;
use shared::pagination::Paginated;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, QueryParams};

fn not_found() -> ApiError {
    ApiError::NotFound("Schedule not found".into())
}

fn time_of_day(value: &str) -> Result<NaiveTime, ApiError> {
    parse_time(value).ok_or_else(|| ApiError::field("time", "The time must be in HH:MM format"))
}

/// GET /api/schedules
pub async fn list(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PageQuery>,
) -> Result<Json<Paginated<ScheduleResponse>>, ApiError> {
    let page = state.page(query.page, query.per_page);
    let repo = ScheduleRepository::new(state.pool.clone());
    let rows = repo.list(page.limit(), page.offset()).await?;
    let total = repo.count().await?;

    Ok(Json(Paginated::new(
        rows.into_iter().map(Into::into).collect(),
        page,
        total,
    )))
}

/// Entries dated today (UTC).
///
/// GET /api/schedules/today
pub async fn today(
    State(state): State<AppState>,
) -> Result<Json<Collection<ScheduleResponse>>, ApiError> {
    let today = Utc::now().date_naive();
    let rows = ScheduleRepository::new(state.pool.clone())
        .between(today, today)
        .await?;
    Ok(Json(Collection::new(rows.into_iter().map(Into::into).collect())))
}

/// Entries from today through the next seven days.
///
/// GET /api/schedules/upcoming
pub async fn upcoming(
    State(state): State<AppState>,
) -> Result<Json<Collection<ScheduleResponse>>, ApiError> {
    let (from, to) = upcoming_window(Utc::now().date_naive());
    let rows = ScheduleRepository::new(state.pool.clone())
        .between(from, to)
        .await?;
    Ok(Json(Collection::new(rows.into_iter().map(Into::into).collect())))
}

/// GET /api/schedules/:id
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Data<ScheduleResponse>>, ApiError> {
    let schedule = ScheduleRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(Data {
        data: schedule.into(),
    }))
}

/// POST /api/schedules
pub async fn create(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<Envelope<ScheduleResponse>>), ApiError> {
    request.validate()?;
    let time = time_of_day(&request.time)?;

    let created = ScheduleRepository::new(state.pool.clone())
        .create(
            request.title.trim(),
            request.date,
            time,
            request.description.as_deref(),
        )
        .await?;

    info!(schedule_id = created.id, date = %request.date, "Schedule created");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("Schedule created successfully", created.into())),
    ))
}

/// Partial update.
///
/// PUT /api/schedules/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    JsonBody(request): JsonBody<UpdateScheduleRequest>,
) -> Result<Json<Envelope<ScheduleResponse>>, ApiError> {
    request.validate()?;

    let changes = ScheduleChanges {
        title: request.title.map(|t| t.trim().to_string()),
        date: request.date,
        time: request.time.as_deref().map(time_of_day).transpose()?,
        description: request.description,
    };

    let updated = ScheduleRepository::new(state.pool.clone())
        .update(id, &changes)
        .await?
        .ok_or_else(not_found)?;

    info!(schedule_id = id, "Schedule updated");
    Ok(Json(Envelope::new(
        "Schedule updated successfully",
        updated.into(),
    )))
}

/// DELETE /api/schedules/:id
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !ScheduleRepository::new(state.pool.clone()).delete(id).await? {
        return Err(not_found());
    }

    info!(schedule_id = id, "Schedule deleted");
    Ok(Json(MessageResponse::new("Schedule deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day() {
        assert_eq!(
            time_of_day("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(matches!(
            time_of_day("9.30"),
            Err(ApiError::InvalidFields(ref d)) if d[0].field == "time"
        ));
    }
}
