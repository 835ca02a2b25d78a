//! Schedule entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::models::schedule::ScheduleResponse;
use shared::datetime::{format_date, format_time};
use sqlx::FromRow;

/// Row of the `schedules` table.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleEntity {
    pub id: i64,
    pub title: String,
    pub schedule_date: NaiveDate,
    pub schedule_time: NaiveTime,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ScheduleEntity> for ScheduleResponse {
    fn from(entity: ScheduleEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            date: format_date(entity.schedule_date),
            time: format_time(entity.schedule_time),
            description: entity.description,
        }
    }
}
