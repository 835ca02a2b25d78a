//! Schedule repository.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

use crate::entities::ScheduleEntity;
use crate::metrics::QueryTimer;

const SCHEDULE_COLUMNS: &str =
    "id, title, schedule_date, schedule_time, description, created_at, updated_at";

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ScheduleChanges {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        title: &str,
        date: NaiveDate,
        time: NaiveTime,
        description: Option<&str>,
    ) -> Result<ScheduleEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_schedule");
        let result = sqlx::query_as::<_, ScheduleEntity>(&format!(
            r#"
            INSERT INTO schedules (title, schedule_date, schedule_time, description)
            VALUES ($1, $2, $3, $4)
            RETURNING {SCHEDULE_COLUMNS}
            "#
        ))
        .bind(title)
        .bind(date)
        .bind(time)
        .bind(description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn update(
        &self,
        id: i64,
        changes: &ScheduleChanges,
    ) -> Result<Option<ScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_schedule");
        let result = sqlx::query_as::<_, ScheduleEntity>(&format!(
            r#"
            UPDATE schedules
            SET title = COALESCE($2, title),
                schedule_date = COALESCE($3, schedule_date),
                schedule_time = COALESCE($4, schedule_time),
                description = COALESCE($5, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SCHEDULE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.date)
        .bind(changes.time)
        .bind(changes.description.as_deref())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_schedule");
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<ScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_schedule");
        let result = sqlx::query_as::<_, ScheduleEntity>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Chronological order.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_schedules");
        let result = sqlx::query_as::<_, ScheduleEntity>(&format!(
            r#"
            SELECT {SCHEDULE_COLUMNS} FROM schedules
            ORDER BY schedule_date, schedule_time, id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_schedules");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM schedules")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Entries with `from <= date <= to`, chronological.
    pub async fn between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ScheduleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("schedules_between");
        let result = sqlx::query_as::<_, ScheduleEntity>(&format!(
            r#"
            SELECT {SCHEDULE_COLUMNS} FROM schedules
            WHERE schedule_date BETWEEN $1 AND $2
            ORDER BY schedule_date, schedule_time, id
            "#
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
