//! Leave request repository.

use chrono::NaiveDate;
use domain::models::NotificationDraft;
use sqlx::{PgConnection, PgPool};

use crate::entities::{LeaveRequestEntity, LeaveRequestWithEmployeeEntity, LeaveStatusDb};
use crate::metrics::QueryTimer;
use crate::repositories::notification::insert_drafts;

const LEAVE_COLUMNS: &str = "id, employee_id, start_date, end_date, reason, leave_type, status, \
                             created_at, updated_at";

const LEAVE_WITH_EMPLOYEE_SELECT: &str = r#"
    SELECT lr.id, lr.employee_id, u.name AS employee_name, e.employee_code,
           u.id AS user_id, u.email AS user_email,
           lr.start_date, lr.end_date, lr.reason, lr.leave_type, lr.status, lr.created_at
    FROM leave_requests lr
    JOIN employees e ON e.id = lr.employee_id
    JOIN users u ON u.id = e.user_id
"#;

#[derive(Debug, Clone, Default)]
pub struct LeaveRequestFilter {
    pub status: Option<LeaveStatusDb>,
    pub leave_type: Option<String>,
    pub employee_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub employee_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub leave_type: String,
}

#[derive(Clone)]
pub struct LeaveRequestRepository {
    pool: PgPool,
}

impl LeaveRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a pending request together with its inbox notifications.
    pub async fn create_with_notifications(
        &self,
        new: &NewLeaveRequest,
        notifications: &[NotificationDraft],
    ) -> Result<LeaveRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_leave_request");
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, LeaveRequestEntity>(&format!(
            r#"
            INSERT INTO leave_requests (employee_id, start_date, end_date, reason, leave_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LEAVE_COLUMNS}
            "#
        ))
        .bind(new.employee_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.reason)
        .bind(&new.leave_type)
        .fetch_one(&mut *tx)
        .await?;

        insert_drafts(&mut tx, notifications).await?;

        tx.commit().await?;
        timer.record();
        Ok(created)
    }

    pub async fn find_with_employee(
        &self,
        id: i64,
    ) -> Result<Option<LeaveRequestWithEmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_leave_request");
        let mut conn = self.pool.acquire().await?;
        let result = fetch_with_employee(&mut conn, id).await;
        timer.record();
        result
    }

    /// Newest first.
    pub async fn list(
        &self,
        filter: &LeaveRequestFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LeaveRequestWithEmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_leave_requests");
        let result = sqlx::query_as::<_, LeaveRequestWithEmployeeEntity>(&format!(
            r#"
            {LEAVE_WITH_EMPLOYEE_SELECT}
            WHERE ($1::leave_status IS NULL OR lr.status = $1)
              AND ($2::TEXT IS NULL OR lr.leave_type = $2)
              AND ($3::BIGINT IS NULL OR lr.employee_id = $3)
            ORDER BY lr.created_at DESC, lr.id DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.status)
        .bind(filter.leave_type.as_deref())
        .bind(filter.employee_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &LeaveRequestFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_leave_requests");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM leave_requests lr
            WHERE ($1::leave_status IS NULL OR lr.status = $1)
              AND ($2::TEXT IS NULL OR lr.leave_type = $2)
              AND ($3::BIGINT IS NULL OR lr.employee_id = $3)
            "#,
        )
        .bind(filter.status)
        .bind(filter.leave_type.as_deref())
        .bind(filter.employee_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Unpaginated list for dashboards, newest first.
    pub async fn list_all(
        &self,
        filter: &LeaveRequestFilter,
    ) -> Result<Vec<LeaveRequestWithEmployeeEntity>, sqlx::Error> {
        self.list(filter, i64::MAX, 0).await
    }

    /// Applies an admin decision if, and only if, the request is still
    /// pending, and writes the owner's notification in the same transaction.
    /// `None` means the request was no longer pending (or is gone).
    pub async fn decide(
        &self,
        id: i64,
        status: LeaveStatusDb,
        notification: Option<&NotificationDraft>,
    ) -> Result<Option<LeaveRequestWithEmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("decide_leave_request");
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        }

        if let Some(draft) = notification {
            insert_drafts(&mut tx, std::slice::from_ref(draft)).await?;
        }

        let decided = fetch_with_employee(&mut tx, id).await?;
        tx.commit().await?;
        timer.record();
        Ok(decided)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_leave_request");
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

async fn fetch_with_employee(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<LeaveRequestWithEmployeeEntity>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequestWithEmployeeEntity>(&format!(
        "{LEAVE_WITH_EMPLOYEE_SELECT} WHERE lr.id = $1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}
