//! Salary ledger repository.

use domain::models::salary::SalaryFigures;
use sqlx::{PgConnection, PgPool};

use crate::entities::SalaryWithEmployeeEntity;
use crate::error::WriteError;
use crate::metrics::QueryTimer;

const SALARY_WITH_EMPLOYEE_SELECT: &str = r#"
    SELECT s.id, s.employee_id, u.name AS employee_name, e.employee_code,
           s.base_salary, s.bonus, s.total, s.month, s.year, s.note, s.created_at
    FROM salaries s
    JOIN employees e ON e.id = s.employee_id
    JOIN users u ON u.id = e.user_id
"#;

#[derive(Debug, Clone, Copy, Default)]
pub struct SalaryFilter {
    pub employee_id: Option<i64>,
    pub month: Option<i32>,
    pub year: Option<i32>,
}

#[derive(Clone)]
pub struct SalaryRepository {
    pool: PgPool,
}

impl SalaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest period first.
    pub async fn list(
        &self,
        filter: SalaryFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SalaryWithEmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_salaries");
        let result = sqlx::query_as::<_, SalaryWithEmployeeEntity>(&format!(
            r#"
            {SALARY_WITH_EMPLOYEE_SELECT}
            WHERE ($1::BIGINT IS NULL OR s.employee_id = $1)
              AND ($2::INTEGER IS NULL OR s.month = $2)
              AND ($3::INTEGER IS NULL OR s.year = $3)
            ORDER BY s.year DESC, s.month DESC, s.id DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.employee_id)
        .bind(filter.month)
        .bind(filter.year)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: SalaryFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_salaries");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM salaries s
            WHERE ($1::BIGINT IS NULL OR s.employee_id = $1)
              AND ($2::INTEGER IS NULL OR s.month = $2)
              AND ($3::INTEGER IS NULL OR s.year = $3)
            "#,
        )
        .bind(filter.employee_id)
        .bind(filter.month)
        .bind(filter.year)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_with_employee(
        &self,
        id: i64,
    ) -> Result<Option<SalaryWithEmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_salary");
        let mut conn = self.pool.acquire().await?;
        let result = fetch_with_employee(&mut conn, id).await;
        timer.record();
        result
    }

    /// Inserts a salary row. The period check and the insert share one
    /// transaction; an existing row for the period is left untouched.
    pub async fn create(
        &self,
        employee_id: i64,
        figures: &SalaryFigures,
    ) -> Result<SalaryWithEmployeeEntity, WriteError> {
        let timer = QueryTimer::new("create_salary");
        let mut tx = self.pool.begin().await?;

        let employee_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM employees WHERE id = $1)")
                .bind(employee_id)
                .fetch_one(&mut *tx)
                .await?;
        if !employee_exists {
            return Err(WriteError::EmployeeMissing);
        }

        if period_taken(&mut tx, employee_id, figures.month, figures.year, None).await? {
            return Err(WriteError::DuplicateSalaryPeriod);
        }

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO salaries (employee_id, base_salary, bonus, total, month, year, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(employee_id)
        .bind(figures.base_salary)
        .bind(figures.bonus)
        .bind(figures.total)
        .bind(figures.month)
        .bind(figures.year)
        .bind(figures.note.as_deref())
        .fetch_one(&mut *tx)
        .await
        .map_err(WriteError::from_constraint)?;

        let created = fetch_with_employee(&mut tx, id)
            .await?
            .ok_or(WriteError::NotFound)?;

        tx.commit().await?;
        timer.record();
        Ok(created)
    }

    /// Rewrites amounts and period; the period must stay unique for the
    /// employee excluding this row.
    pub async fn update(
        &self,
        id: i64,
        figures: &SalaryFigures,
    ) -> Result<SalaryWithEmployeeEntity, WriteError> {
        let timer = QueryTimer::new("update_salary");
        let mut tx = self.pool.begin().await?;

        let employee_id = sqlx::query_scalar::<_, i64>(
            "SELECT employee_id FROM salaries WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(WriteError::NotFound)?;

        if period_taken(&mut tx, employee_id, figures.month, figures.year, Some(id)).await? {
            return Err(WriteError::DuplicateSalaryPeriod);
        }

        sqlx::query(
            r#"
            UPDATE salaries
            SET base_salary = $2, bonus = $3, total = $4, month = $5, year = $6,
                note = $7, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(figures.base_salary)
        .bind(figures.bonus)
        .bind(figures.total)
        .bind(figures.month)
        .bind(figures.year)
        .bind(figures.note.as_deref())
        .execute(&mut *tx)
        .await
        .map_err(WriteError::from_constraint)?;

        let updated = fetch_with_employee(&mut tx, id)
            .await?
            .ok_or(WriteError::NotFound)?;

        tx.commit().await?;
        timer.record();
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_salary");
        let result = sqlx::query("DELETE FROM salaries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

async fn period_taken(
    conn: &mut PgConnection,
    employee_id: i64,
    month: i32,
    year: i32,
    except_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM salaries
            WHERE employee_id = $1 AND month = $2 AND year = $3
              AND ($4::BIGINT IS NULL OR id <> $4)
        )
        "#,
    )
    .bind(employee_id)
    .bind(month)
    .bind(year)
    .bind(except_id)
    .fetch_one(conn)
    .await
}

async fn fetch_with_employee(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<SalaryWithEmployeeEntity>, sqlx::Error> {
    sqlx::query_as::<_, SalaryWithEmployeeEntity>(&format!(
        "{SALARY_WITH_EMPLOYEE_SELECT} WHERE s.id = $1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}
