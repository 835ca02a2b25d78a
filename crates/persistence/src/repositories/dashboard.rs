//! Aggregate counts for the admin and employee dashboards.

use domain::models::dashboard::{count_map, EmployeeBreakdown, LeaveBreakdown};
use sqlx::{PgPool, Row};

use crate::metrics::QueryTimer;

/// Directory-wide counters for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryCounts {
    pub total_employees: i64,
    pub active_staff: i64,
    pub pending_leaves: i64,
}

/// Leave counters for a single employee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmployeeLeaveCounts {
    pub pending: i64,
    pub approved: i64,
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn directory_counts(&self) -> Result<DirectoryCounts, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_directory_counts");
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM employees) AS total_employees,
                (SELECT COUNT(*) FROM employees WHERE status = 'active') AS active_staff,
                (SELECT COUNT(*) FROM leave_requests WHERE status = 'pending') AS pending_leaves
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        let row = row?;

        Ok(DirectoryCounts {
            total_employees: row.get::<i64, _>("total_employees"),
            active_staff: row.get::<i64, _>("active_staff"),
            pending_leaves: row.get::<i64, _>("pending_leaves"),
        })
    }

    pub async fn employee_breakdown(&self) -> Result<EmployeeBreakdown, sqlx::Error> {
        let (by_status, by_department) =
            tokio::try_join!(self.employees_by_status(), self.employees_by_department())?;

        Ok(EmployeeBreakdown {
            by_status: count_map(by_status, "unknown"),
            by_department: count_map(by_department, "unassigned"),
        })
    }

    pub async fn employee_leave_counts(
        &self,
        employee_id: i64,
    ) -> Result<EmployeeLeaveCounts, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_employee_leave_counts");
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved
            FROM leave_requests
            WHERE employee_id = $1
            "#,
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        let row = row?;

        Ok(EmployeeLeaveCounts {
            pending: row.get::<i64, _>("pending"),
            approved: row.get::<i64, _>("approved"),
        })
    }

    pub async fn leave_breakdown(&self, employee_id: i64) -> Result<LeaveBreakdown, sqlx::Error> {
        let (by_status, by_type) = tokio::try_join!(
            self.grouped_leave_counts(employee_id, "status::TEXT"),
            self.grouped_leave_counts(employee_id, "leave_type"),
        )?;

        Ok(LeaveBreakdown {
            by_status: count_map(by_status, "unknown"),
            by_type: count_map(by_type, "unspecified"),
        })
    }

    async fn employees_by_status(&self) -> Result<Vec<(Option<String>, i64)>, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_employees_by_status");
        let result = sqlx::query_as::<_, (Option<String>, i64)>(
            "SELECT status::TEXT, COUNT(*) FROM employees GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    async fn employees_by_department(&self) -> Result<Vec<(Option<String>, i64)>, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_employees_by_department");
        let result = sqlx::query_as::<_, (Option<String>, i64)>(
            "SELECT department, COUNT(*) FROM employees GROUP BY department",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// `column` is one of two fixed expressions chosen above, never input.
    async fn grouped_leave_counts(
        &self,
        employee_id: i64,
        column: &'static str,
    ) -> Result<Vec<(Option<String>, i64)>, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_grouped_leave_counts");
        let result = sqlx::query_as::<_, (Option<String>, i64)>(&format!(
            "SELECT {column}, COUNT(*) FROM leave_requests WHERE employee_id = $1 GROUP BY 1"
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
