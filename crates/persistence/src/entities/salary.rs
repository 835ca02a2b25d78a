//! Salary entities (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::salary::SalaryResponse;
use rust_decimal::Decimal;
use shared::datetime::format_datetime;
use sqlx::FromRow;

/// Row of the `salaries` table.
#[derive(Debug, Clone, FromRow)]
pub struct SalaryEntity {
    pub id: i64,
    pub employee_id: i64,
    pub base_salary: Decimal,
    pub bonus: Decimal,
    pub total: Decimal,
    pub month: i32,
    pub year: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Salary joined with the employee's name and code.
#[derive(Debug, Clone, FromRow)]
pub struct SalaryWithEmployeeEntity {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub employee_code: Option<String>,
    pub base_salary: Decimal,
    pub bonus: Decimal,
    pub total: Decimal,
    pub month: i32,
    pub year: i32,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SalaryWithEmployeeEntity> for SalaryResponse {
    fn from(entity: SalaryWithEmployeeEntity) -> Self {
        Self {
            id: entity.id,
            employee_id: entity.employee_id,
            employee_name: entity.employee_name,
            employee_code: entity.employee_code,
            base_salary: entity.base_salary,
            bonus: entity.bonus,
            total: entity.total,
            month: entity.month,
            year: entity.year,
            note: entity.note,
            created_at: format_datetime(entity.created_at),
        }
    }
}
