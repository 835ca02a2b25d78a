//! Employee entities (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::employee::{EmployeeResponse, EmployeeStatus, EmployeeSummary};
use shared::datetime::format_datetime;
use sqlx::FromRow;

use super::user::UserRoleDb;

/// Database enum for `employee_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "employee_status", rename_all = "lowercase")]
pub enum EmployeeStatusDb {
    Active,
    Terminated,
}

impl From<EmployeeStatusDb> for EmployeeStatus {
    fn from(status: EmployeeStatusDb) -> Self {
        match status {
            EmployeeStatusDb::Active => EmployeeStatus::Active,
            EmployeeStatusDb::Terminated => EmployeeStatus::Terminated,
        }
    }
}

impl From<EmployeeStatus> for EmployeeStatusDb {
    fn from(status: EmployeeStatus) -> Self {
        match status {
            EmployeeStatus::Active => EmployeeStatusDb::Active,
            EmployeeStatus::Terminated => EmployeeStatusDb::Terminated,
        }
    }
}

/// Row of the `employees` table.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeEntity {
    pub id: i64,
    pub user_id: i64,
    pub employee_code: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub status: EmployeeStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmployeeEntity> for EmployeeSummary {
    fn from(entity: EmployeeEntity) -> Self {
        Self {
            id: entity.id,
            employee_code: entity.employee_code,
            position: entity.position,
            department: entity.department,
            phone: entity.phone,
            status: entity.status.into(),
        }
    }
}

/// Employee joined with its owning user.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeWithUserEntity {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRoleDb,
    pub employee_code: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub status: EmployeeStatusDb,
    pub created_at: DateTime<Utc>,
}

impl From<EmployeeWithUserEntity> for EmployeeResponse {
    fn from(entity: EmployeeWithUserEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            name: entity.name,
            email: entity.email,
            role: entity.role.into(),
            employee_code: entity.employee_code,
            position: entity.position,
            department: entity.department,
            phone: entity.phone,
            status: entity.status.into(),
            created_at: format_datetime(entity.created_at),
        }
    }
}
