//! Errors raised by multi-step repository writes.
//!
//! Single-statement queries return `sqlx::Error` directly. Writes that check
//! uniqueness or existence inside a transaction return [`WriteError`] so the
//! API layer can tell a business conflict from a database failure.

use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("The email has already been taken.")]
    EmailTaken,

    #[error("The employee code has already been taken.")]
    EmployeeCodeTaken,

    #[error("A salary for this employee and period already exists.")]
    DuplicateSalaryPeriod,

    #[error("The selected employee does not exist.")]
    EmployeeMissing,

    #[error("Record not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Name of the violated unique constraint, if `err` is a unique violation.
pub fn unique_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            Some(db.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION))
}

impl WriteError {
    /// Maps a constraint violation that slipped past the in-transaction
    /// checks (a concurrent writer) onto the matching business error.
    pub fn from_constraint(err: sqlx::Error) -> Self {
        match unique_violation(&err).as_deref() {
            Some("users_email_key") => WriteError::EmailTaken,
            Some("employees_employee_code_key") => WriteError::EmployeeCodeTaken,
            Some("salaries_employee_period_key") => WriteError::DuplicateSalaryPeriod,
            _ if is_foreign_key_violation(&err) => WriteError::EmployeeMissing,
            _ => WriteError::Database(err),
        }
    }
}
