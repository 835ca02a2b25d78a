//! Creates the first administrator on startup.
//!
//! Runs after migrations when `admin.bootstrap_email` and
//! `admin.bootstrap_password` are set. Idempotent: nothing happens once a
//! user owns the bootstrap email.

use persistence::entities::{EmployeeStatusDb, UserRoleDb};
use persistence::repositories::{EmployeeRepository, NewEmployee, UserRepository};
use persistence::WriteError;
use shared::password::{hash_password, PasswordError};
use shared::validation::normalize_email;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::AdminConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Could not create admin: {0}")]
    Write(#[from] WriteError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    NotConfigured,
    AlreadyPresent,
    Created { user_id: i64, employee_id: i64 },
}

pub async fn bootstrap_admin(
    pool: &PgPool,
    config: &AdminConfig,
) -> Result<BootstrapOutcome, BootstrapError> {
    if !config.is_configured() {
        if !config.bootstrap_email.trim().is_empty() {
            warn!("admin.bootstrap_email is set without admin.bootstrap_password; skipping");
        }
        return Ok(BootstrapOutcome::NotConfigured);
    }

    let email = normalize_email(&config.bootstrap_email);
    if UserRepository::new(pool.clone())
        .find_by_email(&email)
        .await?
        .is_some()
    {
        info!(email = %email, "Bootstrap admin already exists");
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let new = NewEmployee {
        name: config.bootstrap_name.trim().to_string(),
        email: email.clone(),
        password_hash: hash_password(&config.bootstrap_password)?,
        role: UserRoleDb::Admin,
        password_reset_required: false,
        employee_code: None,
        position: Some("Administrator".to_string()),
        department: None,
        phone: None,
        status: EmployeeStatusDb::Active,
    };

    let created = match EmployeeRepository::new(pool.clone())
        .create_with_user(&new)
        .await
    {
        Ok(created) => created,
        // Another instance won the race.
        Err(WriteError::EmailTaken) => return Ok(BootstrapOutcome::AlreadyPresent),
        Err(e) => return Err(e.into()),
    };

    info!(
        email = %email,
        user_id = created.user_id,
        "Bootstrap admin created"
    );
    warn!("Remove admin.bootstrap_password from the configuration after first start");

    Ok(BootstrapOutcome::Created {
        user_id: created.user_id,
        employee_id: created.id,
    })
}
