//! Employee repository: the directory and the user accounts behind it.

use domain::models::employee::format_employee_code;
use sqlx::{PgConnection, PgPool};

use crate::entities::{
    EmployeeEntity, EmployeeStatusDb, EmployeeWithUserEntity, UserEntity, UserRoleDb,
};
use crate::error::WriteError;
use crate::metrics::QueryTimer;

const EMPLOYEE_COLUMNS: &str = "id, user_id, employee_code, position, department, phone, status, \
                                created_at, updated_at";

const EMPLOYEE_WITH_USER_SELECT: &str = r#"
    SELECT e.id, e.user_id, u.name, u.email, u.role, e.employee_code, e.position,
           e.department, e.phone, e.status, e.created_at
    FROM employees e
    JOIN users u ON u.id = e.user_id
"#;

/// Filters for the directory listing.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub status: Option<EmployeeStatusDb>,
    /// Case-insensitive substring over code, department, position, name, email.
    pub search: Option<String>,
}

impl EmployeeFilter {
    fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(|term| format!("%{}%", escape_like(term)))
    }
}

/// Everything needed to hire: the user account and its profile.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRoleDb,
    pub password_reset_required: bool,
    pub employee_code: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub status: EmployeeStatusDb,
}

/// Full replacement of a directory entry. `password_hash`/`role` of `None`
/// leave the stored values alone.
#[derive(Debug, Clone)]
pub struct EmployeeUpdate {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: Option<UserRoleDb>,
    pub employee_code: String,
    pub position: String,
    pub department: String,
    pub phone: Option<String>,
    pub status: EmployeeStatusDb,
}

/// Self-service profile edit.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
}

/// Escapes `%`, `_` and `\` so user input matches literally inside ILIKE.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &EmployeeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EmployeeWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_employees");
        let result = sqlx::query_as::<_, EmployeeWithUserEntity>(&format!(
            r#"
            {EMPLOYEE_WITH_USER_SELECT}
            WHERE ($1::employee_status IS NULL OR e.status = $1)
              AND ($2::TEXT IS NULL
                   OR e.employee_code ILIKE $2 OR e.department ILIKE $2
                   OR e.position ILIKE $2 OR u.name ILIKE $2 OR u.email ILIKE $2)
            ORDER BY e.created_at DESC, e.id DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.status)
        .bind(filter.search_pattern())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn count(&self, filter: &EmployeeFilter) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_employees");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM employees e
            JOIN users u ON u.id = e.user_id
            WHERE ($1::employee_status IS NULL OR e.status = $1)
              AND ($2::TEXT IS NULL
                   OR e.employee_code ILIKE $2 OR e.department ILIKE $2
                   OR e.position ILIKE $2 OR u.name ILIKE $2 OR u.email ILIKE $2)
            "#,
        )
        .bind(filter.status)
        .bind(filter.search_pattern())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<EmployeeWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("recent_employees");
        let result = sqlx::query_as::<_, EmployeeWithUserEntity>(&format!(
            "{EMPLOYEE_WITH_USER_SELECT} ORDER BY e.created_at DESC, e.id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_with_user(
        &self,
        id: i64,
    ) -> Result<Option<EmployeeWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_employee_with_user");
        let result = sqlx::query_as::<_, EmployeeWithUserEntity>(&format!(
            "{EMPLOYEE_WITH_USER_SELECT} WHERE e.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_employee_by_id");
        let result = sqlx::query_as::<_, EmployeeEntity>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_employee_by_user_id");
        let result = sqlx::query_as::<_, EmployeeEntity>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Creates the user and the employee in one transaction. Without an
    /// explicit code the employee gets `EMP-` + its zero-padded id.
    pub async fn create_with_user(
        &self,
        new: &NewEmployee,
    ) -> Result<EmployeeWithUserEntity, WriteError> {
        let timer = QueryTimer::new("create_employee_with_user");
        let mut tx = self.pool.begin().await?;

        if email_taken(&mut tx, &new.email, None).await? {
            return Err(WriteError::EmailTaken);
        }
        if let Some(code) = new.employee_code.as_deref() {
            if code_taken(&mut tx, code, None).await? {
                return Err(WriteError::EmployeeCodeTaken);
            }
        }

        let user_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (name, email, password_hash, role, password_reset_required)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role)
        .bind(new.password_reset_required)
        .fetch_one(&mut *tx)
        .await
        .map_err(WriteError::from_constraint)?;

        let employee_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO employees (user_id, employee_code, position, department, phone, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(new.employee_code.as_deref())
        .bind(new.position.as_deref())
        .bind(new.department.as_deref())
        .bind(new.phone.as_deref())
        .bind(new.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(WriteError::from_constraint)?;

        if new.employee_code.is_none() {
            let code = next_free_code(&mut tx, employee_id).await?;
            sqlx::query("UPDATE employees SET employee_code = $2 WHERE id = $1")
                .bind(employee_id)
                .bind(code)
                .execute(&mut *tx)
                .await
                .map_err(WriteError::from_constraint)?;
        }

        let created = fetch_with_user(&mut tx, employee_id)
            .await?
            .ok_or(WriteError::NotFound)?;

        tx.commit().await?;
        timer.record();
        Ok(created)
    }

    /// Replaces the employee and its user. Uniqueness is re-checked against
    /// every other row.
    pub async fn update_with_user(
        &self,
        id: i64,
        update: &EmployeeUpdate,
    ) -> Result<EmployeeWithUserEntity, WriteError> {
        let timer = QueryTimer::new("update_employee_with_user");
        let mut tx = self.pool.begin().await?;

        let user_id = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM employees WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(WriteError::NotFound)?;

        if email_taken(&mut tx, &update.email, Some(user_id)).await? {
            return Err(WriteError::EmailTaken);
        }
        if code_taken(&mut tx, &update.employee_code, Some(id)).await? {
            return Err(WriteError::EmployeeCodeTaken);
        }

        sqlx::query(
            r#"
            UPDATE users
            SET name = $2,
                email = $3,
                password_hash = COALESCE($4, password_hash),
                role = COALESCE($5, role),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(&update.name)
        .bind(&update.email)
        .bind(update.password_hash.as_deref())
        .bind(update.role)
        .execute(&mut *tx)
        .await
        .map_err(WriteError::from_constraint)?;

        sqlx::query(
            r#"
            UPDATE employees
            SET employee_code = $2, position = $3, department = $4, phone = $5,
                status = $6, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.employee_code)
        .bind(&update.position)
        .bind(&update.department)
        .bind(update.phone.as_deref())
        .bind(update.status)
        .execute(&mut *tx)
        .await
        .map_err(WriteError::from_constraint)?;

        let updated = fetch_with_user(&mut tx, id)
            .await?
            .ok_or(WriteError::NotFound)?;

        tx.commit().await?;
        timer.record();
        Ok(updated)
    }

    /// Deletes the employee's user account; the employee row and everything
    /// hanging off it go with it.
    pub async fn delete_with_user(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_employee_with_user");
        let result = sqlx::query(
            "DELETE FROM users WHERE id = (SELECT user_id FROM employees WHERE id = $1)",
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Updates the caller's user fields and employee profile, creating a
    /// minimal active profile without a code when none exists yet.
    pub async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> Result<(UserEntity, EmployeeEntity), WriteError> {
        let timer = QueryTimer::new("update_profile");
        let mut tx = self.pool.begin().await?;

        if email_taken(&mut tx, &update.email, Some(user_id)).await? {
            return Err(WriteError::EmailTaken);
        }

        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, password_reset_required,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&update.name)
        .bind(&update.email)
        .fetch_optional(&mut *tx)
        .await
        .map_err(WriteError::from_constraint)?
        .ok_or(WriteError::NotFound)?;

        let employee = sqlx::query_as::<_, EmployeeEntity>(&format!(
            r#"
            INSERT INTO employees (user_id, phone, position, department, status)
            VALUES ($1, $2, $3, $4, 'active')
            ON CONFLICT (user_id) DO UPDATE
            SET phone = COALESCE(EXCLUDED.phone, employees.phone),
                position = COALESCE(EXCLUDED.position, employees.position),
                department = COALESCE(EXCLUDED.department, employees.department),
                updated_at = NOW()
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(update.phone.as_deref())
        .bind(update.position.as_deref())
        .bind(update.department.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok((user, employee))
    }
}

async fn email_taken(
    conn: &mut PgConnection,
    email: &str,
    except_user_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM users WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(email)
    .bind(except_user_id)
    .fetch_one(conn)
    .await
}

async fn code_taken(
    conn: &mut PgConnection,
    code: &str,
    except_employee_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM employees
            WHERE employee_code = $1 AND ($2::BIGINT IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(code)
    .bind(except_employee_id)
    .fetch_one(conn)
    .await
}

/// `EMP-<id>`, bumped past codes that were already assigned by hand.
async fn next_free_code(conn: &mut PgConnection, employee_id: i64) -> Result<String, sqlx::Error> {
    let mut sequence = employee_id;
    loop {
        let code = format_employee_code(sequence);
        if !code_taken(conn, &code, Some(employee_id)).await? {
            return Ok(code);
        }
        sequence += 1;
    }
}

async fn fetch_with_user(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<EmployeeWithUserEntity>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeWithUserEntity>(&format!(
        "{EMPLOYEE_WITH_USER_SELECT} WHERE e.id = $1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}
