//! User account entities (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{CurrentUser, Role, UserSummary};
use sqlx::FromRow;

/// Database enum for `user_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRoleDb {
    Admin,
    Employee,
}

impl From<UserRoleDb> for Role {
    fn from(role: UserRoleDb) -> Self {
        match role {
            UserRoleDb::Admin => Role::Admin,
            UserRoleDb::Employee => Role::Employee,
        }
    }
}

impl From<Role> for UserRoleDb {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => UserRoleDb::Admin,
            Role::Employee => UserRoleDb::Employee,
        }
    }
}

/// Row of the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRoleDb,
    pub password_reset_required: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.into(),
        }
    }
}

/// Identity resolved from a live session: user joined with its optional
/// employee profile.
#[derive(Debug, Clone, FromRow)]
pub struct AuthContextEntity {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRoleDb,
    pub password_reset_required: bool,
    pub employee_id: Option<i64>,
}

impl From<AuthContextEntity> for CurrentUser {
    fn from(entity: AuthContextEntity) -> Self {
        Self {
            user_id: entity.user_id,
            name: entity.name,
            email: entity.email,
            role: entity.role.into(),
            employee_id: entity.employee_id,
            password_reset_required: entity.password_reset_required,
        }
    }
}

/// Admin address used for leave notifications.
#[derive(Debug, Clone, FromRow)]
pub struct AdminContactEntity {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<AdminContactEntity> for domain::services::Recipient {
    fn from(entity: AdminContactEntity) -> Self {
        Self {
            email: entity.email,
            name: entity.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_conversion() {
        assert_eq!(Role::from(UserRoleDb::Admin), Role::Admin);
        assert_eq!(UserRoleDb::from(Role::Employee), UserRoleDb::Employee);
    }

    #[test]
    fn test_auth_context_into_current_user() {
        let user: CurrentUser = AuthContextEntity {
            user_id: 5,
            name: "Jane".into(),
            email: "jane@example.com".into(),
            role: UserRoleDb::Employee,
            password_reset_required: true,
            employee_id: Some(11),
        }
        .into();
        assert_eq!(user.user_id, 5);
        assert_eq!(user.employee_id, Some(11));
        assert!(user.password_reset_required);
        assert!(!user.is_admin());
    }
}
