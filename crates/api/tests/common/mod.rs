//! Common test utilities for integration tests.
//!
//! The tests run against a real PostgreSQL database named by
//! `TEST_DATABASE_URL`. When the variable is unset every test returns early.
//! Accounts are created with unique emails so tests can share a database and
//! run in parallel.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use domain::services::RecordingNotifier;
use fake::faker::name::en::Name;
use fake::Fake;
use persistence::entities::{EmployeeStatusDb, UserRoleDb};
use persistence::repositories::{EmployeeRepository, NewEmployee};
use serde_json::Value;
use shared::password::hash_password;
use sqlx::{postgres::PgPoolOptions, PgPool};
use staffhub_api::{app::create_app_with_notifier, config::Config};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "Secret123!";

pub struct TestApp {
    pub app: Router,
    pub pool: PgPool,
    pub notifier: Arc<RecordingNotifier>,
}

/// A user with an employee profile and a live token.
#[derive(Debug, Clone)]
pub struct TestAccount {
    pub user_id: i64,
    pub employee_id: i64,
    pub name: String,
    pub email: String,
    pub token: String,
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}_{}@example.com", prefix, uuid::Uuid::new_v4().simple())
}

pub async fn create_test_pool(database_url: &str) -> PgPool {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await
        .expect("Failed to connect to test database")
}

impl TestApp {
    /// `None` when no test database is configured.
    pub async fn spawn() -> Option<Self> {
        Self::spawn_with(RecordingNotifier::new()).await
    }

    /// Like [`TestApp::spawn`], with a caller-supplied notifier.
    pub async fn spawn_with(notifier: RecordingNotifier) -> Option<Self> {
        let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping");
            return None;
        };

        let pool = create_test_pool(&database_url).await;
        sqlx::migrate!("../persistence/src/migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let config = Config::load_for_test(&[("database.url", database_url.as_str())])
            .expect("Failed to build test config");
        let notifier = Arc::new(notifier);
        let app = create_app_with_notifier(config, pool.clone(), notifier.clone())
            .expect("Failed to build app");

        Some(Self {
            app,
            pool,
            notifier,
        })
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Logs in and returns the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    async fn create_account(&self, role: UserRoleDb, department: &str) -> TestAccount {
        let name: String = Name().fake();
        let email = unique_email(match role {
            UserRoleDb::Admin => "admin",
            UserRoleDb::Employee => "employee",
        });

        let created = EmployeeRepository::new(self.pool.clone())
            .create_with_user(&NewEmployee {
                name: name.clone(),
                email: email.clone(),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
                role,
                password_reset_required: false,
                employee_code: None,
                position: Some("Engineer".to_string()),
                department: Some(department.to_string()),
                phone: None,
                status: EmployeeStatusDb::Active,
            })
            .await
            .expect("Failed to create test account");

        let token = self.login(&email, TEST_PASSWORD).await;

        TestAccount {
            user_id: created.user_id,
            employee_id: created.id,
            name,
            email,
            token,
        }
    }

    pub async fn create_admin(&self) -> TestAccount {
        self.create_account(UserRoleDb::Admin, "Management").await
    }

    pub async fn create_employee(&self) -> TestAccount {
        self.create_account(UserRoleDb::Employee, "Engineering").await
    }

    pub async fn create_employee_in(&self, department: &str) -> TestAccount {
        self.create_account(UserRoleDb::Employee, department).await
    }

    /// Submits a leave request as `employee` and returns its id.
    pub async fn submit_leave(&self, employee: &TestAccount, start: &str, end: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/my-leaves",
                &employee.token,
                serde_json::json!({
                    "start_date": start,
                    "end_date": end,
                    "reason": "Family trip",
                    "type": "annual",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "submit failed: {}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    pub async fn leave_status(&self, id: i64) -> String {
        sqlx::query_scalar::<_, String>("SELECT status::TEXT FROM leave_requests WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn notification_count(&self, user_id: i64) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}
