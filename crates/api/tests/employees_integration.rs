//! Integration tests for the employee directory.

mod common;

use axum::http::StatusCode;
use common::{unique_email, TestApp};
use serde_json::{json, Value};

/// Numeric part of an `EMP-00042` style code.
fn code_sequence(code: &Value) -> i64 {
    code.as_str()
        .and_then(|c| c.strip_prefix("EMP-"))
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("unexpected employee code {code}"))
}

#[tokio::test]
async fn test_create_with_password_assigns_code() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let email = unique_email("coded");

    let (status, body) = app
        .post(
            "/api/employees",
            &admin.token,
            json!({
                "name": "Coded Hire",
                "email": email,
                "password": "initial-pass",
                "position": "Designer",
                "department": "Product",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert!(body.get("temporary_password").is_none());
    let id = body["data"]["id"].as_i64().unwrap();
    assert!(code_sequence(&body["data"]["employee_code"]) >= id);
    assert_eq!(body["data"]["role"], "employee");
    assert_eq!(body["data"]["status"], "active");

    let token = app.login(&email, "initial-pass").await;
    let (status, _) = app.get("/api/my-leaves", &token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_generated_code_skips_manually_assigned_code() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;

    let next_id: i64 = sqlx::query_scalar("SELECT last_value + 1 FROM employees_id_seq")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    let claimed = format!("EMP-{:05}", next_id);

    let (status, body) = app
        .post(
            "/api/employees",
            &admin.token,
            json!({
                "name": "Hand Coded",
                "email": unique_email("handcoded"),
                "password": "initial-pass",
                "employee_code": claimed,
                "position": "Analyst",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["employee_code"], claimed.as_str());

    let (status, body) = app
        .post(
            "/api/employees",
            &admin.token,
            json!({
                "name": "Auto Coded",
                "email": unique_email("autocoded"),
                "password": "initial-pass",
                "position": "Analyst",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_ne!(body["data"]["employee_code"], claimed.as_str());
    assert!(code_sequence(&body["data"]["employee_code"]) >= id);
}

#[tokio::test]
async fn test_create_rejects_duplicates() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let existing = app.create_employee().await;
    let code = format!("DUP-{}", existing.employee_id);

    let (status, _) = app
        .post(
            "/api/employees",
            &admin.token,
            json!({
                "name": "First",
                "email": unique_email("first"),
                "employee_code": code,
                "position": "Clerk",
                "department": "Ops",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(
            "/api/employees",
            &admin.token,
            json!({
                "name": "Same Code",
                "email": unique_email("second"),
                "employee_code": code,
                "position": "Clerk",
                "department": "Ops",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "conflict");

    let (status, _) = app
        .post(
            "/api/employees",
            &admin.token,
            json!({
                "name": "Same Email",
                "email": existing.email,
                "position": "Clerk",
                "department": "Ops",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_search_and_show() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let department = format!("Dept_{}", uuid::Uuid::new_v4().simple());
    let employee = app.create_employee_in(&department).await;

    let (status, body) = app
        .get(
            &format!("/api/employees?search={}", department.to_lowercase()),
            &admin.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["id"], employee.employee_id);

    // Wildcards in the term match literally
    let (_, body) = app.get("/api/employees?search=%25%25%25", &admin.token).await;
    assert_eq!(body["meta"]["total"], 0);

    let (status, body) = app
        .get(&format!("/api/employees/{}", employee.employee_id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], employee.email.as_str());

    let (status, _) = app.get("/api/employees/999999999", &admin.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_employee() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;

    let (status, body) = app
        .put(
            &format!("/api/employees/{}", employee.employee_id),
            &admin.token,
            json!({
                "name": "Renamed",
                "email": employee.email,
                "employee_code": format!("UPD-{}", employee.employee_id),
                "position": "Lead",
                "department": "Engineering",
                "status": "terminated",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["status"], "terminated");
    assert_eq!(body["data"]["position"], "Lead");

    let (status, _) = app
        .put(
            &format!("/api/employees/{}", employee.employee_id),
            &admin.token,
            json!({
                "name": "Renamed",
                "email": admin.email,
                "employee_code": format!("UPD-{}", employee.employee_id),
                "position": "Lead",
                "department": "Engineering",
                "status": "active",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_admin_cannot_delete_own_record() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;

    let (status, _) = app
        .delete(&format!("/api/employees/{}", admin.employee_id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get(&format!("/api/employees/{}", admin.employee_id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_removes_account() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;
    app.submit_leave(&employee, "2025-09-01", "2025-09-02").await;

    let (status, _) = app
        .delete(&format!("/api/employees/{}", employee.employee_id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = $1")
        .bind(employee.user_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(users, 0);

    let leaves: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM leave_requests WHERE employee_id = $1")
            .bind(employee.employee_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(leaves, 0);

    // The deleted user's sessions went with it
    let (status, _) = app.get("/api/user", &employee.token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
