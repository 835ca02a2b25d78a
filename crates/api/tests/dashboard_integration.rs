//! Integration tests for the admin and employee dashboards.
//!
//! The database is shared between tests, so global counters are checked
//! with lower bounds and per-employee figures exactly.

mod common;

use axum::http::StatusCode;
use common::{unique_email, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_admin_stats_are_flat() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;
    app.submit_leave(&employee, "2033-05-01", "2033-05-02").await;

    let (status, body) = app.get("/api/admin/dashboard/stats", &admin.token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("data").is_none());
    assert!(body["total_employees"].as_i64().unwrap() >= 2);
    assert!(body["active_staff"].as_i64().unwrap() >= 2);
    assert!(body["pending_leaves"].as_i64().unwrap() >= 1);
    // Every admin is told about every new request
    assert!(body["unread_notifications"].as_i64().unwrap() >= 1);
    assert!(
        body["total_notifications"].as_i64().unwrap()
            >= body["unread_notifications"].as_i64().unwrap()
    );

    let (status, _) = app
        .get("/api/admin/dashboard/stats", &employee.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_pending_and_recent_lists() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;
    let id = app.submit_leave(&employee, "2033-06-01", "2033-06-03").await;

    let (status, body) = app
        .get("/api/admin/dashboard/pending-leaves", &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().unwrap();
    assert!(rows.iter().any(|r| r["id"] == id));
    assert!(rows.iter().all(|r| r["status"] == "pending"));

    let (status, body) = app
        .get("/api/admin/dashboard/recent-employees", &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["count"].as_u64().unwrap() <= 5);
}

#[tokio::test]
async fn test_employee_breakdown_by_department() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let department = unique_email("dept").replace('@', "_");
    app.create_employee_in(&department).await;
    app.create_employee_in(&department).await;

    let (status, body) = app
        .get("/api/admin/dashboard/employee-stats", &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["by_department"][department.as_str()], 2);
    assert!(body["by_status"]["active"].as_i64().unwrap() >= 2);
}

#[tokio::test]
async fn test_employee_dashboard() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;

    let first = app.submit_leave(&employee, "2033-07-01", "2033-07-01").await;
    app.submit_leave(&employee, "2033-07-10", "2033-07-11").await;
    let (status, _) = app
        .post(
            &format!("/api/leave-requests/{}/status", first),
            &admin.token,
            json!({ "status": "approved" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .get("/api/employee/dashboard/stats", &employee.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pending_leaves"], 1);
    assert_eq!(body["approved_leaves"], 1);
    assert_eq!(body["department"], "Engineering");
    assert_eq!(body["status"], "active");
    assert_eq!(
        body["employee_code"],
        format!("EMP-{:05}", employee.employee_id)
    );
    assert_eq!(body["unread_notifications"], 1);

    let (_, body) = app
        .get("/api/employee/dashboard/leave-stats", &employee.token)
        .await;
    assert_eq!(body["by_status"]["pending"], 1);
    assert_eq!(body["by_status"]["approved"], 1);
    assert_eq!(body["by_type"]["annual"], 2);

    let (_, body) = app
        .get("/api/employee/dashboard/my-leaves", &employee.token)
        .await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_employee_dashboard_without_profile() {
    let Some(app) = TestApp::spawn().await else { return };
    let email = unique_email("noprofile");

    let (status, body) = app
        .request(
            axum::http::Method::POST,
            "/api/register",
            None,
            Some(json!({
                "name": "No Profile",
                "email": email,
                "password": "Secret123!",
                "password_confirmation": "Secret123!",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app.get("/api/employee/dashboard/stats", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Employee profile not found");
}
