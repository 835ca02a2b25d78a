//! Integration tests for the salary ledger.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_total_is_computed_server_side() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;

    let (status, body) = app
        .post(
            "/api/salaries",
            &admin.token,
            json!({
                "employee_id": employee.employee_id,
                "base_salary": 1500.50,
                "bonus": 200.25,
                "total": 1.0,
                "month": 3,
                "year": 2025,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["total"].as_f64().unwrap(), 1700.75);
    assert_eq!(body["data"]["employee_name"], employee.name.as_str());
}

#[tokio::test]
async fn test_duplicate_period_is_rejected() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;

    let (status, first) = app
        .post(
            "/api/salaries",
            &admin.token,
            json!({
                "employee_id": employee.employee_id,
                "base_salary": 1000,
                "month": 4,
                "year": 2025,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["data"]["bonus"].as_f64().unwrap(), 0.0);

    let (status, _) = app
        .post(
            "/api/salaries",
            &admin.token,
            json!({
                "employee_id": employee.employee_id,
                "base_salary": 9999,
                "bonus": 1,
                "month": 4,
                "year": 2025,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = app
        .get(
            &format!(
                "/api/salaries?employee_id={}&month=4&year=2025",
                employee.employee_id
            ),
            &admin.token,
        )
        .await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["base_salary"].as_f64().unwrap(), 1000.0);
    assert_eq!(body["data"][0]["total"].as_f64().unwrap(), 1000.0);
}

#[tokio::test]
async fn test_create_validation() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;

    let (status, body) = app
        .post(
            "/api/salaries",
            &admin.token,
            json!({
                "employee_id": employee.employee_id,
                "base_salary": -5,
                "month": 13,
                "year": 2025,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["base_salary", "month"]);

    let (status, body) = app
        .post(
            "/api/salaries",
            &admin.token,
            json!({
                "employee_id": 999999999,
                "base_salary": 100,
                "month": 1,
                "year": 2025,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "employee_id");
}

#[tokio::test]
async fn test_amounts_beyond_storage_precision_rejected() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;

    let (status, body) = app
        .post(
            "/api/salaries",
            &admin.token,
            json!({
                "employee_id": employee.employee_id,
                "base_salary": 100000000000000_i64,
                "month": 1,
                "year": 2025,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "base_salary");

    let (status, body) = app
        .post(
            "/api/salaries",
            &admin.token,
            json!({
                "employee_id": employee.employee_id,
                "base_salary": 9000000000000_i64,
                "bonus": 2000000000000_i64,
                "month": 1,
                "year": 2025,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
    assert_eq!(body["details"][0]["field"], "total");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM salaries WHERE employee_id = $1")
        .bind(employee.employee_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn test_update_recomputes_and_checks_period() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;

    let mut ids = Vec::new();
    for month in [5, 6] {
        let (_, body) = app
            .post(
                "/api/salaries",
                &admin.token,
                json!({
                    "employee_id": employee.employee_id,
                    "base_salary": 1000,
                    "month": month,
                    "year": 2025,
                }),
            )
            .await;
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let (status, body) = app
        .put(
            &format!("/api/salaries/{}", ids[0]),
            &admin.token,
            json!({ "base_salary": 1200, "bonus": 300, "month": 5, "year": 2025 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["total"].as_f64().unwrap(), 1500.0);

    let (status, _) = app
        .put(
            &format!("/api/salaries/{}", ids[0]),
            &admin.token,
            json!({ "base_salary": 1200, "month": 6, "year": 2025 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = app
        .delete(&format!("/api/salaries/{}", ids[1]), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .put(
            &format!("/api/salaries/{}", ids[1]),
            &admin.token,
            json!({ "base_salary": 1, "month": 7, "year": 2025 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_my_salaries_only_own_rows() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let mine = app.create_employee().await;
    let other = app.create_employee().await;

    for (employee, month) in [(&mine, 1), (&mine, 2), (&other, 1)] {
        let (status, _) = app
            .post(
                "/api/salaries",
                &admin.token,
                json!({
                    "employee_id": employee.employee_id,
                    "base_salary": 800,
                    "month": month,
                    "year": 2024,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get("/api/my-salaries", &mine.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["employee_id"] == mine.employee_id));
    // Newest period first
    assert_eq!(body["data"][0]["month"], 2);

    let (_, body) = app.get("/api/my-salaries?month=1", &mine.token).await;
    assert_eq!(body["meta"]["total"], 1);

    let (status, _) = app.get("/api/salaries", &mine.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
