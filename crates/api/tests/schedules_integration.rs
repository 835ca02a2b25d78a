//! Integration tests for the company calendar.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::{json, Value};

fn contains_id(list: &Value, id: i64) -> bool {
    list["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["id"] == id)
}

#[tokio::test]
async fn test_schedule_crud_is_admin_only() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;

    let payload = json!({
        "title": "Quarterly review",
        "date": "2031-02-10",
        "time": "14:30",
        "description": "Main hall",
    });

    let (status, _) = app.post("/api/schedules", &employee.token, payload.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.post("/api/schedules", &admin.token, payload).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["time"], "14:30");
    assert_eq!(body["data"]["date"], "10/02/2031");
    let id = body["data"]["id"].as_i64().unwrap();

    // Every signed-in user can read it
    let (status, body) = app
        .get(&format!("/api/schedules/{}", id), &employee.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Quarterly review");

    let (status, body) = app
        .put(
            &format!("/api/schedules/{}", id),
            &admin.token,
            json!({ "time": "09:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["time"], "09:00");
    assert_eq!(body["data"]["title"], "Quarterly review");
    assert_eq!(body["data"]["description"], "Main hall");

    let (status, _) = app
        .put(
            &format!("/api/schedules/{}", id),
            &employee.token,
            json!({ "title": "Hijacked" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete(&format!("/api/schedules/{}", id), &admin.token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .get(&format!("/api/schedules/{}", id), &employee.token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_time_is_rejected() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;

    let (status, body) = app
        .post(
            "/api/schedules",
            &admin.token,
            json!({ "title": "Standup", "date": "2031-03-01", "time": "25:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "time");

    let (status, _) = app
        .post(
            "/api/schedules",
            &admin.token,
            json!({ "title": "   ", "date": "2031-03-01", "time": "10:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_today_and_upcoming_windows() {
    let Some(app) = TestApp::spawn().await else { return };
    let admin = app.create_admin().await;
    let employee = app.create_employee().await;

    let today = Utc::now().date_naive();
    let mut ids = Vec::new();
    for offset in [0, 7, 8] {
        let date = today + Duration::days(offset);
        let (status, body) = app
            .post(
                "/api/schedules",
                &admin.token,
                json!({
                    "title": format!("Day +{}", offset),
                    "date": date.format("%Y-%m-%d").to_string(),
                    "time": "12:00",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let (status, body) = app.get("/api/schedules/today", &employee.token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(contains_id(&body, ids[0]));
    assert!(!contains_id(&body, ids[1]));

    let (_, body) = app.get("/api/schedules/upcoming", &employee.token).await;
    assert!(contains_id(&body, ids[0]));
    assert!(contains_id(&body, ids[1]));
    assert!(!contains_id(&body, ids[2]));
    assert_eq!(
        body["count"].as_u64().unwrap() as usize,
        body["data"].as_array().unwrap().len()
    );
}
