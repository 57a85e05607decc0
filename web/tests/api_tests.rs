//! HTTP API tests against an in-memory service.

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::TimeDelta;
use guesthouse_core::Clock;
use guesthouse_runtime::BookingConfig;
use guesthouse_testing::{ManualClock, fixtures, test_clock};
use guesthouse_web::{AppState, build_router};
use serde_json::{Value, json};
use std::sync::Arc;

async fn server_with(clock: Arc<dyn Clock>) -> TestServer {
    let service = fixtures::service_over(
        fixtures::seeded_store().await,
        BookingConfig::default(),
        clock,
    );
    let app = build_router(AppState::new(Arc::new(service)));
    TestServer::new(app).expect("Failed to create test server")
}

async fn server() -> TestServer {
    server_with(Arc::new(test_clock())).await
}

fn quote_body(property_id: u32, room: &str, gender: &str) -> Value {
    json!({
        "property_id": property_id,
        "room_label": room,
        "guest_gender": gender,
        "guest_name": "Test Guest",
        "arrival_date": "2025-01-10",
        "departure_date": "2025-01-12",
    })
}

#[tokio::test]
async fn test_health() {
    let server = server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "ok");
}

#[tokio::test]
async fn test_metrics_disabled_is_not_found() {
    let server = server().await;
    let response = server.get("/metrics").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_verify_credentials() {
    let server = server().await;

    let ok = server
        .post("/api/auth/verify")
        .json(&json!({"student_id": "123456", "password": "password123"}))
        .await;
    ok.assert_status_ok();
    let guest = ok.json::<Value>();
    assert_eq!(guest["name"], "Cristiano Ronaldo");
    assert_eq!(guest["gender"], "Male");

    let rejected = server
        .post("/api/auth/verify")
        .json(&json!({"student_id": "123456", "password": "wrong"}))
        .await;
    rejected.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(rejected.json::<Value>()["code"], "AUTH");
}

#[tokio::test]
async fn test_availability_lists_starter_set() {
    let server = server().await;
    let response = server.get("/api/availability").await;
    response.assert_status_ok();

    let report = response.json::<Value>();
    assert_eq!(report["all_sold_out"], false);
    assert_eq!(report["properties"].as_array().map(Vec::len), Some(3));
    assert_eq!(report["properties"][0]["property"]["restriction"], "Women Only");
    assert_eq!(report["properties"][1]["property"]["restriction"], "None");
}

#[tokio::test]
async fn test_get_property() {
    let server = server().await;

    let response = server.get("/api/properties/2").await;
    response.assert_status_ok();
    let property = response.json::<Value>();
    assert_eq!(property["property"]["name"], "Common Guest House");
    assert_eq!(property["rooms"].as_array().map(Vec::len), Some(4));

    server.get("/api/properties/9").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quote_then_commit() {
    let server = server().await;

    let quote = server.post("/api/quotes").json(&quote_body(2, "Single AC", "Male")).await;
    quote.assert_status(StatusCode::CREATED);
    let quote = quote.json::<Value>();
    assert_eq!(quote["details"]["night_count"], 2);
    assert_eq!(quote["details"]["total_amount"], 273_800);

    let token = quote["token"].as_str().expect("token is a string");
    let committed = server.post(&format!("/api/quotes/{token}/commit")).await;
    committed.assert_status_ok();
    assert_eq!(committed.json::<Value>()["quote_token"], token);

    let property = server.get("/api/properties/2").await.json::<Value>();
    assert_eq!(property["rooms"][0]["label"], "Single AC");
    assert_eq!(property["rooms"][0]["available_count"], 4);

    server
        .post(&format!("/api/quotes/{token}/commit"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ineligible_guest_is_forbidden() {
    let server = server().await;
    let response = server.post("/api/quotes").json(&quote_body(1, "Single AC", "Male")).await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "ELIGIBILITY");
    assert!(body.get("available_count").is_none());
}

#[tokio::test]
async fn test_sold_out_is_conflict() {
    let server = server().await;

    for _ in 0..5 {
        let quote = server
            .post("/api/quotes")
            .json(&quote_body(3, "Single AC", "Female"))
            .await
            .json::<Value>();
        let token = quote["token"].as_str().expect("token");
        server
            .post(&format!("/api/quotes/{token}/commit"))
            .await
            .assert_status_ok();
    }

    let sixth = server.post("/api/quotes").json(&quote_body(3, "Single AC", "Female")).await;
    sixth.assert_status(StatusCode::CONFLICT);
    assert_eq!(sixth.json::<Value>()["code"], "SOLD_OUT");
}

#[tokio::test]
async fn test_invalid_input_is_unprocessable() {
    let server = server().await;

    let mut body = quote_body(2, "Single AC", "Male");
    body["arrival_date"] = json!("next tuesday");
    let response = server.post("/api/quotes").json(&body).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");

    let response = server.post("/api/quotes/not-a-token/commit").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_unknown_room_is_not_found() {
    let server = server().await;
    server
        .post("/api/quotes")
        .json(&quote_body(2, "Penthouse", "Male"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_quote_is_gone() {
    let clock = Arc::new(ManualClock::new(test_clock().now()));
    let server = server_with(clock.clone()).await;

    let quote = server
        .post("/api/quotes")
        .json(&quote_body(2, "Shared AC", "Other"))
        .await
        .json::<Value>();
    let token = quote["token"].as_str().expect("token");

    clock.advance(TimeDelta::minutes(20));
    let response = server.post(&format!("/api/quotes/{token}/commit")).await;
    response.assert_status(StatusCode::GONE);
    assert_eq!(response.json::<Value>()["code"], "EXPIRED");
}
