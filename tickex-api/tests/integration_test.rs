use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use tickex_api::{app, state::AppState, token::TokenService};
use tickex_core::accounts::AccountService;
use tickex_core::memory::{MemoryTicketRepository, MemoryUserRepository};
use tickex_core::tickets::TicketService;

fn test_app() -> Router {
    let state = AppState {
        accounts: Arc::new(AccountService::new(Arc::new(MemoryUserRepository::new()))),
        tickets: Arc::new(TicketService::new(Arc::new(MemoryTicketRepository::new()))),
        auth: TokenService::new("integration-secret", 3600, jsonwebtoken::Algorithm::HS256),
    };
    app(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn registration(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": "hunter22",
        "confirm_password": "hunter22",
        "phone": "9876543210",
        "gender": "female",
        "age": 28,
    })
}

fn ticket_form() -> Value {
    json!({
        "departure": "Pune",
        "destination": "Mumbai",
        "date": "2024-05-01",
        "time": "10:00",
        "price": 500,
        "seat": "A1",
        "class": "sleeper",
    })
}

async fn register_and_login(app: &Router, name: &str, email: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/v1/register",
        None,
        Some(registration(name, email)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({"email": email, "password": "hunter22"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = test_app();
    let token = register_and_login(&app, "Asha Verma", "asha@example.com").await;

    let (status, body) = send(&app, "GET", "/api/v1/profile/get", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "asha@example.com");
    // The hash never leaves the system
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = test_app();
    register_and_login(&app, "Asha Verma", "asha@example.com").await;

    let (wrong_status, wrong_body) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({"email": "asha@example.com", "password": "nope"})),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({"email": "ghost@example.com", "password": "hunter22"})),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["message"], unknown_body["message"]);
}

#[tokio::test]
async fn test_create_ticket_and_duplicate() {
    let app = test_app();
    let token = register_and_login(&app, "Asha Verma", "asha@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/create-ticket",
        Some(&token),
        Some(ticket_form()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["departure"], "Pune");
    assert_eq!(body["data"]["price"], 500);
    // Contact details were filled from the token claims
    assert_eq!(body["data"]["name"], "Asha Verma");
    // Screenshot fell back to the placeholder
    assert!(body["data"]["screenshot"].as_str().unwrap().contains("default"));

    // The identical submission conflicts
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/create-ticket",
        Some(&token),
        Some(ticket_form()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_create_ticket_missing_fields() {
    let app = test_app();
    let token = register_and_login(&app, "Asha Verma", "asha@example.com").await;

    let mut form = ticket_form();
    form.as_object_mut().unwrap().remove("seat");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/create-ticket",
        Some(&token),
        Some(form),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide all the required fields.");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/create-ticket",
        None,
        Some(ticket_form()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication failed.");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/create-ticket",
        Some("not-a-real-token"),
        Some(ticket_form()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    // Invalid and missing tokens are indistinguishable to the caller
    assert_eq!(body["message"], "Authentication failed.");
}

#[tokio::test]
async fn test_cookie_and_body_token_carriers() {
    let app = test_app();
    let token = register_and_login(&app, "Asha Verma", "asha@example.com").await;

    // Cookie carrier
    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/all-tickets")
        .header(header::COOKIE, format!("token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Body carrier
    let mut form = ticket_form();
    form.as_object_mut()
        .unwrap()
        .insert("token".to_string(), json!(token));
    let (status, _) = send(&app, "POST", "/api/v1/create-ticket", None, Some(form)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_search_tickets() {
    let app = test_app();
    let token = register_and_login(&app, "Asha Verma", "asha@example.com").await;
    send(
        &app,
        "POST",
        "/api/v1/create-ticket",
        Some(&token),
        Some(ticket_form()),
    )
    .await;

    // Case-insensitive on departure/destination
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/search-tickets",
        None,
        Some(json!({"departure": "pune", "destination": "mumbai", "date": "2024-05-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    // Summary projection only: no owner contact details
    assert_eq!(results[0]["class"], "sleeper");
    assert_eq!(results[0]["time"], "10:00");
    assert!(results[0].get("phone").is_none());
    assert!(results[0].get("email").is_none());

    // Missing criteria
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/search-tickets",
        None,
        Some(json!({"departure": "pune"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // No match is an expected not-found, not an empty success
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/search-tickets",
        None,
        Some(json!({"departure": "Delhi", "destination": "Agra", "date": "2024-05-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No tickets found matching the criteria.");
}

#[tokio::test]
async fn test_get_ticket_by_id() {
    let app = test_app();
    let token = register_and_login(&app, "Asha Verma", "asha@example.com").await;
    let (_, created) = send(
        &app,
        "POST",
        "/api/v1/create-ticket",
        Some(&token),
        Some(ticket_form()),
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", &format!("/api/v1/ticket/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    // Malformed id is a validation failure, not a lookup miss
    let (status, body) = send(&app, "GET", "/api/v1/ticket/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid ticket ID.");

    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/ticket/00000000-0000-4000-8000-000000000000",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_and_browse_visibility() {
    let app = test_app();
    let asha = register_and_login(&app, "Asha Verma", "asha@example.com").await;
    let ravi = register_and_login(&app, "Ravi Kumar", "ravi@example.com").await;

    send(
        &app,
        "POST",
        "/api/v1/create-ticket",
        Some(&asha),
        Some(ticket_form()),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/v1/create-ticket",
        Some(&ravi),
        Some(ticket_form()),
    )
    .await;

    // The public listing has every ticket
    let (status, body) = send(&app, "GET", "/api/v1/tickets", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // The browse view excludes the caller's own
    let (status, body) = send(&app, "GET", "/api/v1/all-tickets", Some(&asha), None).await;
    assert_eq!(status, StatusCode::OK);
    let visible = body["data"].as_array().unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0]["name"], "Ravi Kumar");
}

#[tokio::test]
async fn test_profile_update() {
    let app = test_app();
    let token = register_and_login(&app, "Asha Verma", "asha@example.com").await;

    // Password mismatch is rejected
    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/profile/edit",
        Some(&token),
        Some(json!({"password": "newpass99", "confirm_password": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Passwords do not match.");

    // Email is immutable; other fields update
    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/profile/edit",
        Some(&token),
        Some(json!({"name": "Asha V.", "email": "new@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Asha V.");
    assert_eq!(body["data"]["email"], "asha@example.com");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = test_app();
    register_and_login(&app, "Asha Verma", "asha@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(registration("Imposter", "asha@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
