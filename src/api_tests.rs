//! HTTP-level tests: the real route table, middleware and handlers against a
//! fresh in-memory store.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::web::Data;
use serde_json::{Value, json};

use crate::auth::password::hash_password;
use crate::config::Config;
use crate::model::account::NewAccount;
use crate::model::role::Role;
use crate::notify::{BroadcastNotifier, StatusNotifier};
use crate::routes;
use crate::store::{MemStore, Store};
use crate::tracker::AttendanceTracker;

fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        jwt_secret: "test-secret".to_string(),
        access_token_ttl: 900,
        refresh_token_ttl: 3600,
        rate_login_per_min: 1000,
        rate_register_per_min: 1000,
        rate_refresh_per_min: 1000,
        rate_protected_per_min: 1000,
        api_prefix: "/api/v1".to_string(),
        seed_demo_data: false,
    }
}

fn peer() -> SocketAddr {
    "127.0.0.1:12345".parse().unwrap()
}

async fn seed_user(store: &dyn Store, username: &str, role: Role) -> u64 {
    store
        .create_account(NewAccount {
            username: username.to_string(),
            full_name: format!("{username} person"),
            email: format!("{username}@dayflow.test"),
            role,
            job_title: None,
            department: None,
            password: hash_password("password123").unwrap(),
            is_first_login: false,
        })
        .await
        .unwrap()
        .id
}

macro_rules! test_app {
    ($store:expr) => {{
        let store: Arc<dyn Store> = $store.clone();
        let tracker = AttendanceTracker::new(
            store.clone(),
            Arc::new(BroadcastNotifier::new()) as Arc<dyn StatusNotifier>,
        );
        let config = test_config();
        let route_config = config.clone();
        test::init_service(
            App::new()
                .app_data(Data::from(store))
                .app_data(Data::new(tracker))
                .app_data(Data::new(config))
                .configure(move |cfg| routes::configure(cfg, route_config.clone())),
        )
        .await
    }};
}

macro_rules! login {
    ($app:expr, $username:expr) => {{
        let resp: Value = test::call_and_read_body_json(
            $app,
            TestRequest::post()
                .uri("/auth/login")
                .peer_addr(peer())
                .set_json(json!({ "username": $username, "password": "password123" }))
                .to_request(),
        )
        .await;
        resp["access_token"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn login_returns_tokens_without_the_password_hash() {
    let store = Arc::new(MemStore::new());
    seed_user(store.as_ref(), "sarah", Role::Employee).await;
    let app = test_app!(store);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/auth/login")
            .peer_addr(peer())
            .set_json(json!({ "username": "sarah", "password": "password123" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["access_token"].as_str().is_some());
    assert!(body["refresh_token"].as_str().is_some());
    assert_eq!(body["account"]["username"], "sarah");
    assert!(body["account"].get("password").is_none());
}

#[actix_web::test]
async fn wrong_password_is_unauthorized() {
    let store = Arc::new(MemStore::new());
    seed_user(store.as_ref(), "sarah", Role::Employee).await;
    let app = test_app!(store);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/auth/login")
            .peer_addr(peer())
            .set_json(json!({ "username": "sarah", "password": "nope" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn protected_routes_require_a_token() {
    let store = Arc::new(MemStore::new());
    let app = test_app!(store);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/api/v1/employees")
            .peer_addr(peer())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn check_in_check_out_round_trip() {
    let store = Arc::new(MemStore::new());
    seed_user(store.as_ref(), "sarah", Role::Employee).await;
    let app = test_app!(store);
    let token = login!(&app, "sarah");

    // First check-in opens a session.
    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/attendance/check-in")
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["account"]["current_status"], "present");
    assert!(body["attendance"]["check_in"].as_str().is_some());

    // A second check-in without a check-out is an invalid state.
    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/attendance/check-in")
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Check-out closes it.
    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/attendance/check-out")
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["account"]["current_status"], "absent");
    assert!(body["attendance"]["check_out"].as_str().is_some());

    // And the day shows up in the caller's history.
    let body: Value = test::call_and_read_body_json(
        &app,
        TestRequest::get()
            .uri("/api/v1/attendance")
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(body["total"], 1);
}

#[actix_web::test]
async fn check_out_without_check_in_is_rejected() {
    let store = Arc::new(MemStore::new());
    seed_user(store.as_ref(), "carl", Role::Employee).await;
    let app = test_app!(store);
    let token = login!(&app, "carl");

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/attendance/check-out")
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No active check-in found for today");
}

#[actix_web::test]
async fn leave_decisions_are_admin_only() {
    let store = Arc::new(MemStore::new());
    let employee_id = seed_user(store.as_ref(), "sarah", Role::Employee).await;
    seed_user(store.as_ref(), "admin", Role::Admin).await;
    let app = test_app!(store);

    let employee_token = login!(&app, "sarah");
    let admin_token = login!(&app, "admin");

    let body: Value = test::call_and_read_body_json(
        &app,
        TestRequest::post()
            .uri("/api/v1/leave")
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {employee_token}")))
            .set_json(json!({
                "leave_type": "annual",
                "start_date": chrono::Local::now().date_naive(),
                "end_date": chrono::Local::now().date_naive(),
                "reason": "errand"
            }))
            .to_request(),
    )
    .await;
    let leave_id = body["leave"]["id"].as_u64().unwrap();

    // The requester cannot decide their own leave.
    let resp = test::call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/leave/{leave_id}/approve"))
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {employee_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The admin can, and approval flips the account to on-leave.
    let resp = test::call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/v1/leave/{leave_id}/approve"))
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {admin_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::call_and_read_body_json(
        &app,
        TestRequest::get()
            .uri(&format!("/api/v1/employees/{employee_id}"))
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {admin_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(body["current_status"], "on-leave");
}

#[actix_web::test]
async fn register_then_login() {
    let store = Arc::new(MemStore::new());
    let app = test_app!(store);

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/auth/register")
            .peer_addr(peer())
            .set_json(json!({
                "username": "newbie",
                "password": "password123",
                "full_name": "New Person",
                "email": "newbie@dayflow.test"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Registering the same username again conflicts.
    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/auth/register")
            .peer_addr(peer())
            .set_json(json!({
                "username": "newbie",
                "password": "password123",
                "full_name": "New Person",
                "email": "other@dayflow.test"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let token = login!(&app, "newbie");
    assert!(!token.is_empty());
}

#[actix_web::test]
async fn employees_cannot_provision_accounts() {
    let store = Arc::new(MemStore::new());
    seed_user(store.as_ref(), "sarah", Role::Employee).await;
    let app = test_app!(store);
    let token = login!(&app, "sarah");

    let resp = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/employees")
            .peer_addr(peer())
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({
                "username": "mallory",
                "password": "password123",
                "full_name": "Mallory",
                "email": "mallory@dayflow.test"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
