#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{test, web};
use serde_json::json;
use taskgate::auth::{AuthResponse, TokenService};
use taskgate::store::MemoryStore;
use taskgate::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Fresh in-memory state; each test gets its own users and tasks.
pub fn memory_state() -> web::Data<AppState> {
    let store = Arc::new(MemoryStore::new());
    web::Data::new(AppState::new(
        store.clone(),
        store,
        TokenService::new(TEST_SECRET).expect("test secret is non-empty"),
    ))
}

// Helper struct to hold auth details
pub struct TestUser {
    pub id: i32,
    pub token: String,
}

pub async fn register_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> Result<TestUser, String> {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;

    if !status.is_success() {
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let auth: AuthResponse = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse registration response: {}", e))?;

    Ok(TestUser {
        id: auth.user.id,
        token: auth.token,
    })
}
