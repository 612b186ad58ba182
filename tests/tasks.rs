mod common;

use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{rt, test, App, HttpServer};
use chrono::{Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::net::TcpListener;
use taskgate::auth::Claims;
use taskgate::models::{Task, TaskStatus};
use taskgate::routes;

use common::{memory_state, register_user, TEST_SECRET};

#[actix_rt::test]
async fn test_create_task_unauthorized() {
    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let state = memory_state();
    let server_state = state.clone();
    let server_handle = rt::spawn(async move {
        HttpServer::new(move || {
            let state = server_state.clone();
            App::new()
                .wrap(Logger::default())
                .configure(|cfg| routes::config(cfg, state))
        })
        .workers(1)
        .bind(("127.0.0.1", port))
        .unwrap_or_else(|_| panic!("Failed to bind to port {}", port))
        .run()
        .await
    });

    // Give the server a moment to start
    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/tasks", port))
        .json(&json!({ "title": "Unauthorized Task" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = resp.json().await.expect("JSON error body");
    assert_eq!(body, json!({ "error": "Missing authorization token" }));

    // Nothing was written for anyone
    let all = state
        .tasks
        .list(1, &Default::default())
        .await
        .expect("listing succeeds");
    assert!(all.is_empty());

    server_handle.abort();
}

#[actix_rt::test]
async fn test_task_crud_flow() {
    let app = test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| routes::config(cfg, memory_state())),
    )
    .await;

    let user = register_user(&app, "crud_user@example.com", "PasswordCrud123!")
        .await
        .expect("Failed to register test user for CRUD flow");

    // 1. Create Task
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header((header::AUTHORIZATION, user.token.clone()))
        .set_json(json!({
            "title": "Buy milk",
            "description": "Two litres",
            "due_date": "2024-05-01"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Task = test::read_body_json(resp).await;
    assert_eq!(created.title, "Buy milk");
    assert_eq!(created.status, TaskStatus::Pending);
    assert_eq!(created.due_date, NaiveDate::from_ymd_opt(2024, 5, 1));
    assert_eq!(created.user_id, user.id);

    // 2. Get Task by ID, using the Bearer form of the header
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .append_header((header::AUTHORIZATION, format!("Bearer {}", user.token)))
        .to_request();
    let fetched: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.id, created.id);

    // 3. Update only the status, as the web client does
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", created.id))
        .append_header((header::AUTHORIZATION, user.token.clone()))
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Task = test::read_body_json(resp).await;
    assert_eq!(updated.status, TaskStatus::Completed);
    assert_eq!(updated.title, "Buy milk");
    assert_eq!(updated.description.as_deref(), Some("Two litres"));

    // 4. Second task, then list and filter
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header((header::AUTHORIZATION, user.token.clone()))
        .set_json(json!({ "title": "Walk the dog" }))
        .to_request();
    let second: Task = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header((header::AUTHORIZATION, user.token.clone()))
        .to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, created.id]);

    let req = test::TestRequest::get()
        .uri("/api/tasks?status=pending")
        .append_header((header::AUTHORIZATION, user.token.clone()))
        .to_request();
    let pending: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.id);

    let req = test::TestRequest::get()
        .uri("/api/tasks?search=MILK")
        .append_header((header::AUTHORIZATION, user.token.clone()))
        .to_request();
    let found: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, created.id);

    // 5. Delete, then the task is gone
    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", created.id))
        .append_header((header::AUTHORIZATION, user.token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .append_header((header::AUTHORIZATION, user.token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_task_ownership_and_authorization() {
    let app =
        test::init_service(App::new().configure(|cfg| routes::config(cfg, memory_state()))).await;

    let user_a = register_user(&app, "owner_a@example.com", "PasswordA123!")
        .await
        .expect("Failed to register User A");
    let user_b = register_user(&app, "other_b@example.com", "PasswordB123!")
        .await
        .expect("Failed to register User B");

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header((header::AUTHORIZATION, user_a.token.clone()))
        .set_json(json!({ "title": "User A's Task" }))
        .to_request();
    let task_a: Task = test::call_and_read_body_json(&app, req).await;

    // User B does not see it in their list
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header((header::AUTHORIZATION, user_b.token.clone()))
        .to_request();
    let tasks_for_b: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert!(tasks_for_b.is_empty());

    // User B can neither read, update nor delete it
    let uri = format!("/api/tasks/{}", task_a.id);
    let attempts = [
        test::TestRequest::get().uri(&uri),
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "title": "Attempted Update by B" })),
        test::TestRequest::delete().uri(&uri),
    ];
    for attempt in attempts {
        let req = attempt
            .append_header((header::AUTHORIZATION, user_b.token.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    // User A still has the original
    let req = test::TestRequest::get()
        .uri(&uri)
        .append_header((header::AUTHORIZATION, user_a.token.clone()))
        .to_request();
    let unchanged: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unchanged.title, "User A's Task");
}

#[actix_rt::test]
async fn test_rejected_tokens() {
    let app =
        test::init_service(App::new().configure(|cfg| routes::config(cfg, memory_state()))).await;
    let user = register_user(&app, "tokens@example.com", "secret1")
        .await
        .expect("registration succeeds");

    let issued_at = Utc::now() - Duration::hours(73);
    let expired = encode(
        &Header::default(),
        &Claims {
            sub: user.id,
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(72)).timestamp(),
        },
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let foreign = encode(
        &Header::default(),
        &Claims {
            sub: user.id,
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(72)).timestamp(),
        },
        &EncodingKey::from_secret(b"not-the-server-secret"),
    )
    .unwrap();

    for token in [expired, foreign, "garbage".to_string()] {
        let req = test::TestRequest::get()
            .uri("/api/tasks")
            .append_header((header::AUTHORIZATION, token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Invalid token" }));
    }
}

#[actix_rt::test]
async fn test_invalid_task_input() {
    let app =
        test::init_service(App::new().configure(|cfg| routes::config(cfg, memory_state()))).await;
    let user = register_user(&app, "input@example.com", "secret1")
        .await
        .expect("registration succeeds");

    for payload in [
        json!({ "title": "" }),
        json!({ "title": "a".repeat(201) }),
        json!({ "title": "ok", "status": "archived" }),
        json!({ "description": "no title" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .append_header((header::AUTHORIZATION, user.token.clone()))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", payload);
    }

    let req = test::TestRequest::get()
        .uri("/api/tasks/not-a-uuid")
        .append_header((header::AUTHORIZATION, user.token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
