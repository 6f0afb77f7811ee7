use accounts::{app::build_app, state::AppState};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    build_app(AppState::fake()).expect("router should build")
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, String) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn signup_then_login_flow() {
    let app = app();

    let (status, body) = post_json(
        &app,
        "/user/signup",
        json!({"name": "Alice", "email": "a@x.com", "password": "pw1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let user: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(user["id"], 1);
    assert_eq!(user["name"], "Alice");
    assert_eq!(user["email"], "a@x.com");
    assert!(user.get("password_hash").is_none());
    assert!(user.get("password").is_none());
    assert!(!body.contains("argon2"));

    let (status, body) = post_json(
        &app,
        "/user/signup",
        json!({"name": "Bob", "email": "a@x.com", "password": "pw2"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, body) = post_json(
        &app,
        "/user/login",
        json!({"email": "a@x.com", "password": "pw1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let user: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(user["id"], 1);
    assert!(!body.contains("argon2"));

    let (status, _) = post_json(
        &app,
        "/user/login",
        json!({"email": "a@x.com", "password": "wrong"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_errors_do_not_reveal_which_part_was_wrong() {
    let app = app();
    post_json(
        &app,
        "/user/signup",
        json!({"name": "Alice", "email": "a@x.com", "password": "pw1"}),
    )
    .await;

    let unknown = post_json(
        &app,
        "/user/login",
        json!({"email": "ghost@x.com", "password": "pw1"}),
    )
    .await;
    let wrong = post_json(
        &app,
        "/user/login",
        json!({"email": "a@x.com", "password": "nope"}),
    )
    .await;
    assert_eq!(unknown.0, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn accepts_emailid_field_and_normalizes_case() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/user/signup",
        json!({"name": "Carol", "emailid": " Carol@Example.COM ", "password": "secret"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let user: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(user["email"], "carol@example.com");

    let (status, _) = post_json(
        &app,
        "/user/login",
        json!({"emailid": "carol@example.com", "password": "secret"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app,
        "/user/signup",
        json!({"name": "Other", "email": "CAROL@example.com", "password": "x"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn signup_rejects_bad_input() {
    let app = app();

    let (status, _) = post_json(
        &app,
        "/user/signup",
        json!({"name": "Dan", "email": "not-an-email", "password": "pw"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        "/user/signup",
        json!({"name": "   ", "email": "d@x.com", "password": "pw"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        "/user/signup",
        json!({"name": "Dan", "email": "d@x.com", "password": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&app, "/user/signup", json!({"email": "d@x.com"})).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn health_check_responds_ok() {
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/user/signup")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    let headers = resp.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn cors_ignores_unknown_origin() {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/user/login")
        .header(header::ORIGIN, "http://evil.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert!(resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
