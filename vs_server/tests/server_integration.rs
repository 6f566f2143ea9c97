//! Integration tests for the HTTP API.
//!
//! Every test drives the full router over an in-memory store, carrying cookies
//! between requests the way a browser would.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt; // For `oneshot` method
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use uuid::Uuid;
use vidshare::PgStore;
use vidshare::auth::{AuthSettings, Role, TokenKind, TokenPayload};
use vidshare::channels::models::{NewComment, NewVideo};
use vidshare::db::{ContentRepository, MemoryStore};
use vidshare::mail::{LogMailer, MailError, MailMessage, MailReceipt, Mailer};
use vs_server::api::{AppState, cookies::CookieSettings, create_router};

/// Mailer that remembers every message it was asked to send
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingMailer {
    /// First URL in the most recent message
    fn last_url(&self) -> Option<String> {
        let text = self.sent.lock().unwrap().last()?.text.clone();
        let start = text.find("http")?;
        text[start..].split_whitespace().next().map(str::to_string)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: MailMessage) -> Result<MailReceipt, MailError> {
        self.sent.lock().unwrap().push(message.clone());
        LogMailer.send(message).await
    }
}

struct TestServer {
    app: axum::Router,
    store: Arc<MemoryStore>,
    mailer: Arc<RecordingMailer>,
}

fn settings() -> AuthSettings {
    AuthSettings {
        access_secret: "test_access_secret_for_testing_only_32b".to_string(),
        refresh_secret: "test_refresh_secret_for_testing_only_3".to_string(),
        pepper: "test_pepper_for_testing_only".to_string(),
        app_origin: "http://localhost:3000".to_string(),
    }
}

fn cookie_settings() -> CookieSettings {
    CookieSettings {
        secure: true,
        domain: None,
    }
}

fn create_test_server() -> TestServer {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingMailer::default());

    let state =
        AppState::new(store.clone(), mailer.clone(), settings(), cookie_settings()).unwrap();

    TestServer {
        app: create_router(state),
        store,
        mailer,
    }
}

/// Server over a PostgreSQL pool pointed at a closed port, so every query fails
fn create_unreachable_server() -> (axum::Router, AppState) {
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(500))
        .connect_lazy("postgres://vidshare@127.0.0.1:1/vidshare")
        .unwrap();
    let state = AppState::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(LogMailer),
        settings(),
        cookie_settings(),
    )
    .unwrap();

    (create_router(state.clone()), state)
}

/// Cookie jar carried between requests
#[derive(Default, Clone)]
struct Cookies {
    access: Option<String>,
    refresh: Option<String>,
}

impl Cookies {
    fn absorb(&mut self, response: &Response<Body>) {
        for value in response.headers().get_all(header::SET_COOKIE) {
            let raw = value.to_str().unwrap();
            let pair = raw.split(';').next().unwrap();
            let (name, value) = pair.split_once('=').unwrap();
            let slot = match name {
                "accessToken" => &mut self.access,
                "refreshToken" => &mut self.refresh,
                _ => continue,
            };
            *slot = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }
    }

    fn header(&self, path: &str) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(access) = &self.access {
            parts.push(format!("accessToken={access}"));
        }
        if path.starts_with("/auth/refresh") {
            if let Some(refresh) = &self.refresh {
                parts.push(format!("refreshToken={refresh}"));
            }
        }
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}

async fn send(
    app: &axum::Router,
    cookies: &mut Cookies,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::USER_AGENT, "integration-tests");
    if let Some(cookie) = cookies.header(uri) {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    cookies.absorb(&response);
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &axum::Router, email: &str) -> (Cookies, Value) {
    let mut cookies = Cookies::default();
    let (status, body) = send(
        app,
        &mut cookies,
        "POST",
        "/auth/register",
        Some(json!({
            "email": email,
            "password": "hunter22",
            "confirmPassword": "hunter22"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    (cookies, body)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let server = create_test_server();
    let (status, body) = send(&server.app, &mut Cookies::default(), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();

    let response = server.app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

// ============================================================================
// Authentication Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_register_sets_cookies_and_hides_password() {
    let server = create_test_server();
    let (cookies, body) = register(&server.app, "ada@example.com").await;

    assert!(cookies.access.is_some());
    assert!(cookies.refresh.is_some());
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["verified"], false);
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
    assert!(!body.to_string().contains("hunter22"));
}

#[tokio::test]
async fn test_register_cookie_attributes() {
    let server = create_test_server();
    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "email": "c@example.com",
                "password": "hunter22",
                "confirmPassword": "hunter22"
            })
                .to_string(),
        ))
        .unwrap();

    let response = server.app.oneshot(request).await.unwrap();
    let set_cookies: Vec<&str> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();

    let refresh = set_cookies
        .iter()
        .find(|c| c.starts_with("refreshToken="))
        .unwrap();
    assert!(refresh.contains("Path=/auth/refresh"));
    assert!(refresh.contains("HttpOnly"));
    assert!(refresh.contains("Secure"));
    assert!(refresh.contains("SameSite=None"));
}

#[tokio::test]
async fn test_register_duplicate_email_conflict() {
    let server = create_test_server();
    register(&server.app, "dup@example.com").await;

    let (status, body) = send(
        &server.app,
        &mut Cookies::default(),
        "POST",
        "/auth/register",
        Some(json!({
            "email": "dup@example.com",
            "password": "hunter22",
            "confirmPassword": "hunter22"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already in use");
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let server = create_test_server();
    let (status, body) = send(
        &server.app,
        &mut Cookies::default(),
        "POST",
        "/auth/register",
        Some(json!({
            "email": "m@example.com",
            "password": "one",
            "confirmPassword": "two"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Passwords do not match"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = create_test_server();
    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = server.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let server = create_test_server();
    register(&server.app, "known@example.com").await;

    let (wrong_status, wrong_body) = send(
        &server.app,
        &mut Cookies::default(),
        "POST",
        "/auth/login",
        Some(json!({"email": "known@example.com", "password": "wrong"})),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &server.app,
        &mut Cookies::default(),
        "POST",
        "/auth/login",
        Some(json!({"email": "nobody@example.com", "password": "wrong"})),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_then_access_protected_route() {
    let server = create_test_server();
    register(&server.app, "login@example.com").await;

    let mut cookies = Cookies::default();
    let (status, body) = send(
        &server.app,
        &mut cookies,
        "POST",
        "/auth/login",
        Some(json!({"email": "login@example.com", "password": "hunter22"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");

    let (status, body) = send(&server.app, &mut cookies, "GET", "/user", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "login@example.com");
}

#[tokio::test]
async fn test_bearer_header_accepted() {
    let server = create_test_server();
    let (cookies, _) = register(&server.app, "bearer@example.com").await;

    let request = Request::builder()
        .uri("/user")
        .header(
            header::AUTHORIZATION,
            format!("Bearer {}", cookies.access.unwrap()),
        )
        .body(Body::empty())
        .unwrap();

    let response = server.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let server = create_test_server();
    let (status, _) = send(&server.app, &mut Cookies::default(), "GET", "/user", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_and_old_token_fails() {
    let server = create_test_server();
    let (mut cookies, _) = register(&server.app, "rot@example.com").await;
    let mut stale = cookies.clone();

    let (status, body) = send(&server.app, &mut cookies, "GET", "/auth/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Access token refreshed");
    assert_ne!(cookies.refresh, stale.refresh);

    // The replayed refresh token no longer has a session
    let (status, _) = send(&server.app, &mut stale, "GET", "/auth/refresh", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(stale.refresh.is_none(), "cookies cleared on failed refresh");

    // Exactly one session remains and it is the caller's
    let (status, body) = send(&server.app, &mut cookies, "GET", "/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    let sessions = body.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["isCurrent"], true);
}

#[tokio::test]
async fn test_refresh_without_cookie() {
    let server = create_test_server();
    let (status, body) = send(
        &server.app,
        &mut Cookies::default(),
        "GET",
        "/auth/refresh",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing refresh token");
}

#[tokio::test]
async fn test_logout_revokes_session_and_clears_cookies() {
    let server = create_test_server();
    let (mut cookies, _) = register(&server.app, "out@example.com").await;
    let mut kept = cookies.clone();

    let (status, body) = send(&server.app, &mut cookies, "GET", "/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful");
    assert!(cookies.access.is_none());

    // The access token is still signed and unexpired, but its session is gone
    let (status, body) = send(&server.app, &mut kept, "GET", "/user", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["error"],
        "Session expired or invalid. Please log in again."
    );
    assert!(kept.access.is_none(), "cookies cleared on rejected session");
}

#[tokio::test]
async fn test_logout_without_session_succeeds() {
    let server = create_test_server();
    let mut cookies = Cookies {
        access: Some("garbage".to_string()),
        refresh: None,
    };

    let (status, _) = send(&server.app, &mut cookies, "GET", "/auth/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cookies.access.is_none());
}

#[tokio::test]
async fn test_logout_clears_cookies_when_store_fails() {
    let (app, state) = create_unreachable_server();
    let token = state
        .auth_manager
        .tokens()
        .sign(
            &TokenPayload {
                user_id: 1,
                session_id: Uuid::new_v4(),
                role: Role::Viewer,
            },
            TokenKind::Access,
        )
        .unwrap();
    let mut cookies = Cookies {
        access: Some(token),
        refresh: Some("stale".to_string()),
    };

    let (status, body) = send(&app, &mut cookies, "GET", "/auth/logout", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful");
    assert!(cookies.access.is_none());
    assert!(cookies.refresh.is_none());
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let (app, _) = create_unreachable_server();
    let (status, body) = send(&app, &mut Cookies::default(), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"], false);
}

#[tokio::test]
async fn test_verify_email_flow() {
    let server = create_test_server();
    let (mut cookies, _) = register(&server.app, "verify@example.com").await;

    let url = server.mailer.last_url().unwrap();
    let code = url.rsplit('/').next().unwrap().to_string();

    let uri = format!("/auth/email/verify/{code}");
    let (status, body) = send(&server.app, &mut Cookies::default(), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Email successfully verified");

    let (_, user) = send(&server.app, &mut cookies, "GET", "/user", None).await;
    assert_eq!(user["verified"], true);

    // Codes are single use
    let (status, _) = send(&server.app, &mut Cookies::default(), "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &server.app,
        &mut Cookies::default(),
        "GET",
        "/auth/email/verify/not-a-code",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let server = create_test_server();
    let (mut old_cookies, _) = register(&server.app, "reset@example.com").await;

    let (status, body) = send(
        &server.app,
        &mut Cookies::default(),
        "POST",
        "/auth/password/forgot",
        Some(json!({"email": "reset@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset email sent");

    let url = server.mailer.last_url().unwrap();
    let code = url
        .split("code=")
        .nth(1)
        .unwrap()
        .split('&')
        .next()
        .unwrap()
        .to_string();

    let (status, _) = send(
        &server.app,
        &mut Cookies::default(),
        "POST",
        "/auth/password/reset",
        Some(json!({"password": "new-password", "verificationCode": code})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Every session was revoked
    let (status, _) = send(&server.app, &mut old_cookies, "GET", "/user", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &server.app,
        &mut Cookies::default(),
        "POST",
        "/auth/login",
        Some(json!({"email": "reset@example.com", "password": "new-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_password_reset_rate_limited() {
    let server = create_test_server();
    register(&server.app, "limit@example.com").await;

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let (status, _) = send(
            &server.app,
            &mut Cookies::default(),
            "POST",
            "/auth/password/forgot",
            Some(json!({"email": "limit@example.com"})),
        )
        .await;
        statuses.push(status);
    }

    assert_eq!(
        statuses,
        vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
    );
}

// ============================================================================
// Session Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_delete_session() {
    let server = create_test_server();
    let (mut first, _) = register(&server.app, "multi@example.com").await;

    let mut second = Cookies::default();
    send(
        &server.app,
        &mut second,
        "POST",
        "/auth/login",
        Some(json!({"email": "multi@example.com", "password": "hunter22"})),
    )
    .await;

    let (_, body) = send(&server.app, &mut first, "GET", "/sessions", None).await;
    let sessions = body.as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    let other = sessions
        .iter()
        .find(|s| s["isCurrent"] == false)
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let uri = format!("/sessions/{other}");
    let (status, body) = send(&server.app, &mut first, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Session removed");

    let (status, _) = send(&server.app, &mut second, "GET", "/user", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&server.app, &mut first, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_check_username() {
    let server = create_test_server();
    let (mut cookies, _) = register(&server.app, "name@example.com").await;

    let (status, body) = send(
        &server.app,
        &mut cookies,
        "GET",
        "/user/check-username/fresh_name",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], true);
}

// ============================================================================
// Engagement Endpoint Tests
// ============================================================================

async fn create_channel(app: &axum::Router, cookies: &mut Cookies) -> i64 {
    let (status, body) = send(
        app,
        cookies,
        "POST",
        "/channels",
        Some(json!({"name": "Bread Lab", "slug": "bread-lab"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_channel_creation_conflicts() {
    let server = create_test_server();
    let (mut cookies, _) = register(&server.app, "owner@example.com").await;
    create_channel(&server.app, &mut cookies).await;

    let (status, _) = send(
        &server.app,
        &mut cookies,
        "POST",
        "/channels",
        Some(json!({"name": "Second", "slug": "second"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &server.app,
        &mut cookies,
        "POST",
        "/channels",
        Some(json!({"name": "Bad", "slug": "bad", "bannerImage": "not a url"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_video_reaction_scenario() {
    let server = create_test_server();
    let (mut cookies, _) = register(&server.app, "fan@example.com").await;
    let channel_id = create_channel(&server.app, &mut cookies).await;
    let video = server
        .store
        .create_video(&NewVideo {
            channel_id,
            title: "Sourdough".to_string(),
        })
        .await
        .unwrap();

    let like = format!("/video/{}/like", video.id);
    let dislike = format!("/video/{}/dislike", video.id);

    let (status, body) = send(&server.app, &mut cookies, "POST", &like, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isActive"], true);
    assert_eq!(body["likes"], 1);
    assert_eq!(body["message"], "Video liked successfully");

    let (_, body) = send(&server.app, &mut cookies, "POST", &dislike, None).await;
    assert_eq!(body["isActive"], true);
    assert_eq!(body["likes"], 0);
    assert_eq!(body["dislikes"], 1);

    let (_, body) = send(&server.app, &mut cookies, "POST", &dislike, None).await;
    assert_eq!(body["isActive"], false);
    assert_eq!(body["dislikes"], 0);

    let (status, body) = send(&server.app, &mut cookies, "POST", "/video/9999/like", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_comment_reactions() {
    let server = create_test_server();
    let (mut cookies, user) = register(&server.app, "critic@example.com").await;
    let channel_id = create_channel(&server.app, &mut cookies).await;
    let video = server
        .store
        .create_video(&NewVideo {
            channel_id,
            title: "Rye".to_string(),
        })
        .await
        .unwrap();
    let comment = server
        .store
        .create_comment(&NewComment {
            video_id: video.id,
            user_id: user["id"].as_i64().unwrap(),
            content: "Nice crumb".to_string(),
        })
        .await
        .unwrap();

    let like = format!("/comment/{}/like", comment.id);
    let (_, body) = send(&server.app, &mut cookies, "POST", &like, None).await;
    assert_eq!(body["isActive"], true);
    assert_eq!(body["likes"], 1);

    let (_, body) = send(&server.app, &mut cookies, "POST", &like, None).await;
    assert_eq!(body["isActive"], false);
    assert_eq!(body["likes"], 0);
}

#[tokio::test]
async fn test_bookmark_and_subscription() {
    let server = create_test_server();
    let (mut owner, _) = register(&server.app, "maker@example.com").await;
    let channel_id = create_channel(&server.app, &mut owner).await;
    let video = server
        .store
        .create_video(&NewVideo {
            channel_id,
            title: "Focaccia".to_string(),
        })
        .await
        .unwrap();

    let (mut viewer, _) = register(&server.app, "watcher@example.com").await;

    let bookmark = format!("/video/{}/bookmark", video.id);
    let (status, body) = send(
        &server.app,
        &mut viewer,
        "POST",
        &bookmark,
        Some(json!({"time": 12})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bookmarked"], true);

    let (_, body) = send(
        &server.app,
        &mut viewer,
        "POST",
        &bookmark,
        Some(json!({"time": 12})),
    )
    .await;
    assert_eq!(body["bookmarked"], false);

    let (status, _) = send(
        &server.app,
        &mut viewer,
        "POST",
        &bookmark,
        Some(json!({"time": -5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let toggle = format!("/subscription/{channel_id}/toggle");
    let status_uri = format!("/subscription/{channel_id}/status");

    let (status, body) = send(&server.app, &mut viewer, "POST", &toggle, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscribed"], true);
    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["subscriberCount"], 1);
    assert_eq!(body["channelName"], "Bread Lab");
    assert!(body["id"].is_i64());

    let (_, body) = send(&server.app, &mut viewer, "GET", &status_uri, None).await;
    assert_eq!(body["subscribed"], true);

    let (_, body) = send(&server.app, &mut viewer, "POST", &toggle, None).await;
    assert_eq!(body["subscribed"], false);
    assert_eq!(body["status"], "INACTIVE");
    assert_eq!(body["subscriberCount"], 0);
    assert!(body["id"].is_null());

    let (status, _) = send(&server.app, &mut viewer, "POST", "/subscription/9999/toggle", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
