//! HTTP API for the video platform.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework
//! - **Tower**: Middleware for CORS, request ids and authentication
//! - **Cookies**: `HttpOnly` access/refresh token cookies, bearer header accepted as fallback
//!
//! # Endpoints Overview
//!
//! ## Authentication (No Auth Required)
//! - `POST /auth/register` - Register and log in
//! - `POST /auth/login` - Login with email and password
//! - `GET /auth/refresh` - Rotate the session behind the refresh cookie
//! - `GET /auth/logout` - End the current session
//! - `GET /auth/email/verify/{code}` - Verify email address
//! - `POST /auth/password/forgot` - Mail a reset link
//! - `POST /auth/password/reset` - Set a new password
//!
//! ## Account (Auth Required)
//! - `GET /user`, `GET /user/check-username/{username}`
//! - `GET /sessions`, `DELETE /sessions/{id}`
//! - `POST /channels`
//!
//! ## Engagement (Auth Required)
//! - `POST /video/{id}/like`, `POST /video/{id}/dislike`, `POST /video/{id}/bookmark`
//! - `POST /comment/{id}/like`, `POST /comment/{id}/dislike`
//! - `POST /subscription/{channel_id}/toggle`, `GET /subscription/{channel_id}/status`
//!
//! ## Health Check
//! - `GET /health` - Server and database health
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vidshare::{MemoryStore, auth::AuthSettings, mail::LogMailer};
//! use vs_server::api::{AppState, cookies::CookieSettings, create_router};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = AuthSettings {
//!     access_secret: "a".repeat(32),
//!     refresh_secret: "b".repeat(32),
//!     pepper: "p".repeat(16),
//!     app_origin: "http://localhost:3000".to_string(),
//! };
//! let cookies = CookieSettings { secure: false, domain: None };
//! let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(LogMailer), settings, cookies)?;
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod channels;
pub mod cookies;
pub mod engagement;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod request_id;
pub mod sessions;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Json},
    routing::{delete, get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use vidshare::{
    AuthManager, AuthResult, EngagementManager, Store,
    auth::AuthSettings,
    channels::ChannelManager,
    mail::Mailer,
};

use cookies::CookieSettings;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub auth_manager: Arc<AuthManager>,
    pub engagement_manager: Arc<EngagementManager>,
    pub channel_manager: Arc<ChannelManager>,
    pub store: Arc<dyn Store>,
    pub cookies: CookieSettings,
    /// Origin allowed to make credentialed cross-origin requests
    pub allowed_origin: Option<HeaderValue>,
}

impl AppState {
    /// Build every manager over one store
    pub fn new(
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        settings: AuthSettings,
        cookies: CookieSettings,
    ) -> AuthResult<Self> {
        let allowed_origin = HeaderValue::from_str(settings.app_origin.trim_end_matches('/')).ok();
        Ok(Self {
            auth_manager: Arc::new(AuthManager::new(store.clone(), mailer, settings)?),
            engagement_manager: Arc::new(EngagementManager::new(store.clone())),
            channel_manager: Arc::new(ChannelManager::new(store.clone())),
            store,
            cookies,
            allowed_origin,
        })
    }
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", get(auth::refresh))
        .route("/auth/logout", get(auth::logout))
        .route("/auth/email/verify/{code}", get(auth::verify_email))
        .route("/auth/password/forgot", post(auth::forgot_password))
        .route("/auth/password/reset", post(auth::reset_password));

    let protected_routes = Router::new()
        .route("/user", get(users::current_user))
        .route("/user/check-username/{username}", get(users::check_username))
        .route("/sessions", get(sessions::list_sessions))
        .route("/sessions/{id}", delete(sessions::delete_session))
        .route("/channels", post(channels::create_channel))
        .route("/video/{video_id}/like", post(engagement::like_video))
        .route("/video/{video_id}/dislike", post(engagement::dislike_video))
        .route("/video/{video_id}/bookmark", post(engagement::toggle_bookmark))
        .route("/comment/{comment_id}/like", post(engagement::like_comment))
        .route("/comment/{comment_id}/dislike", post(engagement::dislike_comment))
        .route(
            "/subscription/{channel_id}/toggle",
            post(engagement::toggle_subscription),
        )
        .route(
            "/subscription/{channel_id}/status",
            get(engagement::subscription_status),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(cors_layer(state.allowed_origin.clone()))
        .with_state(state)
}

fn cors_layer(origin: Option<HeaderValue>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match origin {
        Some(origin) => layer.allow_origin(origin),
        None => layer,
    }
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the store answers, `503 Service Unavailable` otherwise.
///
/// ```bash
/// curl http://localhost:8000/health
/// # {"status":"healthy","version":"0.1.0","database":true,"timestamp":"2026-10-18T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = match state.store.ping().await {
        Ok(()) => true,
        Err(err) => {
            tracing::error!(error = %err, "Health check failed");
            false
        }
    };

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
