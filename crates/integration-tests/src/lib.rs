//! Integration test harness for Nerix.
//!
//! Drives the assembled platform router in-process: a stub backend API is
//! spawned on a loopback port, the real `AppState` is built against it,
//! and requests are pushed through the router with chosen `Host` headers.
//!
//! # Stub accounts
//!
//! All accounts authenticate with [`PASSWORD`]:
//!
//! - `maya@example.com` - merchant with store `str_maya`
//! - `nova@example.com` - merchant without a store
//! - `admin@nerix.online` - merchant role, on the default operator
//!   allow-list
//! - `op-role@example.com` - operator role, not on the allow-list
//! - `fragile@example.com` - merchant whose token refresh always fails
//!
//! # Stub storefronts
//!
//! `aurora.example` is the one custom domain with a storefront bound to
//! it; every other probed host answers 404.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

use nerix_platform::config::PlatformConfig;
use nerix_platform::routing;
use nerix_platform::state::AppState;

/// Password accepted for every stub account.
pub const PASSWORD: &str = "secret-pw";

/// The one custom domain the stub backend knows a storefront for.
pub const BOUND_CUSTOM_DOMAIN: &str = "aurora.example";

// =============================================================================
// Stub backend
// =============================================================================

#[derive(Clone, Default)]
struct StubState {
    store_lookups: Arc<AtomicUsize>,
    emails_with_store: Arc<Mutex<HashSet<String>>>,
}

/// Handle to the spawned stub backend.
#[derive(Clone)]
pub struct StubBackend {
    /// Base URL the platform should be configured with.
    pub url: Url,
    state: StubState,
}

impl StubBackend {
    /// Bind a loopback port and serve the stub API on it.
    ///
    /// # Panics
    ///
    /// Panics when the loopback listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = StubState::default();
        state
            .emails_with_store
            .lock()
            .expect("stub lock")
            .insert("maya@example.com".to_owned());

        let router = Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/api/public/store", get(public_store))
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/me", get(me))
            .route("/api/auth/refresh-token", post(refresh_token))
            .route("/api/auth/forgot-password", post(forgot_password))
            .route("/api/stores", post(create_store))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub backend addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            url: format!("http://{addr}").parse().expect("stub backend url"),
            state,
        }
    }

    /// How many storefront lookups the platform has issued.
    #[must_use]
    pub fn store_lookups(&self) -> usize {
        self.state.store_lookups.load(Ordering::SeqCst)
    }
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct Registration {
    name: String,
    email: String,
    #[allow(dead_code)]
    password: String,
}

#[derive(Deserialize)]
struct StoreName {
    #[allow(dead_code)]
    name: String,
}

const ACCOUNTS: [&str; 5] = [
    "maya@example.com",
    "nova@example.com",
    "admin@nerix.online",
    "op-role@example.com",
    "fragile@example.com",
];

fn token_for(email: &str) -> String {
    format!("tok-{email}")
}

fn email_of_token(token: &str) -> Option<String> {
    let mut email = token.strip_prefix("tok-")?;
    while let Some(stripped) = email.strip_suffix("-r") {
        email = stripped;
    }
    Some(email.to_owned())
}

fn user_json(state: &StubState, email: &str) -> Value {
    let local = email.split('@').next().unwrap_or(email);
    let role = if email == "op-role@example.com" {
        "operator"
    } else {
        "merchant"
    };
    let store_id = state
        .emails_with_store
        .lock()
        .expect("stub lock")
        .contains(email)
        .then(|| format!("str_{local}"));

    let mut user = json!({
        "id": format!("usr_{local}"),
        "name": local,
        "email": email,
        "role": role,
    });
    if let Some(store_id) = store_id {
        user["store_id"] = json!(store_id);
    }
    user
}

fn bearer_email(request: &Request) -> Option<String> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    email_of_token(header.strip_prefix("Bearer ")?)
}

fn error_json(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn public_store(State(state): State<StubState>, request: Request) -> Response {
    state.store_lookups.fetch_add(1, Ordering::SeqCst);

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if host == BOUND_CUSTOM_DOMAIN {
        return Json(json!({ "id": "str_aurora", "name": "Aurora Goods" })).into_response();
    }

    error_json(StatusCode::NOT_FOUND, "no storefront for host")
}

async fn login(State(state): State<StubState>, Json(creds): Json<Credentials>) -> Response {
    if creds.password != PASSWORD || !ACCOUNTS.contains(&creds.email.as_str()) {
        return error_json(StatusCode::UNAUTHORIZED, "invalid credentials");
    }

    Json(json!({
        "token": token_for(&creds.email),
        "user": user_json(&state, &creds.email),
    }))
    .into_response()
}

async fn register(State(state): State<StubState>, Json(reg): Json<Registration>) -> Response {
    if reg.name.is_empty() {
        return error_json(StatusCode::UNPROCESSABLE_ENTITY, "name is required");
    }

    Json(json!({
        "token": token_for(&reg.email),
        "user": user_json(&state, &reg.email),
    }))
    .into_response()
}

async fn me(State(state): State<StubState>, request: Request) -> Response {
    bearer_email(&request).map_or_else(
        || error_json(StatusCode::UNAUTHORIZED, "bad token"),
        |email| Json(user_json(&state, &email)).into_response(),
    )
}

async fn refresh_token(State(state): State<StubState>, request: Request) -> Response {
    let Some(email) = bearer_email(&request) else {
        return error_json(StatusCode::UNAUTHORIZED, "bad token");
    };

    if email == "fragile@example.com" {
        return error_json(StatusCode::INTERNAL_SERVER_ERROR, "refresh unavailable");
    }

    Json(json!({
        "token": format!("{}-r", token_for(&email)),
        "user": user_json(&state, &email),
    }))
    .into_response()
}

async fn forgot_password(Json(body): Json<Value>) -> Response {
    if body.get("email").and_then(Value::as_str).unwrap_or("").is_empty() {
        return error_json(StatusCode::UNPROCESSABLE_ENTITY, "email is required");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn create_store(State(state): State<StubState>, request: Request) -> Response {
    let Some(email) = bearer_email(&request) else {
        return error_json(StatusCode::UNAUTHORIZED, "bad token");
    };

    let local = email.split('@').next().unwrap_or("store").to_owned();
    state
        .emails_with_store
        .lock()
        .expect("stub lock")
        .insert(email);

    Json(json!({ "id": format!("str_{local}"), "name": local })).into_response()
}

// =============================================================================
// Test context
// =============================================================================

/// The platform under test: real state and router over the stub backend.
pub struct TestContext {
    app: Router,
    /// The stub backend, for lookup counting.
    pub backend: StubBackend,
    config: PlatformConfig,
    _session_dir: TempDir,
}

impl TestContext {
    /// Spawn a stub backend and assemble the platform against it.
    ///
    /// # Panics
    ///
    /// Panics when the stub backend or temp storage cannot be set up.
    pub async fn new() -> Self {
        let backend = StubBackend::spawn().await;
        let session_dir = TempDir::new().expect("temp session dir");

        let config = PlatformConfig {
            host: "127.0.0.1".parse().expect("loopback"),
            port: 0,
            base_domain: "nerix.online".to_owned(),
            saas_domain: "nerix.shop".to_owned(),
            admin_allowlist: None,
            api_url: backend.url.clone(),
            session_file: session_dir.path().join("session.json"),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let app = routing::app(AppState::new(config.clone()));

        Self {
            app,
            backend,
            config,
            _session_dir: session_dir,
        }
    }

    /// Rebuild state and router over the same config and session file,
    /// simulating a process restart (fresh probe cache, rehydrated
    /// session).
    pub fn restart(&mut self) {
        self.app = routing::app(AppState::new(self.config.clone()));
    }

    /// Issue a GET for `path` on `host`.
    ///
    /// # Panics
    ///
    /// Panics when the request cannot be built or routed.
    pub async fn get(&self, host: &str, path: &str) -> Response {
        let request = axum::http::Request::builder()
            .uri(path)
            .header(header::HOST, host)
            .body(Body::empty())
            .expect("request");

        self.app.clone().oneshot(request).await.expect("response")
    }

    /// Issue a form POST for `path` on `host`.
    ///
    /// # Panics
    ///
    /// Panics when the request cannot be built or routed.
    pub async fn post_form(&self, host: &str, path: &str, fields: &[(&str, &str)]) -> Response {
        let body = serde_urlencoded::to_string(fields).expect("encode form");
        let request = axum::http::Request::builder()
            .method("POST")
            .uri(path)
            .header(header::HOST, host)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request");

        self.app.clone().oneshot(request).await.expect("response")
    }
}

/// Collect a response body as text.
///
/// # Panics
///
/// Panics when the body cannot be collected.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("collect body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

/// The `Location` header of a redirect response.
///
/// # Panics
///
/// Panics when the response has no parsable `Location` header.
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
        .to_owned()
}
