//! Landing surface route handlers.
//!
//! Carries the marketing page, the auth flows that mutate the session
//! store, and store creation with its session-continuity handling.

use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{error, info};

use nerix_core::User;

use crate::access::{CREATE_STORE_PATH, STORE_PATH};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::services::SessionError;
use crate::state::AppState;

use super::page;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Reset password form data.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
}

/// Store creation form data.
#[derive(Debug, Deserialize)]
pub struct CreateStoreForm {
    pub name: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Query parameters carrying a password-reset token.
#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    pub token: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Pages
// =============================================================================

/// Marketing page; doubles as the catch-all for unknown landing paths.
pub async fn home() -> Response {
    page(
        "Nerix",
        "<h1>Sell anywhere with Nerix</h1>\
         <p>Launch a storefront on your own domain or a free subdomain.</p>\
         <p><a href=\"/register\">Get started</a> · <a href=\"/login\">Sign in</a></p>",
    )
    .into_response()
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> Response {
    page(
        "Sign in - Nerix",
        &format!(
            "{}<h1>Sign in</h1>\
             <form method=\"post\" action=\"/login\">\
             <input type=\"email\" name=\"email\" required>\
             <input type=\"password\" name=\"password\" required>\
             <button type=\"submit\">Sign in</button></form>\
             <p><a href=\"/forgot-password\">Forgot password?</a></p>",
            notice(query.error.as_deref(), query.success.as_deref())
        ),
    )
    .into_response()
}

/// Handle login form submission.
///
/// On success the session is persisted and the user lands on their store
/// (or store creation). Rejected credentials bounce back to the form with
/// a transient message; the session is untouched.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state.sessions().login(&form.email, &form.password).await {
        Ok(session) => Ok(redirect_after_auth(session.user()).into_response()),
        Err(SessionError::Auth(err)) if err.is_client_fault() => {
            Ok(back_with_error("/login", "Invalid email or password").into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> Response {
    page(
        "Create account - Nerix",
        &format!(
            "{}<h1>Create your account</h1>\
             <form method=\"post\" action=\"/register\">\
             <input type=\"text\" name=\"name\" required>\
             <input type=\"email\" name=\"email\" required>\
             <input type=\"password\" name=\"password\" required>\
             <button type=\"submit\">Create account</button></form>",
            notice(query.error.as_deref(), query.success.as_deref())
        ),
    )
    .into_response()
}

/// Handle registration form submission.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match state
        .sessions()
        .register(&form.name, &form.email, &form.password)
        .await
    {
        Ok(session) => Ok(redirect_after_auth(session.user()).into_response()),
        Err(SessionError::Auth(err)) if err.is_client_fault() => {
            let message = err.to_string();
            Ok(back_with_error("/register", &message).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Clear the session and return to the marketing page.
pub async fn logout(State(state): State<AppState>) -> Result<Response, AppError> {
    state.sessions().logout()?;
    Ok(Redirect::to("/").into_response())
}

/// Display the forgot-password page.
pub async fn forgot_password_page(Query(query): Query<MessageQuery>) -> Response {
    page(
        "Reset password - Nerix",
        &format!(
            "{}<h1>Reset your password</h1>\
             <form method=\"post\" action=\"/forgot-password\">\
             <input type=\"email\" name=\"email\" required>\
             <button type=\"submit\">Email me a reset link</button></form>",
            notice(query.error.as_deref(), query.success.as_deref())
        ),
    )
    .into_response()
}

/// Request a password-reset email from the backend.
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Result<Response, AppError> {
    match state.backend().forgot_password(&form.email).await {
        Ok(()) => Ok(back_with_success("/forgot-password", "Check your inbox for a reset link")
            .into_response()),
        Err(err) if err.is_client_fault() => {
            Ok(back_with_error("/forgot-password", "We couldn't find that account")
                .into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Display the reset-password page for an emailed token.
pub async fn reset_password_page(Query(query): Query<ResetQuery>) -> Response {
    let token = query.token.unwrap_or_default();
    page(
        "Choose a new password - Nerix",
        &format!(
            "{}<h1>Choose a new password</h1>\
             <form method=\"post\" action=\"/reset-password\">\
             <input type=\"hidden\" name=\"token\" value=\"{token}\">\
             <input type=\"password\" name=\"password\" required>\
             <button type=\"submit\">Update password</button></form>",
            notice(query.error.as_deref(), None)
        ),
    )
    .into_response()
}

/// Complete a password reset.
pub async fn reset_password(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response, AppError> {
    match state
        .backend()
        .reset_password(&form.token, &form.password)
        .await
    {
        Ok(()) => Ok(back_with_success("/login", "Password updated, sign in below").into_response()),
        Err(err) if err.is_client_fault() => Ok(back_with_error(
            "/reset-password",
            "That reset link has expired; request a new one",
        )
        .into_response()),
        Err(err) => Err(err.into()),
    }
}

/// Display the store-creation page.
///
/// Users who already have a store are sent straight to it.
pub async fn create_store_page(RequireAuth(user): RequireAuth) -> Response {
    if user.store_id.is_some() {
        return Redirect::to(STORE_PATH).into_response();
    }

    create_store_form(&user, None).into_response()
}

/// Create the user's store, then refresh the session so the new store and
/// any rotated token land in it.
///
/// Session continuity is the one fatal-to-the-flow failure here: if no
/// token is obtainable after the store was created, redirecting would
/// strand the user unauthenticated on a protected route, so they stay on
/// this page with an explicit error instead.
pub async fn create_store(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CreateStoreForm>,
) -> Result<Response, AppError> {
    let token = state.sessions().token()?;

    let store = match state.backend().create_store(&token, &form.name).await {
        Ok(store) => store,
        Err(err) if err.is_client_fault() => {
            let message = err.to_string();
            return Ok(create_store_form(&user, Some(&message)).into_response());
        }
        Err(err) => return Err(err.into()),
    };
    info!(store = %store.id, "store created");

    match state.backend().refresh_token(&token).await {
        Ok(payload) => {
            state.sessions().set_token(payload.token)?;
            state.sessions().set_user(payload.user)?;
            Ok(Redirect::to(STORE_PATH).into_response())
        }
        Err(err) => {
            error!(error = %err, "token refresh failed after store creation");
            Ok(create_store_form(
                &user,
                Some("Your store was created but your session could not be refreshed. Sign in again to continue."),
            )
            .into_response())
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Post-authentication landing spot: the console for users with a store,
/// store creation for everyone else. Operators are deliberately not routed
/// toward their console; it is reached only by direct navigation.
fn redirect_after_auth(user: Option<&User>) -> Redirect {
    match user {
        Some(user) if user.store_id.is_some() => Redirect::to(STORE_PATH),
        _ => Redirect::to(CREATE_STORE_PATH),
    }
}

/// Bounce back to `path` with a transient error message.
fn back_with_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message)))
}

/// Bounce back to `path` with a transient success message.
fn back_with_success(path: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{path}?success={}", urlencoding::encode(message)))
}

/// Render the store-creation form, optionally with an error banner.
fn create_store_form(user: &User, error: Option<&str>) -> axum::response::Html<String> {
    let banner = error.map_or(String::new(), |message| {
        format!("<p role=\"alert\">{message}</p>")
    });

    page(
        "Create your store - Nerix",
        &format!(
            "{banner}<h1>Create your store</h1>\
             <p>Welcome, {name}. Name your store to get started.</p>\
             <form method=\"post\" action=\"/create-store\">\
             <input type=\"text\" name=\"name\" required>\
             <button type=\"submit\">Create store</button></form>",
            name = user.name
        ),
    )
}

/// Render transient error/success notices above a form.
fn notice(error: Option<&str>, success: Option<&str>) -> String {
    let mut html = String::new();
    if let Some(message) = error {
        html.push_str(&format!("<p role=\"alert\">{message}</p>"));
    }
    if let Some(message) = success {
        html.push_str(&format!("<p role=\"status\">{message}</p>"));
    }
    html
}
