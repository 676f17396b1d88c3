//! Authentication middleware and extractors.
//!
//! Two integration points over the same policy:
//!
//! - [`RequireAuth`], an extractor for individual handlers that need the
//!   current user (e.g. store creation).
//! - [`require_merchant_console`] / [`require_operator_console`], router
//!   layers gating whole console subtrees through [`crate::access::guard`].
//!
//! Authorization failures are silent redirects; only bare API requests get
//! a status code instead.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use nerix_core::{Role, User};

use crate::access::{Access, LOGIN_PATH, guard};
use crate::state::AppState;

/// Extractor that requires an authenticated session.
///
/// If nobody is signed in, HTML requests are redirected to the login page
/// and API requests get 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Error returned when authentication is required but nobody is signed in.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.sessions().get();

        session
            .user()
            .filter(|_| session.is_authenticated())
            .cloned()
            .map(Self)
            .ok_or_else(|| {
                if parts.uri.path().starts_with("/api/") {
                    AuthRejection::Unauthorized
                } else {
                    AuthRejection::RedirectToLogin
                }
            })
    }
}

/// Layer the merchant console behind authentication.
///
/// No role requirement: any authenticated user may manage their store (or
/// be walked into creating one).
pub async fn require_merchant_console(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    run_guard(&state, None, request, next).await
}

/// Layer the operator console behind the operator requirement.
///
/// Access is decided by the allow-list override policy; see
/// [`crate::access::guard`].
pub async fn require_operator_console(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    run_guard(&state, Some(Role::Operator), request, next).await
}

async fn run_guard(
    state: &AppState,
    required: Option<Role>,
    request: Request,
    next: Next,
) -> Response {
    match guard(&state.sessions().get(), required, state.allowlist()) {
        Access::Granted => next.run(request).await,
        Access::Redirect(target) => Redirect::to(target).into_response(),
    }
}
