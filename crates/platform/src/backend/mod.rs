//! Platform backend API client.
//!
//! The backend owns all business data (stores, users, orders); this
//! deployment only consumes its public and auth surfaces:
//!
//! - `GET  /api/public/store` - storefront bound to the request's Host header
//! - `POST /api/auth/login` - password login, returns `{token, user}`
//! - `POST /api/auth/register` - account creation, returns `{token, user}`
//! - `GET  /api/auth/me` - current user record for session refresh
//! - `POST /api/auth/refresh-token` - possibly-rotated `{token, user}`
//! - `POST /api/auth/forgot-password` / `POST /api/auth/reset-password`
//! - `POST /api/stores` - create the caller's store, returns `{id, name}`

use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use nerix_core::{StoreId, User};

/// Errors that can occur when talking to the platform backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code from the backend.
        status: StatusCode,
        /// Server-provided message, or a generic placeholder.
        message: String,
    },

    /// The request URL could not be constructed.
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Whether this error represents rejected credentials or invalid input,
    /// i.e. something the user can fix, as opposed to a platform fault.
    #[must_use]
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. }
                if status.is_client_error()
        )
    }
}

/// Successful authentication payload.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    /// Bearer token for subsequent backend calls.
    pub token: String,
    /// The authenticated user record.
    pub user: User,
}

/// Minimal store record returned by the public lookup and store creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSummary {
    /// Opaque store identifier.
    pub id: StoreId,
    /// Store display name.
    pub name: String,
}

/// Error body shape the backend uses for 4xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct ResetPasswordBody<'a> {
    token: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CreateStoreBody<'a> {
    name: &'a str,
}

/// Client for the platform backend API.
///
/// Cheaply cloneable; all requests share one `reqwest` connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client for the given base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Check that the backend is reachable at all.
    ///
    /// Any HTTP response counts; only transport failures are errors.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` when the backend cannot be reached.
    pub async fn ping(&self) -> Result<(), BackendError> {
        self.inner
            .client
            .get(self.inner.base_url.clone())
            .send()
            .await?;
        Ok(())
    }

    /// Look up the storefront bound to `hostname`.
    ///
    /// The probed hostname travels as the `Host` header, mirroring how the
    /// backend resolves storefronts for live traffic. `Ok(None)` means the
    /// backend answered 404; transport errors bubble up for the caller to
    /// fold.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-404 error
    /// status.
    pub async fn lookup_store(&self, hostname: &str) -> Result<Option<StoreSummary>, BackendError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("/api/public/store")?)
            .header(reqwest::header::HOST, hostname)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = error_for_status(response).await?;
        let store: StoreSummary = response.json().await?;
        debug!(hostname, store_id = %store.id, "storefront lookup hit");
        Ok(Some(store))
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Status` with the backend's message on
    /// rejected credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/api/auth/login")?)
            .json(&LoginBody { email, password })
            .send()
            .await?;

        let response = error_for_status(response).await?;
        Ok(response.json().await?)
    }

    /// Create an account and authenticate in one step.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Status` on validation failure (taken email,
    /// weak password).
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/api/auth/register")?)
            .json(&RegisterBody {
                name,
                email,
                password,
            })
            .send()
            .await?;

        let response = error_for_status(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the current user record for the given token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Status` when the token is no longer accepted.
    pub async fn me(&self, token: &str) -> Result<User, BackendError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("/api/auth/me")?)
            .bearer_auth(token)
            .send()
            .await?;

        let response = error_for_status(response).await?;
        Ok(response.json().await?)
    }

    /// Exchange the current token for a possibly-rotated one.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Status` when the token is no longer accepted.
    pub async fn refresh_token(&self, token: &str) -> Result<AuthPayload, BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/api/auth/refresh-token")?)
            .bearer_auth(token)
            .send()
            .await?;

        let response = error_for_status(response).await?;
        Ok(response.json().await?)
    }

    /// Request a password-reset email.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or backend rejection.
    pub async fn forgot_password(&self, email: &str) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/api/auth/forgot-password")?)
            .json(&EmailBody { email })
            .send()
            .await?;

        error_for_status(response).await?;
        Ok(())
    }

    /// Complete a password reset with the emailed token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Status` on an expired or unknown reset token.
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/api/auth/reset-password")?)
            .json(&ResetPasswordBody { token, password })
            .send()
            .await?;

        error_for_status(response).await?;
        Ok(())
    }

    /// Create a store for the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Status` when the user already has a store or
    /// the name is rejected.
    pub async fn create_store(&self, token: &str, name: &str) -> Result<StoreSummary, BackendError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/api/stores")?)
            .bearer_auth(token)
            .json(&CreateStoreBody { name })
            .send()
            .await?;

        let response = error_for_status(response).await?;
        Ok(response.json().await?)
    }
}

/// Convert a non-success response into `BackendError::Status`, preserving
/// the server's message when the body parses as the standard error shape.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .map_or_else(|_| "request failed".to_owned(), |body| body.message);

    Err(BackendError::Status { status, message })
}
