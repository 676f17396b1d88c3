//! Durable authentication session.
//!
//! The deployment holds exactly one session against the platform backend,
//! hydrated from durable storage at startup and consulted synchronously by
//! route authorization on every protected request. All mutation goes
//! through [`SessionStore`]; nothing else touches the storage file.
//!
//! Persistence is all-or-nothing: the durable document carries token and
//! user together, and hydration that cannot produce both yields the fully
//! anonymous session. There is never an observable state with only one of
//! the two populated.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use nerix_core::{Session, User};

use crate::backend::{AuthPayload, BackendClient, BackendError};

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend rejected or failed an authentication call.
    #[error("auth error: {0}")]
    Auth(#[from] BackendError),

    /// Durable storage could not be read or written.
    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),

    /// An operation needing a token ran against an anonymous session.
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Errors from the durable storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed session document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durable session document.
///
/// `token` and `user` travel together so a partial write can never leave a
/// half-authenticated state on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    /// Bearer token for the platform backend.
    pub token: String,
    /// The authenticated user record.
    pub user: User,
    /// When this document was written; diagnostic only.
    pub saved_at: DateTime<Utc>,
}

/// Durable storage seam for the session document.
///
/// Production uses [`FileStorage`]; tests substitute in-memory stores.
pub trait SessionStorage: Send + Sync {
    /// Read the persisted document, `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store exists but cannot be read or
    /// parsed.
    fn load(&self) -> Result<Option<PersistedSession>, StorageError>;

    /// Persist the document, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the document cannot be written.
    fn save(&self, session: &PersistedSession) -> Result<(), StorageError>;

    /// Remove the persisted document, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when removal fails for a reason other than
    /// the document already being absent.
    fn clear(&self) -> Result<(), StorageError>;
}

/// File-backed session storage with atomic replace.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create storage at the given path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StorageError> {
        // Write to a sibling temp file and rename so readers never observe
        // a torn document.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(session)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// The deployment's session service.
///
/// Reads are synchronous snapshots; mutations persist to durable storage
/// before swapping the in-memory state, so a failed write never leaves the
/// two out of sync.
pub struct SessionStore {
    backend: BackendClient,
    storage: Arc<dyn SessionStorage>,
    session: RwLock<Session>,
}

impl SessionStore {
    /// Create a store over the given backend and durable storage.
    pub fn new(backend: BackendClient, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            backend,
            storage,
            session: RwLock::new(Session::anonymous()),
        }
    }

    /// Load the persisted session into memory.
    ///
    /// Any defect in the stored document (missing file, unreadable,
    /// unparsable, either key absent) yields the anonymous session: the
    /// store fails closed, never half-open.
    pub fn hydrate(&self) {
        let session = match self.storage.load() {
            Ok(Some(persisted)) => {
                debug!(saved_at = %persisted.saved_at, "restored persisted session");
                Session::authenticated(persisted.token, persisted.user)
            }
            Ok(None) => Session::anonymous(),
            Err(err) => {
                warn!(error = %err, "discarding unreadable session document");
                Session::anonymous()
            }
        };

        *self.write() = session;
    }

    /// Synchronous snapshot of the current session.
    #[must_use]
    pub fn get(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Authenticate with email and password.
    ///
    /// On success the new session is persisted and swapped in atomically;
    /// on failure the current session is untouched.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Auth` on rejected credentials or backend
    /// failure, `SessionError::Storage` when persistence fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, SessionError> {
        let payload = self.backend.login(email, password).await?;
        info!(user = %payload.user.id, "login succeeded");
        self.establish(payload)
    }

    /// Create an account and authenticate in one step.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Auth` on validation failure or backend
    /// failure, `SessionError::Storage` when persistence fails.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, SessionError> {
        let payload = self.backend.register(name, email, password).await?;
        info!(user = %payload.user.id, "registration succeeded");
        self.establish(payload)
    }

    /// Clear both the durable document and the in-memory session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the durable document cannot be
    /// removed; the in-memory session is not cleared in that case so the
    /// two stay consistent.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.storage.clear()?;
        *self.write() = Session::anonymous();
        info!("session cleared");
        Ok(())
    }

    /// Replace the user record after an out-of-band profile refresh.
    ///
    /// The caller is responsible for passing data consistent with the
    /// current token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when re-persisting fails.
    pub fn set_user(&self, user: User) -> Result<(), SessionError> {
        let updated = {
            let mut session = self.write();
            session.set_user(user);
            session.clone()
        };
        self.persist(&updated)
    }

    /// Replace the token after an out-of-band rotation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when re-persisting fails.
    pub fn set_token(&self, token: String) -> Result<(), SessionError> {
        let updated = {
            let mut session = self.write();
            session.set_token(token);
            session.clone()
        };
        self.persist(&updated)
    }

    /// The current bearer token.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAuthenticated` for an anonymous session.
    pub fn token(&self) -> Result<String, SessionError> {
        self.get()
            .token()
            .map(str::to_owned)
            .ok_or(SessionError::NotAuthenticated)
    }

    /// Persist and swap in a freshly-authenticated session.
    fn establish(&self, payload: AuthPayload) -> Result<Session, SessionError> {
        let session = Session::authenticated(payload.token, payload.user);
        self.persist(&session)?;
        *self.write() = session.clone();
        Ok(session)
    }

    /// Write the durable document matching `session`.
    fn persist(&self, session: &Session) -> Result<(), SessionError> {
        match (session.token(), session.user()) {
            (Some(token), Some(user)) => {
                self.storage.save(&PersistedSession {
                    token: token.to_owned(),
                    user: user.clone(),
                    saved_at: Utc::now(),
                })?;
                Ok(())
            }
            // Nothing durable to write for a partial session; hydration
            // would reject it anyway.
            _ => Ok(()),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
