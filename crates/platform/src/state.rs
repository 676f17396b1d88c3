//! Application state shared across handlers.

use std::sync::Arc;

use crate::access::AllowList;
use crate::backend::BackendClient;
use crate::config::PlatformConfig;
use crate::services::{FileStorage, SessionStore, TenantResolver};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; owns the backend client, the tenant
/// resolver, the session store, and the parsed operator allow-list.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PlatformConfig,
    backend: BackendClient,
    tenants: TenantResolver<BackendClient>,
    sessions: SessionStore,
    allowlist: AllowList,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// Builds the backend client, the probe cache, and the session store
    /// over file-backed durable storage; the session is hydrated here so
    /// the state is ready before the router starts serving.
    #[must_use]
    pub fn new(config: PlatformConfig) -> Self {
        let backend = BackendClient::new(config.api_url.clone());
        let tenants = TenantResolver::new(backend.clone());
        let storage = Arc::new(FileStorage::new(config.session_file.clone()));
        let sessions = SessionStore::new(backend.clone(), storage);
        sessions.hydrate();

        let allowlist = AllowList::from_config(config.admin_allowlist.as_deref());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                tenants,
                sessions,
                allowlist,
            }),
        }
    }

    /// Get a reference to the platform configuration.
    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the tenant resolver.
    #[must_use]
    pub fn tenants(&self) -> &TenantResolver<BackendClient> {
        &self.inner.tenants
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Get a reference to the operator allow-list.
    #[must_use]
    pub fn allowlist(&self) -> &AllowList {
        &self.inner.allowlist
    }
}
