//! Platform services.
//!
//! - [`tenants`] - storefront existence resolution with per-host caching
//! - [`session`] - durable authentication session held by the deployment

pub mod session;
pub mod tenants;

pub use session::{FileStorage, PersistedSession, SessionError, SessionStorage, SessionStore, StorageError};
pub use tenants::{StoreLookup, TenantResolver};
