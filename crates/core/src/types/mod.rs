//! Core types for Nerix.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod host;
pub mod id;
pub mod probe;
pub mod role;
pub mod session;

pub use email::{Email, EmailError};
pub use host::HostCategory;
pub use id::*;
pub use probe::{TenantProbe, TenantProbeResult};
pub use role::Role;
pub use session::{Session, User};
