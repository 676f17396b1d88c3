//! Platform configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults below describe a local
//! deployment talking to a backend on port 4000.
//!
//! - `NERIX_HOST` - Bind address (default: 127.0.0.1)
//! - `NERIX_PORT` - Listen port (default: 3000)
//! - `NERIX_BASE_DOMAIN` - Root domain under which merchants receive free
//!   subdomains (default: nerix.online)
//! - `NERIX_SAAS_DOMAIN` - Canonical marketing/operator domain
//!   (default: nerix.shop)
//! - `NERIX_ADMIN_ALLOWLIST` - Comma-separated emails granted operator
//!   console access regardless of role (default: built-in set)
//! - `NERIX_API_URL` - Base URL of the platform backend API
//!   (default: http://127.0.0.1:4000)
//! - `NERIX_SESSION_FILE` - Durable session storage path
//!   (default: nerix-session.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default root domain for merchant subdomains.
const DEFAULT_BASE_DOMAIN: &str = "nerix.online";

/// Default canonical SaaS domain.
///
/// The two values are deliberately distinct: the SaaS domain hosts the
/// marketing surface and consoles, the base domain hosts merchant
/// subdomains.
const DEFAULT_SAAS_DOMAIN: &str = "nerix.shop";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Platform application configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Root domain under which merchants receive free subdomains
    pub base_domain: String,
    /// Canonical marketing/operator domain
    pub saas_domain: String,
    /// Raw comma-separated operator allow-list; `None` falls back to the
    /// built-in default set
    pub admin_allowlist: Option<String>,
    /// Base URL of the platform backend API
    pub api_url: Url,
    /// Durable session storage path
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

impl PlatformConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("NERIX_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("NERIX_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("NERIX_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("NERIX_PORT".to_owned(), e.to_string()))?;

        let base_domain = normalize_domain(&get_env_or_default(
            "NERIX_BASE_DOMAIN",
            DEFAULT_BASE_DOMAIN,
        ));
        let saas_domain = normalize_domain(&get_env_or_default(
            "NERIX_SAAS_DOMAIN",
            DEFAULT_SAAS_DOMAIN,
        ));

        let admin_allowlist = get_optional_env("NERIX_ADMIN_ALLOWLIST");

        let api_url = get_env_or_default("NERIX_API_URL", "http://127.0.0.1:4000")
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("NERIX_API_URL".to_owned(), e.to_string()))?;

        let session_file =
            PathBuf::from(get_env_or_default("NERIX_SESSION_FILE", "nerix-session.json"));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_domain,
            saas_domain,
            admin_allowlist,
            api_url,
            session_file,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Root URL of the canonical SaaS domain, the hard-redirect target for
    /// custom domains with no storefront bound to them.
    #[must_use]
    pub fn saas_root(&self) -> String {
        format!("https://{}/", self.saas_domain)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
///
/// A set-but-blank variable falls back to the default as well.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_owned())
}

/// Normalize a configured domain: trim whitespace, lowercase, and strip any
/// scheme or trailing slash someone pasted in.
fn normalize_domain(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_ascii_lowercase()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain_plain() {
        assert_eq!(normalize_domain("nerix.online"), "nerix.online");
    }

    #[test]
    fn test_normalize_domain_strips_scheme_and_slash() {
        assert_eq!(normalize_domain("https://nerix.shop/"), "nerix.shop");
        assert_eq!(normalize_domain("http://Nerix.Shop"), "nerix.shop");
    }

    #[test]
    fn test_normalize_domain_trims_whitespace() {
        assert_eq!(normalize_domain("  nerix.online "), "nerix.online");
    }

    #[test]
    fn test_saas_root() {
        let config = PlatformConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_domain: "nerix.online".to_owned(),
            saas_domain: "nerix.shop".to_owned(),
            admin_allowlist: None,
            api_url: "http://127.0.0.1:4000".parse().unwrap(),
            session_file: PathBuf::from("nerix-session.json"),
            sentry_dsn: None,
            sentry_environment: None,
        };

        assert_eq!(config.saas_root(), "https://nerix.shop/");
        assert_eq!(config.socket_addr().port(), 3000);
    }

}
