//! Hostname classification for tenancy resolution.
//!
//! Every request is served under exactly one tenancy category, derived from
//! the hostname it arrived on and the two configured platform domains. The
//! classification is pure: no lookups, no side effects, same output for the
//! same input.

use serde::{Deserialize, Serialize};

/// The tenancy category of a request hostname.
///
/// Exactly one variant applies to any hostname. Rules are evaluated in
/// priority order, so a SaaS domain that happens to sit under the base
/// domain still classifies as [`HostCategory::SaasDomain`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum HostCategory {
    /// Local development hosts (`localhost`, `127.0.0.1`, or any hostname
    /// containing `localhost`).
    Localhost,
    /// The platform's root domain (or its `www.` alias).
    BaseDomain,
    /// The canonical marketing/operator domain (or its `www.` alias).
    SaasDomain,
    /// A merchant subdomain of the base domain.
    Subdomain {
        /// The label immediately preceding the base domain,
        /// e.g. `shop` for `shop.nerix.online`.
        slug: String,
    },
    /// A merchant-owned domain pointed at the platform; requires a runtime
    /// existence probe before a storefront can be served.
    CustomDomain,
}

impl HostCategory {
    /// Classify `hostname` against the configured base and SaaS domains.
    ///
    /// Hostnames are case-insensitive on the wire, so all comparisons are
    /// made on the ASCII-lowercased forms. The caller is expected to have
    /// stripped any port suffix.
    #[must_use]
    pub fn classify(hostname: &str, base_domain: &str, saas_domain: &str) -> Self {
        let host = hostname.to_ascii_lowercase();
        let base = base_domain.to_ascii_lowercase();
        let saas = saas_domain.to_ascii_lowercase();

        if host == "127.0.0.1" || host.contains("localhost") {
            return Self::Localhost;
        }

        if host == base || host == format!("www.{base}") {
            return Self::BaseDomain;
        }

        if host == saas || host == format!("www.{saas}") {
            return Self::SaasDomain;
        }

        if let Some(prefix) = host.strip_suffix(&format!(".{base}")) {
            // The slug is the label immediately preceding the base domain.
            if let Some(slug) = prefix.rsplit('.').next().filter(|s| !s.is_empty()) {
                return Self::Subdomain {
                    slug: slug.to_owned(),
                };
            }
        }

        Self::CustomDomain
    }

    /// Whether this category requires a storefront existence probe before a
    /// route tree can be committed.
    #[must_use]
    pub const fn needs_probe(&self) -> bool {
        matches!(self, Self::CustomDomain)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BASE: &str = "nerix.online";
    const SAAS: &str = "nerix.shop";

    fn classify(host: &str) -> HostCategory {
        HostCategory::classify(host, BASE, SAAS)
    }

    #[test]
    fn test_localhost_variants() {
        assert_eq!(classify("localhost"), HostCategory::Localhost);
        assert_eq!(classify("127.0.0.1"), HostCategory::Localhost);
        assert_eq!(classify("app.localhost"), HostCategory::Localhost);
    }

    #[test]
    fn test_base_domain_and_www_alias() {
        assert_eq!(classify("nerix.online"), HostCategory::BaseDomain);
        assert_eq!(classify("www.nerix.online"), HostCategory::BaseDomain);
    }

    #[test]
    fn test_saas_domain_and_www_alias() {
        assert_eq!(classify("nerix.shop"), HostCategory::SaasDomain);
        assert_eq!(classify("www.nerix.shop"), HostCategory::SaasDomain);
    }

    #[test]
    fn test_subdomain_extracts_slug() {
        assert_eq!(
            classify("shop.nerix.online"),
            HostCategory::Subdomain {
                slug: "shop".to_owned()
            }
        );
    }

    #[test]
    fn test_nested_subdomain_takes_label_before_base() {
        assert_eq!(
            classify("a.shop.nerix.online"),
            HostCategory::Subdomain {
                slug: "shop".to_owned()
            }
        );
    }

    #[test]
    fn test_custom_domain() {
        assert_eq!(classify("mystore.com"), HostCategory::CustomDomain);
        assert_eq!(classify("nerix.dev"), HostCategory::CustomDomain);
        // A lookalike that does not end with ".<base>" is not a subdomain
        assert_eq!(classify("shopnerix.online"), HostCategory::CustomDomain);
    }

    #[test]
    fn test_saas_wins_over_subdomain_rule() {
        // A SaaS domain configured under the base domain still classifies
        // as SaasDomain because rules are evaluated in priority order.
        let category = HostCategory::classify("app.nerix.online", BASE, "app.nerix.online");
        assert_eq!(category, HostCategory::SaasDomain);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("NERIX.Online"), HostCategory::BaseDomain);
        assert_eq!(
            classify("Shop.Nerix.Online"),
            HostCategory::Subdomain {
                slug: "shop".to_owned()
            }
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        for host in ["localhost", "nerix.online", "shop.nerix.online", "x.com"] {
            assert_eq!(classify(host), classify(host));
        }
    }

    #[test]
    fn test_needs_probe() {
        assert!(classify("mystore.com").needs_probe());
        assert!(!classify("nerix.shop").needs_probe());
        assert!(!classify("shop.nerix.online").needs_probe());
    }
}
