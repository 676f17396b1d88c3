//! Route-tree selection.
//!
//! A single decision table maps the tenancy category of the request host,
//! plus the storefront probe for hosts that need one, to the tree that
//! serves the request. Keeping this as a pure function means every branch
//! is unit-testable without a router or a backend.

use nerix_core::{HostCategory, TenantProbe};

/// The two top-level route trees.
///
/// The merchant and operator consoles are subtrees of the landing tree,
/// gated by route authorization rather than by hostname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTree {
    /// Marketing surface, auth pages, and the gated consoles.
    Landing,
    /// A merchant's public storefront.
    Storefront,
}

/// Outcome of route selection for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Serve the given tree on this host.
    Mount(RouteTree),
    /// Hard-redirect to the canonical SaaS domain's root: the host is a
    /// custom domain with no storefront bound to it.
    RedirectToSaas,
}

/// Select the route tree for a request.
///
/// The probe is consulted only for custom domains; every platform-owned
/// category is decided by classification alone. A still-`Pending` probe
/// mounts the storefront optimistically - the storefront's own empty state
/// covers the gap, and the no-tenant redirect is never committed before the
/// probe settles.
///
/// The SaaS host itself never reaches the redirect arm: it classifies as
/// [`HostCategory::SaasDomain`] before any probing happens, which is what
/// makes the single redirect branch below sufficient.
#[must_use]
pub const fn select(category: &HostCategory, probe: &TenantProbe) -> RouteDecision {
    match category {
        HostCategory::Localhost | HostCategory::BaseDomain | HostCategory::SaasDomain => {
            RouteDecision::Mount(RouteTree::Landing)
        }
        HostCategory::Subdomain { .. } => RouteDecision::Mount(RouteTree::Storefront),
        HostCategory::CustomDomain => match probe {
            TenantProbe::Pending | TenantProbe::Found(_) => {
                RouteDecision::Mount(RouteTree::Storefront)
            }
            TenantProbe::NotFound => RouteDecision::RedirectToSaas,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use nerix_core::StoreId;

    use super::*;

    const BASE: &str = "nerix.online";
    const SAAS: &str = "nerix.shop";

    fn decide(host: &str, probe: TenantProbe) -> RouteDecision {
        let category = HostCategory::classify(host, BASE, SAAS);
        select(&category, &probe)
    }

    #[test]
    fn test_platform_hosts_mount_landing_regardless_of_probe() {
        for host in ["nerix.shop", "www.nerix.shop", "nerix.online", "localhost"] {
            for probe in [
                TenantProbe::Pending,
                TenantProbe::Found(None),
                TenantProbe::NotFound,
            ] {
                assert_eq!(
                    decide(host, probe),
                    RouteDecision::Mount(RouteTree::Landing),
                    "host {host}"
                );
            }
        }
    }

    #[test]
    fn test_subdomain_mounts_storefront_without_probe() {
        assert_eq!(
            decide("shop.nerix.online", TenantProbe::Pending),
            RouteDecision::Mount(RouteTree::Storefront)
        );
    }

    #[test]
    fn test_custom_domain_pending_is_optimistic() {
        assert_eq!(
            decide("mystore.com", TenantProbe::Pending),
            RouteDecision::Mount(RouteTree::Storefront)
        );
    }

    #[test]
    fn test_custom_domain_found_mounts_storefront() {
        assert_eq!(
            decide("mystore.com", TenantProbe::Found(Some(StoreId::new("str_1")))),
            RouteDecision::Mount(RouteTree::Storefront)
        );
    }

    #[test]
    fn test_custom_domain_not_found_redirects_to_saas() {
        assert_eq!(
            decide("mystore.com", TenantProbe::NotFound),
            RouteDecision::RedirectToSaas
        );
    }

    #[test]
    fn test_selection_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                decide("mystore.com", TenantProbe::NotFound),
                RouteDecision::RedirectToSaas
            );
        }
    }
}
