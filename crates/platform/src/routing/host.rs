//! Host-header dispatch into the prebuilt route trees.
//!
//! The trees are built once at startup; per request this module only
//! classifies the host, resolves the storefront probe when the category
//! calls for one, and oneshots the request into the chosen tree. Probe
//! results are keyed by the hostname they were fetched under, so a result
//! can never be applied to a different host than the one that requested it.

use axum::{
    Router,
    extract::{Extension, Request, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use tower::ServiceExt;
use tracing::debug;

use nerix_core::{HostCategory, TenantProbe};

use crate::routes;
use crate::routing::selector::{RouteDecision, RouteTree, select};
use crate::state::AppState;

/// The prebuilt top-level route trees, shared across requests.
#[derive(Clone)]
pub struct RouteTrees {
    landing: Router,
    storefront: Router,
}

impl RouteTrees {
    /// Build both trees against the given application state.
    #[must_use]
    pub fn new(state: &AppState) -> Self {
        Self {
            landing: routes::landing_tree(state.clone()),
            storefront: routes::storefront_tree(state.clone()),
        }
    }

    async fn serve(router: &Router, request: Request) -> Response {
        match router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(infallible) => match infallible {},
        }
    }
}

/// Serve one request on whichever tree its host selects.
///
/// Wired as the fallback of the outer router so liveness endpoints stay
/// host-independent.
pub async fn dispatch(
    State(state): State<AppState>,
    Extension(trees): Extension<RouteTrees>,
    request: Request,
) -> Response {
    let host = request_host(&request);
    let config = state.config();
    let category = HostCategory::classify(&host, &config.base_domain, &config.saas_domain);

    // Only custom domains need the backend's word; everything else is
    // decided by classification alone. Awaiting settlement here is what
    // guarantees the no-tenant redirect is never committed mid-probe.
    let probe = if category.needs_probe() {
        TenantProbe::from(state.tenants().resolve(&host).await)
    } else {
        TenantProbe::Pending
    };

    match select(&category, &probe) {
        RouteDecision::Mount(RouteTree::Landing) => RouteTrees::serve(&trees.landing, request).await,
        RouteDecision::Mount(RouteTree::Storefront) => {
            RouteTrees::serve(&trees.storefront, request).await
        }
        RouteDecision::RedirectToSaas => {
            debug!(host, "no storefront bound; redirecting to canonical domain");
            Redirect::temporary(&config.saas_root()).into_response()
        }
    }
}

/// The request hostname with any port stripped.
///
/// Prefers the URI authority (HTTP/2), then the `Host` header. A request
/// with neither yields an empty string, which classifies as a custom
/// domain and probes to nothing.
fn request_host(request: &Request) -> String {
    if let Some(host) = request.uri().host() {
        return host.to_ascii_lowercase();
    }

    let raw = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    strip_port(raw).to_ascii_lowercase()
}

/// Strip a `:port` suffix, leaving IPv6 literals intact.
fn strip_port(raw: &str) -> &str {
    if let Some(bracketed) = raw.strip_prefix('[') {
        return bracketed.split(']').next().unwrap_or(raw);
    }

    raw.split(':').next().unwrap_or(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("nerix.shop"), "nerix.shop");
        assert_eq!(strip_port("nerix.shop:3000"), "nerix.shop");
        assert_eq!(strip_port("127.0.0.1:3000"), "127.0.0.1");
        assert_eq!(strip_port("[::1]:3000"), "::1");
    }
}
