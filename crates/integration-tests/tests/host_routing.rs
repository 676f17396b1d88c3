//! Host-based route selection, end to end.
//!
//! Drives the assembled router with varying `Host` headers and checks
//! which tree answers, including probe caching for custom domains.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use nerix_integration_tests::{BOUND_CUSTOM_DOMAIN, TestContext, body_text, location};

#[tokio::test]
async fn saas_host_serves_landing() {
    let ctx = TestContext::new().await;

    let response = ctx.get("nerix.shop", "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Sell anywhere with Nerix"));
}

#[tokio::test]
async fn base_host_and_www_alias_serve_landing() {
    let ctx = TestContext::new().await;

    for host in ["nerix.online", "www.nerix.online", "www.nerix.shop"] {
        let response = ctx.get(host, "/").await;
        assert_eq!(response.status(), StatusCode::OK, "host {host}");
        assert!(body_text(response).await.contains("Nerix"), "host {host}");
    }
}

#[tokio::test]
async fn localhost_serves_landing() {
    let ctx = TestContext::new().await;

    let response = ctx.get("localhost:3000", "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Sell anywhere with Nerix"));
}

#[tokio::test]
async fn unknown_landing_path_falls_back_to_marketing_page() {
    let ctx = TestContext::new().await;

    let response = ctx.get("nerix.shop", "/does/not/exist").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Sell anywhere with Nerix"));
}

#[tokio::test]
async fn subdomain_serves_storefront_without_probing() {
    let ctx = TestContext::new().await;

    let response = ctx.get("shop.nerix.online", "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Storefront"));

    // The backend resolves subdomain stores from the Host header itself;
    // the platform never probes for them.
    assert_eq!(ctx.backend.store_lookups(), 0);
}

#[tokio::test]
async fn bound_custom_domain_serves_storefront() {
    let ctx = TestContext::new().await;

    let response = ctx.get(BOUND_CUSTOM_DOMAIN, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Storefront"));
}

#[tokio::test]
async fn unbound_custom_domain_redirects_to_canonical_root() {
    let ctx = TestContext::new().await;

    let response = ctx.get("mystore.com", "/pricing").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "https://nerix.shop/");
}

#[tokio::test]
async fn custom_domain_is_probed_once_per_process() {
    let ctx = TestContext::new().await;

    for _ in 0..3 {
        ctx.get(BOUND_CUSTOM_DOMAIN, "/").await;
    }
    assert_eq!(ctx.backend.store_lookups(), 1);

    // A second hostname costs exactly one more lookup, even on failure.
    ctx.get("mystore.com", "/").await;
    ctx.get("mystore.com", "/").await;
    assert_eq!(ctx.backend.store_lookups(), 2);
}

#[tokio::test]
async fn probe_cache_clears_on_restart() {
    let mut ctx = TestContext::new().await;

    ctx.get(BOUND_CUSTOM_DOMAIN, "/").await;
    assert_eq!(ctx.backend.store_lookups(), 1);

    ctx.restart();
    ctx.get(BOUND_CUSTOM_DOMAIN, "/").await;
    assert_eq!(ctx.backend.store_lookups(), 2);
}

#[tokio::test]
async fn storefront_catch_all_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.get("shop.nerix.online", "/no/such/page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Page not found"));
}

#[tokio::test]
async fn storefront_pages_are_mounted() {
    let ctx = TestContext::new().await;

    for path in [
        "/products/linen-shirt",
        "/categories",
        "/categories/apparel",
        "/checkout",
        "/checkout/payment",
        "/orders/ord_1/status",
        "/account/login",
        "/account/orders",
        "/terms",
    ] {
        let response = ctx.get("shop.nerix.online", path).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
    }
}

#[tokio::test]
async fn health_answers_on_every_host() {
    let ctx = TestContext::new().await;

    for host in ["nerix.shop", "shop.nerix.online", "mystore.com"] {
        let response = ctx.get(host, "/health").await;
        assert_eq!(response.status(), StatusCode::OK, "host {host}");
    }

    // No probes were spent answering health checks.
    assert_eq!(ctx.backend.store_lookups(), 0);
}

#[tokio::test]
async fn readiness_checks_backend_reachability() {
    let ctx = TestContext::new().await;

    let response = ctx.get("nerix.shop", "/health/ready").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let ctx = TestContext::new().await;

    let response = ctx.get("nerix.shop", "/").await;
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.headers().get("x-frame-options").unwrap(),
        "DENY"
    );
}
