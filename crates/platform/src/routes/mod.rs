//! HTTP route trees.
//!
//! Two top-level trees exist; host dispatch decides which one serves a
//! given request. The consoles are subtrees of the landing tree, gated by
//! route authorization, not by hostname.
//!
//! # Landing tree (platform hosts)
//!
//! ```text
//! GET  /                        - Marketing page (also the catch-all)
//! GET  /login                   - Login page
//! POST /login                   - Login action
//! GET  /register                - Registration page
//! POST /register                - Registration action
//! POST /logout                  - Clear the session
//! GET  /forgot-password         - Request a reset email
//! POST /forgot-password
//! GET  /reset-password          - Complete a reset
//! POST /reset-password
//! GET  /create-store            - Store creation page (requires auth)
//! POST /create-store            - Create store + refresh session
//!
//! # Merchant console (requires auth)
//! GET  /store                   - Dashboard
//! POST /store/refresh-profile   - Re-fetch the user record
//! GET  /store/products
//! GET  /store/orders
//! GET  /store/customers
//! GET  /store/settings
//!
//! # Operator console (requires operator access)
//! GET  /admin                   - Overview
//! GET  /admin/stores
//! GET  /admin/users
//! ```
//!
//! # Storefront tree (merchant hosts)
//!
//! ```text
//! GET  /                        - Store home
//! GET  /products/{handle}       - Product detail
//! GET  /categories              - Category listing
//! GET  /categories/{handle}     - Category detail
//! GET  /checkout                - Checkout
//! GET  /checkout/payment        - Payment step
//! GET  /orders/{id}/status      - Order status
//! GET  /account/login           - Customer login
//! GET  /account/orders          - Customer order history
//! GET  /terms                   - Terms of service
//! *                             - Not found
//! ```

pub mod landing;
pub mod merchant;
pub mod operator;
pub mod storefront;

use axum::{
    Router,
    middleware::from_fn_with_state,
    response::Html,
    routing::{get, post},
};

use crate::middleware::{
    auth_rate_limiter, require_merchant_console, require_operator_console,
};
use crate::state::AppState;

/// Create the credential-bearing routes, wrapped in the auth rate limiter.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(landing::login_page).post(landing::login))
        .route(
            "/register",
            get(landing::register_page).post(landing::register),
        )
        .route(
            "/forgot-password",
            get(landing::forgot_password_page).post(landing::forgot_password),
        )
        .route(
            "/reset-password",
            get(landing::reset_password_page).post(landing::reset_password),
        )
        .route_layer(auth_rate_limiter())
}

/// Create the merchant console router.
fn merchant_console(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(merchant::dashboard))
        .route("/refresh-profile", post(merchant::refresh_profile))
        .route("/products", get(merchant::products))
        .route("/orders", get(merchant::orders))
        .route("/customers", get(merchant::customers))
        .route("/settings", get(merchant::settings))
        .route_layer(from_fn_with_state(state, require_merchant_console))
}

/// Create the operator console router.
fn operator_console(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(operator::overview))
        .route("/stores", get(operator::stores))
        .route("/users", get(operator::users))
        .route_layer(from_fn_with_state(state, require_operator_console))
}

/// Create the landing tree: marketing surface, auth pages, and the gated
/// consoles.
pub fn landing_tree(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing::home))
        .route("/logout", post(landing::logout))
        .route(
            "/create-store",
            get(landing::create_store_page).post(landing::create_store),
        )
        .merge(auth_routes())
        .nest("/store", merchant_console(state.clone()))
        .nest("/admin", operator_console(state.clone()))
        .fallback(landing::home)
        .with_state(state)
}

/// Create the storefront tree served on merchant hosts.
pub fn storefront_tree(state: AppState) -> Router {
    Router::new()
        .route("/", get(storefront::home))
        .route("/products/{handle}", get(storefront::product))
        .route("/categories", get(storefront::categories))
        .route("/categories/{handle}", get(storefront::category))
        .route("/checkout", get(storefront::checkout))
        .route("/checkout/payment", get(storefront::payment))
        .route("/orders/{id}/status", get(storefront::order_status))
        .route("/account/login", get(storefront::account_login))
        .route("/account/orders", get(storefront::account_orders))
        .route("/terms", get(storefront::terms))
        .fallback(storefront::not_found)
        .with_state(state)
}

/// Minimal HTML shell shared by the page handlers.
///
/// The business screens these pages stand for are rendered by their own
/// collaborators; the engine only marks which surface was mounted.
fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title}</title></head>\n<body>\n{body}\n</body>\n</html>"
    ))
}
