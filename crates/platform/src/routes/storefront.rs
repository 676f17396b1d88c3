//! Storefront route handlers.
//!
//! The storefront's screens are rendered by their own collaborators; these
//! handlers mark out the surface the engine mounts on merchant hosts,
//! including the empty state a just-probed custom domain shows while its
//! catalog loads.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::page;

/// Store home.
pub async fn home() -> Response {
    page(
        "Store",
        "<h1>Storefront</h1><p>Browse <a href=\"/categories\">categories</a>.</p>",
    )
    .into_response()
}

/// Product detail.
pub async fn product(Path(handle): Path<String>) -> Response {
    page(
        &format!("{handle} - Store"),
        &format!("<h1>{handle}</h1><p><a href=\"/checkout\">Checkout</a></p>"),
    )
    .into_response()
}

/// Category listing.
pub async fn categories() -> Response {
    page("Categories - Store", "<h1>Categories</h1>").into_response()
}

/// Category detail.
pub async fn category(Path(handle): Path<String>) -> Response {
    page(&format!("{handle} - Store"), &format!("<h1>{handle}</h1>")).into_response()
}

/// Checkout.
pub async fn checkout() -> Response {
    page(
        "Checkout - Store",
        "<h1>Checkout</h1><p><a href=\"/checkout/payment\">Continue to payment</a></p>",
    )
    .into_response()
}

/// Payment step.
pub async fn payment() -> Response {
    page("Payment - Store", "<h1>Payment</h1>").into_response()
}

/// Order status.
pub async fn order_status(Path(id): Path<String>) -> Response {
    page(
        &format!("Order {id} - Store"),
        &format!("<h1>Order {id}</h1>"),
    )
    .into_response()
}

/// Customer login.
pub async fn account_login() -> Response {
    page("Sign in - Store", "<h1>Sign in to your account</h1>").into_response()
}

/// Customer order history.
pub async fn account_orders() -> Response {
    page("Your orders - Store", "<h1>Your orders</h1>").into_response()
}

/// Terms of service.
pub async fn terms() -> Response {
    page("Terms - Store", "<h1>Terms of service</h1>").into_response()
}

/// Catch-all for unknown storefront paths.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        page("Not found - Store", "<h1>Page not found</h1>"),
    )
        .into_response()
}
