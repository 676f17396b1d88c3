//! Merchant console route handlers.
//!
//! Reached under `/store` on platform hosts, behind the authentication
//! guard. The management screens themselves are external collaborators;
//! the console carries the one session-touching operation (profile
//! refresh) plus the page shells.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::page;

/// Console dashboard.
pub async fn dashboard(RequireAuth(user): RequireAuth) -> Response {
    let store_line = user.store_id.as_ref().map_or_else(
        || "<p><a href=\"/create-store\">Create your store</a> to start selling.</p>".to_owned(),
        |store| format!("<p>Managing store {store}.</p>"),
    );

    page(
        "Dashboard - Nerix",
        &format!(
            "<h1>Welcome back, {name}</h1>{store_line}\
             <nav><a href=\"/store/products\">Products</a> · \
             <a href=\"/store/orders\">Orders</a> · \
             <a href=\"/store/customers\">Customers</a> · \
             <a href=\"/store/settings\">Settings</a></nav>\
             <form method=\"post\" action=\"/store/refresh-profile\">\
             <button type=\"submit\">Refresh profile</button></form>\
             <form method=\"post\" action=\"/logout\">\
             <button type=\"submit\">Sign out</button></form>",
            name = user.name
        ),
    )
    .into_response()
}

/// Re-fetch the user record from the backend and fold it into the session.
pub async fn refresh_profile(State(state): State<AppState>) -> Result<Response, AppError> {
    let token = state.sessions().token()?;
    let user = state.backend().me(&token).await?;
    info!(user = %user.id, "profile refreshed");
    state.sessions().set_user(user)?;
    Ok(Redirect::to("/store").into_response())
}

/// Product management.
pub async fn products() -> Response {
    page("Products - Nerix", "<h1>Products</h1>").into_response()
}

/// Order management.
pub async fn orders() -> Response {
    page("Orders - Nerix", "<h1>Orders</h1>").into_response()
}

/// Customer management.
pub async fn customers() -> Response {
    page("Customers - Nerix", "<h1>Customers</h1>").into_response()
}

/// Store settings.
pub async fn settings() -> Response {
    page("Settings - Nerix", "<h1>Settings</h1>").into_response()
}
