//! Operator console route handlers.
//!
//! Reached under `/admin` on platform hosts, behind the operator guard.
//! Nothing links here from the rest of the platform; the console is
//! reached by direct navigation only.

use axum::response::{IntoResponse, Response};

use super::page;

/// Console overview.
pub async fn overview() -> Response {
    page(
        "Operations - Nerix",
        "<h1>Platform operations</h1>\
         <nav><a href=\"/admin/stores\">Stores</a> · \
         <a href=\"/admin/users\">Users</a></nav>",
    )
    .into_response()
}

/// All stores across the platform.
pub async fn stores() -> Response {
    page("Stores - Nerix", "<h1>Stores</h1>").into_response()
}

/// All users across the platform.
pub async fn users() -> Response {
    page("Users - Nerix", "<h1>Users</h1>").into_response()
}
