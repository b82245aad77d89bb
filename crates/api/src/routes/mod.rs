//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod wallets;

/// Creates the versioned API router.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(wallets::routes())
}
