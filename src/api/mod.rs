/// API routes and handlers
pub mod admin;
pub mod chirps;
pub mod extract;
pub mod health;
pub mod sessions;
pub mod users;
pub mod webhooks;


use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(sessions::routes())
        .merge(chirps::routes())
        .merge(webhooks::routes())
        .merge(admin::routes())
}
