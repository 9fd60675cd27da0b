//! HTTP API for the panel.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use crate::registry::{LinkSettings, UserService};
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// User registry and synchronization service
    pub users: Arc<UserService>,
    /// Advertised connection settings for subscription rendering
    pub link: LinkSettings,
}

impl AppState {
    /// Create new application state.
    pub fn new(users: UserService, link: LinkSettings) -> Self {
        Self {
            users: Arc::new(users),
            link,
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/status", get(handlers::get_status))
        .route("/api/user", post(handlers::create_user))
        .route("/api/users", get(handlers::list_users))
        .route("/api/user/:id", delete(handlers::delete_user))
        .route("/api/subscribe/clash", get(handlers::subscribe_clash))
        .route("/api/subscribe/v2ray", get(handlers::subscribe_v2ray))
        .route("/api/xray/restart", post(handlers::restart_daemon))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
