//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use super::config::ServerConfig;
use super::handlers;
use super::state::AppState;

/// Item routes are served under both prefixes.
const ITEM_PREFIXES: [&str; 2] = ["/items", "/api/shoppingItems"];

/// Create the application router with default server settings.
pub fn create_router(state: AppState) -> Router {
    build_router(state, &ServerConfig::default())
}

/// Create the application router with all routes and middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let router = ITEM_PREFIXES
        .iter()
        .fold(Router::new(), |router, base| item_routes(router, base));

    router
        .route("/health", get(handlers::health_check))
        // Item bodies are two short fields.
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(config.cors_layer())
        .with_state(state)
}

fn item_routes(router: Router<AppState>, base: &str) -> Router<AppState> {
    router
        .route(
            base,
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            &format!("{}/{{name}}", base),
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_creation() {
        let _router = create_router(AppState::in_memory());
    }
}
