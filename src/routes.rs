use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(handlers::health_check))

        // Commands
        .route("/api/commands", get(handlers::list_commands))
        .route("/api/commands/:command_id", post(handlers::run_command))

        // Raw pipeline
        .route("/api/translate", post(handlers::translate))

        // Settings
        .route("/api/settings", get(handlers::get_settings))
        .route("/api/settings/:key", put(handlers::update_setting))
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
