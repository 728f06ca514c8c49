//! Route Definitions

use super::handlers::*;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/heartbeat", get(heartbeat_handler))
        .route("/api/v1/player", get(list_players_handler))
        .route("/api/v1/player/create", post(create_player_handler))
        .route("/api/v1/player/credit", post(credit_handler))
        .route("/api/v1/player/spin", post(spin_handler))
        .route("/api/v1/config", get(get_config_handler).put(update_config_handler))
        .with_state(state)
}
