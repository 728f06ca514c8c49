//! Request Handlers
//!
//! Thin adapters: decode the body, reject obviously bad input, call the
//! player service, wrap the outcome in the response envelope.

use super::{
    errors::ApiError,
    middleware::RequestId,
    models::{ApiResponse, HealthResponse, HeartbeatResponse},
};
use crate::{
    games::types::{
        BalanceUpdateRequest, BalanceUpdateResponse, CreatePlayerRequest, Player, SpinRequest,
        SpinResponse,
    },
    money::{is_positive, Decimal},
    service::PlayerService,
    settings::GameSettings,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::Utc;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub service: PlayerService,
    pub version: String,
}

impl AppState {
    pub fn new(service: PlayerService) -> Self {
        Self {
            service,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Unwrap a JSON body or answer 400 with the parser's complaint
fn body<T>(request_id: &RequestId, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(request_id.0.clone(), rejection.body_text()))
}

fn require_player_id(request_id: &RequestId, player_id: &str) -> Result<(), ApiError> {
    if player_id.trim().is_empty() {
        return Err(ApiError::bad_request(request_id.0.clone(), "Player ID is required."));
    }
    Ok(())
}

fn require_positive(request_id: &RequestId, amount: Decimal, message: &str) -> Result<(), ApiError> {
    if !is_positive(amount) {
        return Err(ApiError::bad_request(request_id.0.clone(), message));
    }
    Ok(())
}

/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Running".to_string(),
        version: state.version.clone(),
    })
}

/// GET /api/v1/heartbeat
pub async fn heartbeat_handler() -> Json<HeartbeatResponse> {
    Json(HeartbeatResponse {
        status: "Healthy".to_string(),
        timestamp: Utc::now(),
    })
}

/// GET /api/v1/player
pub async fn list_players_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<Player>> {
    let players = state
        .service
        .get_all()
        .await
        .map_err(|e| ApiError::from_service(request_id.0, e))?;
    Ok(Json(ApiResponse::success(players)))
}

/// POST /api/v1/player/create
pub async fn create_player_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> ApiResult<BalanceUpdateResponse> {
    let request = body(&request_id, payload)?;
    if request.amount < Decimal::ZERO {
        return Err(ApiError::bad_request(request_id.0, "Initial balance cannot be negative."));
    }

    let created = state
        .service
        .create_player(request.amount)
        .await
        .map_err(|e| ApiError::from_service(request_id.0, e))?;
    Ok(Json(ApiResponse::success(created)))
}

/// POST /api/v1/player/credit
pub async fn credit_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BalanceUpdateRequest>, JsonRejection>,
) -> ApiResult<BalanceUpdateResponse> {
    let request = body(&request_id, payload)?;
    require_player_id(&request_id, &request.player_id)?;
    require_positive(&request_id, request.amount, "Amount must be greater than zero.")?;

    let updated = state
        .service
        .credit_balance(&request.player_id, request.amount)
        .await
        .map_err(|e| ApiError::from_service(request_id.0, e))?;
    Ok(Json(ApiResponse::success(updated)))
}

/// POST /api/v1/player/spin
pub async fn spin_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SpinRequest>, JsonRejection>,
) -> ApiResult<SpinResponse> {
    let request = body(&request_id, payload)?;
    require_player_id(&request_id, &request.player_id)?;
    require_positive(&request_id, request.bet_amount, "Bet amount must be greater than zero.")?;

    let result = state
        .service
        .spin(&request.player_id, request.bet_amount)
        .await
        .map_err(|e| ApiError::from_service(request_id.0, e))?;
    Ok(Json(ApiResponse::success(result)))
}

/// GET /api/v1/config
pub async fn get_config_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse<GameSettings>> {
    Json(ApiResponse::success(state.service.settings().current()))
}

/// PUT /api/v1/config
pub async fn update_config_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GameSettings>, JsonRejection>,
) -> ApiResult<GameSettings> {
    let settings = body(&request_id, payload)?;
    let updated = state
        .service
        .settings()
        .update(settings)
        .map_err(|e| ApiError::bad_request(request_id.0, e.to_string()))?;
    Ok(Json(ApiResponse::success(updated)))
}
