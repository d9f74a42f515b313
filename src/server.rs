//! REST request layer.
//!
//! Every handler delegates to [`GameService`] on the blocking pool, since the
//! stores are synchronous. Errors become `{ statusCode, message, error }`
//! bodies.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tracing::{error, info, instrument, warn};

use crate::games::memory::{
    GameError, GameHistory, GameStateView, LeaderboardEntry, RoundOutcome,
};
use crate::openapi::{OPENAPI_PATH, openapi_document};
use crate::service::{GameCreated, GameService, ServiceError};
use crate::store::GameStore;

/// Shared handler state.
pub type AppState<S> = Arc<GameService<S>>;

/// Body of `POST /game/{gameId}/play`.
///
/// Unknown or missing fields are rejected before the game is consulted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PlayRoundRequest {
    /// First card position, e.g. `A1`.
    pub position1: String,
    /// Second card position, e.g. `B3`.
    pub position2: String,
}

/// Error response with an HTTP status.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

/// Body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorBody {
    /// HTTP status code.
    status_code: u16,
    /// What was rejected.
    message: String,
    /// Reason phrase of the status.
    error: &'static str,
}

impl ApiError {
    /// Creates an error with the given status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status_code: self.status.as_u16(),
            message: self.message,
            error: self.status.canonical_reason().unwrap_or("Error"),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::Game(GameError::GameNotFound(_)) => StatusCode::NOT_FOUND,
            ServiceError::Game(_) => StatusCode::BAD_REQUEST,
            ServiceError::ConcurrentUpdate(_) => StatusCode::CONFLICT,
            ServiceError::Storage(e) => {
                error!(kind = %e.kind, error = %e, "Storage failure");
                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

/// Builds the router for all game endpoints.
#[instrument(skip(service))]
pub fn router<S: GameStore + 'static>(service: GameService<S>) -> Router {
    let state: AppState<S> = Arc::new(service);

    Router::new()
        .route("/health", get(health))
        .route(OPENAPI_PATH, get(openapi))
        .route("/game/new", post(create_game::<S>))
        .route("/game/leaderboard", get(leaderboard::<S>))
        .route("/game/{game_id}", get(game_state::<S>))
        .route("/game/{game_id}/play", post(play_round::<S>))
        .route("/game/{game_id}/history", get(history::<S>))
        .layer(ServiceBuilder::new().map_request(|req: Request<axum::body::Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

/// Runs a service call on the blocking pool.
async fn run<S, T, F>(state: AppState<S>, call: F) -> Result<T, ApiError>
where
    S: GameStore + 'static,
    T: Send + 'static,
    F: FnOnce(&GameService<S>) -> Result<T, ServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(&state))
        .await
        .map_err(|e| {
            error!(error = %e, "Service task failed");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        })?
        .map_err(|e| {
            warn!(error = %e, "Request rejected");
            ApiError::from(e)
        })
}

async fn health() -> &'static str {
    "ok"
}

async fn openapi() -> Json<serde_json::Value> {
    Json(openapi_document())
}

#[instrument(skip(state))]
async fn create_game<S: GameStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<(StatusCode, Json<GameCreated>), ApiError> {
    let created = run(state, |service| service.create_game()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
async fn game_state<S: GameStore + 'static>(
    State(state): State<AppState<S>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameStateView>, ApiError> {
    run(state, move |service| service.game_state(&game_id))
        .await
        .map(Json)
}

#[instrument(skip(state, payload))]
async fn play_round<S: GameStore + 'static>(
    State(state): State<AppState<S>>,
    Path(game_id): Path<String>,
    payload: Result<Json<PlayRoundRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RoundOutcome>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Malformed play request");
        ApiError::from(rejection)
    })?;

    let outcome = run(state, move |service| {
        service.play_round(&game_id, &request.position1, &request.position2)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[instrument(skip(state))]
async fn history<S: GameStore + 'static>(
    State(state): State<AppState<S>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameHistory>, ApiError> {
    run(state, move |service| service.history(&game_id))
        .await
        .map(Json)
}

#[instrument(skip(state))]
async fn leaderboard<S: GameStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    run(state, |service| service.leaderboard()).await.map(Json)
}
