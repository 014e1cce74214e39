use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    chat::{
        dto::{Pagination, SendMessageRequest},
        repo_types::ChatMessage,
        services,
    },
    error::ApiError,
    state::AppState,
};

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat/send", post(send_message))
        .route("/chat/history", get(history))
        .route("/chat/:id", get(get_message))
}

#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), ApiError> {
    let record = services::send_message(&state, user.id, &payload.message).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    user: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let (limit, offset) = p.clamped();
    Ok(Json(services::history(&state, user.id, limit, offset).await?))
}

#[instrument(skip(state))]
pub async fn get_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatMessage>, ApiError> {
    Ok(Json(services::get_message(&state, user.id, id).await?))
}
