use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    state::AppState,
    workouts::{
        dto::{LogWorkoutRequest, Pagination, WorkoutDetails, WorkoutList},
        services,
    },
};

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(list_workouts))
        .route("/workouts", post(log_workout))
        .route("/workouts/:id", get(get_workout))
        .route("/workouts/:id", delete(delete_workout))
}

#[instrument(skip(state, payload))]
pub async fn log_workout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<LogWorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutDetails>), ApiError> {
    let details = services::log_workout(&state.db, user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    user: AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<WorkoutList>, ApiError> {
    let (limit, offset) = p.clamped();
    let items = services::list_workouts(&state.db, user.id, limit, offset).await?;
    Ok(Json(WorkoutList { items }))
}

#[instrument(skip(state))]
pub async fn get_workout(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkoutDetails>, ApiError> {
    Ok(Json(
        services::get_workout_details(&state.db, user.id, id).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_workout(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    services::delete_workout(&state.db, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
