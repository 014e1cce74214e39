use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{AdminUser, AuthUser},
    catalog::{
        dto::{ExerciseResponse, UpsertExerciseRequest, UpsertMuscleGroupRequest},
        repo_types::MuscleGroup,
        services,
    },
    error::ApiError,
    state::AppState,
};

pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", get(list_exercises))
        .route("/exercises", post(create_exercise))
        .route("/exercises/:id", get(get_exercise))
        .route("/exercises/:id", put(update_exercise))
        .route("/exercises/:id", delete(delete_exercise))
}

pub fn muscle_group_routes() -> Router<AppState> {
    Router::new()
        .route("/musclegroups", get(list_muscle_groups))
        .route("/musclegroups", post(create_muscle_group))
        .route("/musclegroups/:id", get(get_muscle_group))
        .route("/musclegroups/:id", put(update_muscle_group))
        .route("/musclegroups/:id", delete(delete_muscle_group))
}

// --- muscle groups ---

#[instrument(skip(state))]
pub async fn list_muscle_groups(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<MuscleGroup>>, ApiError> {
    Ok(Json(services::list_muscle_groups(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_muscle_group(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MuscleGroup>, ApiError> {
    Ok(Json(services::get_muscle_group(&state.db, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_muscle_group(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<UpsertMuscleGroupRequest>,
) -> Result<(StatusCode, Json<MuscleGroup>), ApiError> {
    let group = services::create_muscle_group(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[instrument(skip(state, payload))]
pub async fn update_muscle_group(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertMuscleGroupRequest>,
) -> Result<Json<MuscleGroup>, ApiError> {
    Ok(Json(
        services::update_muscle_group(&state.db, id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_muscle_group(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    services::delete_muscle_group(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- exercises ---

#[instrument(skip(state))]
pub async fn list_exercises(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<ExerciseResponse>>, ApiError> {
    Ok(Json(services::list_exercises(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn get_exercise(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ExerciseResponse>, ApiError> {
    Ok(Json(services::get_exercise(&state.db, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_exercise(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<UpsertExerciseRequest>,
) -> Result<(StatusCode, Json<ExerciseResponse>), ApiError> {
    let exercise = services::create_exercise(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

#[instrument(skip(state, payload))]
pub async fn update_exercise(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertExerciseRequest>,
) -> Result<Json<ExerciseResponse>, ApiError> {
    Ok(Json(
        services::update_exercise(&state.db, id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_exercise(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    services::delete_exercise(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
