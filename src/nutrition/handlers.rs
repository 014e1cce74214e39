use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    nutrition::{
        dto::{
            DailySummary, DailySummaryQuery, FoodItemQuery, HistoryPage, HistoryQuery,
            LogFoodRequest, SetGoalRequest, UpsertFoodItemRequest,
        },
        repo_types::{FoodItem, LoggedFoodItem, NutritionGoal},
        services,
    },
    state::AppState,
};

pub fn food_item_routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition/fooditems", get(list_food_items))
        .route("/nutrition/fooditems", post(create_food_item))
        .route("/nutrition/fooditems/:id", get(get_food_item))
        .route("/nutrition/fooditems/:id", put(update_food_item))
        .route("/nutrition/fooditems/:id", delete(delete_food_item))
}

pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition/log", post(log_food))
        .route("/nutrition/log/daily", get(daily_summary))
        .route("/nutrition/log/history", get(history))
        .route("/nutrition/log/:id", delete(delete_logged_food))
}

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition/goals", get(get_goal))
        .route("/nutrition/goals", post(set_goal))
        .route("/nutrition/goals", put(set_goal))
}

// --- food items ---

#[instrument(skip(state, payload))]
pub async fn create_food_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpsertFoodItemRequest>,
) -> Result<(StatusCode, Json<FoodItem>), ApiError> {
    let food = services::create_food_item(&state.db, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

#[instrument(skip(state))]
pub async fn list_food_items(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<FoodItemQuery>,
) -> Result<Json<Vec<FoodItem>>, ApiError> {
    Ok(Json(
        services::list_food_items(&state.db, &user, query).await?,
    ))
}

#[instrument(skip(state))]
pub async fn get_food_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodItem>, ApiError> {
    Ok(Json(services::get_food_item(&state.db, &user, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_food_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpsertFoodItemRequest>,
) -> Result<Json<FoodItem>, ApiError> {
    let food = services::update_food_item(
        &state.db,
        &user,
        state.config.global_food_admin_only,
        id,
        payload,
    )
    .await?;
    Ok(Json(food))
}

#[instrument(skip(state))]
pub async fn delete_food_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    services::delete_food_item(
        &state.db,
        &user,
        state.config.global_food_admin_only,
        id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- logging ---

#[instrument(skip(state, payload))]
pub async fn log_food(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<LogFoodRequest>,
) -> Result<(StatusCode, Json<LoggedFoodItem>), ApiError> {
    let entry = services::log_food(&state.db, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn delete_logged_food(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    services::delete_logged_food(&state.db, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn daily_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DailySummaryQuery>,
) -> Result<Json<DailySummary>, ApiError> {
    Ok(Json(
        services::daily_summary(&state.db, user.id, query.date).await?,
    ))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryPage>, ApiError> {
    Ok(Json(
        services::logged_food_history(&state.db, user.id, query).await?,
    ))
}

// --- goals ---

#[instrument(skip(state, payload))]
pub async fn set_goal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SetGoalRequest>,
) -> Result<Json<NutritionGoal>, ApiError> {
    Ok(Json(services::set_goal(&state.db, user.id, payload).await?))
}

#[instrument(skip(state))]
pub async fn get_goal(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<NutritionGoal>, ApiError> {
    Ok(Json(services::get_goal(&state.db, user.id).await?))
}
