use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::food_item_routes())
        .merge(handlers::log_routes())
        .merge(handlers::goal_routes())
}
