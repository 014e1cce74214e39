use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub workout_date: Date,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

/// A workout set joined with its exercise name, as served in detail views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutSetRow {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub set_number: i32,
    pub reps: Option<i32>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i32>,
    pub distance_m: Option<f64>,
    pub notes: Option<String>,
}

/// Workout list row with its set count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutListRow {
    pub id: Uuid,
    pub workout_date: Date,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub set_count: i64,
}
