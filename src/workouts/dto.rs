use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::workouts::repo_types::{WorkoutListRow, WorkoutSetRow};

#[derive(Debug, Deserialize)]
pub struct LogSetRequest {
    pub exercise_id: Uuid,
    /// Position within the workout; assigned from list order when omitted.
    pub set_number: Option<i32>,
    pub reps: Option<i32>,
    pub weight_kg: Option<f64>,
    pub duration_seconds: Option<i32>,
    pub distance_m: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogWorkoutRequest {
    pub workout_date: Date,
    pub notes: Option<String>,
    pub sets: Vec<LogSetRequest>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutDetails {
    pub id: Uuid,
    pub workout_date: Date,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub sets: Vec<WorkoutSetRow>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutList {
    pub items: Vec<WorkoutListRow>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Bounds client-supplied values before they reach a query.
    pub fn clamped(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let p = Pagination {
            limit: -1,
            offset: -5,
        };
        assert_eq!(p.clamped(), (1, 0));

        let p = Pagination {
            limit: 10_000,
            offset: 40,
        };
        assert_eq!(p.clamped(), (100, 40));

        let p = Pagination {
            limit: 20,
            offset: 0,
        };
        assert_eq!(p.clamped(), (20, 0));
    }
}
