use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::catalog::repo_types::MuscleGroup;

#[derive(Debug, Deserialize)]
pub struct UpsertMuscleGroupRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertExerciseRequest {
    pub name: String,
    pub description: Option<String>,
    /// Full set of linked muscle groups; replaces any existing links.
    #[serde(default)]
    pub muscle_group_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub muscle_groups: Vec<MuscleGroup>,
}
