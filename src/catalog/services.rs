use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::catalog::dto::{ExerciseResponse, UpsertExerciseRequest, UpsertMuscleGroupRequest};
use crate::catalog::repo_types::{Exercise, MuscleGroup};
use crate::error::ApiError;

fn validated_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    Ok(trimmed)
}

// --- muscle groups ---

pub async fn list_muscle_groups(db: &PgPool) -> Result<Vec<MuscleGroup>, ApiError> {
    Ok(MuscleGroup::list(db).await?)
}

pub async fn get_muscle_group(db: &PgPool, id: Uuid) -> Result<MuscleGroup, ApiError> {
    MuscleGroup::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Muscle group not found".into()))
}

pub async fn create_muscle_group(
    db: &PgPool,
    payload: UpsertMuscleGroupRequest,
) -> Result<MuscleGroup, ApiError> {
    let name = validated_name(&payload.name)?;
    if MuscleGroup::find_by_name(db, name, None).await?.is_some() {
        return Err(ApiError::Conflict(
            "A muscle group with this name already exists".into(),
        ));
    }
    let group = MuscleGroup::create(db, name, payload.description.as_deref()).await?;
    info!(id = %group.id, name = %group.name, "muscle group created");
    Ok(group)
}

pub async fn update_muscle_group(
    db: &PgPool,
    id: Uuid,
    payload: UpsertMuscleGroupRequest,
) -> Result<MuscleGroup, ApiError> {
    let name = validated_name(&payload.name)?;
    if MuscleGroup::find_by_name(db, name, Some(id)).await?.is_some() {
        return Err(ApiError::Conflict(
            "A muscle group with this name already exists".into(),
        ));
    }
    MuscleGroup::update(db, id, name, payload.description.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Muscle group not found".into()))
}

pub async fn delete_muscle_group(db: &PgPool, id: Uuid) -> Result<(), ApiError> {
    if !MuscleGroup::delete(db, id).await? {
        return Err(ApiError::NotFound("Muscle group not found".into()));
    }
    info!(%id, "muscle group deleted");
    Ok(())
}

// --- exercises ---

async fn hydrate_exercise(db: &PgPool, exercise: Exercise) -> Result<ExerciseResponse, ApiError> {
    let muscle_groups = MuscleGroup::list_for_exercise(db, exercise.id).await?;
    Ok(ExerciseResponse {
        id: exercise.id,
        name: exercise.name,
        description: exercise.description,
        created_at: exercise.created_at,
        muscle_groups,
    })
}

pub async fn list_exercises(db: &PgPool) -> Result<Vec<ExerciseResponse>, ApiError> {
    let exercises = Exercise::list(db).await?;
    let mut out = Vec::with_capacity(exercises.len());
    for exercise in exercises {
        out.push(hydrate_exercise(db, exercise).await?);
    }
    Ok(out)
}

pub async fn get_exercise(db: &PgPool, id: Uuid) -> Result<ExerciseResponse, ApiError> {
    let exercise = Exercise::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Exercise not found".into()))?;
    hydrate_exercise(db, exercise).await
}

async fn check_muscle_groups_exist(db: &PgPool, ids: &[Uuid]) -> Result<(), ApiError> {
    if ids.is_empty() {
        return Ok(());
    }
    let count = MuscleGroup::count_existing(db, ids).await?;
    if count != ids.len() as i64 {
        return Err(ApiError::NotFound(
            "One or more muscle groups do not exist".into(),
        ));
    }
    Ok(())
}

pub async fn create_exercise(
    db: &PgPool,
    payload: UpsertExerciseRequest,
) -> Result<ExerciseResponse, ApiError> {
    let name = validated_name(&payload.name)?;
    if Exercise::find_by_name(db, name, None).await?.is_some() {
        return Err(ApiError::Conflict(
            "An exercise with this name already exists".into(),
        ));
    }
    check_muscle_groups_exist(db, &payload.muscle_group_ids).await?;

    let mut tx = db.begin().await?;
    let exercise = Exercise::create(&mut tx, name, payload.description.as_deref()).await?;
    Exercise::replace_muscle_groups(&mut tx, exercise.id, &payload.muscle_group_ids).await?;
    tx.commit().await?;

    info!(id = %exercise.id, name = %exercise.name, "exercise created");
    hydrate_exercise(db, exercise).await
}

pub async fn update_exercise(
    db: &PgPool,
    id: Uuid,
    payload: UpsertExerciseRequest,
) -> Result<ExerciseResponse, ApiError> {
    let name = validated_name(&payload.name)?;
    if Exercise::find_by_name(db, name, Some(id)).await?.is_some() {
        return Err(ApiError::Conflict(
            "An exercise with this name already exists".into(),
        ));
    }
    check_muscle_groups_exist(db, &payload.muscle_group_ids).await?;

    let mut tx = db.begin().await?;
    let exercise = Exercise::update(&mut tx, id, name, payload.description.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("Exercise not found".into()))?;
    Exercise::replace_muscle_groups(&mut tx, exercise.id, &payload.muscle_group_ids).await?;
    tx.commit().await?;

    hydrate_exercise(db, exercise).await
}

pub async fn delete_exercise(db: &PgPool, id: Uuid) -> Result<(), ApiError> {
    if Exercise::is_referenced_by_sets(db, id).await? {
        return Err(ApiError::Conflict(
            "Exercise is referenced by logged workouts".into(),
        ));
    }
    if !Exercise::delete(db, id).await? {
        return Err(ApiError::NotFound("Exercise not found".into()));
    }
    info!(%id, "exercise deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation_trims_and_rejects_empty() {
        assert_eq!(validated_name("  Bench Press ").unwrap(), "Bench Press");
        assert!(matches!(
            validated_name("   "),
            Err(ApiError::Validation(_))
        ));
    }
}
