use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::workouts::dto::{LogSetRequest, LogWorkoutRequest, WorkoutDetails};
use crate::workouts::repo;
use crate::workouts::repo_types::{Workout, WorkoutListRow};

/// Effective set numbers: explicit values win, gaps fill from list position.
fn set_numbers(sets: &[LogSetRequest]) -> Vec<i32> {
    sets.iter()
        .enumerate()
        .map(|(idx, s)| s.set_number.unwrap_or(idx as i32 + 1))
        .collect()
}

fn validate(payload: &LogWorkoutRequest) -> Result<(), ApiError> {
    if payload.sets.is_empty() {
        return Err(ApiError::Validation(
            "A workout must contain at least one set".into(),
        ));
    }
    Ok(())
}

pub async fn log_workout(
    db: &PgPool,
    user_id: Uuid,
    payload: LogWorkoutRequest,
) -> Result<WorkoutDetails, ApiError> {
    validate(&payload)?;

    // Resolve every referenced exercise before writing anything so a bad id
    // leaves no workout row behind.
    let mut exercise_ids: Vec<Uuid> = payload.sets.iter().map(|s| s.exercise_id).collect();
    exercise_ids.sort();
    exercise_ids.dedup();
    let existing = repo::count_existing_exercises(db, &exercise_ids).await?;
    if existing != exercise_ids.len() as i64 {
        return Err(ApiError::NotFound(
            "One or more exercises do not exist".into(),
        ));
    }

    let numbers = set_numbers(&payload.sets);

    let mut tx = db.begin().await?;
    let workout = Workout::insert(
        &mut tx,
        user_id,
        payload.workout_date,
        payload.notes.as_deref(),
    )
    .await?;
    for (set, number) in payload.sets.iter().zip(numbers) {
        repo::insert_set(
            &mut tx,
            workout.id,
            set.exercise_id,
            number,
            set.reps,
            set.weight_kg,
            set.duration_seconds,
            set.distance_m,
            set.notes.as_deref(),
        )
        .await?;
    }
    tx.commit().await?;

    info!(workout_id = %workout.id, %user_id, sets = payload.sets.len(), "workout logged");
    get_workout_details(db, user_id, workout.id).await
}

pub async fn get_workout_details(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<WorkoutDetails, ApiError> {
    let workout = Workout::find_owned(db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Workout not found".into()))?;
    let sets = Workout::sets_with_exercise(db, workout.id).await?;
    Ok(WorkoutDetails {
        id: workout.id,
        workout_date: workout.workout_date,
        notes: workout.notes,
        created_at: workout.created_at,
        sets,
    })
}

pub async fn list_workouts(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<WorkoutListRow>, ApiError> {
    Ok(Workout::list_by_user(db, user_id, limit, offset).await?)
}

pub async fn delete_workout(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
    if !Workout::delete_owned(db, user_id, id).await? {
        return Err(ApiError::NotFound("Workout not found".into()));
    }
    info!(workout_id = %id, %user_id, "workout deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn set(exercise_id: Uuid, number: Option<i32>) -> LogSetRequest {
        LogSetRequest {
            exercise_id,
            set_number: number,
            reps: Some(8),
            weight_kg: Some(60.0),
            duration_seconds: None,
            distance_m: None,
            notes: None,
        }
    }

    #[test]
    fn empty_set_list_is_rejected() {
        let payload = LogWorkoutRequest {
            workout_date: date!(2024 - 01 - 01),
            notes: None,
            sets: vec![],
        };
        assert!(matches!(
            validate(&payload),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn missing_set_numbers_fill_from_position() {
        let ex = Uuid::new_v4();
        let sets = vec![set(ex, None), set(ex, Some(7)), set(ex, None)];
        assert_eq!(set_numbers(&sets), vec![1, 7, 3]);
    }
}
