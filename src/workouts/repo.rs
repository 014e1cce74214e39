use sqlx::{PgPool, Postgres, Transaction};
use time::Date;
use uuid::Uuid;

use crate::workouts::repo_types::{Workout, WorkoutListRow, WorkoutSetRow};

impl Workout {
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        workout_date: Date,
        notes: Option<&str>,
    ) -> Result<Workout, sqlx::Error> {
        sqlx::query_as::<_, Workout>(
            r#"
            INSERT INTO workouts (user_id, workout_date, notes)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, workout_date, notes, created_at
            "#,
        )
        .bind(user_id)
        .bind(workout_date)
        .bind(notes)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Workout>, sqlx::Error> {
        sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, workout_date, notes, created_at
            FROM workouts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkoutListRow>, sqlx::Error> {
        sqlx::query_as::<_, WorkoutListRow>(
            r#"
            SELECT w.id, w.workout_date, w.notes, w.created_at,
                   (SELECT COUNT(*) FROM workout_sets s WHERE s.workout_id = w.id) AS set_count
            FROM workouts w
            WHERE w.user_id = $1
            ORDER BY w.workout_date DESC, w.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    /// Ownership-scoped delete; true when a row was removed. Sets cascade.
    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn sets_with_exercise(
        db: &PgPool,
        workout_id: Uuid,
    ) -> Result<Vec<WorkoutSetRow>, sqlx::Error> {
        sqlx::query_as::<_, WorkoutSetRow>(
            r#"
            SELECT s.id, s.exercise_id, e.name AS exercise_name, s.set_number,
                   s.reps, s.weight_kg, s.duration_seconds, s.distance_m, s.notes
            FROM workout_sets s
            JOIN exercises e ON e.id = s.exercise_id
            WHERE s.workout_id = $1
            ORDER BY s.set_number ASC
            "#,
        )
        .bind(workout_id)
        .fetch_all(db)
        .await
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_set(
    tx: &mut Transaction<'_, Postgres>,
    workout_id: Uuid,
    exercise_id: Uuid,
    set_number: i32,
    reps: Option<i32>,
    weight_kg: Option<f64>,
    duration_seconds: Option<i32>,
    distance_m: Option<f64>,
    notes: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO workout_sets
            (workout_id, exercise_id, set_number, reps, weight_kg, duration_seconds, distance_m, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(workout_id)
    .bind(exercise_id)
    .bind(set_number)
    .bind(reps)
    .bind(weight_kg)
    .bind(duration_seconds)
    .bind(distance_m)
    .bind(notes)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// How many of the given exercise ids actually exist.
pub async fn count_existing_exercises(db: &PgPool, ids: &[Uuid]) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM exercises WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(db)
            .await?;
    Ok(count)
}
