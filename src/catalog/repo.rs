use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::catalog::repo_types::{Exercise, MuscleGroup};

impl MuscleGroup {
    pub async fn list(db: &PgPool) -> Result<Vec<MuscleGroup>, sqlx::Error> {
        sqlx::query_as::<_, MuscleGroup>(
            r#"
            SELECT id, name, description, created_at
            FROM muscle_groups
            ORDER BY name ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<MuscleGroup>, sqlx::Error> {
        sqlx::query_as::<_, MuscleGroup>(
            r#"
            SELECT id, name, description, created_at
            FROM muscle_groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Case-insensitive name lookup, optionally excluding one row (for
    /// update-time uniqueness checks).
    pub async fn find_by_name(
        db: &PgPool,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<MuscleGroup>, sqlx::Error> {
        sqlx::query_as::<_, MuscleGroup>(
            r#"
            SELECT id, name, description, created_at
            FROM muscle_groups
            WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(name)
        .bind(exclude)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        description: Option<&str>,
    ) -> Result<MuscleGroup, sqlx::Error> {
        sqlx::query_as::<_, MuscleGroup>(
            r#"
            INSERT INTO muscle_groups (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<MuscleGroup>, sqlx::Error> {
        sqlx::query_as::<_, MuscleGroup>(
            r#"
            UPDATE muscle_groups
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(db)
        .await
    }

    /// Returns true when a row was deleted.
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM muscle_groups WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_exercise(
        db: &PgPool,
        exercise_id: Uuid,
    ) -> Result<Vec<MuscleGroup>, sqlx::Error> {
        sqlx::query_as::<_, MuscleGroup>(
            r#"
            SELECT mg.id, mg.name, mg.description, mg.created_at
            FROM muscle_groups mg
            JOIN exercise_muscle_groups emg ON emg.muscle_group_id = mg.id
            WHERE emg.exercise_id = $1
            ORDER BY mg.name ASC
            "#,
        )
        .bind(exercise_id)
        .fetch_all(db)
        .await
    }

    pub async fn count_existing(db: &PgPool, ids: &[Uuid]) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM muscle_groups WHERE id = ANY($1)")
                .bind(ids)
                .fetch_one(db)
                .await?;
        Ok(count)
    }
}

impl Exercise {
    pub async fn list(db: &PgPool) -> Result<Vec<Exercise>, sqlx::Error> {
        sqlx::query_as::<_, Exercise>(
            r#"
            SELECT id, name, description, created_at
            FROM exercises
            ORDER BY name ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Exercise>, sqlx::Error> {
        sqlx::query_as::<_, Exercise>(
            r#"
            SELECT id, name, description, created_at
            FROM exercises
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_name(
        db: &PgPool,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Exercise>, sqlx::Error> {
        sqlx::query_as::<_, Exercise>(
            r#"
            SELECT id, name, description, created_at
            FROM exercises
            WHERE LOWER(name) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(name)
        .bind(exclude)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        description: Option<&str>,
    ) -> Result<Exercise, sqlx::Error> {
        sqlx::query_as::<_, Exercise>(
            r#"
            INSERT INTO exercises (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<Exercise>, sqlx::Error> {
        sqlx::query_as::<_, Exercise>(
            r#"
            UPDATE exercises
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&mut **tx)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replaces the exercise's muscle group links with the given set.
    pub async fn replace_muscle_groups(
        tx: &mut Transaction<'_, Postgres>,
        exercise_id: Uuid,
        muscle_group_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM exercise_muscle_groups WHERE exercise_id = $1")
            .bind(exercise_id)
            .execute(&mut **tx)
            .await?;

        for mg_id in muscle_group_ids {
            sqlx::query(
                r#"
                INSERT INTO exercise_muscle_groups (exercise_id, muscle_group_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(exercise_id)
            .bind(mg_id)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    pub async fn is_referenced_by_sets(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM workout_sets WHERE exercise_id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;
        Ok(exists)
    }
}
