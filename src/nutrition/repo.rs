use sqlx::{PgPool, Postgres, QueryBuilder};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::dto::UpsertFoodItemRequest;
use crate::nutrition::repo_types::{FoodItem, LoggedFoodItem, LoggedFoodRow, NutritionGoal};

const FOOD_ITEM_COLUMNS: &str = "id, user_id, name, barcode, serving_size, serving_unit, \
     calories_per_serving, protein_per_serving, carbs_per_serving, fat_per_serving, \
     fiber_per_serving, sugar_per_serving, sodium_per_serving, created_at";

impl FoodItem {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<FoodItem>, sqlx::Error> {
        sqlx::query_as::<_, FoodItem>(&format!(
            "SELECT {FOOD_ITEM_COLUMNS} FROM food_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_barcode(
        db: &PgPool,
        barcode: &str,
    ) -> Result<Option<FoodItem>, sqlx::Error> {
        sqlx::query_as::<_, FoodItem>(&format!(
            "SELECT {FOOD_ITEM_COLUMNS} FROM food_items WHERE barcode = $1"
        ))
        .bind(barcode)
        .fetch_optional(db)
        .await
    }

    /// The user's own items plus global ones, optionally filtered by name.
    pub async fn list_visible(
        db: &PgPool,
        user_id: Uuid,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FoodItem>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {FOOD_ITEM_COLUMNS} FROM food_items WHERE (user_id = "
        ));
        qb.push_bind(user_id);
        qb.push(" OR user_id IS NULL)");
        if let Some(search) = search {
            qb.push(" AND name ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(search)));
        }
        qb.push(" ORDER BY name ASC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);
        qb.build_query_as::<FoodItem>().fetch_all(db).await
    }

    pub async fn insert(
        db: &PgPool,
        user_id: Option<Uuid>,
        payload: &UpsertFoodItemRequest,
    ) -> Result<FoodItem, sqlx::Error> {
        sqlx::query_as::<_, FoodItem>(&format!(
            r#"
            INSERT INTO food_items
                (user_id, name, barcode, serving_size, serving_unit,
                 calories_per_serving, protein_per_serving, carbs_per_serving, fat_per_serving,
                 fiber_per_serving, sugar_per_serving, sodium_per_serving)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {FOOD_ITEM_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(payload.name.trim())
        .bind(payload.barcode.as_deref())
        .bind(payload.serving_size)
        .bind(&payload.serving_unit)
        .bind(payload.calories_per_serving)
        .bind(payload.protein_per_serving)
        .bind(payload.carbs_per_serving)
        .bind(payload.fat_per_serving)
        .bind(payload.fiber_per_serving)
        .bind(payload.sugar_per_serving)
        .bind(payload.sodium_per_serving)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        payload: &UpsertFoodItemRequest,
    ) -> Result<Option<FoodItem>, sqlx::Error> {
        sqlx::query_as::<_, FoodItem>(&format!(
            r#"
            UPDATE food_items
            SET name = $2, barcode = $3, serving_size = $4, serving_unit = $5,
                calories_per_serving = $6, protein_per_serving = $7,
                carbs_per_serving = $8, fat_per_serving = $9,
                fiber_per_serving = $10, sugar_per_serving = $11, sodium_per_serving = $12
            WHERE id = $1
            RETURNING {FOOD_ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payload.name.trim())
        .bind(payload.barcode.as_deref())
        .bind(payload.serving_size)
        .bind(&payload.serving_unit)
        .bind(payload.calories_per_serving)
        .bind(payload.protein_per_serving)
        .bind(payload.carbs_per_serving)
        .bind(payload.fat_per_serving)
        .bind(payload.fiber_per_serving)
        .bind(payload.sugar_per_serving)
        .bind(payload.sodium_per_serving)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM food_items WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Referential guard: true when any logged entry points at this item.
    pub async fn is_logged_against(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM logged_food_items WHERE food_item_id = $1)")
                .bind(id)
                .fetch_one(db)
                .await?;
        Ok(exists)
    }
}

const LOGGED_ROW_COLUMNS: &str = "l.id, l.food_item_id, f.name AS food_name, l.logged_date, \
     l.logged_at, l.meal_context, l.quantity, l.calculated_calories, l.calculated_protein, \
     l.calculated_carbs, l.calculated_fat";

impl LoggedFoodItem {
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        food_item_id: Uuid,
        logged_date: Date,
        logged_at: OffsetDateTime,
        meal_context: &str,
        quantity: f64,
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
    ) -> Result<LoggedFoodItem, sqlx::Error> {
        sqlx::query_as::<_, LoggedFoodItem>(
            r#"
            INSERT INTO logged_food_items
                (user_id, food_item_id, logged_date, logged_at, meal_context, quantity,
                 calculated_calories, calculated_protein, calculated_carbs, calculated_fat)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, food_item_id, logged_date, logged_at, meal_context, quantity,
                      calculated_calories, calculated_protein, calculated_carbs, calculated_fat
            "#,
        )
        .bind(user_id)
        .bind(food_item_id)
        .bind(logged_date)
        .bind(logged_at)
        .bind(meal_context)
        .bind(quantity)
        .bind(calories)
        .bind(protein)
        .bind(carbs)
        .bind(fat)
        .fetch_one(db)
        .await
    }

    pub async fn list_for_day(
        db: &PgPool,
        user_id: Uuid,
        date: Date,
    ) -> Result<Vec<LoggedFoodRow>, sqlx::Error> {
        sqlx::query_as::<_, LoggedFoodRow>(&format!(
            r#"
            SELECT {LOGGED_ROW_COLUMNS}
            FROM logged_food_items l
            JOIN food_items f ON f.id = l.food_item_id
            WHERE l.user_id = $1 AND l.logged_date = $2
            ORDER BY l.logged_at ASC
            "#
        ))
        .bind(user_id)
        .bind(date)
        .fetch_all(db)
        .await
    }

    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM logged_food_items WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Explicit filter options for history queries. The query builder applies
/// each clause conditionally; dates are inclusive at day granularity.
#[derive(Debug, Clone)]
pub struct HistoryFilter {
    pub user_id: Uuid,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub meal_context: Option<String>,
}

fn push_history_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &HistoryFilter) {
    qb.push(" WHERE l.user_id = ");
    qb.push_bind(filter.user_id);
    if let Some(start) = filter.start_date {
        qb.push(" AND l.logged_date >= ");
        qb.push_bind(start);
    }
    if let Some(end) = filter.end_date {
        qb.push(" AND l.logged_date <= ");
        qb.push_bind(end);
    }
    if let Some(meal) = &filter.meal_context {
        qb.push(" AND l.meal_context ILIKE ");
        qb.push_bind(format!("%{}%", escape_like(meal)));
    }
}

pub async fn history_page(
    db: &PgPool,
    filter: &HistoryFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<LoggedFoodRow>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {LOGGED_ROW_COLUMNS} FROM logged_food_items l JOIN food_items f ON f.id = l.food_item_id"
    ));
    push_history_filters(&mut qb, filter);
    qb.push(" ORDER BY l.logged_date DESC, l.logged_at DESC LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    qb.build_query_as::<LoggedFoodRow>().fetch_all(db).await
}

pub async fn history_count(db: &PgPool, filter: &HistoryFilter) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM logged_food_items l");
    push_history_filters(&mut qb, filter);
    let (count,): (i64,) = qb.build_query_as().fetch_one(db).await?;
    Ok(count)
}

impl NutritionGoal {
    pub async fn find_by_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<NutritionGoal>, sqlx::Error> {
        sqlx::query_as::<_, NutritionGoal>(
            r#"
            SELECT user_id, goal_type, calories, protein_g, carbs_g, fat_g, updated_at
            FROM nutrition_goals
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// One row per user; the unique constraint turns a second set into an
    /// in-place update. RETURNING gives read-your-writes.
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        goal_type: &str,
        calories: f64,
        protein_g: f64,
        carbs_g: f64,
        fat_g: f64,
    ) -> Result<Option<NutritionGoal>, sqlx::Error> {
        sqlx::query_as::<_, NutritionGoal>(
            r#"
            INSERT INTO nutrition_goals (user_id, goal_type, calories, protein_g, carbs_g, fat_g)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE
            SET goal_type = EXCLUDED.goal_type, calories = EXCLUDED.calories,
                protein_g = EXCLUDED.protein_g, carbs_g = EXCLUDED.carbs_g,
                fat_g = EXCLUDED.fat_g, updated_at = now()
            RETURNING user_id, goal_type, calories, protein_g, carbs_g, fat_g, updated_at
            "#,
        )
        .bind(user_id)
        .bind(goal_type)
        .bind(calories)
        .bind(protein_g)
        .bind(carbs_g)
        .bind(fat_g)
        .fetch_optional(db)
        .await
    }
}

/// Escapes LIKE metacharacters so user input only matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_neutralizes_metacharacters() {
        assert_eq!(escape_like("break%fast"), "break\\%fast");
        assert_eq!(escape_like("snack_1"), "snack\\_1");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
        assert_eq!(escape_like("Breakfast"), "Breakfast");
    }
}
