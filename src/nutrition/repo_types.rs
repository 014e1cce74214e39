use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Food catalog entry. `user_id = NULL` marks a global/shared item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodItem {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub barcode: Option<String>,
    pub serving_size: f64,
    pub serving_unit: String,
    pub calories_per_serving: f64,
    pub protein_per_serving: f64,
    pub carbs_per_serving: f64,
    pub fat_per_serving: f64,
    pub fiber_per_serving: Option<f64>,
    pub sugar_per_serving: Option<f64>,
    pub sodium_per_serving: Option<f64>,
    pub created_at: OffsetDateTime,
}

/// A consumption event. The four calculated fields are snapshotted at log
/// time; later edits to the food item never rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoggedFoodItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_item_id: Uuid,
    pub logged_date: Date,
    pub logged_at: OffsetDateTime,
    pub meal_context: String,
    pub quantity: f64,
    pub calculated_calories: f64,
    pub calculated_protein: f64,
    pub calculated_carbs: f64,
    pub calculated_fat: f64,
}

/// Logged entry joined with its food item name, as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoggedFoodRow {
    pub id: Uuid,
    pub food_item_id: Uuid,
    pub food_name: String,
    pub logged_date: Date,
    pub logged_at: OffsetDateTime,
    pub meal_context: String,
    pub quantity: f64,
    pub calculated_calories: f64,
    pub calculated_protein: f64,
    pub calculated_carbs: f64,
    pub calculated_fat: f64,
}

/// One-per-user macro targets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NutritionGoal {
    pub user_id: Uuid,
    pub goal_type: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub updated_at: OffsetDateTime,
}
