use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::repo_types::{LoggedFoodRow, NutritionGoal};

#[derive(Debug, Deserialize)]
pub struct UpsertFoodItemRequest {
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
}

#[derive(Debug, Deserialize)]
pub struct FoodItemQuery {
    /// Case-insensitive name substring filter.
    pub search: Option<String>,
    /// Exact barcode lookup; when present `search` is ignored.
    pub barcode: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct LogFoodRequest {
    pub food_item_id: Uuid,
    pub logged_date: Date,
    /// Exact moment of consumption; defaults to now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub logged_at: Option<OffsetDateTime>,
    pub meal_context: String,
    /// Multiplier of one serving.
    pub quantity: f64,
}

/// History query parameters; names follow the public API contract.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub meal_context_filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryPage {
    pub items: Vec<LoggedFoodRow>,
    pub total_count: i64,
    pub page_number: i64,
    pub page_size: i64,
}

#[derive(Debug, Deserialize)]
pub struct DailySummaryQuery {
    pub date: Date,
}

#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub date: Date,
    pub total_calories_consumed: f64,
    pub total_protein_consumed: f64,
    pub total_carbs_consumed: f64,
    pub total_fat_consumed: f64,
    /// Absent until the user sets a goal; remaining values then count down
    /// from zero.
    pub goal: Option<NutritionGoal>,
    pub remaining_calories: f64,
    pub remaining_protein: f64,
    pub remaining_carbs: f64,
    pub remaining_fat: f64,
    pub entries: Vec<LoggedFoodRow>,
}

#[derive(Debug, Deserialize)]
pub struct SetGoalRequest {
    pub goal_type: GoalType,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Informational fitness objective tag attached to a goal row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Cutting,
    Maintaining,
    Bulking,
}

impl GoalType {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalType::Cutting => "cutting",
            GoalType::Maintaining => "maintaining",
            GoalType::Bulking => "bulking",
        }
    }
}
