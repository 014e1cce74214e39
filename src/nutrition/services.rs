use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::nutrition::dto::{
    DailySummary, FoodItemQuery, HistoryPage, HistoryQuery, LogFoodRequest, SetGoalRequest,
    UpsertFoodItemRequest,
};
use crate::nutrition::repo::{self, HistoryFilter};
use crate::nutrition::repo_types::{FoodItem, LoggedFoodItem, LoggedFoodRow, NutritionGoal};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// The four tracked macros as one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Per-serving values scaled by the logged quantity. This is the snapshot
/// written into the log row.
fn snapshot_macros(food: &FoodItem, quantity: f64) -> MacroTotals {
    MacroTotals {
        calories: food.calories_per_serving * quantity,
        protein: food.protein_per_serving * quantity,
        carbs: food.carbs_per_serving * quantity,
        fat: food.fat_per_serving * quantity,
    }
}

fn sum_rows(rows: &[LoggedFoodRow]) -> MacroTotals {
    rows.iter().fold(
        MacroTotals {
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
        },
        |acc, r| MacroTotals {
            calories: acc.calories + r.calculated_calories,
            protein: acc.protein + r.calculated_protein,
            carbs: acc.carbs + r.calculated_carbs,
            fat: acc.fat + r.calculated_fat,
        },
    )
}

/// Goal minus consumed; an unset goal counts down from zero.
fn remaining(goal: Option<&NutritionGoal>, consumed: &MacroTotals) -> MacroTotals {
    let (calories, protein, carbs, fat) = goal
        .map(|g| (g.calories, g.protein_g, g.carbs_g, g.fat_g))
        .unwrap_or((0.0, 0.0, 0.0, 0.0));
    MacroTotals {
        calories: calories - consumed.calories,
        protein: protein - consumed.protein,
        carbs: carbs - consumed.carbs,
        fat: fat - consumed.fat,
    }
}

/// Page number is 1-based; size is clamped to keep responses bounded. The
/// offset saturates so an absurd page number cannot overflow or go negative.
fn normalize_page(page_number: Option<i64>, page_size: Option<i64>) -> (i64, i64, i64) {
    let page = page_number.unwrap_or(1).max(1);
    let size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = page.saturating_sub(1).saturating_mul(size);
    (page, size, offset)
}

/// Who may edit or delete a food item. Owned items: the owner only. Global
/// items: anyone, unless the admin-only policy is enabled.
fn check_modify_permission(
    food: &FoodItem,
    user: &AuthUser,
    global_admin_only: bool,
) -> Result<(), ApiError> {
    match food.user_id {
        Some(owner) if owner != user.id => Err(ApiError::Forbidden(
            "Food item belongs to another user".into(),
        )),
        Some(_) => Ok(()),
        None => {
            if global_admin_only && !user.is_admin() {
                Err(ApiError::Forbidden(
                    "Only admins may modify global food items".into(),
                ))
            } else {
                Ok(())
            }
        }
    }
}

fn validate_food(payload: &UpsertFoodItemRequest) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".into()));
    }
    if payload.serving_size <= 0.0 {
        return Err(ApiError::Validation(
            "Serving size must be positive".into(),
        ));
    }
    let per_serving = [
        payload.calories_per_serving,
        payload.protein_per_serving,
        payload.carbs_per_serving,
        payload.fat_per_serving,
    ];
    if per_serving.iter().any(|v| *v < 0.0 || !v.is_finite()) {
        return Err(ApiError::Validation(
            "Nutrition values must be non-negative".into(),
        ));
    }
    Ok(())
}

// --- food items ---

pub async fn create_food_item(
    db: &PgPool,
    user: &AuthUser,
    payload: UpsertFoodItemRequest,
) -> Result<FoodItem, ApiError> {
    validate_food(&payload)?;
    if let Some(barcode) = payload.barcode.as_deref() {
        if FoodItem::find_by_barcode(db, barcode).await?.is_some() {
            return Err(ApiError::Conflict(
                "A food item with this barcode already exists".into(),
            ));
        }
    }
    let food = FoodItem::insert(db, Some(user.id), &payload).await?;
    info!(food_item_id = %food.id, user_id = %user.id, "food item created");
    Ok(food)
}

/// Global items and the user's own items are visible; other users' items
/// are not.
fn is_visible_to(food: &FoodItem, user: &AuthUser) -> bool {
    !matches!(food.user_id, Some(owner) if owner != user.id)
}

pub async fn get_food_item(db: &PgPool, user: &AuthUser, id: Uuid) -> Result<FoodItem, ApiError> {
    let food = FoodItem::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food item not found".into()))?;
    // Another user's private item is indistinguishable from a missing one.
    if !is_visible_to(&food, user) {
        return Err(ApiError::NotFound("Food item not found".into()));
    }
    Ok(food)
}

pub async fn list_food_items(
    db: &PgPool,
    user: &AuthUser,
    query: FoodItemQuery,
) -> Result<Vec<FoodItem>, ApiError> {
    if let Some(barcode) = query.barcode.as_deref() {
        return Ok(FoodItem::find_by_barcode(db, barcode)
            .await?
            .into_iter()
            .filter(|food| is_visible_to(food, user))
            .collect());
    }
    let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.max(0);
    Ok(FoodItem::list_visible(db, user.id, query.search.as_deref(), limit, offset).await?)
}

pub async fn update_food_item(
    db: &PgPool,
    user: &AuthUser,
    global_admin_only: bool,
    id: Uuid,
    payload: UpsertFoodItemRequest,
) -> Result<FoodItem, ApiError> {
    validate_food(&payload)?;
    let existing = FoodItem::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food item not found".into()))?;
    check_modify_permission(&existing, user, global_admin_only)?;

    if let Some(barcode) = payload.barcode.as_deref() {
        if let Some(other) = FoodItem::find_by_barcode(db, barcode).await? {
            if other.id != id {
                return Err(ApiError::Conflict(
                    "A food item with this barcode already exists".into(),
                ));
            }
        }
    }

    FoodItem::update(db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food item not found".into()))
}

pub async fn delete_food_item(
    db: &PgPool,
    user: &AuthUser,
    global_admin_only: bool,
    id: Uuid,
) -> Result<(), ApiError> {
    let existing = FoodItem::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food item not found".into()))?;
    check_modify_permission(&existing, user, global_admin_only)?;

    // Application-level referential guard: logged history must stay intact.
    if FoodItem::is_logged_against(db, id).await? {
        return Err(ApiError::Conflict(
            "Food item has logged entries and cannot be deleted".into(),
        ));
    }
    if !FoodItem::delete(db, id).await? {
        return Err(ApiError::NotFound("Food item not found".into()));
    }
    info!(food_item_id = %id, user_id = %user.id, "food item deleted");
    Ok(())
}

// --- logging ---

pub async fn log_food(
    db: &PgPool,
    user: &AuthUser,
    payload: LogFoodRequest,
) -> Result<LoggedFoodItem, ApiError> {
    if payload.quantity <= 0.0 || !payload.quantity.is_finite() {
        return Err(ApiError::Validation("Quantity must be positive".into()));
    }
    if payload.meal_context.trim().is_empty() {
        return Err(ApiError::Validation("Meal context is required".into()));
    }

    let food = FoodItem::find_by_id(db, payload.food_item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Food item not found".into()))?;
    if matches!(food.user_id, Some(owner) if owner != user.id) {
        return Err(ApiError::Forbidden(
            "Food item belongs to another user".into(),
        ));
    }

    let macros = snapshot_macros(&food, payload.quantity);
    let logged_at = payload.logged_at.unwrap_or_else(OffsetDateTime::now_utc);

    let entry = LoggedFoodItem::insert(
        db,
        user.id,
        food.id,
        payload.logged_date,
        logged_at,
        payload.meal_context.trim(),
        payload.quantity,
        macros.calories,
        macros.protein,
        macros.carbs,
        macros.fat,
    )
    .await?;

    info!(
        entry_id = %entry.id,
        user_id = %user.id,
        food_item_id = %food.id,
        quantity = payload.quantity,
        "food logged"
    );
    Ok(entry)
}

pub async fn delete_logged_food(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
    if !LoggedFoodItem::delete_owned(db, user_id, id).await? {
        return Err(ApiError::NotFound("Logged entry not found".into()));
    }
    Ok(())
}

pub async fn daily_summary(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> Result<DailySummary, ApiError> {
    let entries = LoggedFoodItem::list_for_day(db, user_id, date).await?;
    let goal = NutritionGoal::find_by_user(db, user_id).await?;
    let consumed = sum_rows(&entries);
    let left = remaining(goal.as_ref(), &consumed);

    Ok(DailySummary {
        date,
        total_calories_consumed: consumed.calories,
        total_protein_consumed: consumed.protein,
        total_carbs_consumed: consumed.carbs,
        total_fat_consumed: consumed.fat,
        goal,
        remaining_calories: left.calories,
        remaining_protein: left.protein,
        remaining_carbs: left.carbs,
        remaining_fat: left.fat,
        entries,
    })
}

pub async fn logged_food_history(
    db: &PgPool,
    user_id: Uuid,
    query: HistoryQuery,
) -> Result<HistoryPage, ApiError> {
    let (page, size, offset) = normalize_page(query.page_number, query.page_size);
    let filter = HistoryFilter {
        user_id,
        start_date: query.start_date,
        end_date: query.end_date,
        meal_context: query
            .meal_context_filter
            .filter(|m| !m.trim().is_empty()),
    };
    let items = repo::history_page(db, &filter, size, offset).await?;
    let total_count = repo::history_count(db, &filter).await?;
    Ok(HistoryPage {
        items,
        total_count,
        page_number: page,
        page_size: size,
    })
}

// --- goals ---

pub async fn set_goal(
    db: &PgPool,
    user_id: Uuid,
    payload: SetGoalRequest,
) -> Result<NutritionGoal, ApiError> {
    let values = [
        payload.calories,
        payload.protein_g,
        payload.carbs_g,
        payload.fat_g,
    ];
    if values.iter().any(|v| *v < 0.0 || !v.is_finite()) {
        return Err(ApiError::Validation(
            "Goal values must be non-negative".into(),
        ));
    }

    let goal = NutritionGoal::upsert(
        db,
        user_id,
        payload.goal_type.as_str(),
        payload.calories,
        payload.protein_g,
        payload.carbs_g,
        payload.fat_g,
    )
    .await?
    .ok_or_else(|| ApiError::Unexpected("Goal row missing after upsert".into()))?;

    info!(%user_id, goal_type = goal.goal_type.as_str(), "nutrition goal set");
    Ok(goal)
}

pub async fn get_goal(db: &PgPool, user_id: Uuid) -> Result<NutritionGoal, ApiError> {
    NutritionGoal::find_by_user(db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No nutrition goal set".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use time::macros::{date, datetime};

    fn food(user_id: Option<Uuid>, calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodItem {
        FoodItem {
            id: Uuid::new_v4(),
            user_id,
            name: "Banana".into(),
            barcode: None,
            serving_size: 1.0,
            serving_unit: "piece".into(),
            calories_per_serving: calories,
            protein_per_serving: protein,
            carbs_per_serving: carbs,
            fat_per_serving: fat,
            fiber_per_serving: None,
            sugar_per_serving: None,
            sodium_per_serving: None,
            created_at: datetime!(2024-01-01 00:00 UTC),
        }
    }

    fn row(calories: f64, protein: f64, carbs: f64, fat: f64) -> LoggedFoodRow {
        LoggedFoodRow {
            id: Uuid::new_v4(),
            food_item_id: Uuid::new_v4(),
            food_name: "Banana".into(),
            logged_date: date!(2024 - 01 - 01),
            logged_at: datetime!(2024-01-01 08:00 UTC),
            meal_context: "Breakfast".into(),
            quantity: 1.0,
            calculated_calories: calories,
            calculated_protein: protein,
            calculated_carbs: carbs,
            calculated_fat: fat,
        }
    }

    fn goal(calories: f64, protein: f64, carbs: f64, fat: f64) -> NutritionGoal {
        NutritionGoal {
            user_id: Uuid::new_v4(),
            goal_type: "maintaining".into(),
            calories,
            protein_g: protein,
            carbs_g: carbs,
            fat_g: fat,
            updated_at: datetime!(2024-01-01 00:00 UTC),
        }
    }

    fn user() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role: Role::User,
        }
    }

    #[test]
    fn snapshot_scales_per_serving_values() {
        // Banana: 105 kcal / 1.3 g protein / 27 g carbs / 0.4 g fat per piece.
        let banana = food(None, 105.0, 1.3, 27.0, 0.4);
        let macros = snapshot_macros(&banana, 2.0);
        assert_eq!(macros.calories, 210.0);
        assert_eq!(macros.protein, 2.6);
        assert_eq!(macros.carbs, 54.0);
        assert_eq!(macros.fat, 0.8);
    }

    #[test]
    fn snapshot_with_fractional_quantity() {
        let item = food(None, 200.0, 10.0, 20.0, 5.0);
        let macros = snapshot_macros(&item, 0.5);
        assert!((macros.calories - 100.0).abs() < 1e-9);
        assert!((macros.protein - 5.0).abs() < 1e-9);
    }

    #[test]
    fn summary_totals_are_the_sum_of_calculated_fields() {
        let rows = vec![
            row(210.0, 2.6, 54.0, 0.8),
            row(150.0, 8.0, 12.0, 7.5),
            row(90.0, 3.0, 15.0, 1.0),
        ];
        let totals = sum_rows(&rows);
        assert!((totals.calories - 450.0).abs() < 1e-9);
        assert!((totals.protein - 13.6).abs() < 1e-9);
        assert!((totals.carbs - 81.0).abs() < 1e-9);
        assert!((totals.fat - 9.3).abs() < 1e-9);
    }

    #[test]
    fn empty_day_sums_to_zero() {
        let totals = sum_rows(&[]);
        assert_eq!(totals.calories, 0.0);
        assert_eq!(totals.protein, 0.0);
    }

    #[test]
    fn remaining_subtracts_consumed_from_goal() {
        let g = goal(2000.0, 150.0, 250.0, 70.0);
        let consumed = MacroTotals {
            calories: 450.0,
            protein: 13.6,
            carbs: 81.0,
            fat: 9.3,
        };
        let left = remaining(Some(&g), &consumed);
        assert!((left.calories - 1550.0).abs() < 1e-9);
        assert!((left.protein - 136.4).abs() < 1e-9);
    }

    #[test]
    fn remaining_without_goal_defaults_to_zero_targets() {
        let consumed = MacroTotals {
            calories: 300.0,
            protein: 20.0,
            carbs: 30.0,
            fat: 10.0,
        };
        let left = remaining(None, &consumed);
        assert_eq!(left.calories, -300.0);
        assert_eq!(left.protein, -20.0);
    }

    #[test]
    fn page_defaults_and_clamping() {
        assert_eq!(normalize_page(None, None), (1, DEFAULT_PAGE_SIZE, 0));
        assert_eq!(normalize_page(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(normalize_page(Some(-3), Some(10)), (1, 10, 0));
        assert_eq!(
            normalize_page(Some(4), Some(1000)),
            (4, MAX_PAGE_SIZE, 3 * MAX_PAGE_SIZE)
        );
    }

    #[test]
    fn huge_page_number_saturates_instead_of_overflowing() {
        let (page, size, offset) = normalize_page(Some(i64::MAX), Some(100));
        assert_eq!(page, i64::MAX);
        assert_eq!(size, 100);
        assert_eq!(offset, i64::MAX);
    }

    #[test]
    fn visibility_hides_other_users_private_items() {
        let u = user();
        assert!(is_visible_to(&food(None, 100.0, 1.0, 1.0, 1.0), &u));
        assert!(is_visible_to(&food(Some(u.id), 100.0, 1.0, 1.0, 1.0), &u));
        assert!(!is_visible_to(
            &food(Some(Uuid::new_v4()), 100.0, 1.0, 1.0, 1.0),
            &u
        ));
    }

    #[test]
    fn owner_may_modify_own_item() {
        let u = user();
        let item = food(Some(u.id), 100.0, 1.0, 1.0, 1.0);
        assert!(check_modify_permission(&item, &u, false).is_ok());
        assert!(check_modify_permission(&item, &u, true).is_ok());
    }

    #[test]
    fn non_owner_is_rejected() {
        let u = user();
        let item = food(Some(Uuid::new_v4()), 100.0, 1.0, 1.0, 1.0);
        assert!(matches!(
            check_modify_permission(&item, &u, false),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn global_item_policy_controls_non_admin_edits() {
        let u = user();
        let item = food(None, 100.0, 1.0, 1.0, 1.0);
        // Legacy behavior: anyone may edit a global item.
        assert!(check_modify_permission(&item, &u, false).is_ok());
        // Strict policy: only admins.
        assert!(matches!(
            check_modify_permission(&item, &u, true),
            Err(ApiError::Forbidden(_))
        ));
        let admin = AuthUser {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        assert!(check_modify_permission(&item, &admin, true).is_ok());
    }

    #[test]
    fn food_validation_rejects_bad_input() {
        let mut payload = UpsertFoodItemRequest {
            name: "Banana".into(),
            barcode: None,
            serving_size: 1.0,
            serving_unit: "piece".into(),
            calories_per_serving: 105.0,
            protein_per_serving: 1.3,
            carbs_per_serving: 27.0,
            fat_per_serving: 0.4,
            fiber_per_serving: None,
            sugar_per_serving: None,
            sodium_per_serving: None,
        };
        assert!(validate_food(&payload).is_ok());

        payload.name = "  ".into();
        assert!(matches!(
            validate_food(&payload),
            Err(ApiError::Validation(_))
        ));

        payload.name = "Banana".into();
        payload.serving_size = 0.0;
        assert!(matches!(
            validate_food(&payload),
            Err(ApiError::Validation(_))
        ));

        payload.serving_size = 1.0;
        payload.protein_per_serving = -1.0;
        assert!(matches!(
            validate_food(&payload),
            Err(ApiError::Validation(_))
        ));
    }
}
