//! Meal MCP Tools
//!
//! Manual meal entry, saving confirmed photo meals, listing and deletion.

use serde::Serialize;
use tracing::info;

use super::{resolve_date, DeleteResponse};
use crate::db::Database;
use crate::models::{FoodItem, Meal, MealCreate, MealSource, MealType, NutritionTotals};
use crate::nutrition::{aggregate, parse_int_or_zero};

pub const MISSING_MEAL_FIELDS: &str = "Please enter at least meal name and calories.";

/// Text fields of the manual meal form
#[derive(Debug, Clone, Default)]
pub struct ManualMealInput {
    pub name: String,
    pub calories: String,
    pub protein: Option<String>,
    pub carbs: Option<String>,
    pub fat: Option<String>,
    pub meal_type: Option<String>,
    pub date: Option<String>,
}

/// Response for meal creation
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub meal: Meal,
    pub message: String,
}

/// Response for list_meals
#[derive(Debug, Serialize)]
pub struct ListMealsResponse {
    pub date: String,
    pub meals: Vec<Meal>,
    pub totals: NutritionTotals,
}

// ============================================================================
// Meal Tools
// ============================================================================

/// Log a meal typed in by hand
///
/// Name and calories are required; numbers are read as whole values and
/// anything unreadable counts as 0.
pub fn log_manual_meal(db: &Database, input: &ManualMealInput) -> Result<LogMealResponse, String> {
    let name = input.name.trim();
    if name.is_empty() || input.calories.trim().is_empty() {
        return Err(MISSING_MEAL_FIELDS.to_string());
    }

    let date = resolve_date(input.date.as_deref())?;
    let whole = |v: &Option<String>| {
        v.as_deref()
            .map(|s| parse_int_or_zero(s).max(0) as f64)
            .unwrap_or(0.0)
    };

    let data = MealCreate {
        date,
        name: name.to_string(),
        meal_type: input
            .meal_type
            .as_deref()
            .map(MealType::from_str)
            .unwrap_or_default(),
        nutrition: NutritionTotals::new(
            parse_int_or_zero(&input.calories).max(0) as f64,
            whole(&input.protein),
            whole(&input.carbs),
            whole(&input.fat),
        ),
        source: MealSource::Manual,
        photo_uri: None,
        logged_at: None,
        items: Vec::new(),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let meal = Meal::create(&conn, &data).map_err(|e| format!("Failed to log meal: {}", e))?;

    info!(meal_id = meal.id, date = %meal.date, calories = meal.nutrition.calories, "manual meal logged");

    Ok(LogMealResponse {
        message: format!("Meal '{}' logged", meal.name),
        meal,
    })
}

/// Persist the items of a confirmed food analysis as one meal
pub fn save_confirmed_meal(
    db: &Database,
    date: Option<&str>,
    meal_type: Option<&str>,
    items: Vec<FoodItem>,
    photo_uri: Option<String>,
) -> Result<LogMealResponse, String> {
    if items.is_empty() {
        return Err("No food items to save".to_string());
    }

    let date = resolve_date(date)?;
    let meal_type = meal_type.map(MealType::from_str).unwrap_or_default();
    let data = MealCreate::from_confirmed(&date, meal_type, items, photo_uri);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let meal = Meal::create(&conn, &data).map_err(|e| format!("Failed to save meal: {}", e))?;

    info!(meal_id = meal.id, items = meal.items.len(), calories = meal.nutrition.calories, "photo meal saved");

    Ok(LogMealResponse {
        message: format!("Meal logged with {} food item(s)", meal.items.len()),
        meal,
    })
}

/// List the meals of a day with their summed nutrition
pub fn list_meals(db: &Database, date: Option<&str>) -> Result<ListMealsResponse, String> {
    let date = resolve_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meals = Meal::list_for_date(&conn, &date)
        .map_err(|e| format!("Failed to list meals: {}", e))?;
    let totals = aggregate(&meals);

    Ok(ListMealsResponse { date, meals, totals })
}

/// Delete a meal and its items
pub fn delete_meal(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Meal::delete(&conn, id).map_err(|e| format!("Failed to delete meal: {}", e))?;
    if !deleted {
        return Err(format!("Meal {} not found", id));
    }

    info!(meal_id = id, "meal deleted");
    Ok(DeleteResponse { id, deleted })
}
