//! Meal model
//!
//! A logged meal, entered by hand or confirmed from a photo analysis.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::{FoodItem, MacroSource, NutritionTotals};

/// Meal type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    #[default]
    Unspecified,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Unspecified => "unspecified",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            "snack" => MealType::Snack,
            _ => MealType::Unspecified,
        }
    }
}

/// How a meal got logged
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealSource {
    Manual,
    Photo,
}

impl MealSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSource::Manual => "manual",
            MealSource::Photo => "photo",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "photo" => MealSource::Photo,
            _ => MealSource::Manual,
        }
    }
}

/// A logged meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub date: String, // ISO date: "2026-01-10"
    pub name: String,
    pub meal_type: MealType,
    pub nutrition: NutritionTotals,
    pub source: MealSource,
    pub photo_uri: Option<String>,
    pub logged_at: String,
    pub created_at: String,
    /// Confirmed food items, empty for manual entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<FoodItem>,
}

/// Data for creating a meal
#[derive(Debug, Clone)]
pub struct MealCreate {
    pub date: String,
    pub name: String,
    pub meal_type: MealType,
    pub nutrition: NutritionTotals,
    pub source: MealSource,
    pub photo_uri: Option<String>,
    pub logged_at: Option<String>,
    pub items: Vec<FoodItem>,
}

impl MealCreate {
    /// A photo meal built from confirmed items
    ///
    /// The name lists the named items and the nutrition is the sum of all of them.
    pub fn from_confirmed(
        date: &str,
        meal_type: MealType,
        items: Vec<FoodItem>,
        photo_uri: Option<String>,
    ) -> Self {
        let name = items
            .iter()
            .map(|i| i.name.trim())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        let nutrition = crate::nutrition::aggregate(&items);

        Self {
            date: date.to_string(),
            name,
            meal_type,
            nutrition,
            source: MealSource::Photo,
            photo_uri,
            logged_at: None,
            items,
        }
    }
}

impl MacroSource for Meal {
    fn macros(&self) -> NutritionTotals {
        self.nutrition
    }
}

impl Meal {
    /// Create from a database row (items are loaded separately)
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type: String = row.get("meal_type")?;
        let source: String = row.get("source")?;

        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            name: row.get("name")?,
            meal_type: MealType::from_str(&meal_type),
            nutrition: NutritionTotals {
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                carbs: row.get("carbs")?,
                fat: row.get("fat")?,
            },
            source: MealSource::from_str(&source),
            photo_uri: row.get("photo_uri")?,
            logged_at: row.get("logged_at")?,
            created_at: row.get("created_at")?,
            items: Vec::new(),
        })
    }

    fn item_from_row(row: &Row) -> rusqlite::Result<FoodItem> {
        Ok(FoodItem {
            name: row.get("name")?,
            portion_size_grams: row.get("portion_size_grams")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            confidence: row.get("confidence")?,
        })
    }

    /// Create a meal and its items in one transaction
    pub fn create(conn: &Connection, data: &MealCreate) -> DbResult<Self> {
        if data.name.trim().is_empty() {
            return Err(DbError::Validation("Meal name is required".to_string()));
        }

        let logged_at = data
            .logged_at
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO meals (date, name, meal_type, calories, protein, carbs, fat,
                               source, photo_uri, logged_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.date,
                data.name.trim(),
                data.meal_type.as_str(),
                data.nutrition.calories,
                data.nutrition.protein,
                data.nutrition.carbs,
                data.nutrition.fat,
                data.source.as_str(),
                data.photo_uri,
                logged_at,
            ],
        )?;
        let id = tx.last_insert_rowid();

        for (position, item) in data.items.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO meal_items (meal_id, position, name, portion_size_grams,
                                        calories, protein, carbs, fat, confidence)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
                params![
                    id,
                    position as i64,
                    item.name,
                    item.portion_size_grams,
                    item.calories,
                    item.protein,
                    item.carbs,
                    item.fat,
                    item.confidence,
                ],
            )?;
        }

        tx.commit()?;

        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a meal with its items by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(mut meal) => {
                meal.items = Self::items_for(conn, id)?;
                Ok(Some(meal))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn items_for(conn: &Connection, meal_id: i64) -> DbResult<Vec<FoodItem>> {
        let mut stmt =
            conn.prepare("SELECT * FROM meal_items WHERE meal_id = ?1 ORDER BY position")?;
        let items = stmt
            .query_map([meal_id], Self::item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Meals logged on a date, in logging order
    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM meals WHERE date = ?1 ORDER BY logged_at, id")?;
        let mut meals = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for meal in &mut meals {
            if meal.source == MealSource::Photo {
                meal.items = Self::items_for(conn, meal.id)?;
            }
        }

        Ok(meals)
    }

    /// Per-date nutrition sums over an inclusive date range
    pub fn daily_totals(
        conn: &Connection,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<(String, NutritionTotals)>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT date, SUM(calories), SUM(protein), SUM(carbs), SUM(fat)
            FROM meals
            WHERE date >= ?1 AND date <= ?2
            GROUP BY date
            ORDER BY date
            "#,
        )?;

        let rows = stmt
            .query_map([start_date, end_date], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    NutritionTotals::new(row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?),
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Distinct dates with at least one meal, up to and including `date`
    pub fn dates_up_to(conn: &Connection, date: &str) -> DbResult<Vec<String>> {
        let mut stmt =
            conn.prepare("SELECT DISTINCT date FROM meals WHERE date <= ?1 ORDER BY date DESC")?;
        let dates = stmt
            .query_map([date], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dates)
    }

    /// Delete a meal (items cascade)
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meals WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn)).unwrap();
        db
    }

    fn item(name: &str, calories: f64) -> FoodItem {
        FoodItem {
            name: name.to_string(),
            portion_size_grams: 100.0,
            calories,
            protein: 10.0,
            carbs: 5.0,
            fat: 2.5,
            confidence: 0.8,
        }
    }

    #[test]
    fn test_confirmed_meal_keeps_items() {
        let db = db();
        let data = MealCreate::from_confirmed(
            "2026-01-10",
            MealType::Lunch,
            vec![item("Chicken Salad", 200.0), item("Bread", 150.0)],
            Some("file:///photos/1.jpg".to_string()),
        );
        assert_eq!(data.name, "Chicken Salad, Bread");

        let meal = db.with_conn(|conn| Meal::create(conn, &data)).unwrap();
        assert_eq!(meal.source, MealSource::Photo);
        assert_eq!(meal.nutrition.calories, 350.0);
        assert_eq!(meal.nutrition.protein, 20.0);
        assert_eq!(meal.items.len(), 2);
        assert_eq!(meal.items[1].name, "Bread");
    }

    #[test]
    fn test_blank_item_names_skipped() {
        let data = MealCreate::from_confirmed(
            "2026-01-10",
            MealType::Lunch,
            vec![item("", 200.0), item("Bread", 150.0), item("  ", 50.0)],
            None,
        );
        assert_eq!(data.name, "Bread");
        assert_eq!(data.nutrition.calories, 400.0);
        assert_eq!(data.items.len(), 3);
    }

    #[test]
    fn test_list_and_delete() {
        let db = db();
        db.with_conn(|conn| {
            let first = Meal::create(
                conn,
                &MealCreate::from_confirmed("2026-01-10", MealType::Dinner, vec![item("Rice", 300.0)], None),
            )?;
            Meal::create(
                conn,
                &MealCreate::from_confirmed("2026-01-11", MealType::Lunch, vec![item("Soup", 120.0)], None),
            )?;

            assert_eq!(Meal::list_for_date(conn, "2026-01-10")?.len(), 1);
            assert_eq!(Meal::dates_up_to(conn, "2026-01-11")?, vec!["2026-01-11", "2026-01-10"]);

            assert!(Meal::delete(conn, first.id)?);
            assert!(!Meal::delete(conn, first.id)?);
            assert!(Meal::list_for_date(conn, "2026-01-10")?.is_empty());

            let orphans: i64 =
                conn.query_row("SELECT COUNT(*) FROM meal_items WHERE meal_id = ?1", [first.id], |r| r.get(0))?;
            assert_eq!(orphans, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_blank_name_rejected() {
        let db = db();
        let data = MealCreate {
            date: "2026-01-10".to_string(),
            name: "  ".to_string(),
            meal_type: MealType::Snack,
            nutrition: NutritionTotals::zero(),
            source: MealSource::Manual,
            photo_uri: None,
            logged_at: None,
            items: Vec::new(),
        };
        let err = db.with_conn(|conn| Meal::create(conn, &data)).unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
