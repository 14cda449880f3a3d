//! User profile model
//!
//! Personal data and daily goals, stored as a single row.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Daily targets the summary measures progress against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyGoals {
    pub calorie_goal: f64,
    pub protein_goal: f64,
    pub carbs_goal: f64,
    pub fat_goal: f64,
    pub workout_goal: i64,
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            calorie_goal: 2000.0,
            protein_goal: 150.0,
            carbs_goal: 200.0,
            fat_goal: 65.0,
            workout_goal: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal: String,
    pub goals: DailyGoals,
    pub updated_at: Option<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 0,
            height_cm: 0.0,
            weight_kg: 0.0,
            goal: String::new(),
            goals: DailyGoals::default(),
            updated_at: None,
        }
    }
}

/// Partial profile update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub goal: Option<String>,
    pub calorie_goal: Option<f64>,
    pub protein_goal: Option<f64>,
    pub carbs_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub workout_goal: Option<i64>,
}

impl UserProfile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get("name")?,
            age: row.get("age")?,
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            goal: row.get("goal")?,
            goals: DailyGoals {
                calorie_goal: row.get("calorie_goal")?,
                protein_goal: row.get("protein_goal")?,
                carbs_goal: row.get("carbs_goal")?,
                fat_goal: row.get("fat_goal")?,
                workout_goal: row.get("workout_goal")?,
            },
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the stored profile, or defaults if none was saved yet
    pub fn get(conn: &Connection) -> DbResult<Self> {
        let mut stmt = conn.prepare("SELECT * FROM user_profile WHERE id = 1")?;

        let result = stmt.query_row([], Self::from_row);
        match result {
            Ok(profile) => Ok(profile),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply a partial update (upsert)
    pub fn update(conn: &Connection, data: &ProfileUpdate) -> DbResult<Self> {
        let negative = [
            data.height_cm,
            data.weight_kg,
            data.calorie_goal,
            data.protein_goal,
            data.carbs_goal,
            data.fat_goal,
        ]
        .iter()
        .flatten()
        .any(|v| *v < 0.0 || !v.is_finite())
            || data.age.is_some_and(|a| a < 0)
            || data.workout_goal.is_some_and(|w| w < 0);
        if negative {
            return Err(DbError::Validation(
                "Profile values must be zero or positive".to_string(),
            ));
        }

        let current = Self::get(conn)?;
        let goals = current.goals;

        conn.execute(
            r#"
            INSERT INTO user_profile (id, name, age, height_cm, weight_kg, goal,
                                      calorie_goal, protein_goal, carbs_goal, fat_goal, workout_goal)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                goal = excluded.goal,
                calorie_goal = excluded.calorie_goal,
                protein_goal = excluded.protein_goal,
                carbs_goal = excluded.carbs_goal,
                fat_goal = excluded.fat_goal,
                workout_goal = excluded.workout_goal,
                updated_at = datetime('now')
            "#,
            params![
                data.name.as_deref().map(str::trim).unwrap_or(&current.name),
                data.age.unwrap_or(current.age),
                data.height_cm.unwrap_or(current.height_cm),
                data.weight_kg.unwrap_or(current.weight_kg),
                data.goal.as_deref().map(str::trim).unwrap_or(&current.goal),
                data.calorie_goal.unwrap_or(goals.calorie_goal),
                data.protein_goal.unwrap_or(goals.protein_goal),
                data.carbs_goal.unwrap_or(goals.carbs_goal),
                data.fat_goal.unwrap_or(goals.fat_goal),
                data.workout_goal.unwrap_or(goals.workout_goal),
            ],
        )?;

        Self::get(conn)
    }
}
