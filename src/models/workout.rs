//! Workout model
//!
//! Logged workouts plus the built-in workout types and their burn rates.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Built-in workout type with an estimated burn rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkoutType {
    pub name: &'static str,
    pub calories_per_minute: f64,
}

pub const WORKOUT_TYPES: &[WorkoutType] = &[
    WorkoutType { name: "Running", calories_per_minute: 10.0 },
    WorkoutType { name: "Cycling", calories_per_minute: 8.0 },
    WorkoutType { name: "Swimming", calories_per_minute: 9.0 },
    WorkoutType { name: "Weightlifting", calories_per_minute: 6.0 },
    WorkoutType { name: "Yoga", calories_per_minute: 4.0 },
    WorkoutType { name: "Walking", calories_per_minute: 5.0 },
];

impl WorkoutType {
    /// Case-insensitive lookup by name
    pub fn find(name: &str) -> Option<&'static WorkoutType> {
        let name = name.trim();
        WORKOUT_TYPES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// Estimated calories burned; unknown types burn nothing
pub fn estimate_calories_burned(workout_type: &str, duration_minutes: f64) -> f64 {
    WorkoutType::find(workout_type)
        .map(|t| t.calories_per_minute * duration_minutes.max(0.0))
        .unwrap_or(0.0)
}

/// A logged workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub date: String,
    pub workout_type: String,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub logged_at: String,
    pub created_at: String,
}

/// Data for creating a workout
#[derive(Debug, Clone)]
pub struct WorkoutCreate {
    pub date: String,
    pub workout_type: String,
    pub duration_minutes: f64,
    /// Estimated from the type's rate when absent
    pub calories_burned: Option<f64>,
    pub logged_at: Option<String>,
}

impl Workout {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            workout_type: row.get("workout_type")?,
            duration_minutes: row.get("duration_minutes")?,
            calories_burned: row.get("calories_burned")?,
            logged_at: row.get("logged_at")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Create a new workout
    pub fn create(conn: &Connection, data: &WorkoutCreate) -> DbResult<Self> {
        if data.workout_type.trim().is_empty() || data.duration_minutes <= 0.0 {
            return Err(DbError::Validation(
                "Workout type and a positive duration are required".to_string(),
            ));
        }

        // Store the canonical spelling for built-in types
        let workout_type = WorkoutType::find(&data.workout_type)
            .map(|t| t.name.to_string())
            .unwrap_or_else(|| data.workout_type.trim().to_string());

        let calories_burned = data
            .calories_burned
            .unwrap_or_else(|| estimate_calories_burned(&workout_type, data.duration_minutes));
        let logged_at = data
            .logged_at
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string());

        conn.execute(
            r#"
            INSERT INTO workouts (date, workout_type, duration_minutes, calories_burned, logged_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![data.date, workout_type, data.duration_minutes, calories_burned, logged_at],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a workout by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(workout) => Ok(Some(workout)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Workouts in an inclusive date range, oldest first
    pub fn list_range(conn: &Connection, start_date: &str, end_date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM workouts WHERE date >= ?1 AND date <= ?2 ORDER BY date, logged_at, id",
        )?;
        let workouts = stmt
            .query_map([start_date, end_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(workouts)
    }

    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        Self::list_range(conn, date, date)
    }

    /// Distinct dates with at least one workout, up to and including `date`
    pub fn dates_up_to(conn: &Connection, date: &str) -> DbResult<Vec<String>> {
        let mut stmt = conn
            .prepare("SELECT DISTINCT date FROM workouts WHERE date <= ?1 ORDER BY date DESC")?;
        let dates = stmt
            .query_map([date], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dates)
    }

    /// Delete a workout
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM workouts WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
