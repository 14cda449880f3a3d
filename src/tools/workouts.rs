//! Workout MCP Tools

use serde::Serialize;
use tracing::info;

use super::{resolve_date, DeleteResponse};
use crate::db::Database;
use crate::models::{Workout, WorkoutCreate, WorkoutType, WORKOUT_TYPES};
use crate::nutrition::{aggregate_workouts, parse_int_or_zero, WorkoutTotals};

pub const MISSING_WORKOUT_FIELDS: &str = "Please select workout type and duration.";

/// Response for log_workout
#[derive(Debug, Serialize)]
pub struct LogWorkoutResponse {
    pub workout: Workout,
    pub message: String,
}

/// Response for list_workouts
#[derive(Debug, Serialize)]
pub struct ListWorkoutsResponse {
    pub date: String,
    pub workouts: Vec<Workout>,
    pub totals: WorkoutTotals,
}

/// Built-in workout types and their burn rates
pub fn list_workout_types() -> Vec<WorkoutType> {
    WORKOUT_TYPES.to_vec()
}

/// Log a workout from the form's type and duration text
///
/// The duration is read as whole minutes. Calories burned are estimated from
/// the type's rate (0 for types without one).
pub fn log_workout(
    db: &Database,
    workout_type: &str,
    duration: &str,
    date: Option<&str>,
) -> Result<LogWorkoutResponse, String> {
    let minutes = parse_int_or_zero(duration);
    if workout_type.trim().is_empty() || minutes <= 0 {
        return Err(MISSING_WORKOUT_FIELDS.to_string());
    }

    let data = WorkoutCreate {
        date: resolve_date(date)?,
        workout_type: workout_type.to_string(),
        duration_minutes: minutes as f64,
        calories_burned: None,
        logged_at: None,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let workout =
        Workout::create(&conn, &data).map_err(|e| format!("Failed to log workout: {}", e))?;

    info!(
        workout_id = workout.id,
        workout_type = %workout.workout_type,
        calories_burned = workout.calories_burned,
        "workout logged"
    );

    Ok(LogWorkoutResponse {
        message: format!(
            "{} for {} min logged ({} kcal)",
            workout.workout_type, workout.duration_minutes, workout.calories_burned
        ),
        workout,
    })
}

/// List the workouts of a day with their totals
pub fn list_workouts(db: &Database, date: Option<&str>) -> Result<ListWorkoutsResponse, String> {
    let date = resolve_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let workouts = Workout::list_for_date(&conn, &date)
        .map_err(|e| format!("Failed to list workouts: {}", e))?;
    let totals = aggregate_workouts(&workouts);

    Ok(ListWorkoutsResponse { date, workouts, totals })
}

pub fn delete_workout(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted =
        Workout::delete(&conn, id).map_err(|e| format!("Failed to delete workout: {}", e))?;
    if !deleted {
        return Err(format!("Workout {} not found", id));
    }

    info!(workout_id = id, "workout deleted");
    Ok(DeleteResponse { id, deleted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_db;

    #[test]
    fn test_missing_fields() {
        let db = test_db();
        assert_eq!(log_workout(&db, "", "30", None).unwrap_err(), MISSING_WORKOUT_FIELDS);
        assert_eq!(log_workout(&db, "Running", "", None).unwrap_err(), MISSING_WORKOUT_FIELDS);
        assert_eq!(log_workout(&db, "Running", "abc", None).unwrap_err(), MISSING_WORKOUT_FIELDS);
    }

    #[test]
    fn test_log_and_list() {
        let db = test_db();
        let run = log_workout(&db, "Running", "30", Some("2026-01-10")).unwrap();
        assert_eq!(run.workout.calories_burned, 300.0);

        let yoga = log_workout(&db, "Yoga", "45.9", Some("2026-01-10")).unwrap();
        assert_eq!(yoga.workout.duration_minutes, 45.0);
        assert_eq!(yoga.workout.calories_burned, 180.0);

        let listed = list_workouts(&db, Some("2026-01-10")).unwrap();
        assert_eq!(listed.totals.count, 2);
        assert_eq!(listed.totals.duration_minutes, 75.0);
        assert_eq!(listed.totals.calories_burned, 480.0);

        delete_workout(&db, run.workout.id).unwrap();
        assert_eq!(list_workouts(&db, Some("2026-01-10")).unwrap().workouts.len(), 1);
    }

    #[test]
    fn test_workout_types() {
        let types = list_workout_types();
        assert_eq!(types[0].name, "Running");
        assert_eq!(types[0].calories_per_minute, 10.0);
    }
}
