//! Progress MCP Tools
//!
//! Daily summary against the profile's goals, streaks, and multi-day history.

use std::collections::{BTreeSet, HashMap};

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

use super::resolve_date;
use crate::db::{Database, DbResult};
use crate::models::{DailyGoals, Meal, NutritionTotals, UserProfile, WeighIn, Workout};
use crate::nutrition::{aggregate, aggregate_workouts, round_calories, round_macro, WorkoutTotals};

pub const DEFAULT_PROGRESS_DAYS: u32 = 7;
pub const MAX_PROGRESS_DAYS: u32 = 365;

/// Whole-number progress towards each daily goal, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProgress {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
    pub workouts: u32,
}

/// Response for get_daily_summary
#[derive(Debug, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub nutrition: NutritionTotals,
    pub meal_count: usize,
    pub workouts: WorkoutTotals,
    pub goals: DailyGoals,
    pub goal_progress: GoalProgress,
    pub calories_remaining: f64,
    pub streak_days: u32,
}

/// One day of the progress history
#[derive(Debug, Clone, Serialize)]
pub struct DayProgress {
    pub date: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub workout_count: usize,
    pub workout_minutes: f64,
    pub calories_burned: f64,
}

/// Response for get_progress
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub start_date: String,
    pub end_date: String,
    pub days: Vec<DayProgress>,
    pub average_calories: f64,
    pub average_protein: f64,
    pub total_workouts: usize,
    pub total_workout_minutes: f64,
    pub total_calories_burned: f64,
    pub days_on_calorie_goal: usize,
    pub weigh_ins: Vec<WeighIn>,
    pub weight_change_kg: Option<f64>,
    pub streak_days: u32,
}

/// `value / goal` as a whole percentage clamped to [0, 100]; a goal of 0 gives 0
pub fn goal_percent(value: f64, goal: f64) -> u32 {
    if !(goal > 0.0) || !value.is_finite() {
        return 0;
    }
    (value / goal * 100.0).clamp(0.0, 100.0).round() as u32
}

fn goal_progress(nutrition: &NutritionTotals, workouts: &WorkoutTotals, goals: &DailyGoals) -> GoalProgress {
    GoalProgress {
        calories: goal_percent(nutrition.calories, goals.calorie_goal),
        protein: goal_percent(nutrition.protein, goals.protein_goal),
        carbs: goal_percent(nutrition.carbs, goals.carbs_goal),
        fat: goal_percent(nutrition.fat, goals.fat_goal),
        workouts: goal_percent(workouts.count as f64, goals.workout_goal as f64),
    }
}

fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| format!("Invalid date '{}': {}", date, e))
}

/// Consecutive days ending at `date` with at least one meal or workout
///
/// A day without activity at `date` itself means a streak of 0.
pub fn compute_streak(active_dates: &BTreeSet<NaiveDate>, date: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = date;
    while active_dates.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

fn active_dates(conn: &Connection, date: &str) -> DbResult<BTreeSet<NaiveDate>> {
    let mut dates = Meal::dates_up_to(conn, date)?;
    dates.extend(Workout::dates_up_to(conn, date)?);

    Ok(dates
        .iter()
        .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .collect())
}

// ============================================================================
// Progress Tools
// ============================================================================

/// Totals, goal progress and streak for one day
pub fn get_daily_summary(db: &Database, date: Option<&str>) -> Result<DailySummary, String> {
    let date = resolve_date(date)?;
    let day = parse_date(&date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meals = Meal::list_for_date(&conn, &date).map_err(|e| format!("Failed to get meals: {}", e))?;
    let workouts =
        Workout::list_for_date(&conn, &date).map_err(|e| format!("Failed to get workouts: {}", e))?;
    let profile = UserProfile::get(&conn).map_err(|e| format!("Failed to get profile: {}", e))?;
    let active = active_dates(&conn, &date).map_err(|e| format!("Failed to compute streak: {}", e))?;

    let nutrition = aggregate(&meals);
    let workout_totals = aggregate_workouts(&workouts);
    let goals = profile.goals;

    Ok(DailySummary {
        goal_progress: goal_progress(&nutrition, &workout_totals, &goals),
        calories_remaining: round_calories((goals.calorie_goal - nutrition.calories).max(0.0)),
        streak_days: compute_streak(&active, day),
        nutrition: nutrition.rounded(),
        meal_count: meals.len(),
        workouts: workout_totals,
        goals,
        date,
    })
}

/// Day-by-day history for the `days` days ending at `end_date`
pub fn get_progress(
    db: &Database,
    end_date: Option<&str>,
    days: Option<u32>,
) -> Result<ProgressResponse, String> {
    let days = days.unwrap_or(DEFAULT_PROGRESS_DAYS);
    if days == 0 || days > MAX_PROGRESS_DAYS {
        return Err(format!("days must be between 1 and {}", MAX_PROGRESS_DAYS));
    }

    let end_date = resolve_date(end_date)?;
    let end = parse_date(&end_date)?;
    let start = end
        .checked_sub_signed(Duration::days(i64::from(days) - 1))
        .ok_or_else(|| "Date range out of bounds".to_string())?;
    let start_date = start.format("%Y-%m-%d").to_string();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let nutrition_by_day: HashMap<String, NutritionTotals> = Meal::daily_totals(&conn, &start_date, &end_date)
        .map_err(|e| format!("Failed to get meals: {}", e))?
        .into_iter()
        .collect();
    let workouts = Workout::list_range(&conn, &start_date, &end_date)
        .map_err(|e| format!("Failed to get workouts: {}", e))?;
    let weigh_ins = WeighIn::list_range(&conn, &start_date, &end_date)
        .map_err(|e| format!("Failed to get weigh-ins: {}", e))?;
    let goals = UserProfile::get(&conn)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .goals;
    let active = active_dates(&conn, &end_date).map_err(|e| format!("Failed to compute streak: {}", e))?;

    let history: Vec<DayProgress> = start
        .iter_days()
        .take(days as usize)
        .map(|day| {
            let date = day.format("%Y-%m-%d").to_string();
            let nutrition = nutrition_by_day.get(&date).copied().unwrap_or_default();
            let activity = aggregate_workouts(workouts.iter().filter(|w| w.date == date));
            DayProgress {
                calories: round_calories(nutrition.calories),
                protein: round_macro(nutrition.protein),
                carbs: round_macro(nutrition.carbs),
                fat: round_macro(nutrition.fat),
                workout_count: activity.count,
                workout_minutes: activity.duration_minutes,
                calories_burned: round_calories(activity.calories_burned),
                date,
            }
        })
        .collect();

    let total = aggregate(nutrition_by_day.values());
    let workout_totals = aggregate_workouts(&workouts);
    let days_on_calorie_goal = history
        .iter()
        .filter(|d| d.calories > 0.0 && goal_percent(d.calories, goals.calorie_goal) >= 100)
        .count();
    let weight_change_kg = match (weigh_ins.first(), weigh_ins.last()) {
        (Some(first), Some(last)) if weigh_ins.len() > 1 => Some(round_macro(last.weight_kg - first.weight_kg)),
        _ => None,
    };

    Ok(ProgressResponse {
        average_calories: round_calories(total.calories / f64::from(days)),
        average_protein: round_macro(total.protein / f64::from(days)),
        total_workouts: workout_totals.count,
        total_workout_minutes: workout_totals.duration_minutes,
        total_calories_burned: round_calories(workout_totals.calories_burned),
        days_on_calorie_goal,
        weigh_ins,
        weight_change_kg,
        streak_days: compute_streak(&active, end),
        days: history,
        start_date,
        end_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::meals::{log_manual_meal, ManualMealInput};
    use crate::tools::test_db;
    use crate::tools::workouts::log_workout;

    fn meal(db: &Database, date: &str, calories: &str, protein: &str) {
        log_manual_meal(
            db,
            &ManualMealInput {
                name: "Meal".to_string(),
                calories: calories.to_string(),
                protein: Some(protein.to_string()),
                date: Some(date.to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_goal_percent() {
        assert_eq!(goal_percent(1000.0, 2000.0), 50);
        assert_eq!(goal_percent(2600.0, 2000.0), 100);
        assert_eq!(goal_percent(-10.0, 2000.0), 0);
        assert_eq!(goal_percent(500.0, 0.0), 0);
        assert_eq!(goal_percent(1.0, 3.0), 33);
    }

    #[test]
    fn test_streak() {
        let active: BTreeSet<NaiveDate> = ["2026-01-08", "2026-01-09", "2026-01-10", "2026-01-05"]
            .iter()
            .map(|d| date(d))
            .collect();
        assert_eq!(compute_streak(&active, date("2026-01-10")), 3);
        assert_eq!(compute_streak(&active, date("2026-01-11")), 0);
        assert_eq!(compute_streak(&active, date("2026-01-05")), 1);
    }

    #[test]
    fn test_daily_summary() {
        let db = test_db();
        meal(&db, "2026-01-09", "500", "20");
        meal(&db, "2026-01-10", "600", "45");
        meal(&db, "2026-01-10", "400", "30");
        log_workout(&db, "Running", "30", Some("2026-01-10")).unwrap();

        let summary = get_daily_summary(&db, Some("2026-01-10")).unwrap();
        assert_eq!(summary.meal_count, 2);
        assert_eq!(summary.nutrition.calories, 1000.0);
        assert_eq!(summary.goal_progress.calories, 50);
        assert_eq!(summary.goal_progress.protein, 50);
        assert_eq!(summary.goal_progress.workouts, 100);
        assert_eq!(summary.calories_remaining, 1000.0);
        assert_eq!(summary.workouts.calories_burned, 300.0);
        assert_eq!(summary.streak_days, 2);
    }

    #[test]
    fn test_empty_day() {
        let db = test_db();
        let summary = get_daily_summary(&db, Some("2026-01-10")).unwrap();
        assert_eq!(summary.nutrition, NutritionTotals::zero());
        assert_eq!(summary.goal_progress.calories, 0);
        assert_eq!(summary.streak_days, 0);
    }

    #[test]
    fn test_progress_history() {
        let db = test_db();
        meal(&db, "2026-01-04", "2100", "100");
        meal(&db, "2026-01-10", "1400", "90");
        meal(&db, "2026-01-02", "9999", "1");
        log_workout(&db, "Walking", "40", Some("2026-01-07")).unwrap();
        {
            let conn = db.get_conn().unwrap();
            WeighIn::upsert(&conn, "2026-01-04", 80.0).unwrap();
            WeighIn::upsert(&conn, "2026-01-10", 79.2).unwrap();
        }

        let progress = get_progress(&db, Some("2026-01-10"), None).unwrap();
        assert_eq!(progress.start_date, "2026-01-04");
        assert_eq!(progress.days.len(), 7);
        assert_eq!(progress.days[0].calories, 2100.0);
        assert_eq!(progress.days[3].calories_burned, 200.0);
        assert_eq!(progress.average_calories, 500.0);
        assert_eq!(progress.total_workouts, 1);
        assert_eq!(progress.days_on_calorie_goal, 1);
        assert_eq!(progress.weigh_ins.len(), 2);
        assert_eq!(progress.weight_change_kg, Some(-0.8));
        assert_eq!(progress.streak_days, 1);

        assert!(get_progress(&db, Some("2026-01-10"), Some(0)).is_err());
    }

    #[test]
    fn test_progress_window_before_earliest_date() {
        let db = test_db();
        let earliest = NaiveDate::MIN.format("%Y-%m-%d").to_string();

        let err = get_progress(&db, Some(&earliest), Some(7)).unwrap_err();
        assert_eq!(err, "Date range out of bounds");

        let single = get_progress(&db, Some(&earliest), Some(1)).unwrap();
        assert_eq!(single.days.len(), 1);
    }
}
