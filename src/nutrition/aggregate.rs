//! Nutrition and workout aggregation
//!
//! Plain sums; rounding is left to whoever displays the result.

use serde::Serialize;

use crate::models::{MacroSource, NutritionTotals, Workout};

/// Sum calories and macros over any sequence of records
///
/// An empty sequence yields all-zero totals.
pub fn aggregate<I>(items: I) -> NutritionTotals
where
    I: IntoIterator,
    I::Item: MacroSource,
{
    items.into_iter().map(|item| item.macros()).sum()
}

/// Summed workout activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WorkoutTotals {
    pub count: usize,
    pub duration_minutes: f64,
    pub calories_burned: f64,
}

/// Sum duration and calories burned over a set of workouts
pub fn aggregate_workouts<'a, I>(workouts: I) -> WorkoutTotals
where
    I: IntoIterator<Item = &'a Workout>,
{
    workouts.into_iter().fold(WorkoutTotals::default(), |acc, w| WorkoutTotals {
        count: acc.count + 1,
        duration_minutes: acc.duration_minutes + w.duration_minutes,
        calories_burned: acc.calories_burned + w.calories_burned,
    })
}
