//! Data models
//!
//! Rust structs for food items and the persisted tracker records.

mod checklist;
mod food_item;
mod meal;
mod nutrition;
mod profile;
mod weigh_in;
mod workout;

pub use checklist::{completion_percent, ChecklistItem};
pub use food_item::{FoodField, FoodItem};
pub use meal::{Meal, MealCreate, MealSource, MealType};
pub use nutrition::{MacroSource, NutritionTotals};
pub use profile::{DailyGoals, ProfileUpdate, UserProfile};
pub use weigh_in::WeighIn;
pub use workout::{estimate_calories_burned, Workout, WorkoutCreate, WorkoutType, WORKOUT_TYPES};
