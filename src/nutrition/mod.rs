//! Nutrition calculation module
//!
//! Handles lenient numeric parsing, portion rescaling and aggregation.

pub mod aggregate;
pub mod parse;
pub mod rescale;

pub use aggregate::{aggregate, aggregate_workouts, WorkoutTotals};
pub use parse::{parse_int_or_zero, parse_or_zero};
pub use rescale::{rescale_portion, round_calories, round_macro};
