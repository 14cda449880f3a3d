//! Portion rescaling
//!
//! Applies a single field edit to a food item. Editing the portion size
//! rescales calories and macros proportionally; editing any other numeric
//! field overrides just that field.

use tracing::warn;

use super::parse::parse_or_zero;
use crate::models::{FoodField, FoodItem};

/// Round calories to a whole number
pub fn round_calories(value: f64) -> f64 {
    value.round()
}

/// Round a macro (grams) to one decimal place
pub fn round_macro(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Apply a raw text edit to one field of a food item
///
/// Numeric input goes through `parse_or_zero`; negative results clamp to 0.
/// If the current portion is 0 no ratio exists, so the nutrition values are
/// kept as-is and only the portion changes.
pub fn rescale_portion(item: &FoodItem, field: FoodField, raw: &str) -> FoodItem {
    let mut updated = item.clone();
    let numeric = || parse_or_zero(raw).max(0.0);

    match field {
        FoodField::Name => updated.name = raw.to_string(),
        FoodField::PortionSizeGrams => {
            let value = numeric();
            let old = item.portion_size_grams;
            if old > 0.0 && old.is_finite() {
                let ratio = value / old;
                updated.calories = round_calories(item.calories * ratio);
                updated.protein = round_macro(item.protein * ratio);
                updated.carbs = round_macro(item.carbs * ratio);
                updated.fat = round_macro(item.fat * ratio);
            } else {
                warn!(
                    food = %item.name,
                    old_portion = old,
                    new_portion = value,
                    "portion has no usable baseline; keeping nutrition unchanged"
                );
            }
            updated.portion_size_grams = value;
        }
        FoodField::Calories => updated.calories = numeric(),
        FoodField::Protein => updated.protein = numeric(),
        FoodField::Carbs => updated.carbs = numeric(),
        FoodField::Fat => updated.fat = numeric(),
    }

    updated
}
