//! Food Item model
//!
//! One AI-estimated (or user-adjusted) component of a photographed meal.

use serde::{Deserialize, Serialize};

use super::{MacroSource, NutritionTotals};

/// A food item as returned by the food analysis function
///
/// Nutrition values describe exactly `portion_size_grams` grams of the food,
/// as of the last portion rescale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub portion_size_grams: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// AI confidence in [0, 1], display only
    #[serde(default)]
    pub confidence: f64,
}

impl FoodItem {
    /// Confidence as a whole percentage for display
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    /// Check the values against the model: a positive portion, non-negative
    /// nutrition and a confidence in [0, 1]
    pub fn check(&self) -> Result<(), String> {
        if !(self.portion_size_grams.is_finite() && self.portion_size_grams > 0.0) {
            return Err(format!("portion size must be greater than 0, got {}", self.portion_size_grams));
        }
        for (field, value) in [
            (FoodField::Calories, self.calories),
            (FoodField::Protein, self.protein),
            (FoodField::Carbs, self.carbs),
            (FoodField::Fat, self.fat),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("{} must not be negative, got {}", field.as_str(), value));
            }
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence must be between 0 and 1, got {}", self.confidence));
        }
        Ok(())
    }
}

impl MacroSource for FoodItem {
    fn macros(&self) -> NutritionTotals {
        NutritionTotals::new(self.calories, self.protein, self.carbs, self.fat)
    }
}

/// Editable field of a food item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodField {
    Name,
    PortionSizeGrams,
    Calories,
    Protein,
    Carbs,
    Fat,
}

impl FoodField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodField::Name => "name",
            FoodField::PortionSizeGrams => "portion_size_grams",
            FoodField::Calories => "calories",
            FoodField::Protein => "protein",
            FoodField::Carbs => "carbs",
            FoodField::Fat => "fat",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(FoodField::Name),
            "portion_size_grams" | "portion" | "portion_size" | "grams" => {
                Some(FoodField::PortionSizeGrams)
            }
            "calories" | "kcal" => Some(FoodField::Calories),
            "protein" => Some(FoodField::Protein),
            "carbs" => Some(FoodField::Carbs),
            "fat" => Some(FoodField::Fat),
            _ => None,
        }
    }
}
