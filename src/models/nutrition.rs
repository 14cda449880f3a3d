//! Shared nutrition totals
//!
//! Used across food items, meals, and daily summaries.

use serde::{Deserialize, Serialize};

/// Calories and macronutrients, summed over any set of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64, // grams
    pub carbs: f64,   // grams
    pub fat: f64,     // grams
}

impl NutritionTotals {
    /// Create a new NutritionTotals with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self { calories, protein, carbs, fat }
    }

    /// Add another set of totals to this one
    pub fn add(&self, other: &NutritionTotals) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }

    /// Rounded copy for display: integer calories, one-decimal macros
    pub fn rounded(&self) -> Self {
        Self {
            calories: crate::nutrition::round_calories(self.calories),
            protein: crate::nutrition::round_macro(self.protein),
            carbs: crate::nutrition::round_macro(self.carbs),
            fat: crate::nutrition::round_macro(self.fat),
        }
    }
}

impl std::ops::Add for NutritionTotals {
    type Output = NutritionTotals;

    fn add(self, other: NutritionTotals) -> NutritionTotals {
        NutritionTotals::add(&self, &other)
    }
}

impl std::iter::Sum for NutritionTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutritionTotals::zero(), |acc, n| acc + n)
    }
}

/// Anything that carries calories and macros
pub trait MacroSource {
    fn macros(&self) -> NutritionTotals;
}

impl MacroSource for NutritionTotals {
    fn macros(&self) -> NutritionTotals {
        *self
    }
}

impl<T: MacroSource + ?Sized> MacroSource for &T {
    fn macros(&self) -> NutritionTotals {
        (**self).macros()
    }
}
