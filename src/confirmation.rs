//! Food confirmation workflow
//!
//! Holds the editable list of AI-estimated foods for one photographed meal
//! between analysis and save. A session starts in `Editing`; `confirm` and
//! `cancel` consume it, so nothing can touch the list afterwards.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{FoodField, FoodItem, NutritionTotals};
use crate::nutrition::{aggregate, rescale_portion};

/// Advisory shown when the user tries to remove the only remaining food
pub const LAST_ITEM_WARNING: &str = "You must have at least one food item.";

/// Workflow error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    #[error("{}", LAST_ITEM_WARNING)]
    LastItem,

    #[error("Food item index {index} out of range (meal has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No food detected in the photo")]
    NoFoods,

    #[error("Food item {index} is invalid: {reason}")]
    InvalidItem { index: usize, reason: String },
}

/// Lifecycle state of a confirmation session
///
/// A live session is always `Editing`. The terminal states are reached by
/// `FoodConfirmation::confirm` and `FoodConfirmation::cancel`, which consume
/// the session and report the state they end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationState {
    Editing,
    Confirmed,
    Cancelled,
}

/// Remove the item at `index`, refusing to empty the list
pub fn remove_item(items: &[FoodItem], index: usize) -> Result<Vec<FoodItem>, WorkflowError> {
    if index >= items.len() {
        return Err(WorkflowError::IndexOutOfRange { index, len: items.len() });
    }
    if items.len() == 1 {
        return Err(WorkflowError::LastItem);
    }

    let mut remaining = items.to_vec();
    remaining.remove(index);
    Ok(remaining)
}

/// Hand the confirmed items to the caller
pub fn confirm(items: Vec<FoodItem>) -> Vec<FoodItem> {
    items
}

/// Discard the items; nothing is persisted
pub fn cancel(items: Vec<FoodItem>) {
    drop(items);
}

/// An in-progress meal submission
#[derive(Debug, Clone, Serialize)]
pub struct FoodConfirmation {
    items: Vec<FoodItem>,
    image_uri: Option<String>,
}

impl FoodConfirmation {
    /// Open a session with the foods returned by analysis
    pub fn new(items: Vec<FoodItem>, image_uri: Option<String>) -> Result<Self, WorkflowError> {
        if items.is_empty() {
            return Err(WorkflowError::NoFoods);
        }
        for (index, item) in items.iter().enumerate() {
            item.check()
                .map_err(|reason| WorkflowError::InvalidItem { index, reason })?;
        }
        debug!(items = items.len(), "food confirmation opened");
        Ok(Self { items, image_uri })
    }

    pub fn state(&self) -> ConfirmationState {
        ConfirmationState::Editing
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn image_uri(&self) -> Option<&str> {
        self.image_uri.as_deref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: a session never holds an empty list
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Running totals for display
    pub fn totals(&self) -> NutritionTotals {
        aggregate(&self.items)
    }

    /// Apply a raw text edit to one item's field
    pub fn edit(&mut self, index: usize, field: FoodField, raw: &str) -> Result<&FoodItem, WorkflowError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(WorkflowError::IndexOutOfRange { index, len })?;
        *item = rescale_portion(item, field, raw);
        debug!(index, field = field.as_str(), "food item edited");
        Ok(&self.items[index])
    }

    /// Remove one item; the last remaining item cannot be removed
    pub fn remove_item(&mut self, index: usize) -> Result<(), WorkflowError> {
        self.items = remove_item(&self.items, index)?;
        debug!(index, remaining = self.items.len(), "food item removed");
        Ok(())
    }

    /// Finish editing and hand the list over for persistence
    pub fn confirm(self) -> (ConfirmationState, Vec<FoodItem>) {
        info!(items = self.items.len(), "food confirmation confirmed");
        (ConfirmationState::Confirmed, confirm(self.items))
    }

    /// Abandon the session
    pub fn cancel(self) -> ConfirmationState {
        info!(items = self.items.len(), "food confirmation cancelled");
        cancel(self.items);
        ConfirmationState::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, calories: f64) -> FoodItem {
        FoodItem {
            name: name.to_string(),
            portion_size_grams: 100.0,
            calories,
            protein: 10.0,
            carbs: 10.0,
            fat: 5.0,
            confidence: 0.8,
        }
    }

    #[test]
    fn test_empty_analysis_rejected() {
        assert_eq!(FoodConfirmation::new(Vec::new(), None).unwrap_err(), WorkflowError::NoFoods);
    }

    #[test]
    fn test_invalid_items_rejected() {
        let mut negative = item("Soup", -400.0);
        negative.portion_size_grams = -200.0;
        negative.confidence = 7.5;
        assert!(matches!(
            FoodConfirmation::new(vec![item("Rice", 200.0), negative], None),
            Err(WorkflowError::InvalidItem { index: 1, .. })
        ));

        let mut no_portion = item("Rice", 200.0);
        no_portion.portion_size_grams = 0.0;
        assert!(FoodConfirmation::new(vec![no_portion], None).is_err());

        let mut bad_fat = item("Rice", 200.0);
        bad_fat.fat = f64::NAN;
        let err = FoodConfirmation::new(vec![bad_fat], None).unwrap_err();
        assert!(err.to_string().starts_with("Food item 0 is invalid: fat"));

        let mut sure = item("Rice", 200.0);
        sure.confidence = 1.0;
        assert!(FoodConfirmation::new(vec![sure], None).is_ok());
    }

    #[test]
    fn test_cancel_ends_cancelled() {
        let session = FoodConfirmation::new(vec![item("Rice", 200.0)], None).unwrap();
        assert_eq!(session.cancel(), ConfirmationState::Cancelled);
    }

    #[test]
    fn test_remove_from_two_items() {
        let items = vec![item("Rice", 200.0), item("Beans", 150.0)];
        let remaining = remove_item(&items, 0).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Beans");
    }

    #[test]
    fn test_remove_last_item_rejected() {
        let mut session = FoodConfirmation::new(vec![item("Rice", 200.0)], None).unwrap();
        let err = session.remove_item(0).unwrap_err();
        assert_eq!(err, WorkflowError::LastItem);
        assert_eq!(err.to_string(), LAST_ITEM_WARNING);
        assert_eq!(session.len(), 1);
        assert_eq!(session.items()[0].name, "Rice");
        assert_eq!(session.state(), ConfirmationState::Editing);
    }

    #[test]
    fn test_remove_out_of_range() {
        let items = vec![item("Rice", 200.0), item("Beans", 150.0)];
        assert_eq!(
            remove_item(&items, 5).unwrap_err(),
            WorkflowError::IndexOutOfRange { index: 5, len: 2 }
        );
    }

    #[test]
    fn test_edit_updates_totals() {
        let mut session =
            FoodConfirmation::new(vec![item("Chicken", 400.0), item("Bread", 150.0)], None).unwrap();
        assert_eq!(session.totals().calories, 550.0);

        let edited = session.edit(0, FoodField::PortionSizeGrams, "50").unwrap();
        assert_eq!(edited.calories, 200.0);
        assert_eq!(edited.protein, 5.0);
        assert_eq!(session.totals().calories, 350.0);
        assert_eq!(session.totals().protein, 15.0);
    }

    #[test]
    fn test_edit_bad_index() {
        let mut session = FoodConfirmation::new(vec![item("Rice", 200.0)], None).unwrap();
        assert!(matches!(
            session.edit(3, FoodField::Calories, "10"),
            Err(WorkflowError::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_confirm_hands_over_current_items() {
        let mut session = FoodConfirmation::new(
            vec![item("Rice", 200.0), item("Beans", 150.0)],
            Some("file:///tmp/meal.jpg".to_string()),
        )
        .unwrap();
        session.edit(1, FoodField::Name, "Black Beans").unwrap();
        session.remove_item(0).unwrap();
        assert_eq!(session.image_uri(), Some("file:///tmp/meal.jpg"));

        let (state, confirmed) = session.confirm();
        assert_eq!(state, ConfirmationState::Confirmed);
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].name, "Black Beans");
    }
}
