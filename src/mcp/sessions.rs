//! Open food confirmation sessions
//!
//! Sessions live in memory only; ids increase monotonically and are never
//! reused while the server runs. At most `MAX_OPEN_SESSIONS` are kept, and
//! opening one more drops the oldest.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::confirmation::{ConfirmationState, FoodConfirmation};
use crate::models::{FoodItem, NutritionTotals};

/// One food item as shown to the user
#[derive(Debug, Serialize)]
pub struct ItemView {
    pub index: usize,
    #[serde(flatten)]
    pub item: FoodItem,
    pub confidence_percent: u32,
}

/// A session as returned by the confirmation tools
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: u64,
    pub state: ConfirmationState,
    pub image_uri: Option<String>,
    pub items: Vec<ItemView>,
    /// Rounded for display
    pub totals: NutritionTotals,
}

impl SessionView {
    pub fn new(session_id: u64, session: &FoodConfirmation) -> Self {
        Self {
            session_id,
            state: session.state(),
            image_uri: session.image_uri().map(str::to_string),
            items: session
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| ItemView {
                    index,
                    item: item.clone(),
                    confidence_percent: item.confidence_percent(),
                })
                .collect(),
            totals: session.totals().rounded(),
        }
    }
}

pub const MAX_OPEN_SESSIONS: usize = 8;

#[derive(Debug, Default)]
pub struct ConfirmationSessions {
    next_id: u64,
    open: HashMap<u64, FoodConfirmation>,
}

impl ConfirmationSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session and return its id
    pub fn open(&mut self, session: FoodConfirmation) -> u64 {
        while self.open.len() >= MAX_OPEN_SESSIONS {
            let Some(oldest) = self.open.keys().min().copied() else {
                break;
            };
            self.open.remove(&oldest);
            warn!(session_id = oldest, "too many open food confirmations, dropped the oldest");
        }

        self.next_id += 1;
        self.open.insert(self.next_id, session);
        self.next_id
    }

    pub fn get(&self, id: u64) -> Result<&FoodConfirmation, String> {
        self.open.get(&id).ok_or_else(|| not_found(id))
    }

    pub fn get_mut(&mut self, id: u64) -> Result<&mut FoodConfirmation, String> {
        self.open.get_mut(&id).ok_or_else(|| not_found(id))
    }

    /// Remove a session so it can be confirmed or cancelled
    pub fn take(&mut self, id: u64) -> Result<FoodConfirmation, String> {
        self.open.remove(&id).ok_or_else(|| not_found(id))
    }

    /// Put a session back under its old id, e.g. after a failed save
    pub fn restore(&mut self, id: u64, session: FoodConfirmation) {
        self.open.insert(id, session);
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

fn not_found(id: u64) -> String {
    format!("Food confirmation {} not found (it may have been confirmed or cancelled)", id)
}
