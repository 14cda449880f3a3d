//! Checklist MCP Tools

use serde::Serialize;
use tracing::info;

use super::{resolve_date, DeleteResponse};
use crate::db::Database;
use crate::models::{completion_percent, ChecklistItem};

/// Response for get_checklist
#[derive(Debug, Serialize)]
pub struct ChecklistResponse {
    pub date: String,
    pub items: Vec<ChecklistItem>,
    pub completed: usize,
    pub completion_percent: u32,
}

pub fn get_checklist(db: &Database, date: Option<&str>) -> Result<ChecklistResponse, String> {
    let date = resolve_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let items = ChecklistItem::list_for_date(&conn, &date)
        .map_err(|e| format!("Failed to get checklist: {}", e))?;

    Ok(ChecklistResponse {
        completed: items.iter().filter(|i| i.completed).count(),
        completion_percent: completion_percent(&items),
        items,
        date,
    })
}

pub fn add_checklist_item(db: &Database, label: &str, date: Option<&str>) -> Result<ChecklistItem, String> {
    let date = resolve_date(date)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let item = ChecklistItem::create(&conn, &date, label)
        .map_err(|e| format!("Failed to add checklist item: {}", e))?;

    info!(item_id = item.id, date = %item.date, "checklist item added");
    Ok(item)
}

pub fn toggle_checklist_item(db: &Database, id: i64) -> Result<ChecklistItem, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    ChecklistItem::toggle(&conn, id)
        .map_err(|e| format!("Failed to toggle checklist item: {}", e))?
        .ok_or_else(|| format!("Checklist item {} not found", id))
}

pub fn delete_checklist_item(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = ChecklistItem::delete(&conn, id)
        .map_err(|e| format!("Failed to delete checklist item: {}", e))?;
    if !deleted {
        return Err(format!("Checklist item {} not found", id));
    }

    Ok(DeleteResponse { id, deleted })
}
