//! Daily checklist model

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: i64,
    pub date: String,
    pub label: String,
    pub completed: bool,
    pub created_at: String,
}

impl ChecklistItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            label: row.get("label")?,
            completed: row.get::<_, i64>("completed")? != 0,
            created_at: row.get("created_at")?,
        })
    }

    /// Add an unchecked item for a date
    pub fn create(conn: &Connection, date: &str, label: &str) -> DbResult<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Err(DbError::Validation("Checklist item label is required".to_string()));
        }

        conn.execute(
            "INSERT INTO checklist_items (date, label) VALUES (?1, ?2)",
            params![date, label],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM checklist_items WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM checklist_items WHERE date = ?1 ORDER BY id")?;
        let items = stmt
            .query_map([date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Flip the completed flag; `None` if the item does not exist
    pub fn toggle(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let rows = conn.execute(
            "UPDATE checklist_items SET completed = 1 - completed WHERE id = ?1",
            [id],
        )?;
        if rows == 0 {
            return Ok(None);
        }
        Self::get_by_id(conn, id)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM checklist_items WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

/// Share of completed items as a whole percentage, 0 for an empty list
pub fn completion_percent(items: &[ChecklistItem]) -> u32 {
    if items.is_empty() {
        return 0;
    }
    let done = items.iter().filter(|i| i.completed).count();
    ((done as f64 / items.len() as f64) * 100.0).round() as u32
}
