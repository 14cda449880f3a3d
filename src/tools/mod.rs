//! FitAI Tools module
//!
//! Operations behind the MCP tools. Each returns a serializable response or a
//! readable error message.

pub mod checklist;
pub mod meals;
pub mod profile;
pub mod progress;
pub mod status;
pub mod workouts;

use chrono::{NaiveDate, Utc};
use serde::Serialize;

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: i64,
    pub deleted: bool,
}

/// Today's date (UTC) as `YYYY-MM-DD`
pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Validate an optional ISO date, defaulting to today
pub fn resolve_date(date: Option<&str>) -> Result<String, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(today()),
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map(|parsed| parsed.format("%Y-%m-%d").to_string())
            .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", d)),
    }
}

#[cfg(test)]
pub(crate) fn test_db() -> crate::db::Database {
    let db = crate::db::Database::in_memory().unwrap();
    db.with_conn(|conn| crate::db::migrations::run_migrations(conn)).unwrap();
    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_date() {
        assert_eq!(resolve_date(Some("2026-01-10")).unwrap(), "2026-01-10");
        assert_eq!(resolve_date(Some(" ")).unwrap(), today());
        assert_eq!(resolve_date(None).unwrap(), today());
        assert!(resolve_date(Some("10/01/2026")).is_err());
        assert!(resolve_date(Some("2026-02-30")).is_err());
    }
}
