//! Weigh-in model
//!
//! Body weight, at most one reading per day.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeighIn {
    pub id: i64,
    pub date: String,
    pub weight_kg: f64,
    pub updated_at: String,
}

impl WeighIn {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            weight_kg: row.get("weight_kg")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Record the weight for a date, replacing any earlier reading that day
    pub fn upsert(conn: &Connection, date: &str, weight_kg: f64) -> DbResult<Self> {
        if !(weight_kg.is_finite() && weight_kg > 0.0) {
            return Err(DbError::Validation("Weight must be greater than 0".to_string()));
        }

        conn.execute(
            r#"
            INSERT INTO weigh_ins (date, weight_kg)
            VALUES (?1, ?2)
            ON CONFLICT(date) DO UPDATE SET
                weight_kg = excluded.weight_kg,
                updated_at = datetime('now')
            "#,
            params![date, weight_kg],
        )?;

        let mut stmt = conn.prepare("SELECT * FROM weigh_ins WHERE date = ?1")?;
        Ok(stmt.query_row([date], Self::from_row)?)
    }

    /// Readings in an inclusive date range, oldest first
    pub fn list_range(conn: &Connection, start_date: &str, end_date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn
            .prepare("SELECT * FROM weigh_ins WHERE date >= ?1 AND date <= ?2 ORDER BY date")?;
        let readings = stmt
            .query_map([start_date, end_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(readings)
    }

    /// Most recent reading, optionally only those on or before a date
    pub fn latest(conn: &Connection, on_or_before: Option<&str>) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM weigh_ins WHERE ?1 IS NULL OR date <= ?1 ORDER BY date DESC LIMIT 1",
        )?;

        let result = stmt.query_row([on_or_before], Self::from_row);
        match result {
            Ok(reading) => Ok(Some(reading)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn db() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn)).unwrap();
        db
    }

    #[test]
    fn test_upsert_replaces_same_day() {
        let db = db();
        db.with_conn(|conn| {
            WeighIn::upsert(conn, "2026-01-10", 80.0)?;
            let second = WeighIn::upsert(conn, "2026-01-10", 79.4)?;
            assert_eq!(second.weight_kg, 79.4);

            WeighIn::upsert(conn, "2026-01-12", 79.0)?;
            let readings = WeighIn::list_range(conn, "2026-01-01", "2026-01-31")?;
            assert_eq!(readings.len(), 2);

            let latest = WeighIn::latest(conn, Some("2026-01-11"))?.unwrap();
            assert_eq!(latest.date, "2026-01-10");
            assert_eq!(WeighIn::latest(conn, None)?.unwrap().date, "2026-01-12");
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_non_positive_rejected() {
        let db = db();
        for weight in [0.0, -5.0, f64::NAN] {
            let err = db.with_conn(|conn| WeighIn::upsert(conn, "2026-01-10", weight)).unwrap_err();
            assert!(matches!(err, DbError::Validation(_)));
        }
    }
}
