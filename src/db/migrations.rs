//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USER PROFILE
        -- Single row (id = 1) with personal data and daily goals
        -- ============================================
        CREATE TABLE user_profile (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            name TEXT NOT NULL DEFAULT '',
            age INTEGER NOT NULL DEFAULT 0,
            height_cm REAL NOT NULL DEFAULT 0,
            weight_kg REAL NOT NULL DEFAULT 0,
            goal TEXT NOT NULL DEFAULT '',

            calorie_goal REAL NOT NULL DEFAULT 2000,
            protein_goal REAL NOT NULL DEFAULT 150,  -- grams
            carbs_goal REAL NOT NULL DEFAULT 200,    -- grams
            fat_goal REAL NOT NULL DEFAULT 65,       -- grams
            workout_goal INTEGER NOT NULL DEFAULT 1, -- workouts per day

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- MEALS
        -- Nutrition is stored as logged; photo meals also keep their items
        -- ============================================
        CREATE TABLE meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,                  -- ISO date: "2026-01-10"
            name TEXT NOT NULL,
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack', 'unspecified')),

            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,

            source TEXT NOT NULL CHECK(source IN ('manual', 'photo')),
            photo_uri TEXT,

            logged_at TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meals_date ON meals(date);

        CREATE TABLE meal_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            meal_id INTEGER NOT NULL REFERENCES meals(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            portion_size_grams REAL NOT NULL DEFAULT 0,
            calories REAL NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,
            confidence REAL NOT NULL DEFAULT 0,

            UNIQUE(meal_id, position)
        );

        CREATE INDEX idx_meal_items_meal ON meal_items(meal_id);

        -- ============================================
        -- WORKOUTS
        -- ============================================
        CREATE TABLE workouts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            workout_type TEXT NOT NULL,
            duration_minutes REAL NOT NULL,
            calories_burned REAL NOT NULL DEFAULT 0,
            logged_at TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_workouts_date ON workouts(date);

        -- ============================================
        -- DAILY CHECKLIST
        -- ============================================
        CREATE TABLE checklist_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            label TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0, -- boolean
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_checklist_items_date ON checklist_items(date);

        -- ============================================
        -- WEIGH-INS
        -- At most one per day
        -- ============================================
        CREATE TABLE weigh_ins (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL UNIQUE,
            weight_kg REAL NOT NULL CHECK(weight_kg > 0),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
