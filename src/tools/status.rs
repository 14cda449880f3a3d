//! FitAI Status Tool
//!
//! Runtime status of the service plus the usage guide for assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// How to log meals and workouts with the FitAI tools
pub const USAGE_INSTRUCTIONS: &str = r#"
# FitAI Tracker

## Dates

Every date is an ISO date (`YYYY-MM-DD`). Tools that take an optional date
default to today (UTC).

## Logging a meal from a photo

1. `analyze_meal_photo` with a local image path. The detected foods open a
   confirmation session; the response carries its `session_id`.
2. Review the items with `get_food_confirmation`.
3. Fix estimates with `edit_food_item`:
   - editing `portion_size_grams` rescales calories and macros in proportion
     (200 g -> 100 g halves everything)
   - editing `calories`, `protein`, `carbs` or `fat` changes only that value
   - numeric text is read up to the first non-numeric character ("150g" is
     150); unreadable text counts as 0
4. Drop wrong detections with `remove_food_item`. The last item cannot be
   removed.
5. `confirm_food_confirmation` saves the meal (name = item names, nutrition =
   sum of items). `cancel_food_confirmation` discards it.

If the analysis is already known, `start_food_confirmation` opens a session
from a list of foods directly.

## Logging by hand

- `log_meal`: name and calories are required; protein/carbs/fat optional.
- `log_workout`: pick a type from `list_workout_types` and a duration in
  minutes; calories burned are estimated from the type's rate.

## Progress

- `get_daily_summary`: totals, goal progress and streak for a day.
- `get_progress`: day-by-day history, 7 days by default.
- `get_checklist`, `add_checklist_item`, `toggle_checklist_item`.
- `log_weight`: one weigh-in per day; logging again replaces it.

## AI generation

`generate_workout_routine` and `generate_content` need the functions URL and
key to be configured. `get_request_status` reports the latest state of each
AI request.
"#;

/// Runtime status of the FitAI service
#[derive(Debug, Clone, Serialize)]
pub struct FitaiStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub ai_enabled: bool,
    pub open_confirmations: usize,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    ai_enabled: bool,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, ai_enabled: bool) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            ai_enabled,
        }
    }

    /// Snapshot the current status
    pub fn get_status(&self, open_confirmations: usize) -> FitaiStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FitaiStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            ai_enabled: self.ai_enabled,
            open_confirmations,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
