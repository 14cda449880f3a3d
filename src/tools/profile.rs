//! Profile MCP Tools
//!
//! User profile, daily goals and weigh-ins.

use serde::Serialize;
use tracing::info;

use super::resolve_date;
use crate::db::Database;
use crate::models::{ProfileUpdate, UserProfile, WeighIn};
use crate::nutrition::parse_or_zero;

/// Profile form as text, the way it is typed in
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub age: Option<String>,
    pub height_cm: Option<String>,
    pub weight_kg: Option<String>,
    pub goal: Option<String>,
    pub calorie_goal: Option<f64>,
    pub protein_goal: Option<f64>,
    pub carbs_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub workout_goal: Option<i64>,
}

impl ProfileForm {
    /// Numeric text fields are read with parse-or-zero
    fn to_update(&self) -> ProfileUpdate {
        let number = |v: &Option<String>| v.as_deref().map(|s| parse_or_zero(s).max(0.0));

        ProfileUpdate {
            name: self.name.clone(),
            age: number(&self.age).map(|a| a.trunc() as i64),
            height_cm: number(&self.height_cm),
            weight_kg: number(&self.weight_kg),
            goal: self.goal.clone(),
            calorie_goal: self.calorie_goal,
            protein_goal: self.protein_goal,
            carbs_goal: self.carbs_goal,
            fat_goal: self.fat_goal,
            workout_goal: self.workout_goal,
        }
    }
}

/// Response for update_profile
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub profile: UserProfile,
    pub message: String,
}

/// Response for log_weight
#[derive(Debug, Serialize)]
pub struct LogWeightResponse {
    pub weigh_in: WeighIn,
    pub profile_weight_kg: f64,
}

pub fn get_profile(db: &Database) -> Result<UserProfile, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    UserProfile::get(&conn).map_err(|e| format!("Failed to get profile: {}", e))
}

/// Save the given profile fields, leaving the rest unchanged
pub fn update_profile(db: &Database, form: &ProfileForm) -> Result<UpdateProfileResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = UserProfile::update(&conn, &form.to_update())
        .map_err(|e| format!("Failed to save profile: {}", e))?;

    info!(name = %profile.name, "profile saved");

    Ok(UpdateProfileResponse {
        profile,
        message: "Profile saved successfully!".to_string(),
    })
}

/// Record a weigh-in and keep the profile weight current
///
/// The profile only follows the reading when it is the latest one.
pub fn log_weight(db: &Database, weight_kg: f64, date: Option<&str>) -> Result<LogWeightResponse, String> {
    let date = resolve_date(date)?;
    let mut conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let tx = conn.transaction().map_err(|e| format!("Database error: {}", e))?;

    let weigh_in = WeighIn::upsert(&tx, &date, weight_kg)
        .map_err(|e| format!("Failed to log weight: {}", e))?;

    let latest = WeighIn::latest(&tx, None)
        .map_err(|e| format!("Failed to log weight: {}", e))?;

    let profile = if latest.as_ref().map(|w| w.date == weigh_in.date).unwrap_or(false) {
        UserProfile::update(
            &tx,
            &ProfileUpdate {
                weight_kg: Some(weigh_in.weight_kg),
                ..Default::default()
            },
        )
    } else {
        UserProfile::get(&tx)
    }
    .map_err(|e| format!("Failed to update profile weight: {}", e))?;

    tx.commit().map_err(|e| format!("Database error: {}", e))?;

    info!(date = %weigh_in.date, weight_kg = weigh_in.weight_kg, "weight logged");

    Ok(LogWeightResponse {
        profile_weight_kg: profile.weight_kg,
        weigh_in,
    })
}
