//! Utility to set the user profile from the command line
//!
//! Usage: set_profile <name> [age] [height_cm] [weight_kg] [goal...]

use fitai::config::AppConfig;
use fitai::models::{ProfileUpdate, UserProfile};
use fitai::nutrition::{parse_int_or_zero, parse_or_zero};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(name) = args.first() else {
        eprintln!("Usage: set_profile <name> [age] [height_cm] [weight_kg] [goal...]");
        std::process::exit(2);
    };

    let config = AppConfig::from_env()?;
    println!("Database path: {}", config.database_path.display());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = fitai::db::Database::new(&config.database_path)?;
    database.with_conn(|conn| fitai::db::migrations::run_migrations(conn))?;

    let update = ProfileUpdate {
        name: Some(name.clone()),
        age: args.get(1).map(|a| parse_int_or_zero(a).max(0)),
        height_cm: args.get(2).map(|h| parse_or_zero(h).max(0.0)),
        weight_kg: args.get(3).map(|w| parse_or_zero(w).max(0.0)),
        goal: (args.len() > 4).then(|| args[4..].join(" ")),
        ..Default::default()
    };

    let profile = database.with_conn(|conn| UserProfile::update(conn, &update))?;
    println!("Profile set:");
    println!("  Name: {}", profile.name);
    println!("  Age: {}", profile.age);
    println!("  Height: {} cm", profile.height_cm);
    println!("  Weight: {} kg", profile.weight_kg);
    println!("  Goal: {}", profile.goal);

    Ok(())
}
