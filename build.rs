//! Build script for FitAI
//!
//! Bumps a persistent build counter and embeds it with the build time.

use std::fs;
use std::path::Path;

const COUNTER_FILE: &str = "build_number.txt";

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed={}", COUNTER_FILE);

    let counter = Path::new(COUNTER_FILE);
    let previous: u64 = fs::read_to_string(counter)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let build = previous + 1;

    if let Err(e) = fs::write(counter, build.to_string()) {
        println!("cargo:warning=could not persist build number: {}", e);
    }

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=FITAI_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=FITAI_BUILD_TIMESTAMP={}", timestamp);
}
