//! FitAI Tracker Library
//!
//! Meal, workout and progress tracking with AI food analysis.

pub mod build_info;
pub mod config;
pub mod confirmation;
pub mod db;
pub mod edge;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod request_state;
pub mod tools;
