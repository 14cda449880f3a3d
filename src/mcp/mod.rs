//! MCP server
//!
//! Stdio server exposing the tracker's tools.

mod server;
pub mod sessions;

pub use server::FitaiService;
