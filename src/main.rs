//! FitAI Tracker
//!
//! An MCP server for meal, workout and progress tracking.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fitai::build_info;
use fitai::config::AppConfig;
use fitai::db::{self, Database};
use fitai::edge::{EdgeFunctions, HttpEdgeClient};
use fitai::mcp::FitaiService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr; stdout carries the MCP protocol
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fitai=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = AppConfig::from_env()?;
    eprintln!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        if db::migrations::needs_migration(conn)? {
            info!("applying database migrations");
            db::migrations::run_migrations(conn)?;
        }
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let edge: Option<Arc<dyn EdgeFunctions>> = match &config.functions {
        Some(functions) => {
            let client = HttpEdgeClient::new(&functions.url, &functions.key, config.http_timeout)?;
            info!(url = %functions.url, "AI functions enabled");
            Some(Arc::new(client) as Arc<dyn EdgeFunctions>)
        }
        None => {
            warn!("AI functions not configured; photo analysis and generation tools are disabled");
            None
        }
    };

    let service = FitaiService::new(config.database_path.clone(), database, edge);

    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
