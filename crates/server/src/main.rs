//! mcp-todos server entry point.
//!
//! Boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use todos_client::{PostgrestClient, PostgrestConfig};
use todos_core::{AppConfig, Backend, Collection, MemoryCollection, Preferences, PrefsDb, TodoService};
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(backend = ?config.backend, table = %config.table, "Starting mcp-todos server on stdio transport");

    let collection = open_collection(&config)?;
    let prefs = PrefsDb::open(&config.prefs_path)
        .await
        .with_context(|| format!("opening preferences at {}", config.prefs_path.display()))?;
    let service = TodoService::from_config(collection, Preferences::new(Arc::new(prefs)), &config).await?;

    let handler = handler::McpTodosServer::new(Arc::new(service));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

fn open_collection(config: &AppConfig) -> Result<Arc<dyn Collection>> {
    match config.backend {
        Backend::Postgrest => {
            let client = PostgrestClient::new(PostgrestConfig::from_app_config(config)?)?;
            tracing::info!(endpoint = %client.endpoint(), "using PostgREST backend");
            Ok(Arc::new(client))
        }
        Backend::Memory => {
            tracing::warn!("using in-memory backend; todos are lost on exit");
            Ok(Arc::new(MemoryCollection::new(config.table.clone())))
        }
    }
}
