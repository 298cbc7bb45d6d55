//! Omi MCP Server - Omi memories, action items and conversations for MCP
//! clients.
//!
//! This binary communicates via stdio transport, which is the standard for
//! local MCP servers. See the library docs for configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use omi_client::OmiClient;
use omi_mcp::OmiServer;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    // Initialize tracing to stderr (stdout is used for MCP transport)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Starting Omi MCP server");

    let client = OmiClient::from_env().context("failed to configure the Omi API client")?;
    let server = OmiServer::new(Arc::new(client));

    // Serve via stdio transport
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Server error: {:?}", e);
    })?;

    tracing::info!("MCP server running on stdio");

    service.waiting().await?;
    Ok(())
}
