//! MCP (Model Context Protocol) server implementation
//!
//! Enables AI assistants to inspect and operate a Ceph cluster through the
//! Ceph Manager API. Two transports are offered: stdio for assistants that
//! spawn the server locally, and streamable HTTP for remote clients.

pub mod resources;
pub mod server;
pub mod tools;

use crate::api::CephClient;
use crate::config::Settings;
use std::sync::Arc;

pub use server::CephMcpServer;

/// Path the streamable HTTP transport is mounted on
pub const HTTP_MOUNT_PATH: &str = "/mcp";

fn build_server(client: Arc<CephClient>, settings: &Settings) -> CephMcpServer {
    CephMcpServer::new(
        client,
        settings.server_name.clone(),
        settings.server_version.clone(),
    )
}

pub async fn run_stdio_server(client: Arc<CephClient>, settings: &Settings) -> anyhow::Result<()> {
    use rmcp::ServiceExt;
    use tokio::io::{stdin, stdout};

    tracing::info!(
        name = %settings.server_name,
        manager = %settings.manager_url,
        "Starting Ceph MCP server with stdio transport"
    );

    let server = build_server(client, settings);
    let service = server.serve((stdin(), stdout())).await?;

    tracing::info!("MCP server running, waiting for requests...");
    service.waiting().await?;

    Ok(())
}

pub async fn run_http_server(client: Arc<CephClient>, settings: &Settings) -> anyhow::Result<()> {
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    };
    use tokio::net::TcpListener;

    let server = build_server(client, settings);
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = axum::Router::new().nest_service(HTTP_MOUNT_PATH, service);

    let addr = settings.listen_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        "Starting Ceph MCP server on http://{}{}",
        listener.local_addr()?,
        HTTP_MOUNT_PATH
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received, stopping HTTP server");
        })
        .await?;

    Ok(())
}
