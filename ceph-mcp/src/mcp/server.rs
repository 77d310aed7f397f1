//! MCP server implementation
//!
//! Contains the CephMcpServer struct, tool definitions,
//! and ServerHandler implementation.

use super::{resources, tools};
use crate::api::CephClient;
use crate::models::ToolResponse;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct CephMcpServer {
    client: Arc<CephClient>,
    name: String,
    version: String,
    tool_router: ToolRouter<Self>,
}

/// Failed operations are tool errors, not protocol errors.
fn respond(response: ToolResponse) -> Result<CallToolResult, McpError> {
    let content = vec![Content::text(response.render())];
    if response.success {
        Ok(CallToolResult::success(content))
    } else {
        Ok(CallToolResult::error(content))
    }
}

#[tool_router]
impl CephMcpServer {
    pub fn new(client: Arc<CephClient>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
            version: version.into(),
            tool_router: Self::tool_router(),
        }
    }

    // ===== HEALTH TOOLS =====

    #[tool(
        description = "Get an overall health summary of the Ceph cluster: status, health score, active checks and recommendations"
    )]
    async fn get_health_summary(&self) -> Result<CallToolResult, McpError> {
        respond(tools::health::get_health_summary(&self.client).await)
    }

    #[tool(
        description = "Get detailed health checks sorted by priority. Optionally filter by severity (HEALTH_ERR, HEALTH_WARN, HEALTH_INFO)."
    )]
    async fn get_health_details(
        &self,
        Parameters(params): Parameters<tools::health::HealthDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::health::get_health_details(&self.client, params).await)
    }

    #[tool(
        description = "Get actionable health recommendations. Use priority_only=true to focus on the most urgent items."
    )]
    async fn get_health_recommendations(
        &self,
        Parameters(params): Parameters<tools::health::RecommendationsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::health::get_health_recommendations(&self.client, params).await)
    }

    #[tool(
        description = "Get cluster capacity summary including total objects and capacity statistics"
    )]
    async fn get_cluster_capacity(&self) -> Result<CallToolResult, McpError> {
        let response = tools::health::get_cluster_capacity(&self.client).await;
        let report = tools::health::capacity_report(&response);
        if response.success {
            Ok(CallToolResult::success(vec![Content::text(report)]))
        } else {
            Ok(CallToolResult::error(vec![Content::text(report)]))
        }
    }

    // ===== HOST TOOLS =====

    #[tool(
        description = "List all hosts in the cluster with their status, services, uptime, memory and labels"
    )]
    async fn get_host_summary(&self) -> Result<CallToolResult, McpError> {
        respond(tools::host::get_host_summary(&self.client).await)
    }

    #[tool(
        description = "Get detailed information about one host: services, hardware, memory and operating system"
    )]
    async fn get_host_details(
        &self,
        Parameters(params): Parameters<tools::host::HostDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::host::get_host_details(&self.client, params).await)
    }

    // ===== DAEMON TOOLS =====

    #[tool(description = "Summarize all Ceph daemons grouped by type with running and stopped counts")]
    async fn get_daemon_summary(&self) -> Result<CallToolResult, McpError> {
        respond(tools::daemon::get_daemon_summary(&self.client).await)
    }

    #[tool(
        description = "List the names of all daemons of one type (mon, mgr, osd, mds, rgw, ...). Use get_daemon_summary first to see the available types."
    )]
    async fn get_daemon_names(
        &self,
        Parameters(params): Parameters<tools::daemon::DaemonNamesParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::daemon::get_daemon_names(&self.client, params).await)
    }

    #[tool(
        description = "Get details about one daemon on a host: version, systemd unit, memory and CPU usage, uptime"
    )]
    async fn get_daemon_details(
        &self,
        Parameters(params): Parameters<tools::daemon::DaemonDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::daemon::get_daemon_details(&self.client, params).await)
    }

    #[tool(
        description = "Start, stop or restart a daemon (WARNING: affects cluster services). Valid actions: start, stop, restart."
    )]
    async fn perform_daemon_action(
        &self,
        Parameters(params): Parameters<tools::daemon::DaemonActionParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::daemon::perform_daemon_action(&self.client, params).await)
    }

    // ===== OSD TOOLS =====

    #[tool(
        description = "Summarize all OSDs: up/down and in/out counts, hosts and per device class capacity"
    )]
    async fn get_osd_summary(&self) -> Result<CallToolResult, McpError> {
        respond(tools::osd::get_osd_summary(&self.client).await)
    }

    #[tool(description = "List every OSD id together with the host it runs on")]
    async fn get_osd_id(&self) -> Result<CallToolResult, McpError> {
        respond(tools::osd::get_osd_id(&self.client).await)
    }

    #[tool(
        description = "Get details about one OSD: status, capacity, latency and placement group count"
    )]
    async fn get_osd_details(
        &self,
        Parameters(params): Parameters<tools::osd::OsdDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::osd::get_osd_details(&self.client, params).await)
    }

    #[tool(
        description = "Mark an OSD out, in, or set its noout flag (WARNING: out triggers data movement). Valid actions: noout, out, in."
    )]
    async fn perform_osd_mark_action(
        &self,
        Parameters(params): Parameters<tools::osd::OsdMarkParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::osd::perform_osd_mark_action(&self.client, params).await)
    }

    // ===== POOL TOOLS =====

    #[tool(description = "Summarize all pools by type and placement group state")]
    async fn get_pool_summary(&self) -> Result<CallToolResult, McpError> {
        respond(tools::pool::get_pool_summary(&self.client).await)
    }

    #[tool(
        description = "Get details about one pool: replica configuration, placement groups and applications"
    )]
    async fn get_pool_details(
        &self,
        Parameters(params): Parameters<tools::pool::PoolDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::pool::get_pool_details(&self.client, params).await)
    }

    // ===== CEPHFS TOOLS =====

    #[tool(description = "List CephFS filesystems with their names and ids")]
    async fn get_fs_summary(&self) -> Result<CallToolResult, McpError> {
        respond(tools::cephfs::get_fs_summary(&self.client).await)
    }

    #[tool(
        description = "Get details about one CephFS filesystem: clients, MDS ranks and pool usage. Use get_fs_summary to find the id."
    )]
    async fn get_fs_details(
        &self,
        Parameters(params): Parameters<tools::cephfs::FsDetailsParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(tools::cephfs::get_fs_details(&self.client, params).await)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for CephMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: self.version.clone(),
                ..Default::default()
            },
            instructions: Some(
                "Read-mostly access to a Ceph cluster through the Ceph Manager API. \
                 Start with get_health_summary, then drill down with the host, daemon, \
                 OSD, pool and CephFS tools. perform_daemon_action and \
                 perform_osd_mark_action change cluster state."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(resources::list_resources())
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match resources::read_resource(&self.client, &request).await {
            Some(result) => Ok(result),
            None => Err(McpError::resource_not_found(
                format!("Unknown resource: {}", request.uri),
                None,
            )),
        }
    }
}
