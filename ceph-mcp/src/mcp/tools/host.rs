//! Host inventory tools

use super::{handle, ToolError};
use crate::api::CephClient;
use crate::models::{decimal, Host, HostSummary, ToolResponse};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub async fn get_host_summary(client: &CephClient) -> ToolResponse {
    handle("host", "get_host_summary", async {
        let summary = client.get_host_summary().await?;
        Ok::<_, ToolError>(summary_response(&summary))
    })
    .await
}

fn summary_response(summary: &HostSummary) -> ToolResponse {
    let data = json!({
        "cluster_summary": {
            "total_hosts": summary.total_hosts(),
            "online_hosts": summary.online_hosts,
            "offline_hosts": summary.offline_hosts,
            "online_percentage": summary.online_percentage(),
        },
        "hosts": summary.hosts.iter().map(|h| json!({
            "hostname": h.hostname,
            "address": h.addr,
            "status": h.status_display(),
            "services": h.service_summary(),
            "uptime_days": h.uptime_days(),
            "memory_total_gb": h.memory_total_gb(),
            "architecture": h.arch,
            "labels": h.labels,
        })).collect::<Vec<_>>(),
    });

    let message = if summary.offline_hosts == 0 {
        format!(
            "All {} hosts are online and operational",
            summary.total_hosts()
        )
    } else {
        format!(
            "Cluster has {} hosts: {} online, {} offline",
            summary.total_hosts(),
            summary.online_hosts,
            summary.offline_hosts
        )
    };

    ToolResponse::success(message, data)
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct HostDetailsParams {
    /// Hostname, short name or FQDN of the host
    pub hostname: String,
}

pub async fn get_host_details(client: &CephClient, params: HostDetailsParams) -> ToolResponse {
    handle("host", "get_host_details", async {
        let hostname = params.hostname.trim();
        if hostname.is_empty() {
            return Err(ToolError::Validation("hostname must not be empty".into()));
        }
        let host = client.get_host_details(hostname).await?;
        Ok(details_response(&host))
    })
    .await
}

fn details_response(host: &Host) -> ToolResponse {
    let data = json!({
        "basic_info": {
            "hostname": host.hostname,
            "fqdn": host.fqdn,
            "shortname": host.shortname,
            "address": host.addr,
            "status": host.status_display(),
            "labels": host.labels,
            "uptime_days": host.uptime_days(),
        },
        "services": {
            "summary": host.service_summary(),
            "instances": host.service_instances.iter().map(|s| json!({
                "type": s.service_type,
                "count": s.count,
            })).collect::<Vec<_>>(),
        },
        "hardware": {
            "architecture": host.arch,
            "cpu_model": host.cpu_model,
            "cpu_cores": host.cpu_cores,
            "cpu_count": host.cpu_count,
            "cpu_threads": host.cpu_threads,
        },
        "memory": {
            "total_gb": host.memory_total_gb(),
            "available_gb": host.memory_available_gb(),
            "free_gb": host.memory_free_gb(),
            "used_gb": host.memory_used_gb(),
        },
        "system": {
            "operating_system": host.operating_system,
            "kernel_version": host.kernel,
            "system_uptime_seconds": host.system_uptime,
        },
    });

    let message = format!(
        "Host '{}' is {} with {} service types running, {}% memory usage",
        host.hostname,
        host.status_display(),
        host.service_instances.len(),
        decimal(host.memory_usage_percentage())
    );

    ToolResponse::success(message, data)
}
