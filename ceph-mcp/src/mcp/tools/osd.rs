//! OSD tools

use super::{handle, ToolError};
use crate::api::CephClient;
use crate::models::{
    decimal, ActionOutcome, Osd, OsdIdInfo, OsdMarkAction, OsdSummary, ToolResponse,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub async fn get_osd_summary(client: &CephClient) -> ToolResponse {
    handle("osd", "get_osd_summary", async {
        let summary = client.get_osd_summary().await?;
        Ok::<_, ToolError>(summary_response(&summary))
    })
    .await
}

fn summary_response(summary: &OsdSummary) -> ToolResponse {
    let class_summary: Map<String, Value> = summary
        .device_classes
        .iter()
        .map(|c| {
            (
                c.device_class.clone(),
                json!({
                    "osd_count": c.osd_count,
                    "total_pgs": c.total_pgs,
                    "capacity_gb": c.capacity_gb(),
                    "used_gb": c.used_gb(),
                    "available_gb": c.available_gb(),
                }),
            )
        })
        .collect();

    let data = json!({
        "cluster_summary": {
            "total_osds": summary.total_osds(),
            "up_osds": summary.up_osds,
            "down_osds": summary.down_osds(),
            "in_osds": summary.in_osds,
            "out_osds": summary.out_osds(),
            "working_osds": summary.working_osds,
            "up_percentage": summary.up_percentage(),
        },
        "hosts": {
            "unique_hosts": summary.unique_hosts,
            "host_count": summary.unique_hosts.len(),
        },
        "device_classes": {
            "unique_classes": summary.device_classes.iter().map(|c| c.device_class.as_str()).collect::<Vec<_>>(),
            "class_summary": class_summary,
        },
    });

    let message = if summary.down_osds() == 0 {
        format!(
            "All {} OSDs are up and operational across {} hosts",
            summary.total_osds(),
            summary.unique_hosts.len()
        )
    } else {
        format!(
            "Cluster has {} OSDs: {} up, {} down",
            summary.total_osds(),
            summary.up_osds,
            summary.down_osds()
        )
    };

    ToolResponse::success(message, data)
}

pub async fn get_osd_id(client: &CephClient) -> ToolResponse {
    handle("osd", "get_osd_id", async {
        let info = client.get_osd_ids().await?;
        Ok::<_, ToolError>(ids_response(&info))
    })
    .await
}

fn ids_response(info: &OsdIdInfo) -> ToolResponse {
    let data = json!({
        "osd_mappings": info.mappings.iter().map(|m| json!({
            "osd_id": m.osd_id,
            "hostname": m.hostname,
        })).collect::<Vec<_>>(),
        "summary": {
            "total_osds": info.total_count(),
            "unique_hosts": info.unique_host_count(),
        },
    });
    ToolResponse::success(
        format!(
            "Found {} OSDs distributed across {} hosts",
            info.total_count(),
            info.unique_host_count()
        ),
        data,
    )
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct OsdDetailsParams {
    /// Numeric OSD id, e.g. 0 for osd.0
    pub osd_id: i64,
}

pub async fn get_osd_details(client: &CephClient, params: OsdDetailsParams) -> ToolResponse {
    handle("osd", "get_osd_details", async {
        if params.osd_id < 0 {
            return Err(ToolError::Validation(format!(
                "osd_id must be non-negative, got {}",
                params.osd_id
            )));
        }
        let osd = client.get_osd_details(params.osd_id).await?;
        Ok(details_response(&osd))
    })
    .await
}

fn details_response(osd: &Osd) -> ToolResponse {
    let stats = &osd.osd_stats;
    let data = json!({
        "basic_info": {
            "osd_id": osd.osd,
            "hostname": osd.hostname(),
            "device_class": osd.device_class(),
            "weight": osd.weight,
            "operational_status": osd.operational_status,
        },
        "status": {
            "up": osd.is_up(),
            "down": !osd.is_up(),
            "in": osd.is_in(),
            "out": !osd.is_in(),
            "working": osd.is_working(),
            "status_display": osd.status_display(),
        },
        "capacity": {
            "total_kb": stats.kb,
            "used_kb": stats.kb_used,
            "available_kb": stats.kb_avail,
            "total_gb": osd.capacity_gb(),
            "used_gb": osd.used_gb(),
            "available_gb": osd.available_gb(),
            "usage_percentage": osd.usage_percentage(),
        },
        "performance": {
            "commit_latency_ms": stats.perf_stat.commit_latency_ms,
            "apply_latency_ms": stats.perf_stat.apply_latency_ms,
            "num_pgs": stats.num_pgs,
        },
        "statistics": {
            "alerts_count": stats.alerts.len(),
        },
    });

    let message = format!(
        "OSD {} on '{}' is {} with {}% usage ({}GB/{}GB)",
        osd.osd,
        osd.hostname(),
        osd.status_display(),
        decimal(osd.usage_percentage()),
        decimal(osd.used_gb()),
        decimal(osd.capacity_gb())
    );

    ToolResponse::success(message, data)
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct OsdMarkParams {
    /// Numeric OSD id
    pub osd_id: i64,
    /// One of: noout, out, in
    pub action: String,
}

pub async fn perform_osd_mark_action(client: &CephClient, params: OsdMarkParams) -> ToolResponse {
    handle("osd", "perform_osd_mark_action", async {
        if params.osd_id < 0 {
            return Err(ToolError::Validation(format!(
                "osd_id must be non-negative, got {}",
                params.osd_id
            )));
        }
        let action: OsdMarkAction = params
            .action
            .trim()
            .parse()
            .map_err(ToolError::Validation)?;
        let outcome = client.perform_osd_mark_action(params.osd_id, action).await?;
        Ok(mark_response(&outcome, action))
    })
    .await
}

fn mark_response(outcome: &ActionOutcome, action: OsdMarkAction) -> ToolResponse {
    let data = json!({
        "osd_info": {
            "osd_id": outcome.target,
            "action_performed": outcome.action,
            "success": true,
        },
        "api_response": outcome.response,
    });
    ToolResponse::success(
        format!("Successfully {} OSD {}", action.description(), outcome.target),
        data,
    )
}
