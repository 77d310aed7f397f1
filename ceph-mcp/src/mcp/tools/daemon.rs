//! Daemon tools

use super::{handle, ToolError};
use crate::api::CephClient;
use crate::models::{ActionOutcome, Daemon, DaemonAction, DaemonSummary, DaemonTypeInfo, ToolResponse};
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub async fn get_daemon_summary(client: &CephClient) -> ToolResponse {
    handle("daemon", "get_daemon_summary", async {
        let summary = client.get_daemon_summary().await?;
        Ok::<_, ToolError>(summary_response(&summary))
    })
    .await
}

fn summary_response(summary: &DaemonSummary) -> ToolResponse {
    let daemon_types: Map<String, Value> = summary
        .daemon_types
        .iter()
        .map(|t| {
            (
                t.daemon_type.clone(),
                json!({
                    "total_count": t.total_count,
                    "running_count": t.running_count,
                    "stopped_count": t.stopped_count,
                    "daemon_names": t.daemon_names,
                }),
            )
        })
        .collect();

    let data = json!({
        "cluster_summary": {
            "total_daemons": summary.total_daemons(),
            "running_daemons": summary.running_daemons,
            "stopped_daemons": summary.stopped_daemons,
            "daemon_type_count": summary.daemon_types.len(),
        },
        "daemon_types": daemon_types,
        "all_daemon_names": summary.daemons.iter().map(|d| d.daemon_name.as_str()).collect::<Vec<_>>(),
    });

    let message = if summary.stopped_daemons == 0 {
        format!(
            "All {} daemons are running across {} daemon types",
            summary.total_daemons(),
            summary.daemon_types.len()
        )
    } else {
        format!(
            "Cluster has {} daemons: {} running, {} stopped",
            summary.total_daemons(),
            summary.running_daemons,
            summary.stopped_daemons
        )
    };

    ToolResponse::success(message, data)
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DaemonNamesParams {
    /// Daemon type, e.g. mon, mgr, osd, mds, rgw
    pub daemon_type: String,
}

pub async fn get_daemon_names(client: &CephClient, params: DaemonNamesParams) -> ToolResponse {
    handle("daemon", "get_daemon_names", async {
        let daemon_type = params.daemon_type.trim();
        if daemon_type.is_empty() {
            return Err(ToolError::Validation("daemon_type must not be empty".into()));
        }
        let info = client.get_daemon_names_by_type(daemon_type).await?;
        Ok(names_response(&info))
    })
    .await
}

fn names_response(info: &DaemonTypeInfo) -> ToolResponse {
    let data = json!({
        "daemon_type": info.daemon_type,
        "daemon_names": info.daemon_names,
        "summary": {
            "total_count": info.total_count,
            "running_count": info.running_count,
            "stopped_count": info.stopped_count,
        },
    });
    let message = format!(
        "Found {} {} daemons: {} running, {} stopped",
        info.total_count, info.daemon_type, info.running_count, info.stopped_count
    );
    ToolResponse::success(message, data)
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DaemonDetailsParams {
    /// Host the daemon runs on
    pub hostname: String,
    /// Full daemon name, e.g. mon.node-1 or osd.0
    pub daemon_name: String,
}

pub async fn get_daemon_details(client: &CephClient, params: DaemonDetailsParams) -> ToolResponse {
    handle("daemon", "get_daemon_details", async {
        if params.hostname.trim().is_empty() || params.daemon_name.trim().is_empty() {
            return Err(ToolError::Validation(
                "hostname and daemon_name are required".into(),
            ));
        }
        let daemon = client
            .get_daemon_details(params.hostname.trim(), params.daemon_name.trim())
            .await?;
        Ok(details_response(&daemon))
    })
    .await
}

fn details_response(daemon: &Daemon) -> ToolResponse {
    let uptime_days = daemon.uptime_days(Utc::now());

    let data = json!({
        "basic_info": {
            "daemon_id": daemon.daemon_id,
            "daemon_type": daemon.daemon_type,
            "daemon_name": daemon.daemon_name,
            "hostname": daemon.hostname,
            "status": daemon.status_display(),
            "status_code": daemon.status,
        },
        "version_info": {
            "ceph_version": daemon.version,
            "systemd_unit": daemon.systemd_unit,
            "started": daemon.started,
            "started_datetime": daemon.started_at().map(|t| t.to_rfc3339()),
        },
        "resource_usage": {
            "memory_usage_gb": daemon.memory_usage_gb(),
            "memory_request_gb": daemon.memory_request_gb(),
            "cpu_percentage": daemon.cpu_percentage,
            "cpu_percentage_float": daemon.cpu_percentage_value(),
        },
    });

    let mut message = format!(
        "Daemon '{}' on '{}' is {} using {}GB memory and {} CPU",
        daemon.daemon_name,
        daemon.hostname,
        daemon.status_display(),
        daemon.memory_usage_gb(),
        daemon.cpu_percentage
    );
    if let Some(days) = uptime_days {
        message.push_str(&format!(", running for {} days", days));
    }

    ToolResponse::success(message, data)
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DaemonActionParams {
    /// Full daemon name, e.g. mgr.node-1.abcdef
    pub daemon_name: String,
    /// One of: start, stop, restart
    pub action: String,
}

pub async fn perform_daemon_action(client: &CephClient, params: DaemonActionParams) -> ToolResponse {
    handle("daemon", "perform_daemon_action", async {
        let daemon_name = params.daemon_name.trim();
        if daemon_name.is_empty() {
            return Err(ToolError::Validation("daemon_name must not be empty".into()));
        }
        let action: DaemonAction = params
            .action
            .trim()
            .parse()
            .map_err(ToolError::Validation)?;
        let outcome = client.perform_daemon_action(daemon_name, action).await?;
        Ok(action_response(&outcome, action))
    })
    .await
}

fn action_response(outcome: &ActionOutcome, action: DaemonAction) -> ToolResponse {
    let data = json!({
        "daemon_info": {
            "daemon_name": outcome.target,
            "action_performed": outcome.action,
            "success": true,
        },
        "api_response": outcome.response,
    });
    ToolResponse::success(
        format!("Successfully {} daemon '{}'", action.past_tense(), outcome.target),
        data,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_listing;

    fn summary() -> DaemonSummary {
        DaemonSummary::from_daemons(parse_listing(
            "daemon",
            json!([
                {"daemon_type": "mon", "daemon_name": "mon.a", "hostname": "node-1", "status": 1,
                 "memory_usage": 1073741824u64, "cpu_percentage": "2.5%"},
                {"daemon_type": "mgr", "daemon_name": "mgr.a", "hostname": "node-1", "status": 1}
            ]),
            Daemon::minimal,
        ))
    }

    #[test]
    fn summary_message_when_all_running() {
        let response = summary_response(&summary());
        assert_eq!(
            response.message,
            "All 2 daemons are running across 2 daemon types"
        );
        let data = response.data.unwrap();
        assert_eq!(data["daemon_types"]["mon"]["daemon_names"][0], "mon.a");
        assert_eq!(data["all_daemon_names"][1], "mgr.a");
    }

    #[test]
    fn details_without_start_time() {
        let summary = summary();
        let response = details_response(summary.find("node-1", "mon.a").unwrap());
        assert_eq!(
            response.message,
            "Daemon 'mon.a' on 'node-1' is running using 1GB memory and 2.5% CPU"
        );
        assert_eq!(
            response.data.unwrap()["version_info"]["started_datetime"],
            Value::Null
        );
    }

    #[test]
    fn action_message_uses_past_tense() {
        let outcome = ActionOutcome {
            target: "mgr.a".into(),
            action: "restart".into(),
            response: json!({"status": "ok"}),
        };
        let response = action_response(&outcome, DaemonAction::Restart);
        assert_eq!(response.message, "Successfully restarted daemon 'mgr.a'");
        assert_eq!(response.data.unwrap()["api_response"]["status"], "ok");
    }
}
