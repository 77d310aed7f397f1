//! CephFS tools

use super::{handle, ToolError};
use crate::api::CephClient;
use crate::models::{CephFsDetails, CephFsPool, CephFsSummary, ToolResponse};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub async fn get_fs_summary(client: &CephClient) -> ToolResponse {
    handle("cephfs", "get_fs_summary", async {
        let summary = client.get_fs_summary().await?;
        Ok::<_, ToolError>(summary_response(&summary))
    })
    .await
}

fn summary_response(summary: &CephFsSummary) -> ToolResponse {
    let name_id_mapping: Map<String, Value> = summary
        .filesystems
        .iter()
        .map(|fs| (fs.name().to_string(), json!(fs.id)))
        .collect();

    let data = json!({
        "cluster_summary": {
            "total_filesystems": summary.total_filesystems(),
            "filesystem_count": summary.filesystems.len(),
        },
        "filesystems": summary.filesystems.iter().map(|fs| json!({
            "fs_id": fs.id,
            "fs_name": fs.name(),
            "display_name": fs.display_name(),
        })).collect::<Vec<_>>(),
        "filesystem_names": summary.names(),
        "filesystem_ids": summary.ids(),
        "name_id_mapping": name_id_mapping,
        "summary_text": summary.summary_text(),
    });

    let message = if summary.filesystems.is_empty() {
        "No CephFS filesystems found in the cluster".to_string()
    } else {
        summary.summary_text()
    };

    ToolResponse::success(message, data)
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct FsDetailsParams {
    /// Filesystem id as listed by get_fs_summary
    pub fs_id: i64,
}

pub async fn get_fs_details(client: &CephClient, params: FsDetailsParams) -> ToolResponse {
    handle("cephfs", "get_fs_details", async {
        if params.fs_id < 0 {
            return Err(ToolError::Validation(format!(
                "Invalid filesystem ID: {}. Must be a non-negative integer.",
                params.fs_id
            )));
        }
        let details = client.get_fs_details(params.fs_id).await?;
        Ok(details_response(&details))
    })
    .await
}

fn pool_statistics(pool: Option<&CephFsPool>) -> Value {
    match pool {
        Some(pool) => json!({
            "name": pool.pool,
            "used_gb": pool.used_gb(),
            "total_gb": pool.total_gb(),
            "used_percent": pool.used_percent(),
        }),
        None => Value::Null,
    }
}

fn details_response(details: &CephFsDetails) -> ToolResponse {
    let data = json!({
        "filesystem_info": {
            "fs_id": details.id,
            "fs_name": details.name,
            "client_count": details.client_count,
        },
        "mds_ranks": details.ranks.iter().map(|r| json!({
            "rank": r.rank,
            "mds_name": r.mds,
            "state": r.state,
        })).collect::<Vec<_>>(),
        "pool_statistics": {
            "metadata_pool": pool_statistics(details.metadata_pool()),
            "data_pool": pool_statistics(details.data_pool()),
        },
        "summary": {
            "active_ranks": details.active_ranks(),
            "total_ranks": details.ranks.len(),
        },
    });

    let message = format!(
        "Filesystem '{}' (ID: {}) - {} clients, {} active MDS ranks",
        details.name,
        details.id,
        details.client_count,
        details.active_ranks()
    );

    ToolResponse::success(message, data)
}
