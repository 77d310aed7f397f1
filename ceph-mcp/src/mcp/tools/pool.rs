//! Pool tools

use super::{handle, ToolError};
use crate::api::CephClient;
use crate::models::{Pool, PoolSummary, ToolResponse};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub async fn get_pool_summary(client: &CephClient) -> ToolResponse {
    handle("pool", "get_pool_summary", async {
        let summary = client.get_pool_summary().await?;
        Ok::<_, ToolError>(summary_response(&summary))
    })
    .await
}

fn summary_response(summary: &PoolSummary) -> ToolResponse {
    let pool_types: Map<String, Value> = summary
        .pool_types
        .iter()
        .map(|t| {
            (
                t.pool_type.clone(),
                json!({ "count": t.count, "pool_names": t.pool_names }),
            )
        })
        .collect();
    let pg_status: Map<String, Value> = summary
        .pg_states
        .values()
        .map(|s| {
            (
                s.state.clone(),
                json!({ "pool_count": s.pool_count, "total_pgs": s.total_pgs }),
            )
        })
        .collect();

    let data = json!({
        "cluster_summary": {
            "total_pools": summary.total_pools(),
            "replicated_pools": summary.replicated_pools(),
            "erasure_pools": summary.erasure_pools(),
            "healthy_pools": summary.healthy_pools,
            "unhealthy_pools": summary.unhealthy_pools(),
            "total_pgs": summary.total_pgs(),
        },
        "pool_types": pool_types,
        "pg_status": pg_status,
        "pool_names": summary.pool_names(),
        "unique_applications": summary.unique_applications(),
        "average_pool_size": summary.average_pool_size(),
    });

    let message = if summary.unhealthy_pools() == 0 {
        format!(
            "All {} pools are healthy with {} total PGs",
            summary.total_pools(),
            summary.total_pgs()
        )
    } else {
        format!(
            "Cluster has {} pools: {} healthy, {} with PG issues",
            summary.total_pools(),
            summary.healthy_pools,
            summary.unhealthy_pools()
        )
    };

    ToolResponse::success(message, data)
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct PoolDetailsParams {
    /// Exact pool name
    pub pool_name: String,
}

pub async fn get_pool_details(client: &CephClient, params: PoolDetailsParams) -> ToolResponse {
    handle("pool", "get_pool_details", async {
        let pool_name = params.pool_name.trim();
        if pool_name.is_empty() {
            return Err(ToolError::Validation("pool_name must not be empty".into()));
        }
        let pool = client.get_pool_details(pool_name).await?;
        Ok(details_response(&pool))
    })
    .await
}

fn details_response(pool: &Pool) -> ToolResponse {
    let data = json!({
        "basic_info": {
            "pool_name": pool.pool_name,
            "type": pool.pool_type,
            "crush_rule": pool.crush_rule,
            "is_replicated": pool.is_replicated(),
            "is_erasure": pool.is_erasure(),
        },
        "replica_configuration": {
            "size": pool.size,
            "min_size": pool.min_size,
            "replica_info": pool.replica_info(),
        },
        "placement_groups": {
            "pg_num": pool.pg_num,
            "pg_num_target": pool.pg_num_target,
            "pg_num_max": pool.options.pg_num_max,
            "pg_num_min": pool.options.pg_num_min,
            "pg_placement_num": pool.pg_placement_num,
            "pg_placement_num_target": pool.pg_placement_num_target,
        },
        "pg_status": {
            "status_breakdown": pool.pg_status,
            "total_pgs": pool.total_pgs(),
            "active_pgs": pool.active_pgs(),
            "pg_states": pool.pg_states(),
            "is_healthy": pool.is_healthy(),
            "pg_efficiency": pool.pg_efficiency(),
        },
        "applications": {
            "application_metadata": pool.application_metadata,
            "primary_applications": pool.primary_applications(),
            "application_count": pool.application_metadata.len(),
        },
    });

    let message = format!(
        "Pool '{}' is {} type with {} replicas, {} PGs and {}",
        pool.pool_name,
        pool.pool_type,
        pool.replica_info(),
        pool.total_pgs(),
        if pool.is_healthy() {
            "healthy"
        } else {
            "has PG issues"
        }
    );

    ToolResponse::success(message, data)
}
