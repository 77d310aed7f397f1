use super::client::{ApiVersion, CephClient};
use super::error::{CephApiError, Result};
use crate::models::{parse_listing, Pool, PoolSummary};

impl CephClient {
    pub async fn get_pool_summary(&self) -> Result<PoolSummary> {
        let payload = self.get("/api/pool?stats=true", ApiVersion::V1_0).await?;
        Ok(PoolSummary::from_pools(parse_listing(
            "pool",
            payload,
            Pool::minimal,
        )))
    }

    pub async fn get_pool_details(&self, pool_name: &str) -> Result<Pool> {
        let summary = self.get_pool_summary().await?;
        summary.find(pool_name).cloned().ok_or_else(|| {
            CephApiError::NotFound(format!(
                "Pool '{}' not found. Available pools: {}",
                pool_name,
                summary.pool_names().join(", ")
            ))
        })
    }
}
