use super::client::{ApiVersion, CephClient};
use super::error::{CephApiError, Result};
use crate::models::{parse_record, ClusterCapacity, ClusterHealth};
use serde_json::Value;

impl CephClient {
    pub async fn get_cluster_health(&self) -> Result<ClusterHealth> {
        let minimal = self.get("/api/health/minimal", ApiVersion::V1_0).await?;
        let fsid = match self.get("/api/health/get_cluster_fsid", ApiVersion::V1_0).await? {
            Value::String(fsid) => fsid,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Ok(ClusterHealth::from_minimal(fsid, &minimal))
    }

    pub async fn get_cluster_capacity(&self) -> Result<ClusterCapacity> {
        let payload = self
            .get("/api/health/get_cluster_capacity", ApiVersion::V1_0)
            .await?;
        parse_record("capacity", payload).ok_or_else(|| {
            CephApiError::Decode("cluster capacity payload does not match the expected fields".into())
        })
    }
}
