use super::client::{ApiVersion, CephClient};
use super::error::Result;
use crate::models::{parse_listing, CephFs, CephFsDetails, CephFsSummary};

impl CephClient {
    pub async fn get_fs_summary(&self) -> Result<CephFsSummary> {
        let payload = self.get("/api/cephfs", ApiVersion::V1_0).await?;
        Ok(CephFsSummary {
            filesystems: parse_listing("cephfs", payload, CephFs::minimal),
        })
    }

    pub async fn get_fs_details(&self, fs_id: i64) -> Result<CephFsDetails> {
        let payload = self
            .get(&format!("/api/cephfs/{}", fs_id), ApiVersion::V1_0)
            .await?;
        Ok(CephFsDetails::from_payload(payload))
    }
}
