use super::client::{ApiVersion, CephClient};
use super::error::{CephApiError, Result};
use crate::models::{parse_listing, Host, HostSummary};

impl CephClient {
    pub async fn get_host_summary(&self) -> Result<HostSummary> {
        let payload = self.get("/api/host?facts=true", ApiVersion::V1_3).await?;
        Ok(HostSummary::from_hosts(parse_listing(
            "host",
            payload,
            Host::minimal,
        )))
    }

    /// Matches on hostname, short name or FQDN.
    pub async fn get_host_details(&self, hostname: &str) -> Result<Host> {
        let summary = self.get_host_summary().await?;
        summary.find(hostname).cloned().ok_or_else(|| {
            CephApiError::NotFound(format!("Host '{}' not found in cluster", hostname))
        })
    }
}
