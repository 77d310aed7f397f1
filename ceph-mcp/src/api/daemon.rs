use super::client::{ApiVersion, CephClient};
use super::error::{CephApiError, Result};
use crate::models::{parse_listing, ActionOutcome, Daemon, DaemonAction, DaemonSummary, DaemonTypeInfo};
use serde_json::json;
use tracing::info;

impl CephClient {
    pub async fn get_daemon_summary(&self) -> Result<DaemonSummary> {
        let payload = self.get("/api/daemon", ApiVersion::V1_0).await?;
        Ok(DaemonSummary::from_daemons(parse_listing(
            "daemon",
            payload,
            Daemon::minimal,
        )))
    }

    pub async fn get_daemon_names_by_type(&self, daemon_type: &str) -> Result<DaemonTypeInfo> {
        let summary = self.get_daemon_summary().await?;
        match summary.type_summary(daemon_type) {
            Some(found) => Ok(DaemonTypeInfo::from(found)),
            None => Err(CephApiError::InvalidArgument(format!(
                "Daemon type '{}' not found. Available types: {}",
                daemon_type,
                summary.type_names().join(", ")
            ))),
        }
    }

    pub async fn get_daemon_details(&self, hostname: &str, daemon_name: &str) -> Result<Daemon> {
        let summary = self.get_daemon_summary().await?;
        summary.find(hostname, daemon_name).cloned().ok_or_else(|| {
            CephApiError::NotFound(format!(
                "Daemon '{}' not found on host '{}'",
                daemon_name, hostname
            ))
        })
    }

    pub async fn perform_daemon_action(
        &self,
        daemon_name: &str,
        action: DaemonAction,
    ) -> Result<ActionOutcome> {
        info!(daemon = %daemon_name, action = %action, "performing daemon action");
        let response = self
            .put(
                &format!("/api/daemon/{}", daemon_name),
                ApiVersion::V0_1,
                &json!({ "action": action.as_str() }),
            )
            .await?;
        Ok(ActionOutcome {
            target: daemon_name.to_string(),
            action: action.as_str().to_string(),
            response,
        })
    }
}
