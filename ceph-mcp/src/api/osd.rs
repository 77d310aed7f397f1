use super::client::{ApiVersion, CephClient};
use super::error::{CephApiError, Result};
use crate::models::{parse_listing, ActionOutcome, Osd, OsdIdInfo, OsdMarkAction, OsdSummary};
use serde_json::json;
use tracing::info;

impl CephClient {
    pub async fn get_osd_summary(&self) -> Result<OsdSummary> {
        let payload = self.get("/api/osd?limit=-1", ApiVersion::V1_1).await?;
        Ok(OsdSummary::from_osds(parse_listing(
            "osd",
            payload,
            Osd::minimal,
        )))
    }

    pub async fn get_osd_ids(&self) -> Result<OsdIdInfo> {
        let summary = self.get_osd_summary().await?;
        Ok(OsdIdInfo::from_summary(&summary))
    }

    pub async fn get_osd_details(&self, osd_id: i64) -> Result<Osd> {
        let summary = self.get_osd_summary().await?;
        summary.find(osd_id).cloned().ok_or_else(|| {
            let ids: Vec<String> = summary.ids().iter().map(i64::to_string).collect();
            CephApiError::NotFound(format!(
                "OSD {} not found. Available OSD IDs: {}",
                osd_id,
                ids.join(", ")
            ))
        })
    }

    /// `noout` sets the per-OSD flag; `out` and `in` go through the mark endpoint.
    pub async fn perform_osd_mark_action(
        &self,
        osd_id: i64,
        action: OsdMarkAction,
    ) -> Result<ActionOutcome> {
        if osd_id < 0 {
            return Err(CephApiError::InvalidArgument(format!(
                "Invalid OSD ID: {}. Must be a non-negative integer.",
                osd_id
            )));
        }
        info!(osd_id, action = %action, "performing OSD mark action");

        let response = match action {
            OsdMarkAction::Noout => {
                self.put(
                    "/api/osd/flags/individual",
                    ApiVersion::V1_0,
                    &json!({ "flags": { "noout": true }, "ids": [osd_id] }),
                )
                .await?
            }
            OsdMarkAction::Out | OsdMarkAction::In => {
                self.put(
                    &format!("/api/osd/{}/mark", osd_id),
                    ApiVersion::V1_0,
                    &json!({ "action": action.as_str() }),
                )
                .await?
            }
        };

        Ok(ActionOutcome {
            target: osd_id.to_string(),
            action: action.as_str().to_string(),
            response,
        })
    }
}
