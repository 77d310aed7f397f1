//! Health summary resource
//!
//! The same rendered envelope as the get_health_summary tool, readable as a
//! resource so assistants can attach it as context.

use crate::api::CephClient;
use crate::mcp::tools;
use rmcp::model::{RawResource, ReadResourceResult, Resource, ResourceContents};

pub const HEALTH_SUMMARY_URI: &str = "ceph://health/summary";

pub fn resource() -> Resource {
    Resource {
        raw: RawResource {
            uri: HEALTH_SUMMARY_URI.to_string(),
            name: "HealthSummary".to_string(),
            title: Some("Ceph Cluster Health Summary".to_string()),
            description: Some(
                "Current cluster health status, score, active checks and recommendations"
                    .to_string(),
            ),
            mime_type: Some("text/plain".to_string()),
            size: None,
            icons: None,
            meta: None,
        },
        annotations: None,
    }
}

pub async fn read(client: &CephClient) -> ReadResourceResult {
    let response = tools::health::get_health_summary(client).await;
    ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: HEALTH_SUMMARY_URI.to_string(),
            mime_type: Some("text/plain".to_string()),
            text: response.render(),
            meta: None,
        }],
    }
}
