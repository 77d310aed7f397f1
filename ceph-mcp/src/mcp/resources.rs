//! MCP resources module
//!
//! Provides the routing functions for list_resources and read_resource.

pub mod health;

use crate::api::CephClient;
use rmcp::model::{ListResourcesResult, ReadResourceRequestParams, ReadResourceResult};

pub fn list_resources() -> ListResourcesResult {
    ListResourcesResult {
        resources: vec![health::resource()],
        next_cursor: None,
        meta: None,
    }
}

/// `None` for an unknown URI
pub async fn read_resource(
    client: &CephClient,
    params: &ReadResourceRequestParams,
) -> Option<ReadResourceResult> {
    if params.uri == health::HEALTH_SUMMARY_URI {
        return Some(health::read(client).await);
    }
    None
}
