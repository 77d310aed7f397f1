//! MCP tool implementations
//!
//! Each module turns client results for one domain into a [`ToolResponse`].
//! Failures never escape as protocol errors: they become failure envelopes
//! with an error code the assistant can act on.

pub mod cephfs;
pub mod daemon;
pub mod health;
pub mod host;
pub mod osd;
pub mod pool;

use crate::api::CephApiError;
use crate::models::{ErrorCode, ToolResponse};
use std::future::Future;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Api(#[from] CephApiError),

    #[error("{0}")]
    Validation(String),
}

impl ToolError {
    pub fn into_response(self) -> ToolResponse {
        match self {
            ToolError::Api(e) if e.is_authentication() => ToolResponse::failure(
                ErrorCode::Authentication,
                format!("Authentication failed: {}", e),
            ),
            ToolError::Api(e) => {
                ToolResponse::failure(ErrorCode::CephApi, format!("Ceph API error: {}", e))
            }
            ToolError::Validation(msg) => {
                ToolResponse::failure(ErrorCode::Validation, format!("Invalid parameters: {}", msg))
            }
        }
    }
}

/// Run one tool operation, logging entry and outcome.
pub(crate) async fn handle<F>(domain: &'static str, operation: &'static str, fut: F) -> ToolResponse
where
    F: Future<Output = Result<ToolResponse, ToolError>>,
{
    info!(domain, operation, "handling tool request");
    match fut.await {
        Ok(response) => {
            info!(domain, operation, "tool request completed");
            response
        }
        Err(e) => {
            error!(domain, operation, error = %e, "tool request failed");
            e.into_response()
        }
    }
}
