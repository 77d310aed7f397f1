//! Ceph Manager REST API client
//!
//! [`CephClient`] handles authentication, versioned media types and retries.
//! The endpoint modules add one `impl CephClient` block per domain.

mod auth;
mod client;
mod error;

mod cephfs;
mod daemon;
mod health;
mod host;
mod osd;
mod pool;

pub use client::{ApiVersion, CephClient};
pub use error::{CephApiError, Result};
