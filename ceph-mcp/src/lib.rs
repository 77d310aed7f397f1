//! Ceph MCP server
//!
//! Exposes the Ceph Manager REST API to AI assistants through the
//! Model Context Protocol. The crate is split into:
//!
//! - [`config`]: connection and server settings (CLI flags, env vars, YAML)
//! - [`api`]: authenticated manager API client
//! - [`models`]: typed views over the manager payloads
//! - [`mcp`]: tool handlers, resources and the rmcp server

pub mod api;
pub mod config;
pub mod mcp;
pub mod models;

pub use api::{CephApiError, CephClient};
pub use config::{LogFormat, Settings, SettingsArgs, TlsMode};
pub use mcp::CephMcpServer;
