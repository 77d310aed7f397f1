//! Settings for the manager connection and the MCP server identity
//!
//! Values come from three layers, highest precedence first: CLI flags,
//! environment variables (clap `env` fallbacks, `.env` loaded by the binary),
//! and an optional YAML file passed with `--config`.

use anyhow::{anyhow, bail, Context};
use clap::{Args, ValueEnum};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8000;
pub const DEFAULT_SERVER_NAME: &str = "ceph-storage-assistant";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 5;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Manager password. Never printed by `Debug`.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"********\"")
    }
}

impl FromStr for Password {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// How the HTTP client verifies the manager's certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsMode {
    /// Accept any certificate (self-signed clusters)
    Disabled,
    /// Trust the PEM bundle at this path in addition to the system roots
    CustomCa(PathBuf),
    /// System roots only
    System,
}

/// Raw settings as given on the command line, in the environment or in a
/// YAML file. Every field is optional here; [`Settings`] applies defaults
/// and checks the required ones.
#[derive(Clone, Default, Args, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsArgs {
    /// YAML settings file; flags and environment variables override its values
    #[arg(long, short = 'c', env = "CEPH_MCP_CONFIG")]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Ceph Manager base URL, e.g. https://ceph-mgr:8443
    #[arg(long, env = "CEPH_MANAGER_URL")]
    pub manager_url: Option<String>,

    /// Manager API username
    #[arg(long, env = "CEPH_USERNAME")]
    pub username: Option<String>,

    /// Manager API password
    #[arg(long, env = "CEPH_PASSWORD", hide_env_values = true)]
    pub password: Option<Password>,

    /// Verify the manager's TLS certificate (true/false, yes/no, on/off, 1/0)
    #[arg(long, env = "CEPH_SSL_VERIFY", value_parser = clap::builder::BoolishValueParser::new())]
    pub ssl_verify: Option<bool>,

    /// PEM file with a custom CA for the manager certificate
    #[arg(long, env = "CEPH_CERT_PATH")]
    pub cert_path: Option<PathBuf>,

    /// Listen host for the HTTP transport
    #[arg(long, env = "SERVER_HOST")]
    pub server_host: Option<String>,

    /// Listen port for the HTTP transport
    #[arg(long, env = "SERVER_PORT")]
    pub server_port: Option<u16>,

    /// Server name announced to MCP clients
    #[arg(long, env = "MCP_SERVER_NAME")]
    pub server_name: Option<String>,

    /// Server version announced to MCP clients (MAJOR.MINOR.PATCH)
    #[arg(long, env = "MCP_SERVER_VERSION")]
    pub server_version: Option<String>,

    /// Per-request timeout against the manager API
    #[arg(long, env = "REQUEST_TIMEOUT_SECONDS")]
    pub request_timeout_seconds: Option<u64>,

    /// Attempts per manager API request
    #[arg(long, env = "MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Only read from the YAML file; `--log-format` and `LOG_FORMAT` win over it
    #[arg(skip)]
    pub log_format: Option<LogFormat>,
}

impl fmt::Debug for SettingsArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsArgs")
            .field("config", &self.config)
            .field("manager_url", &self.manager_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("ssl_verify", &self.ssl_verify)
            .field("cert_path", &self.cert_path)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("server_name", &self.server_name)
            .field("server_version", &self.server_version)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("max_retries", &self.max_retries)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl SettingsArgs {
    /// Fill every unset field from `fallback`.
    pub fn or(self, fallback: SettingsArgs) -> SettingsArgs {
        SettingsArgs {
            config: self.config.or(fallback.config),
            manager_url: self.manager_url.or(fallback.manager_url),
            username: self.username.or(fallback.username),
            password: self.password.or(fallback.password),
            ssl_verify: self.ssl_verify.or(fallback.ssl_verify),
            cert_path: self.cert_path.or(fallback.cert_path),
            server_host: self.server_host.or(fallback.server_host),
            server_port: self.server_port.or(fallback.server_port),
            server_name: self.server_name.or(fallback.server_name),
            server_version: self.server_version.or(fallback.server_version),
            request_timeout_seconds: self
                .request_timeout_seconds
                .or(fallback.request_timeout_seconds),
            max_retries: self.max_retries.or(fallback.max_retries),
            log_format: self.log_format.or(fallback.log_format),
        }
    }

    /// Merge with the YAML file (if any), apply defaults and validate.
    pub fn resolve(self) -> anyhow::Result<Settings> {
        let merged = match self.config.clone() {
            Some(path) => self.or(read_yaml(&path)?),
            None => self,
        };
        let settings = Settings::try_from(merged)?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub manager_url: String,
    pub username: String,
    pub password: Password,
    pub ssl_verify: bool,
    pub cert_path: Option<PathBuf>,
    pub server_host: String,
    pub server_port: u16,
    pub server_name: String,
    pub server_version: String,
    pub request_timeout_seconds: u64,
    pub max_retries: u32,
    pub log_format: LogFormat,
}

impl TryFrom<SettingsArgs> for Settings {
    type Error = anyhow::Error;

    fn try_from(args: SettingsArgs) -> anyhow::Result<Self> {
        let manager_url = args
            .manager_url
            .ok_or_else(|| anyhow!("Missing manager URL (set CEPH_MANAGER_URL or --manager-url)"))?;
        let username = args
            .username
            .ok_or_else(|| anyhow!("Missing username (set CEPH_USERNAME or --username)"))?;
        let password = args
            .password
            .ok_or_else(|| anyhow!("Missing password (set CEPH_PASSWORD or --password)"))?;

        Ok(Settings {
            manager_url: manager_url.trim().trim_end_matches('/').to_string(),
            username,
            password,
            ssl_verify: args.ssl_verify.unwrap_or(true),
            // An empty CEPH_CERT_PATH means "no custom CA"
            cert_path: args.cert_path.filter(|p| !p.as_os_str().is_empty()),
            server_host: args
                .server_host
                .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: args.server_port.unwrap_or(DEFAULT_SERVER_PORT),
            server_name: args
                .server_name
                .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_string()),
            server_version: args
                .server_version
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            request_timeout_seconds: args
                .request_timeout_seconds
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECONDS),
            max_retries: args.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            log_format: args.log_format.unwrap_or_default(),
        })
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let settings = Settings::try_from(read_yaml(path)?)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = reqwest::Url::parse(&self.manager_url)
            .with_context(|| format!("Invalid manager URL '{}'", self.manager_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "Manager URL must use http or https, got '{}'",
                url.scheme()
            );
        }
        if url.host_str().is_none() {
            bail!("Manager URL '{}' has no host", self.manager_url);
        }

        if self.username.trim().is_empty() {
            bail!("Username must not be empty");
        }
        if self.max_retries < 1 {
            bail!("max_retries must be at least 1");
        }
        if self.request_timeout_seconds < 1 {
            bail!("request_timeout_seconds must be at least 1");
        }
        if !is_semver(&self.server_version) {
            bail!(
                "Server version '{}' is not MAJOR.MINOR.PATCH",
                self.server_version
            );
        }
        if let Some(path) = &self.cert_path {
            if !path.exists() {
                bail!("Certificate file does not exist: {:?}", path);
            }
        }
        Ok(())
    }

    pub fn tls_mode(&self) -> TlsMode {
        if !self.ssl_verify {
            TlsMode::Disabled
        } else if let Some(path) = &self.cert_path {
            TlsMode::CustomCa(path.clone())
        } else {
            TlsMode::System
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.server_name, self.server_version)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn read_yaml(path: &Path) -> anyhow::Result<SettingsArgs> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;
    serde_yaml::from_str(&content)
        .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))
}

fn is_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}
