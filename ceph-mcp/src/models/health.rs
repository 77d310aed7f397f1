//! Cluster health and capacity

use super::{decimal, percentage, round_to, BYTES_PER_GB};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Ok,
    Warn,
    Err,
}

impl HealthStatus {
    /// Unknown values are treated as `HEALTH_ERR`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "HEALTH_OK" => HealthStatus::Ok,
            "HEALTH_WARN" => HealthStatus::Warn,
            "HEALTH_ERR" => HealthStatus::Err,
            other => {
                warn!(status = other, "unknown health status received");
                HealthStatus::Err
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Ok => "HEALTH_OK",
            HealthStatus::Warn => "HEALTH_WARN",
            HealthStatus::Err => "HEALTH_ERR",
        }
    }

    fn emoji(self) -> &'static str {
        match self {
            HealthStatus::Ok => "🟢",
            HealthStatus::Warn => "🟡",
            HealthStatus::Err => "🔴",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthCheckSeverity {
    Info,
    Warn,
    Err,
    Unknown,
}

impl HealthCheckSeverity {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "HEALTH_INFO" => HealthCheckSeverity::Info,
            "HEALTH_WARN" => HealthCheckSeverity::Warn,
            "HEALTH_ERR" => HealthCheckSeverity::Err,
            _ => HealthCheckSeverity::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthCheckSeverity::Info => "HEALTH_INFO",
            HealthCheckSeverity::Warn => "HEALTH_WARN",
            HealthCheckSeverity::Err => "HEALTH_ERR",
            HealthCheckSeverity::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub check_type: String,
    pub severity: HealthCheckSeverity,
    pub summary: String,
    /// Detail messages joined with ", "
    pub details: String,
    pub count: u64,
}

impl HealthCheck {
    fn from_value(check_type: Option<&str>, raw: &Value) -> Self {
        let summary = raw.get("summary");
        let details = raw
            .get("detail")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|d| d.get("message").and_then(Value::as_str).unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        Self {
            check_type: raw
                .get("type")
                .and_then(Value::as_str)
                .or(check_type)
                .unwrap_or("unknown")
                .to_string(),
            severity: HealthCheckSeverity::parse(
                raw.get("severity").and_then(Value::as_str).unwrap_or(""),
            ),
            summary: summary
                .and_then(|s| s.get("message"))
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            details,
            count: summary
                .and_then(|s| s.get("count"))
                .and_then(Value::as_u64)
                .unwrap_or(0),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == HealthCheckSeverity::Err
    }

    pub fn is_warning(&self) -> bool {
        self.severity == HealthCheckSeverity::Warn
    }

    pub fn priority_score(&self) -> u32 {
        match self.severity {
            HealthCheckSeverity::Err => 100,
            HealthCheckSeverity::Warn => 50,
            HealthCheckSeverity::Info => 10,
            HealthCheckSeverity::Unknown => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClusterHealth {
    pub cluster_fsid: String,
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub description: String,
    pub collected_at: DateTime<Utc>,
}

impl ClusterHealth {
    /// Build from the `/api/health/minimal` payload and the cluster fsid.
    ///
    /// `health.checks` is usually a list of check objects; a map keyed by
    /// check type is accepted as well.
    pub fn from_minimal(cluster_fsid: String, payload: &Value) -> Self {
        let health = payload.get("health").unwrap_or(&Value::Null);
        let status = HealthStatus::parse(
            health
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or("HEALTH_ERR"),
        );

        let checks: Vec<HealthCheck> = match health.get("checks") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|c| HealthCheck::from_value(None, c))
                .collect(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(name, c)| HealthCheck::from_value(Some(name.as_str()), c))
                .collect(),
            _ => Vec::new(),
        };

        let description = describe(status, &checks);
        Self {
            cluster_fsid,
            status,
            checks,
            description,
            collected_at: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Ok
    }

    pub fn has_warnings(&self) -> bool {
        self.status == HealthStatus::Warn || self.checks.iter().any(HealthCheck::is_warning)
    }

    pub fn has_errors(&self) -> bool {
        self.status == HealthStatus::Err || self.checks.iter().any(HealthCheck::is_critical)
    }

    pub fn critical_checks(&self) -> Vec<&HealthCheck> {
        self.checks.iter().filter(|c| c.is_critical()).collect()
    }

    pub fn warning_checks(&self) -> Vec<&HealthCheck> {
        self.checks.iter().filter(|c| c.is_warning()).collect()
    }

    /// Most urgent first; equal priorities keep their original order.
    pub fn checks_by_priority(&self) -> Vec<&HealthCheck> {
        let mut sorted: Vec<&HealthCheck> = self.checks.iter().collect();
        sorted.sort_by(|a, b| b.priority_score().cmp(&a.priority_score()));
        sorted
    }

    /// 0-100, where 100 is a healthy cluster
    pub fn health_score(&self) -> u32 {
        if self.is_healthy() {
            return 100;
        }
        let penalty: u32 = self
            .checks
            .iter()
            .map(|c| {
                if c.is_critical() {
                    30
                } else if c.is_warning() {
                    10
                } else {
                    0
                }
            })
            .sum();
        100u32.saturating_sub(penalty)
    }

    pub fn recommendations(&self) -> Vec<String> {
        if self.is_healthy() {
            return vec!["Cluster is healthy - continue regular monitoring".to_string()];
        }

        let mut out = Vec::new();
        let critical = self.critical_checks();
        let warnings = self.warning_checks();

        if !critical.is_empty() {
            out.push(format!(
                "🔴 Address {} critical issue(s) immediately",
                critical.len()
            ));
            out.extend(critical.iter().take(3).map(|c| format!("   - {}", c.summary)));
        }
        if !warnings.is_empty() {
            out.push(format!(
                "🟡 Investigate {} warning(s) when possible",
                warnings.len()
            ));
            out.extend(warnings.iter().take(2).map(|c| format!("   - {}", c.summary)));
        }
        out.push("📊 Monitor cluster status regularly for changes".to_string());
        out
    }

    pub fn executive_summary(&self) -> String {
        let emoji = self.status.emoji();
        let score = self.health_score();
        if self.is_healthy() {
            format!("{} Cluster is healthy (Score: {}/100)", emoji, score)
        } else {
            format!(
                "{} Cluster has {} issue(s) requiring attention (Score: {}/100)",
                emoji,
                self.checks.len(),
                score
            )
        }
    }
}

fn describe(status: HealthStatus, checks: &[HealthCheck]) -> String {
    match status {
        HealthStatus::Ok => "Cluster is operating normally with no issues detected.".to_string(),
        HealthStatus::Warn => format!(
            "Cluster has {} warnings that should be investigated.",
            checks.iter().filter(|c| c.is_warning()).count()
        ),
        HealthStatus::Err => format!(
            "Cluster has {} errors requiring immediate attention.",
            checks.iter().filter(|c| c.is_critical()).count()
        ),
    }
}

/// `/api/health/get_cluster_capacity`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClusterCapacity {
    pub total_avail_bytes: u64,
    pub total_bytes: u64,
    pub total_used_raw_bytes: u64,
    pub total_objects: u64,
    pub total_pool_bytes_used: u64,
    /// Bytes; the manager reports a mean, so it can be fractional
    pub average_object_size: f64,
}

impl ClusterCapacity {
    pub fn total_gb(&self) -> f64 {
        round_to(self.total_bytes as f64 / BYTES_PER_GB, 2)
    }

    pub fn used_gb(&self) -> f64 {
        round_to(self.total_used_raw_bytes as f64 / BYTES_PER_GB, 2)
    }

    pub fn available_gb(&self) -> f64 {
        round_to(self.total_avail_bytes as f64 / BYTES_PER_GB, 2)
    }

    pub fn pool_used_gb(&self) -> f64 {
        round_to(self.total_pool_bytes_used as f64 / BYTES_PER_GB, 2)
    }

    pub fn usage_percentage(&self) -> f64 {
        percentage(
            self.total_used_raw_bytes as f64,
            self.total_bytes as f64,
            1,
        )
    }

    pub fn average_object_size_kb(&self) -> f64 {
        round_to(self.average_object_size / 1024.0, 2)
    }

    pub fn summary(&self) -> String {
        format!(
            "{}GB used of {}GB total ({}% used)",
            decimal(self.used_gb()),
            decimal(self.total_gb()),
            decimal(self.usage_percentage())
        )
    }
}
