//! Ceph daemons (mon, mgr, osd, mds, rgw, ...)

use super::{round_to, str_field, BYTES_PER_GB};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

fn unknown() -> String {
    "unknown".to_string()
}

fn zero_percent() -> String {
    "0%".to_string()
}

/// One entry of `/api/daemon`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Daemon {
    #[serde(default = "unknown")]
    pub daemon_type: String,
    pub daemon_id: String,
    pub daemon_name: String,
    pub hostname: String,

    /// Bytes
    pub memory_usage: u64,
    /// Bytes
    pub memory_request: u64,
    #[serde(default = "zero_percent")]
    pub cpu_percentage: String,

    pub version: String,
    pub status: i64,
    pub status_desc: String,
    pub systemd_unit: String,
    /// RFC 3339 start time
    pub started: String,
}

impl Default for Daemon {
    fn default() -> Self {
        Self {
            daemon_type: unknown(),
            daemon_id: String::new(),
            daemon_name: String::new(),
            hostname: String::new(),
            memory_usage: 0,
            memory_request: 0,
            cpu_percentage: zero_percent(),
            version: String::new(),
            status: 0,
            status_desc: String::new(),
            systemd_unit: String::new(),
            started: String::new(),
        }
    }
}

impl Daemon {
    pub fn minimal(raw: &Value) -> Self {
        Daemon {
            daemon_type: str_field(raw, "daemon_type", "unknown"),
            daemon_id: str_field(raw, "daemon_id", ""),
            daemon_name: str_field(raw, "daemon_name", "unknown"),
            hostname: str_field(raw, "hostname", ""),
            ..Default::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == 1 || self.status_desc.eq_ignore_ascii_case("running")
    }

    pub fn status_display(&self) -> &'static str {
        if self.is_running() {
            "running"
        } else {
            "stopped"
        }
    }

    pub fn memory_usage_gb(&self) -> f64 {
        round_to(self.memory_usage as f64 / BYTES_PER_GB, 2)
    }

    pub fn memory_request_gb(&self) -> f64 {
        round_to(self.memory_request as f64 / BYTES_PER_GB, 2)
    }

    /// "12.5%" -> 12.5; unparsable values read as 0
    pub fn cpu_percentage_value(&self) -> f64 {
        self.cpu_percentage
            .trim()
            .trim_end_matches('%')
            .parse()
            .unwrap_or(0.0)
    }

    pub fn started_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.started).ok()
    }

    pub fn uptime_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.started_at()
            .map(|started| (now - started.with_timezone(&Utc)).num_days())
    }
}

#[derive(Debug, Clone)]
pub struct DaemonTypeSummary {
    pub daemon_type: String,
    pub total_count: usize,
    pub running_count: usize,
    pub stopped_count: usize,
    pub daemon_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DaemonSummary {
    pub daemons: Vec<Daemon>,
    pub running_daemons: usize,
    pub stopped_daemons: usize,
    /// Grouped by type, in first-seen order
    pub daemon_types: Vec<DaemonTypeSummary>,
}

impl DaemonSummary {
    pub fn from_daemons(daemons: Vec<Daemon>) -> Self {
        let mut daemon_types: Vec<DaemonTypeSummary> = Vec::new();
        for daemon in &daemons {
            let idx = match daemon_types
                .iter()
                .position(|t| t.daemon_type == daemon.daemon_type)
            {
                Some(idx) => idx,
                None => {
                    daemon_types.push(DaemonTypeSummary {
                        daemon_type: daemon.daemon_type.clone(),
                        total_count: 0,
                        running_count: 0,
                        stopped_count: 0,
                        daemon_names: Vec::new(),
                    });
                    daemon_types.len() - 1
                }
            };
            let entry = &mut daemon_types[idx];
            entry.total_count += 1;
            if daemon.is_running() {
                entry.running_count += 1;
            } else {
                entry.stopped_count += 1;
            }
            entry.daemon_names.push(daemon.daemon_name.clone());
        }

        let running_daemons = daemons.iter().filter(|d| d.is_running()).count();
        let stopped_daemons = daemons.len() - running_daemons;
        Self {
            daemons,
            running_daemons,
            stopped_daemons,
            daemon_types,
        }
    }

    pub fn total_daemons(&self) -> usize {
        self.daemons.len()
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.daemon_types
            .iter()
            .map(|t| t.daemon_type.as_str())
            .collect()
    }

    pub fn type_summary(&self, daemon_type: &str) -> Option<&DaemonTypeSummary> {
        self.daemon_types
            .iter()
            .find(|t| t.daemon_type == daemon_type)
    }

    pub fn find(&self, hostname: &str, daemon_name: &str) -> Option<&Daemon> {
        self.daemons
            .iter()
            .find(|d| d.daemon_name == daemon_name && d.hostname == hostname)
    }
}

#[derive(Debug, Clone)]
pub struct DaemonTypeInfo {
    pub daemon_type: String,
    pub daemon_names: Vec<String>,
    pub total_count: usize,
    pub running_count: usize,
    pub stopped_count: usize,
}

impl From<&DaemonTypeSummary> for DaemonTypeInfo {
    fn from(summary: &DaemonTypeSummary) -> Self {
        Self {
            daemon_type: summary.daemon_type.clone(),
            daemon_names: summary.daemon_names.clone(),
            total_count: summary.total_count,
            running_count: summary.running_count,
            stopped_count: summary.stopped_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonAction {
    Start,
    Stop,
    Restart,
}

impl DaemonAction {
    pub const ALL: [DaemonAction; 3] = [DaemonAction::Start, DaemonAction::Stop, DaemonAction::Restart];

    pub fn as_str(self) -> &'static str {
        match self {
            DaemonAction::Start => "start",
            DaemonAction::Stop => "stop",
            DaemonAction::Restart => "restart",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            DaemonAction::Start => "started",
            DaemonAction::Stop => "stopped",
            DaemonAction::Restart => "restarted",
        }
    }
}

impl fmt::Display for DaemonAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DaemonAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DaemonAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = DaemonAction::ALL.iter().map(|a| a.as_str()).collect();
                format!("Invalid action '{}'. Valid actions: {}", s, valid.join(", "))
            })
    }
}
