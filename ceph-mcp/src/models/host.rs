//! Cluster hosts

use super::{round_to, str_field, KB_PER_GB};
use serde::Deserialize;
use serde_json::Value;

fn unknown() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInstance {
    #[serde(rename = "type", default = "unknown")]
    pub service_type: String,
    #[serde(default)]
    pub count: u64,
}

/// One entry of `/api/host?facts=true`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Host {
    #[serde(default = "unknown")]
    pub hostname: String,
    pub addr: String,
    pub status: String,
    pub labels: Vec<String>,
    pub service_instances: Vec<ServiceInstance>,

    pub arch: String,
    pub cpu_cores: u64,
    pub cpu_count: u64,
    pub cpu_threads: u64,
    pub cpu_model: String,

    pub memory_total_kb: u64,
    pub memory_available_kb: u64,
    pub memory_free_kb: u64,

    pub operating_system: String,
    pub kernel: String,
    pub fqdn: String,
    pub shortname: String,
    /// Seconds
    pub system_uptime: f64,
    pub timestamp: f64,
}

impl Host {
    /// Identifying fields only, for entries that fail to parse.
    pub fn minimal(raw: &Value) -> Self {
        Host {
            hostname: str_field(raw, "hostname", "unknown"),
            addr: str_field(raw, "addr", ""),
            status: str_field(raw, "status", ""),
            ..Default::default()
        }
    }

    /// An empty status also counts as online.
    pub fn is_online(&self) -> bool {
        self.status.is_empty() || self.status.eq_ignore_ascii_case("online")
    }

    pub fn status_display(&self) -> &str {
        if self.is_online() {
            "online"
        } else {
            &self.status
        }
    }

    pub fn memory_total_gb(&self) -> f64 {
        round_to(self.memory_total_kb as f64 / KB_PER_GB, 2)
    }

    pub fn memory_free_gb(&self) -> f64 {
        round_to(self.memory_free_kb as f64 / KB_PER_GB, 2)
    }

    pub fn memory_available_gb(&self) -> f64 {
        round_to(self.memory_available_kb as f64 / KB_PER_GB, 2)
    }

    pub fn memory_used_gb(&self) -> f64 {
        round_to(self.memory_total_gb() - self.memory_free_gb(), 2)
    }

    pub fn memory_usage_percentage(&self) -> f64 {
        let total = self.memory_total_gb();
        if total > 0.0 {
            round_to((total - self.memory_free_gb()) / total * 100.0, 1)
        } else {
            0.0
        }
    }

    pub fn service_summary(&self) -> String {
        if self.service_instances.is_empty() {
            return "No services".to_string();
        }
        self.service_instances
            .iter()
            .map(|s| format!("{}({})", s.service_type, s.count))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn uptime_days(&self) -> f64 {
        round_to(self.system_uptime / 86_400.0, 1)
    }

    pub fn matches(&self, name: &str) -> bool {
        self.hostname == name || self.shortname == name || self.fqdn == name
    }
}

#[derive(Debug, Clone)]
pub struct HostSummary {
    pub hosts: Vec<Host>,
    pub online_hosts: usize,
    pub offline_hosts: usize,
}

impl HostSummary {
    pub fn from_hosts(hosts: Vec<Host>) -> Self {
        let online_hosts = hosts.iter().filter(|h| h.is_online()).count();
        let offline_hosts = hosts.len() - online_hosts;
        Self {
            hosts,
            online_hosts,
            offline_hosts,
        }
    }

    pub fn total_hosts(&self) -> usize {
        self.hosts.len()
    }

    pub fn online_percentage(&self) -> f64 {
        super::percentage(self.online_hosts as f64, self.hosts.len() as f64, 1)
    }

    /// Match on hostname, short name or FQDN
    pub fn find(&self, name: &str) -> Option<&Host> {
        self.hosts.iter().find(|h| h.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_listing;
    use serde_json::json;

    fn listing() -> Value {
        json!([
            {
                "hostname": "node-1",
                "addr": "10.0.0.1",
                "status": "",
                "labels": ["_admin"],
                "service_instances": [{"type": "mon", "count": 1}, {"type": "osd", "count": 2}],
                "memory_total_kb": 16777216,
                "memory_free_kb": 4194304,
                "fqdn": "node-1.lab.local",
                "shortname": "node-1",
                "system_uptime": 172800.0,
                "cpu_model": null
            },
            {
                "hostname": "node-2",
                "addr": "10.0.0.2",
                "status": "maintenance",
                "cpu_cores": "eight"
            }
        ])
    }

    #[test]
    fn parses_listing_with_fallback() {
        let hosts = parse_listing("host", listing(), Host::minimal);
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].cpu_model, "");
        assert_eq!(hosts[1].hostname, "node-2");
        assert_eq!(hosts[1].status, "maintenance");
        assert_eq!(hosts[1].cpu_cores, 0);
    }

    #[test]
    fn derived_values() {
        let hosts = parse_listing("host", listing(), Host::minimal);
        let host = &hosts[0];
        assert!(host.is_online());
        assert_eq!(host.status_display(), "online");
        assert_eq!(host.memory_total_gb(), 16.0);
        assert_eq!(host.memory_used_gb(), 12.0);
        assert_eq!(host.memory_usage_percentage(), 75.0);
        assert_eq!(host.service_summary(), "mon(1), osd(2)");
        assert_eq!(host.uptime_days(), 2.0);
        assert_eq!(hosts[1].status_display(), "maintenance");
        assert_eq!(hosts[1].service_summary(), "No services");
    }

    #[test]
    fn summary_counts_and_lookup() {
        let summary = HostSummary::from_hosts(parse_listing("host", listing(), Host::minimal));
        assert_eq!(summary.total_hosts(), 2);
        assert_eq!(summary.online_hosts, 1);
        assert_eq!(summary.offline_hosts, 1);
        assert_eq!(summary.online_percentage(), 50.0);
        assert!(summary.find("node-1.lab.local").is_some());
        assert!(summary.find("node-3").is_none());
    }

    #[test]
    fn status_is_case_insensitive() {
        let host = Host {
            status: "Online".into(),
            ..Default::default()
        };
        assert!(host.is_online());
    }
}
