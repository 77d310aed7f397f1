//! Object storage daemons

use super::{int_field, percentage, round_to, unique_in_order, KB_PER_GB};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PerfStat {
    pub commit_latency_ms: f64,
    pub apply_latency_ms: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OsdStats {
    pub num_pgs: u64,
    /// KB
    pub kb: u64,
    pub kb_used: u64,
    pub kb_avail: u64,
    pub perf_stat: PerfStat,
    pub alerts: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OsdTree {
    pub id: i64,
    pub device_class: String,
    #[serde(rename = "type")]
    pub node_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsdHost {
    #[serde(default = "unknown")]
    pub name: String,
}

impl Default for OsdHost {
    fn default() -> Self {
        Self { name: unknown() }
    }
}

fn unknown() -> String {
    "unknown".to_string()
}

fn unit_weight() -> f64 {
    1.0
}

/// One entry of `/api/osd`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Osd {
    pub osd: i64,
    pub id: i64,
    /// 1 = up, 0 = down
    pub up: i64,
    /// 1 = in, 0 = out
    #[serde(rename = "in")]
    pub in_cluster: i64,
    #[serde(default = "unit_weight")]
    pub weight: f64,
    pub operational_status: String,
    pub osd_stats: OsdStats,
    pub tree: OsdTree,
    pub host: OsdHost,
}

impl Default for Osd {
    fn default() -> Self {
        Self {
            osd: 0,
            id: 0,
            up: 0,
            in_cluster: 0,
            weight: unit_weight(),
            operational_status: String::new(),
            osd_stats: OsdStats::default(),
            tree: OsdTree::default(),
            host: OsdHost::default(),
        }
    }
}

impl Osd {
    pub fn minimal(raw: &Value) -> Self {
        Osd {
            osd: int_field(raw, "osd"),
            id: int_field(raw, "id"),
            up: int_field(raw, "up"),
            in_cluster: int_field(raw, "in"),
            ..Default::default()
        }
    }

    pub fn is_up(&self) -> bool {
        self.up == 1
    }

    pub fn is_in(&self) -> bool {
        self.in_cluster == 1
    }

    pub fn is_working(&self) -> bool {
        self.operational_status.eq_ignore_ascii_case("working")
    }

    /// e.g. "up/in (working)"
    pub fn status_display(&self) -> String {
        format!(
            "{}/{} ({})",
            if self.is_up() { "up" } else { "down" },
            if self.is_in() { "in" } else { "out" },
            self.operational_status
        )
    }

    pub fn capacity_gb(&self) -> f64 {
        round_to(self.osd_stats.kb as f64 / KB_PER_GB, 2)
    }

    pub fn used_gb(&self) -> f64 {
        round_to(self.osd_stats.kb_used as f64 / KB_PER_GB, 2)
    }

    pub fn available_gb(&self) -> f64 {
        round_to(self.osd_stats.kb_avail as f64 / KB_PER_GB, 2)
    }

    pub fn usage_percentage(&self) -> f64 {
        percentage(self.osd_stats.kb_used as f64, self.osd_stats.kb as f64, 2)
    }

    pub fn device_class(&self) -> &str {
        if self.tree.device_class.is_empty() {
            "unknown"
        } else {
            &self.tree.device_class
        }
    }

    pub fn hostname(&self) -> &str {
        &self.host.name
    }
}

#[derive(Debug, Clone)]
pub struct DeviceClassSummary {
    pub device_class: String,
    pub osd_count: usize,
    pub total_pgs: u64,
    pub total_capacity_kb: u64,
    pub total_used_kb: u64,
    pub total_available_kb: u64,
}

impl DeviceClassSummary {
    pub fn capacity_gb(&self) -> f64 {
        round_to(self.total_capacity_kb as f64 / KB_PER_GB, 2)
    }

    pub fn used_gb(&self) -> f64 {
        round_to(self.total_used_kb as f64 / KB_PER_GB, 2)
    }

    pub fn available_gb(&self) -> f64 {
        round_to(self.total_available_kb as f64 / KB_PER_GB, 2)
    }
}

#[derive(Debug, Clone)]
pub struct OsdSummary {
    pub osds: Vec<Osd>,
    pub up_osds: usize,
    pub in_osds: usize,
    pub working_osds: usize,
    pub unique_hosts: Vec<String>,
    pub device_classes: Vec<DeviceClassSummary>,
}

impl OsdSummary {
    pub fn from_osds(osds: Vec<Osd>) -> Self {
        let unique_hosts = unique_in_order(osds.iter().map(|o| o.hostname().to_string()));

        let mut device_classes: Vec<DeviceClassSummary> = Vec::new();
        for osd in &osds {
            let class = osd.device_class();
            let idx = match device_classes.iter().position(|c| c.device_class == class) {
                Some(idx) => idx,
                None => {
                    device_classes.push(DeviceClassSummary {
                        device_class: class.to_string(),
                        osd_count: 0,
                        total_pgs: 0,
                        total_capacity_kb: 0,
                        total_used_kb: 0,
                        total_available_kb: 0,
                    });
                    device_classes.len() - 1
                }
            };
            let entry = &mut device_classes[idx];
            entry.osd_count += 1;
            entry.total_pgs += osd.osd_stats.num_pgs;
            entry.total_capacity_kb += osd.osd_stats.kb;
            entry.total_used_kb += osd.osd_stats.kb_used;
            entry.total_available_kb += osd.osd_stats.kb_avail;
        }

        Self {
            up_osds: osds.iter().filter(|o| o.is_up()).count(),
            in_osds: osds.iter().filter(|o| o.is_in()).count(),
            working_osds: osds.iter().filter(|o| o.is_working()).count(),
            unique_hosts,
            device_classes,
            osds,
        }
    }

    pub fn total_osds(&self) -> usize {
        self.osds.len()
    }

    pub fn down_osds(&self) -> usize {
        self.osds.len() - self.up_osds
    }

    pub fn out_osds(&self) -> usize {
        self.osds.len() - self.in_osds
    }

    pub fn up_percentage(&self) -> f64 {
        percentage(self.up_osds as f64, self.osds.len() as f64, 1)
    }

    pub fn find(&self, osd_id: i64) -> Option<&Osd> {
        self.osds.iter().find(|o| o.osd == osd_id)
    }

    pub fn ids(&self) -> Vec<i64> {
        self.osds.iter().map(|o| o.osd).collect()
    }
}

#[derive(Debug, Clone)]
pub struct OsdHostMapping {
    pub osd_id: i64,
    pub hostname: String,
}

#[derive(Debug, Clone)]
pub struct OsdIdInfo {
    pub mappings: Vec<OsdHostMapping>,
}

impl OsdIdInfo {
    pub fn from_summary(summary: &OsdSummary) -> Self {
        Self {
            mappings: summary
                .osds
                .iter()
                .map(|o| OsdHostMapping {
                    osd_id: o.osd,
                    hostname: o.hostname().to_string(),
                })
                .collect(),
        }
    }

    pub fn total_count(&self) -> usize {
        self.mappings.len()
    }

    pub fn unique_host_count(&self) -> usize {
        unique_in_order(self.mappings.iter().map(|m| m.hostname.clone())).len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsdMarkAction {
    Noout,
    Out,
    In,
}

impl OsdMarkAction {
    pub const ALL: [OsdMarkAction; 3] = [OsdMarkAction::Noout, OsdMarkAction::Out, OsdMarkAction::In];

    pub fn as_str(self) -> &'static str {
        match self {
            OsdMarkAction::Noout => "noout",
            OsdMarkAction::Out => "out",
            OsdMarkAction::In => "in",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            OsdMarkAction::Out => "marked out (excluded from data placement)",
            OsdMarkAction::Noout => "marked noout (prevented from being automatically marked out)",
            OsdMarkAction::In => "marked in (included back into data placement)",
        }
    }
}

impl fmt::Display for OsdMarkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsdMarkAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OsdMarkAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = OsdMarkAction::ALL.iter().map(|a| a.as_str()).collect();
                format!("Invalid action '{}'. Valid actions: {}", s, valid.join(", "))
            })
    }
}
