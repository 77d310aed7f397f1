//! CephFS filesystems

use super::{int_field, parse_record, percentage, round_to, BYTES_PER_GB};
use serde::Deserialize;
use serde_json::Value;

fn unknown() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MdsMap {
    #[serde(default = "unknown")]
    pub fs_name: String,
}

impl Default for MdsMap {
    fn default() -> Self {
        Self { fs_name: unknown() }
    }
}

/// One entry of `/api/cephfs`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CephFs {
    pub id: i64,
    pub mdsmap: MdsMap,
}

impl CephFs {
    pub fn minimal(raw: &Value) -> Self {
        CephFs {
            id: int_field(raw, "id"),
            mdsmap: MdsMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.mdsmap.fs_name
    }

    pub fn display_name(&self) -> String {
        format!("{} (ID: {})", self.name(), self.id)
    }
}

#[derive(Debug, Clone)]
pub struct CephFsSummary {
    pub filesystems: Vec<CephFs>,
}

impl CephFsSummary {
    pub fn total_filesystems(&self) -> usize {
        self.filesystems.len()
    }

    pub fn names(&self) -> Vec<String> {
        self.filesystems.iter().map(|fs| fs.name().to_string()).collect()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.filesystems.iter().map(|fs| fs.id).collect()
    }

    pub fn find(&self, fs_id: i64) -> Option<&CephFs> {
        self.filesystems.iter().find(|fs| fs.id == fs_id)
    }

    pub fn summary_text(&self) -> String {
        match self.filesystems.as_slice() {
            [] => "No CephFS filesystems found".to_string(),
            [fs] => format!("1 filesystem: {}", fs.display_name()),
            many => format!("{} filesystems: {}", many.len(), self.names().join(", ")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CephFsRank {
    #[serde(default)]
    pub rank: i64,
    #[serde(default = "unknown")]
    pub state: String,
    #[serde(default = "unknown")]
    pub mds: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CephFsPool {
    #[serde(default = "unknown")]
    pub pool: String,
    #[serde(rename = "type", default = "unknown")]
    pub pool_type: String,
    /// Bytes
    #[serde(default)]
    pub used: u64,
    /// Bytes
    #[serde(default)]
    pub avail: u64,
}

impl CephFsPool {
    pub fn used_gb(&self) -> f64 {
        round_to(self.used as f64 / BYTES_PER_GB, 2)
    }

    pub fn total_gb(&self) -> f64 {
        round_to((self.used + self.avail) as f64 / BYTES_PER_GB, 2)
    }

    pub fn used_percent(&self) -> f64 {
        percentage(self.used as f64, (self.used + self.avail) as f64, 1)
    }
}

/// `/api/cephfs/{id}`, under its `cephfs` member
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CephFsDetails {
    pub id: i64,
    pub name: String,
    pub client_count: u64,
    pub ranks: Vec<CephFsRank>,
    pub pools: Vec<CephFsPool>,
}

impl Default for CephFsDetails {
    fn default() -> Self {
        Self {
            id: 0,
            name: unknown(),
            client_count: 0,
            ranks: Vec::new(),
            pools: Vec::new(),
        }
    }
}

impl CephFsDetails {
    /// Falls back to an empty record named "unknown" when the payload does not parse.
    pub fn from_payload(mut payload: Value) -> Self {
        let inner = payload
            .get_mut("cephfs")
            .map(Value::take)
            .unwrap_or_else(|| Value::Object(Default::default()));
        parse_record("cephfs", inner).unwrap_or_default()
    }

    pub fn metadata_pool(&self) -> Option<&CephFsPool> {
        self.pools.iter().find(|p| p.pool_type == "metadata")
    }

    pub fn data_pool(&self) -> Option<&CephFsPool> {
        self.pools.iter().find(|p| p.pool_type == "data")
    }

    pub fn active_ranks(&self) -> usize {
        self.ranks.iter().filter(|r| r.state == "active").count()
    }
}
