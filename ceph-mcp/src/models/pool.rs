//! Storage pools

use super::{percentage, round_to, str_field, unique_in_order};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

const ACTIVE_CLEAN: &str = "active+clean";

fn unknown() -> String {
    "unknown".to_string()
}

fn default_pg_num_max() -> u64 {
    32
}

fn default_pg_num_min() -> u64 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolOptions {
    #[serde(default = "default_pg_num_max")]
    pub pg_num_max: u64,
    #[serde(default = "default_pg_num_min")]
    pub pg_num_min: u64,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            pg_num_max: default_pg_num_max(),
            pg_num_min: default_pg_num_min(),
        }
    }
}

/// One entry of `/api/pool?stats=true`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Pool {
    #[serde(default = "unknown")]
    pub pool_name: String,
    #[serde(rename = "type")]
    pub pool_type: String,
    pub size: u64,
    pub min_size: u64,
    pub crush_rule: String,

    pub pg_num: u64,
    pub pg_placement_num: u64,
    pub pg_placement_num_target: u64,
    pub pg_num_target: u64,

    pub options: PoolOptions,
    pub application_metadata: Vec<String>,
    /// PG count per state, e.g. `{"active+clean": 32}`
    pub pg_status: BTreeMap<String, u64>,
}

impl Default for Pool {
    fn default() -> Self {
        Self {
            pool_name: unknown(),
            pool_type: String::new(),
            size: 0,
            min_size: 0,
            crush_rule: String::new(),
            pg_num: 0,
            pg_placement_num: 0,
            pg_placement_num_target: 0,
            pg_num_target: 0,
            options: PoolOptions::default(),
            application_metadata: Vec::new(),
            pg_status: BTreeMap::new(),
        }
    }
}

impl Pool {
    pub fn minimal(raw: &Value) -> Self {
        Pool {
            pool_name: str_field(raw, "pool_name", "unknown"),
            pool_type: str_field(raw, "type", "unknown"),
            ..Default::default()
        }
    }

    pub fn is_replicated(&self) -> bool {
        self.pool_type.eq_ignore_ascii_case("replicated")
    }

    pub fn is_erasure(&self) -> bool {
        self.pool_type.eq_ignore_ascii_case("erasure")
    }

    pub fn total_pgs(&self) -> u64 {
        self.pg_status.values().sum()
    }

    /// PGs in any state containing "active"
    pub fn active_pgs(&self) -> u64 {
        self.pg_status
            .iter()
            .filter(|(state, _)| state.to_lowercase().contains("active"))
            .map(|(_, count)| count)
            .sum()
    }

    pub fn pg_states(&self) -> Vec<&str> {
        self.pg_status.keys().map(String::as_str).collect()
    }

    pub fn is_healthy(&self) -> bool {
        let total = self.total_pgs();
        total > 0 && self.pg_status.get(ACTIVE_CLEAN).copied().unwrap_or(0) == total
    }

    pub fn primary_applications(&self) -> String {
        if self.application_metadata.is_empty() {
            "none".to_string()
        } else {
            self.application_metadata.join(", ")
        }
    }

    /// "min_size/size"
    pub fn replica_info(&self) -> String {
        format!("{}/{}", self.min_size, self.size)
    }

    pub fn pg_efficiency(&self) -> f64 {
        percentage(self.active_pgs() as f64, self.total_pgs() as f64, 1)
    }
}

#[derive(Debug, Clone)]
pub struct PoolTypeSummary {
    pub pool_type: String,
    pub count: usize,
    pub pool_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PoolStateSummary {
    pub state: String,
    pub pool_count: usize,
    pub total_pgs: u64,
}

#[derive(Debug, Clone)]
pub struct PoolSummary {
    pub pools: Vec<Pool>,
    pub pool_types: Vec<PoolTypeSummary>,
    pub pg_states: BTreeMap<String, PoolStateSummary>,
    pub healthy_pools: usize,
}

impl PoolSummary {
    pub fn from_pools(pools: Vec<Pool>) -> Self {
        let mut pool_types: Vec<PoolTypeSummary> = Vec::new();
        let mut pg_states: BTreeMap<String, PoolStateSummary> = BTreeMap::new();

        for pool in &pools {
            match pool_types.iter_mut().find(|t| t.pool_type == pool.pool_type) {
                Some(entry) => {
                    entry.count += 1;
                    entry.pool_names.push(pool.pool_name.clone());
                }
                None => pool_types.push(PoolTypeSummary {
                    pool_type: pool.pool_type.clone(),
                    count: 1,
                    pool_names: vec![pool.pool_name.clone()],
                }),
            }

            for (state, count) in &pool.pg_status {
                let entry = pg_states
                    .entry(state.clone())
                    .or_insert_with(|| PoolStateSummary {
                        state: state.clone(),
                        pool_count: 0,
                        total_pgs: 0,
                    });
                entry.pool_count += 1;
                entry.total_pgs += count;
            }
        }

        Self {
            healthy_pools: pools.iter().filter(|p| p.is_healthy()).count(),
            pools,
            pool_types,
            pg_states,
        }
    }

    pub fn total_pools(&self) -> usize {
        self.pools.len()
    }

    pub fn replicated_pools(&self) -> usize {
        self.pools.iter().filter(|p| p.is_replicated()).count()
    }

    pub fn erasure_pools(&self) -> usize {
        self.pools.iter().filter(|p| p.is_erasure()).count()
    }

    pub fn unhealthy_pools(&self) -> usize {
        self.pools.len() - self.healthy_pools
    }

    pub fn total_pgs(&self) -> u64 {
        self.pools.iter().map(Pool::total_pgs).sum()
    }

    pub fn pool_names(&self) -> Vec<String> {
        self.pools.iter().map(|p| p.pool_name.clone()).collect()
    }

    pub fn unique_applications(&self) -> Vec<String> {
        unique_in_order(
            self.pools
                .iter()
                .flat_map(|p| p.application_metadata.iter().cloned()),
        )
    }

    pub fn average_pool_size(&self) -> f64 {
        if self.pools.is_empty() {
            return 0.0;
        }
        let total: u64 = self.pools.iter().map(|p| p.size).sum();
        round_to(total as f64 / self.pools.len() as f64, 1)
    }

    pub fn find(&self, pool_name: &str) -> Option<&Pool> {
        self.pools.iter().find(|p| p.pool_name == pool_name)
    }
}
