//! Typed views over manager API payloads
//!
//! Every model deserializes leniently: missing or `null` fields fall back to
//! defaults, and a listing element that still fails to parse is replaced by a
//! minimal record instead of failing the whole listing.

pub mod cephfs;
pub mod daemon;
pub mod health;
pub mod host;
pub mod osd;
pub mod pool;
pub mod response;

pub use cephfs::{CephFs, CephFsDetails, CephFsPool, CephFsRank, CephFsSummary};
pub use daemon::{Daemon, DaemonAction, DaemonSummary, DaemonTypeInfo, DaemonTypeSummary};
pub use health::{ClusterCapacity, ClusterHealth, HealthCheck, HealthCheckSeverity, HealthStatus};
pub use host::{Host, HostSummary, ServiceInstance};
pub use osd::{DeviceClassSummary, Osd, OsdIdInfo, OsdMarkAction, OsdSummary};
pub use pool::{Pool, PoolStateSummary, PoolSummary, PoolTypeSummary};
pub use response::{ActionOutcome, ErrorCode, ToolResponse};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

pub(crate) const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
pub(crate) const KB_PER_GB: f64 = 1024.0 * 1024.0;

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Decimal text for a rounded value. Whole values keep one fractional
/// digit, so 32 prints as "32.0" and 25.47 as "25.47".
pub(crate) fn decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Percentage of `part` in `whole`, 0 when `whole` is 0.
pub(crate) fn percentage(part: f64, whole: f64, places: i32) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        round_to(part / whole * 100.0, places)
    }
}

/// Drop `null` object members so serde defaults apply to them.
pub(crate) fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Deserialize one record, `None` (after logging) when it does not fit `T`.
pub(crate) fn parse_record<T: DeserializeOwned>(kind: &'static str, mut value: Value) -> Option<T> {
    strip_nulls(&mut value);
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(kind, error = %e, "failed to parse record");
            None
        }
    }
}

/// Parse a listing payload. A non-array payload counts as empty; elements
/// that fail to parse are replaced by `fallback(element)`.
pub(crate) fn parse_listing<T, F>(kind: &'static str, payload: Value, fallback: F) -> Vec<T>
where
    T: DeserializeOwned,
    F: Fn(&Value) -> T,
{
    let Value::Array(items) = payload else {
        if !payload.is_null() {
            warn!(kind, "listing payload is not an array, treating as empty");
        }
        return Vec::new();
    };

    items
        .into_iter()
        .map(|item| match parse_record(kind, item.clone()) {
            Some(record) => record,
            None => fallback(&item),
        })
        .collect()
}

pub(crate) fn str_field(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

pub(crate) fn int_field(value: &Value, key: &str) -> i64 {
    value.get(key).and_then(Value::as_i64).unwrap_or(0)
}

/// Keep the first occurrence of every item, in order.
pub(crate) fn unique_in_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = Vec::new();
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}
