//! Cluster health and capacity tools

use super::{handle, ToolError};
use crate::api::CephClient;
use crate::models::{ClusterHealth, HealthCheck, ToolResponse};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DEFAULT_MAX_RECOMMENDATIONS: u32 = 10;
const MAX_RECOMMENDATIONS_LIMIT: u32 = 50;

pub async fn get_health_summary(client: &CephClient) -> ToolResponse {
    handle("health", "get_health_summary", async {
        let health = client.get_cluster_health().await?;
        Ok::<_, ToolError>(summary_response(&health))
    })
    .await
}

pub(crate) fn summary_response(health: &ClusterHealth) -> ToolResponse {
    let critical = health.critical_checks().len();
    let warnings = health.warning_checks().len();

    let data = json!({
        "executive_summary": health.executive_summary(),
        "health_score": health.health_score(),
        "status": health.status.as_str(),
        "cluster_fsid": health.cluster_fsid,
        "is_healthy": health.is_healthy(),
        "has_warnings": health.has_warnings(),
        "has_errors": health.has_errors(),
        "description": health.description,
        "checks_summary": {
            "total": health.checks.len(),
            "critical": critical,
            "warnings": warnings,
        },
        "recommendations": health.recommendations(),
    });

    let message = if health.is_healthy() {
        format!("Cluster is healthy (Score: {}/100)", health.health_score())
    } else if health.has_errors() {
        format!(
            "Cluster has {} critical issue(s) requiring immediate attention",
            critical
        )
    } else {
        format!(
            "Cluster has {} warning(s) that should be investigated",
            warnings
        )
    };

    ToolResponse::success(message, data)
}

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct HealthDetailsParams {
    /// Only return checks with this severity (HEALTH_ERR, HEALTH_WARN or HEALTH_INFO)
    pub severity: Option<String>,
}

pub async fn get_health_details(client: &CephClient, params: HealthDetailsParams) -> ToolResponse {
    handle("health", "get_health_details", async {
        let health = client.get_cluster_health().await?;
        Ok::<_, ToolError>(details_response(&health, params.severity.as_deref()))
    })
    .await
}

fn details_response(health: &ClusterHealth, severity: Option<&str>) -> ToolResponse {
    let severity = severity.filter(|s| !s.is_empty());
    let checks: Vec<&HealthCheck> = health
        .checks_by_priority()
        .into_iter()
        .filter(|c| severity.map_or(true, |s| c.severity.as_str() == s))
        .collect();

    let critical = checks.iter().filter(|c| c.is_critical()).count();
    let warnings = checks.iter().filter(|c| c.is_warning()).count();

    let data = json!({
        "overall_status": health.status.as_str(),
        "health_score": health.health_score(),
        "description": health.description,
        "checks": checks.iter().map(|c| json!({
            "type": c.check_type,
            "severity": c.severity.as_str(),
            "summary": c.summary,
            "detail": c.details,
            "count": c.count,
            "is_critical": c.is_critical(),
            "is_warning": c.is_warning(),
            "priority_score": c.priority_score(),
        })).collect::<Vec<_>>(),
        "check_statistics": {
            "total_checks": checks.len(),
            "critical_count": critical,
            "warning_count": warnings,
            "filtered_by_severity": severity,
        },
        "recommendations": health.recommendations(),
    });

    let message = if checks.is_empty() {
        match severity {
            Some(s) => format!("No health checks found with severity '{}'", s),
            None => "Cluster is healthy with no active health checks".to_string(),
        }
    } else {
        let mut parts = Vec::new();
        if critical > 0 {
            parts.push(format!("{} critical issue(s)", critical));
        }
        if warnings > 0 {
            parts.push(format!("{} warning(s)", warnings));
        }
        if parts.is_empty() {
            format!("Found {} informational health check(s)", checks.len())
        } else {
            format!("Found {} requiring attention", parts.join(" and "))
        }
    };

    ToolResponse::success(message, data)
}

fn default_max_recommendations() -> u32 {
    DEFAULT_MAX_RECOMMENDATIONS
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct RecommendationsParams {
    /// Only return the most urgent items
    #[serde(default)]
    pub priority_only: bool,
    /// Maximum number of recommendations, 1 to 50 (default 10)
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: u32,
}

impl Default for RecommendationsParams {
    fn default() -> Self {
        Self {
            priority_only: false,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

pub async fn get_health_recommendations(
    client: &CephClient,
    params: RecommendationsParams,
) -> ToolResponse {
    handle("health", "get_health_recommendations", async {
        let health = client.get_cluster_health().await?;
        Ok::<_, ToolError>(recommendations_response(&health, &params))
    })
    .await
}

fn recommendations_response(health: &ClusterHealth, params: &RecommendationsParams) -> ToolResponse {
    let max_items = params
        .max_recommendations
        .clamp(1, MAX_RECOMMENDATIONS_LIMIT);
    let all = health.recommendations();

    let mut recommendations = if params.priority_only {
        priority_recommendations(health)
    } else {
        all.clone()
    };
    recommendations.truncate(max_items as usize);

    let mut message = format!(
        "Generated {} health recommendations",
        recommendations.len()
    );
    if params.priority_only {
        message.push_str(" (priority items only)");
    }

    let data = json!({
        "recommendations": recommendations,
        "health_score": health.health_score(),
        "priority_filter_applied": params.priority_only,
        "max_items": max_items,
        "total_available": all.len(),
        "cluster_status": health.status.as_str(),
    });

    ToolResponse::success(message, data)
}

fn priority_recommendations(health: &ClusterHealth) -> Vec<String> {
    let critical = health.critical_checks();
    if !critical.is_empty() {
        return std::iter::once("🚨 Critical issues require immediate attention:".to_string())
            .chain(critical.iter().take(3).map(|c| format!("   - {}", c.summary)))
            .collect();
    }

    let warnings = health.warning_checks();
    if !warnings.is_empty() {
        return std::iter::once("⚠️ Address these warnings when possible:".to_string())
            .chain(warnings.iter().take(3).map(|c| format!("   - {}", c.summary)))
            .collect();
    }

    vec!["✅ No immediate action required - cluster is healthy".to_string()]
}

pub async fn get_cluster_capacity(client: &CephClient) -> ToolResponse {
    handle("health", "get_cluster_capacity", async {
        let capacity = client.get_cluster_capacity().await?;
        let summary = capacity.summary();

        let data = json!({
            "cluster_capacity": {
                "total_objects": capacity.total_objects,
                "total_capacity_gb": capacity.total_gb(),
                "used_capacity_gb": capacity.used_gb(),
                "available_capacity_gb": capacity.available_gb(),
                "pool_bytes_used_gb": capacity.pool_used_gb(),
                "usage_percentage": capacity.usage_percentage(),
                "average_object_size_kb": capacity.average_object_size_kb(),
            },
            "raw_data": {
                "total_avail_bytes": capacity.total_avail_bytes,
                "total_bytes": capacity.total_bytes,
                "total_used_raw_bytes": capacity.total_used_raw_bytes,
                "total_pool_bytes_used": capacity.total_pool_bytes_used,
                "average_object_size": capacity.average_object_size,
            },
            "summary": summary,
        });

        let message = format!(
            "Cluster capacity: {} with {} objects",
            summary,
            with_thousands(capacity.total_objects)
        );
        Ok::<_, ToolError>(ToolResponse::success(message, data))
    })
    .await
}

/// Capacity report shown to the assistant instead of the generic envelope.
pub fn capacity_report(response: &ToolResponse) -> String {
    let Some(data) = response.data.as_ref().filter(|_| response.success) else {
        return format!("❌ Failed to get cluster capacity: {}", response.message);
    };

    let capacity = &data["cluster_capacity"];
    let field = |key: &str| capacity.get(key).cloned().unwrap_or(Value::Null);
    let objects = capacity
        .get("total_objects")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let summary = data.get("summary").and_then(Value::as_str).unwrap_or("");

    format!(
        "**Cluster Capacity Summary**\n\n\
         📊 **Overall Statistics:**\n\
         • Total Objects: {}\n\
         • Capacity: {}\n\n\
         💾 **Storage Breakdown:**\n\
         • Total Capacity: {} GB\n\
         • Used Capacity: {} GB\n\
         • Available Capacity: {} GB\n\
         • Pool Usage: {} GB\n\n\
         📈 **Efficiency Metrics:**\n\
         • Usage Percentage: {}%\n\
         • Average Object Size: {} KB",
        with_thousands(objects),
        summary,
        field("total_capacity_gb"),
        field("used_capacity_gb"),
        field("available_capacity_gb"),
        field("pool_bytes_used_gb"),
        field("usage_percentage"),
        field("average_object_size_kb"),
    )
}

fn with_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
