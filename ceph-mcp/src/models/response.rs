//! Tool response envelope and its text rendering

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Authentication,
    CephApi,
    Validation,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Authentication => "AUTHENTICATION_ERROR",
            ErrorCode::CephApi => "CEPH_API_ERROR",
            ErrorCode::Validation => "VALIDATION_ERROR",
        }
    }
}

/// Result of one tool call, rendered as text for the assistant.
#[derive(Debug, Clone)]
pub struct ToolResponse {
    pub success: bool,
    pub message: String,
    pub error_code: Option<ErrorCode>,
    pub data: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl ToolResponse {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_code: None,
            data: Some(data),
            timestamp: Utc::now(),
        }
    }

    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_code: Some(code),
            data: None,
            timestamp: Utc::now(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Operation status: {}\n",
            if self.success { "success" } else { "failure" }
        ));
        if let (false, Some(code)) = (self.success, self.error_code) {
            out.push_str(&format!("Error code: {}\n", code.as_str()));
        }
        if !self.message.is_empty() {
            out.push_str(&format!("Message: {}\n", self.message));
        }
        if let Some(data) = self.data.as_ref().filter(|d| !is_empty(d)) {
            out.push_str("Data:\n");
            match data {
                Value::Object(map) => {
                    for (key, value) in map {
                        write_entry(&mut out, 1, key, value);
                    }
                }
                other => write_item(&mut out, 1, other),
            }
        }
        out.push_str(&format!(
            "Collected at: {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        out
    }
}

/// Outcome of a mutating call (daemon action, OSD mark)
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub target: String,
    pub action: String,
    pub response: Value,
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "none".to_string(),
        Value::String(s) => s.clone(),
        Value::Object(_) => "{}".to_string(),
        Value::Array(_) => "[]".to_string(),
        other => other.to_string(),
    }
}

fn write_entry(out: &mut String, indent: usize, key: &str, value: &Value) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            out.push_str(&format!("{}{}:\n", pad(indent), key));
            for (k, v) in map {
                write_entry(out, indent + 1, k, v);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            out.push_str(&format!("{}{}:\n", pad(indent), key));
            for item in items {
                write_item(out, indent + 1, item);
            }
        }
        other => out.push_str(&format!("{}{}: {}\n", pad(indent), key, scalar(other))),
    }
}

// List items are prefixed with "- "; an object item starts on the dash line.
fn write_item(out: &mut String, indent: usize, item: &Value) {
    match item {
        Value::Object(map) if !map.is_empty() => {
            let mut block = String::new();
            for (k, v) in map {
                write_entry(&mut block, indent + 1, k, v);
            }
            let inner = pad(indent + 1);
            match block.strip_prefix(inner.as_str()) {
                Some(rest) => out.push_str(&format!("{}- {}", pad(indent), rest)),
                None => out.push_str(&block),
            }
        }
        Value::Array(items) if !items.is_empty() => {
            out.push_str(&format!("{}-\n", pad(indent)));
            for nested in items {
                write_item(out, indent + 1, nested);
            }
        }
        other => out.push_str(&format!("{}- {}\n", pad(indent), scalar(other))),
    }
}
