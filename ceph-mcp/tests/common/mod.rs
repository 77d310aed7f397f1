//! In-process stand-in for the Ceph Manager REST API

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use ceph_mcp::config::Password;
use ceph_mcp::{CephClient, LogFormat, Settings};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const TOKEN: &str = "stub-token";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub accept: String,
    pub authorization: String,
    pub body: Value,
}

#[derive(Default)]
pub struct StubState {
    pub logins: AtomicU32,
    /// Number of upcoming data requests answered with 503
    pub fail_next: AtomicU32,
    /// Answer data requests with 401 instead of the payload
    pub reject_tokens: AtomicBool,
    /// Status returned by `/api/auth` (201 when unset)
    pub auth_status: Mutex<Option<StatusCode>>,
    /// Replaces the capacity fixture when set
    pub capacity: Mutex<Option<Value>>,
    pub requests: Mutex<Vec<Recorded>>,
}

impl StubState {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }
}

pub struct StubManager {
    pub url: String,
    pub state: Arc<StubState>,
}

impl StubManager {
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let router = Router::new()
            .route("/api/auth", post(auth))
            .route("/api/health/minimal", get(health_minimal))
            .route("/api/health/get_cluster_fsid", get(cluster_fsid))
            .route("/api/health/get_cluster_capacity", get(cluster_capacity))
            .route("/api/host", get(hosts))
            .route("/api/daemon", get(daemons))
            .route("/api/daemon/{name}", put(daemon_action))
            .route("/api/osd", get(osds))
            .route("/api/osd/flags/individual", put(osd_flags))
            .route("/api/osd/{id}/mark", put(osd_mark))
            .route("/api/pool", get(pools))
            .route("/api/cephfs", get(filesystems))
            .route("/api/cephfs/{id}", get(filesystem))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { url, state }
    }

    pub fn settings(&self) -> Settings {
        settings_for(&self.url)
    }

    pub fn client(&self) -> CephClient {
        CephClient::new(&self.settings())
            .unwrap()
            .with_retry_backoff(Duration::from_millis(10))
    }
}

pub fn settings_for(url: &str) -> Settings {
    Settings {
        manager_url: url.to_string(),
        username: "admin".into(),
        password: Password::new("secret"),
        ssl_verify: true,
        cert_path: None,
        server_host: "127.0.0.1".into(),
        server_port: 0,
        server_name: "ceph-storage-assistant".into(),
        server_version: "0.1.0".into(),
        request_timeout_seconds: 5,
        max_retries: 3,
        log_format: LogFormat::Json,
    }
}

fn header(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Record the request, then decide whether it is answered with the payload.
fn gate(
    state: &StubState,
    method: &'static str,
    path: String,
    headers: &HeaderMap,
    body: Value,
    payload: Value,
) -> axum::response::Response {
    state.requests.lock().unwrap().push(Recorded {
        method,
        path,
        accept: header(headers, "accept"),
        authorization: header(headers, "authorization"),
        body,
    });

    if state.reject_tokens.load(Ordering::SeqCst) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if header(headers, "authorization") != format!("Bearer {}", TOKEN) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let pending = state.fail_next.load(Ordering::SeqCst);
    if pending > 0 {
        state.fail_next.store(pending - 1, Ordering::SeqCst);
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(payload).into_response()
}

async fn auth(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> axum::response::Response {
    state.logins.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = *state.auth_status.lock().unwrap() {
        return status.into_response();
    }
    if body["username"] != "admin" || body["password"] != "secret" {
        return StatusCode::BAD_REQUEST.into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({"token": TOKEN, "username": "admin", "ttl": 28800})),
    )
        .into_response()
}

async fn health_minimal(State(state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    gate(&state, "GET", "/api/health/minimal".into(), &headers, Value::Null, json!({
        "health": {
            "status": "HEALTH_WARN",
            "checks": [
                {"type": "OSD_DOWN", "severity": "HEALTH_WARN",
                 "summary": {"message": "1 osds down", "count": 1},
                 "detail": [{"message": "osd.1 (root=default,host=node-2) is down"}]}
            ]
        }
    }))
}

async fn cluster_fsid(State(state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    gate(&state, "GET", "/api/health/get_cluster_fsid".into(), &headers, Value::Null,
        json!("5f0b3c2e-8c0e-11ee-9d6a-525400a1b2c3"))
}

pub fn capacity_fixture() -> Value {
    json!({
        "total_avail_bytes": 80530636800u64,
        "total_bytes": 107374182400u64,
        "total_used_raw_bytes": 26843545600u64,
        "total_objects": 12345,
        "total_pool_bytes_used": 21474836480u64,
        "average_object_size": 4096
    })
}

async fn cluster_capacity(State(state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    let payload = state
        .capacity
        .lock()
        .unwrap()
        .clone()
        .unwrap_or_else(capacity_fixture);
    gate(&state, "GET", "/api/health/get_cluster_capacity".into(), &headers, Value::Null, payload)
}

async fn hosts(State(state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    gate(&state, "GET", "/api/host".into(), &headers, Value::Null, json!([
        {"hostname": "node-1", "addr": "10.0.0.1", "status": "", "labels": ["_admin"],
         "service_instances": [{"type": "mon", "count": 1}, {"type": "osd", "count": 1}],
         "memory_total_kb": 16777216, "memory_free_kb": 8388608, "memory_available_kb": 10485760,
         "fqdn": "node-1.lab.local", "shortname": "node-1", "arch": "x86_64",
         "system_uptime": 259200.0},
        {"hostname": "node-2", "addr": "10.0.0.2", "status": "", "service_instances": [],
         "memory_total_kb": "unknown"}
    ]))
}

async fn daemons(State(state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    gate(&state, "GET", "/api/daemon".into(), &headers, Value::Null, json!([
        {"daemon_type": "mon", "daemon_id": "node-1", "daemon_name": "mon.node-1",
         "hostname": "node-1", "status": 1, "status_desc": "running",
         "memory_usage": 104857600, "cpu_percentage": "0.8%", "version": "18.2.1"},
        {"daemon_type": "osd", "daemon_id": "0", "daemon_name": "osd.0",
         "hostname": "node-1", "status": 1, "status_desc": "running"},
        {"daemon_type": "osd", "daemon_id": "1", "daemon_name": "osd.1",
         "hostname": "node-2", "status": 0, "status_desc": "stopped"}
    ]))
}

async fn daemon_action(
    State(state): State<Arc<StubState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    gate(&state, "PUT", format!("/api/daemon/{}", name), &headers, body, json!({"status": "ok"}))
}

async fn osds(State(state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    gate(&state, "GET", "/api/osd".into(), &headers, Value::Null, json!([
        {"osd": 0, "id": 0, "up": 1, "in": 1, "weight": 1.0, "operational_status": "working",
         "osd_stats": {"num_pgs": 33, "kb": 10485760, "kb_used": 1048576, "kb_avail": 9437184,
                       "perf_stat": {"commit_latency_ms": 1.0, "apply_latency_ms": 1.0}},
         "tree": {"id": 0, "device_class": "hdd", "type": "osd"},
         "host": {"name": "node-1"}},
        {"osd": 1, "id": 1, "up": 0, "in": 1, "weight": 1.0, "operational_status": "",
         "osd_stats": {"num_pgs": 0, "kb": 10485760, "kb_used": 0, "kb_avail": 10485760},
         "tree": {"id": 1, "device_class": "hdd", "type": "osd"},
         "host": {"name": "node-2"}}
    ]))
}

async fn osd_flags(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    gate(&state, "PUT", "/api/osd/flags/individual".into(), &headers, body, json!({"added": ["noout"]}))
}

async fn osd_mark(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    gate(&state, "PUT", format!("/api/osd/{}/mark", id), &headers, body, Value::Null)
}

async fn pools(State(state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    gate(&state, "GET", "/api/pool".into(), &headers, Value::Null, json!([
        {"pool_name": ".mgr", "type": "replicated", "size": 3, "min_size": 2,
         "crush_rule": "replicated_rule", "pg_num": 1, "pg_num_target": 1,
         "pg_placement_num": 1, "pg_placement_num_target": 1,
         "options": {"pg_num_max": 32, "pg_num_min": 1},
         "application_metadata": ["mgr"], "pg_status": {"active+clean": 1}},
        {"pool_name": "rbd", "type": "replicated", "size": 3, "min_size": 2,
         "crush_rule": "replicated_rule", "pg_num": 32,
         "options": {}, "application_metadata": ["rbd"],
         "pg_status": {"active+clean": 31, "active+undersized+degraded": 1}}
    ]))
}

async fn filesystems(State(state): State<Arc<StubState>>, headers: HeaderMap) -> impl IntoResponse {
    gate(&state, "GET", "/api/cephfs".into(), &headers, Value::Null, json!([
        {"id": 1, "mdsmap": {"fs_name": "cephfs"}}
    ]))
}

async fn filesystem(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    gate(&state, "GET", format!("/api/cephfs/{}", id), &headers, Value::Null, json!({
        "cephfs": {
            "id": 1, "name": "cephfs", "client_count": 2,
            "ranks": [{"rank": 0, "state": "active", "mds": "cephfs.node-1.xyz"}],
            "pools": [
                {"pool": "cephfs.cephfs.meta", "type": "metadata", "used": 1073741824u64, "avail": 1073741824u64},
                {"pool": "cephfs.cephfs.data", "type": "data", "used": 0, "avail": 2147483648u64}
            ]
        }
    }))
}
