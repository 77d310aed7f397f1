//! Tool handlers end to end: stub manager -> client -> rendered envelope

mod common;

use ceph_mcp::mcp::tools::{cephfs, daemon, health, host, osd, pool};
use ceph_mcp::models::ErrorCode;
use ceph_mcp::{CephClient, CephMcpServer};
use common::{settings_for, StubManager};
use rmcp::ServerHandler;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn health_summary_envelope() {
    let stub = StubManager::start().await;
    let response = health::get_health_summary(&stub.client()).await;

    assert!(response.success);
    assert_eq!(
        response.message,
        "Cluster has 1 warning(s) that should be investigated"
    );
    let text = response.render();
    assert!(text.starts_with("Operation status: success\n"));
    assert!(text.contains("  cluster_fsid: 5f0b3c2e-8c0e-11ee-9d6a-525400a1b2c3\n"));
    assert!(text.contains("  health_score: 90\n"));
    assert!(text.contains("Collected at: "));
}

#[tokio::test]
async fn capacity_report_text() {
    let stub = StubManager::start().await;
    let response = health::get_cluster_capacity(&stub.client()).await;
    assert_eq!(
        response.message,
        "Cluster capacity: 25.0GB used of 100.0GB total (25.0% used) with 12,345 objects"
    );

    let report = health::capacity_report(&response);
    assert!(report.contains("• Total Objects: 12,345\n"));
    assert!(report.contains("• Total Capacity: 100.0 GB\n"));
    assert!(report.contains("• Average Object Size: 4.0 KB"));
}

#[tokio::test]
async fn host_tools() {
    let stub = StubManager::start().await;
    let client = stub.client();

    let summary = host::get_host_summary(&client).await;
    assert_eq!(summary.message, "All 2 hosts are online and operational");

    let details = host::get_host_details(
        &client,
        host::HostDetailsParams {
            hostname: "node-1".into(),
        },
    )
    .await;
    assert_eq!(
        details.message,
        "Host 'node-1' is online with 2 service types running, 50.0% memory usage"
    );

    let missing = host::get_host_details(
        &client,
        host::HostDetailsParams {
            hostname: "node-9".into(),
        },
    )
    .await;
    assert!(!missing.success);
    assert_eq!(missing.error_code, Some(ErrorCode::CephApi));
    assert_eq!(
        missing.message,
        "Ceph API error: Host 'node-9' not found in cluster"
    );
}

#[tokio::test]
async fn daemon_tools() {
    let stub = StubManager::start().await;
    let client = stub.client();

    let summary = daemon::get_daemon_summary(&client).await;
    assert_eq!(summary.message, "Cluster has 3 daemons: 2 running, 1 stopped");

    let names = daemon::get_daemon_names(
        &client,
        daemon::DaemonNamesParams {
            daemon_type: "osd".into(),
        },
    )
    .await;
    assert_eq!(names.message, "Found 2 osd daemons: 1 running, 1 stopped");

    let action = daemon::perform_daemon_action(
        &client,
        daemon::DaemonActionParams {
            daemon_name: "osd.1".into(),
            action: "start".into(),
        },
    )
    .await;
    assert_eq!(action.message, "Successfully started daemon 'osd.1'");
}

#[tokio::test]
async fn invalid_action_never_reaches_the_manager() {
    let stub = StubManager::start().await;
    let client = stub.client();

    let response = daemon::perform_daemon_action(
        &client,
        daemon::DaemonActionParams {
            daemon_name: "osd.1".into(),
            action: "reload".into(),
        },
    )
    .await;
    assert_eq!(response.error_code, Some(ErrorCode::Validation));
    assert_eq!(
        response.message,
        "Invalid parameters: Invalid action 'reload'. Valid actions: start, stop, restart"
    );

    let response = osd::perform_osd_mark_action(
        &client,
        osd::OsdMarkParams {
            osd_id: -2,
            action: "out".into(),
        },
    )
    .await;
    assert_eq!(response.error_code, Some(ErrorCode::Validation));

    assert!(stub.state.requests().is_empty());
    assert_eq!(stub.state.logins.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn osd_tools() {
    let stub = StubManager::start().await;
    let client = stub.client();

    let summary = osd::get_osd_summary(&client).await;
    assert_eq!(summary.message, "Cluster has 2 OSDs: 1 up, 1 down");

    let ids = osd::get_osd_id(&client).await;
    assert_eq!(ids.message, "Found 2 OSDs distributed across 2 hosts");

    let details = osd::get_osd_details(&client, osd::OsdDetailsParams { osd_id: 0 }).await;
    assert_eq!(
        details.message,
        "OSD 0 on 'node-1' is up/in (working) with 10.0% usage (1.0GB/10.0GB)"
    );

    let mark = osd::perform_osd_mark_action(
        &client,
        osd::OsdMarkParams {
            osd_id: 1,
            action: "in".into(),
        },
    )
    .await;
    assert_eq!(
        mark.message,
        "Successfully marked in (included back into data placement) OSD 1"
    );
}

#[tokio::test]
async fn pool_and_cephfs_tools() {
    let stub = StubManager::start().await;
    let client = stub.client();

    let pools = pool::get_pool_summary(&client).await;
    assert_eq!(
        pools.message,
        "Cluster has 2 pools: 1 healthy, 1 with PG issues"
    );

    let rbd = pool::get_pool_details(
        &client,
        pool::PoolDetailsParams {
            pool_name: "rbd".into(),
        },
    )
    .await;
    assert_eq!(
        rbd.message,
        "Pool 'rbd' is replicated type with 2/3 replicas, 32 PGs and has PG issues"
    );

    let fs = cephfs::get_fs_summary(&client).await;
    assert_eq!(fs.message, "1 filesystem: cephfs (ID: 1)");

    let details = cephfs::get_fs_details(&client, cephfs::FsDetailsParams { fs_id: 1 }).await;
    assert_eq!(
        details.message,
        "Filesystem 'cephfs' (ID: 1) - 2 clients, 1 active MDS ranks"
    );
}

#[tokio::test]
async fn authentication_failure_envelope() {
    let mut settings = settings_for("http://127.0.0.1:1");
    settings.max_retries = 1;
    let client = CephClient::new(&settings)
        .unwrap()
        .with_retry_backoff(Duration::from_millis(1));

    let response = health::get_health_summary(&client).await;
    assert!(!response.success);
    assert_eq!(response.error_code, Some(ErrorCode::Authentication));
    let text = response.render();
    assert!(text.starts_with("Operation status: failure\nError code: AUTHENTICATION_ERROR\n"));
    assert!(text.contains("Message: Authentication failed: Network error during authentication"));

    let report = health::capacity_report(&health::get_cluster_capacity(&client).await);
    assert!(report.starts_with("❌ Failed to get cluster capacity: Authentication failed"));
}

#[tokio::test]
async fn server_info_uses_configured_identity() {
    let stub = StubManager::start().await;
    let server = CephMcpServer::new(Arc::new(stub.client()), "ceph-lab", "1.2.3");
    let info = server.get_info();

    assert_eq!(info.server_info.name, "ceph-lab");
    assert_eq!(info.server_info.version, "1.2.3");
    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.resources.is_some());
}
