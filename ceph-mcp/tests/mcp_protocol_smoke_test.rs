//! MCP protocol smoke test
//!
//! Spawns the binary with the stdio transport and checks initialization,
//! tool and resource discovery, and one tool call. The manager URL points at
//! a closed port, so the call exercises the failure envelope.

use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

/// Helper struct to manage MCP server process and communicate via stdio
struct McpClient {
    process: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    request_id: u64,
}

impl McpClient {
    /// Spawn the server as a subprocess with the stdio transport
    fn spawn() -> Self {
        let mut process = Command::new(assert_cmd::cargo::cargo_bin!("ceph-mcp"))
            .arg("serve")
            .arg("--transport")
            .arg("stdio")
            .env("CEPH_MANAGER_URL", "http://127.0.0.1:1")
            .env("CEPH_USERNAME", "admin")
            .env("CEPH_PASSWORD", "secret")
            .env("MCP_SERVER_NAME", "ceph-smoke-test")
            .env("MAX_RETRIES", "1")
            .env_remove("CEPH_MCP_CONFIG")
            .env("RUST_LOG", "error")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn MCP server");

        // Give server a moment to start
        std::thread::sleep(Duration::from_millis(500));

        let stdin = process.stdin.take().expect("stdin not captured");
        let stdout = process.stdout.take().expect("stdout not captured");
        Self {
            process,
            stdin,
            reader: BufReader::new(stdout),
            request_id: 0,
        }
    }

    /// Send JSON-RPC request and read response
    fn request(&mut self, method: &str, params: Value) -> Value {
        self.request_id += 1;
        let request = json!({
            "jsonrpc": "2.0",
            "id": self.request_id,
            "method": method,
            "params": params
        });

        let request_str = serde_json::to_string(&request).unwrap();
        writeln!(self.stdin, "{}", request_str).expect("Failed to write to stdin");
        self.stdin.flush().expect("Failed to flush stdin");

        // Try to read lines until we get a valid JSON-RPC response
        // (skip any log lines or non-JSON output)
        for _ in 0..10 {
            let mut response_line = String::new();
            match self.reader.read_line(&mut response_line) {
                Ok(0) => panic!("EOF: MCP server closed stdout"),
                Ok(_) => {
                    let trimmed = response_line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    // Try to parse as JSON-RPC response
                    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
                        if json.get("jsonrpc").is_some()
                            || json.get("result").is_some()
                            || json.get("error").is_some()
                        {
                            return json;
                        }
                    }
                    // Not a valid JSON-RPC response, might be a log line
                    eprintln!("Skipping non-JSON line: {}", trimmed);
                }
                Err(e) => panic!("Failed to read response: {}", e),
            }
        }

        panic!("Failed to read valid JSON-RPC response after 10 attempts")
    }

    /// Initialize the MCP server
    fn initialize(&mut self) -> Value {
        let response = self.request(
            "initialize",
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "roots": {
                        "listChanged": false
                    }
                },
                "clientInfo": {
                    "name": "mcp-smoke-test",
                    "version": "1.0.0"
                }
            }),
        );

        // Send initialized notification (required by MCP protocol)
        self.send_notification("notifications/initialized", json!({}));

        response
    }

    /// Send a notification (no response expected)
    fn send_notification(&mut self, method: &str, params: Value) {
        let notification = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params
        });

        let notification_str = serde_json::to_string(&notification).unwrap();
        writeln!(self.stdin, "{}", notification_str).expect("Failed to write notification");
        self.stdin.flush().expect("Failed to flush stdin");

        // Give server a moment to process notification
        std::thread::sleep(Duration::from_millis(100));
    }

    /// List available tools
    fn list_tools(&mut self) -> Value {
        self.request("tools/list", json!({}))
    }

    /// List available resources
    fn list_resources(&mut self) -> Value {
        self.request("resources/list", json!({}))
    }

    /// Call a tool
    fn call_tool(&mut self, name: &str, arguments: Value) -> Value {
        self.request(
            "tools/call",
            json!({
                "name": name,
                "arguments": arguments
            }),
        )
    }
}

impl Drop for McpClient {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

const EXPECTED_TOOLS: [&str; 18] = [
    "get_health_summary",
    "get_health_details",
    "get_health_recommendations",
    "get_cluster_capacity",
    "get_host_summary",
    "get_host_details",
    "get_daemon_summary",
    "get_daemon_names",
    "get_daemon_details",
    "perform_daemon_action",
    "get_osd_summary",
    "get_osd_id",
    "get_osd_details",
    "perform_osd_mark_action",
    "get_pool_summary",
    "get_pool_details",
    "get_fs_summary",
    "get_fs_details",
];

#[test]
fn mcp_server_initialization_and_capabilities() {
    let mut client = McpClient::spawn();
    let response = client.initialize();

    let result = &response["result"];
    assert!(result.is_object(), "Missing result in initialize response: {}", response);
    assert_eq!(result["serverInfo"]["name"], "ceph-smoke-test");
    assert!(result["serverInfo"].get("version").is_some(), "Missing server version");

    let capabilities = &result["capabilities"];
    assert!(capabilities.get("tools").is_some(), "Tools capability not advertised");
    assert!(
        capabilities.get("resources").is_some(),
        "Resources capability not advertised"
    );
}

#[test]
fn mcp_tools_discovery() {
    let mut client = McpClient::spawn();
    client.initialize();

    let response = client.list_tools();
    let tools = response["result"]["tools"]
        .as_array()
        .expect("tools should be an array");
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();

    for expected in EXPECTED_TOOLS {
        assert!(names.contains(&expected), "Tool '{}' missing from {:?}", expected, names);
    }
    assert_eq!(tools.len(), EXPECTED_TOOLS.len());

    for tool in tools {
        assert!(tool.get("description").is_some(), "Tool missing description: {:?}", tool);
        assert!(tool.get("inputSchema").is_some(), "Tool missing inputSchema: {:?}", tool);
    }

    let mark = tools
        .iter()
        .find(|t| t["name"] == "perform_osd_mark_action")
        .unwrap();
    let properties = &mark["inputSchema"]["properties"];
    assert!(properties.get("osd_id").is_some());
    assert!(properties.get("action").is_some());
}

#[test]
fn mcp_resources_discovery() {
    let mut client = McpClient::spawn();
    client.initialize();

    let response = client.list_resources();
    let resources = response["result"]["resources"]
        .as_array()
        .expect("resources should be an array");
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0]["uri"], "ceph://health/summary");
    assert_eq!(resources[0]["name"], "HealthSummary");

    let unknown = client.request("resources/read", json!({"uri": "ceph://nope"}));
    assert!(unknown.get("error").is_some(), "Unknown resource should fail: {}", unknown);
}

#[test]
fn mcp_tool_invocation_end_to_end() {
    let mut client = McpClient::spawn();
    client.initialize();

    let response = client.call_tool("get_health_summary", json!({}));
    let result = &response["result"];
    assert_eq!(result["isError"], true, "Unreachable manager should fail: {}", response);

    let content = result["content"].as_array().expect("content should be an array");
    assert_eq!(content[0]["type"], "text");
    let text = content[0]["text"].as_str().unwrap();
    assert!(text.starts_with("Operation status: failure\nError code: AUTHENTICATION_ERROR\n"), "{}", text);
}

#[test]
fn mcp_invalid_calls_are_rejected() {
    let mut client = McpClient::spawn();
    client.initialize();

    let unknown = client.call_tool("delete_cluster", json!({}));
    assert!(unknown.get("error").is_some(), "Unknown tool should fail: {}", unknown);

    let invalid = client.call_tool(
        "perform_daemon_action",
        json!({"daemon_name": "mgr.a", "action": "reload"}),
    );
    let result = &invalid["result"];
    assert_eq!(result["isError"], true);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Error code: VALIDATION_ERROR"), "{}", text);
}
