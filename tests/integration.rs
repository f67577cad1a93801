use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::Level;
use serde_json::{Value, json};
use tempfile::TempDir;

use mcp_file_server::protocol::{ToolCall, parse_request};
use mcp_file_server::utils::MemoryLog;
use mcp_file_server::{FailureKind, FileService, ServerConfig, ToolError, TraversalPolicy};

// Helper to build a service that records its log output
fn setup_service(config: ServerConfig) -> (FileService, Arc<MemoryLog>) {
    let log = Arc::new(MemoryLog::new());
    (FileService::new(&config, log.clone()), log)
}

// Helper to send one request line and decode the response
fn send_request(service: &FileService, request: Value) -> Value {
    let response = service.handle_request(parse_request(&request.to_string()));
    serde_json::from_str(&response.to_line().unwrap()).unwrap()
}

fn path_str(path: &Path) -> String {
    path.to_str().unwrap().to_string()
}

fn failure_kind(err: ToolError) -> FailureKind {
    match err {
        ToolError::Operation(e) => e.kind,
        other => panic!("expected an operation failure, got {other:?}"),
    }
}

#[test]
fn test_nested_write_then_overwrite_then_list() {
    let (service, _) = setup_service(ServerConfig::default());
    let root = TempDir::new().unwrap();
    let x = root.path().join("x");
    let out = x.join("y").join("out.txt");

    let first = service.write_file(&path_str(&out), "hello").unwrap();
    assert!(first.created);
    assert!(x.join("y").is_dir());

    let second = service.write_file(&path_str(&out), "hello2").unwrap();
    assert!(!second.created);
    assert_eq!(service.read_file(&path_str(&out)).unwrap(), "hello2");

    let listing = service.list_directory(&path_str(&x)).unwrap();
    assert_eq!(listing.total_entries, 1);
    let entry = &listing.entries[0];
    assert_eq!(entry.name, "y");
    assert_eq!(entry.kind, mcp_file_server::storage::EntryKind::Directory);
    assert_eq!(entry.size, None);
    assert_eq!(entry.path, path_str(&x.join("y")));
}

#[test]
fn test_list_directory_response_shape() {
    let (service, _) = setup_service(ServerConfig::default());
    let root = TempDir::new().unwrap();
    fs::create_dir(root.path().join("y")).unwrap();
    fs::write(root.path().join("readme.md"), "# hi\n").unwrap();

    let response = send_request(
        &service,
        json!({"id": 3, "tool": "list_directory", "arguments": {"directory_path": path_str(root.path())}}),
    );
    assert_eq!(response["id"], 3);

    let payload: Value =
        serde_json::from_str(response["result"]["content"].as_str().unwrap()).unwrap();
    assert_eq!(payload["directory"], path_str(root.path()));
    assert_eq!(payload["total_entries"], 2);

    let entries = payload["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "readme.md");
    assert_eq!(entries[0]["type"], "file");
    assert_eq!(entries[0]["size"], 5);
    assert!(entries[0]["modified"].is_string());
    assert_eq!(entries[1]["name"], "y");
    assert_eq!(entries[1]["type"], "directory");
    assert_eq!(entries[1]["size"], Value::Null);
    assert!(entries[1].get("error").is_none());
}

#[test]
fn test_round_trip_preserves_content() {
    let (service, _) = setup_service(ServerConfig::default());
    let root = TempDir::new().unwrap();
    let target = path_str(&root.path().join("round.txt"));

    for content in [
        "",
        "single line",
        "line one\nline two\r\nline three\n",
        "Unicode: 你好 мир 🚀 café",
        "trailing whitespace   \n\n",
        "embedded \0 nul is still text",
    ] {
        service.write_file(&target, content).unwrap();
        assert_eq!(service.read_file(&target).unwrap(), content);
    }
}

#[test]
fn test_wrong_kind_failures() {
    let (service, _) = setup_service(ServerConfig::default());
    let root = TempDir::new().unwrap();
    let file = root.path().join("file.txt");
    fs::write(&file, "x").unwrap();

    let err = service
        .read_file(&path_str(&root.path().join("missing.txt")))
        .unwrap_err();
    assert_eq!(failure_kind(err), FailureKind::NotFound);

    let err = service.read_file(&path_str(root.path())).unwrap_err();
    assert_eq!(failure_kind(err), FailureKind::NotAFile);

    let err = service.list_directory(&path_str(&file)).unwrap_err();
    assert_eq!(failure_kind(err), FailureKind::NotADirectory);
}

#[test]
fn test_invalid_utf8_never_returns_partial_text() {
    let (service, _) = setup_service(ServerConfig::default());
    let root = TempDir::new().unwrap();

    let binary = root.path().join("image.png");
    fs::write(&binary, b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR").unwrap();
    let response = send_request(
        &service,
        json!({"id": 1, "tool": "read_file", "arguments": {"file_path": path_str(&binary)}}),
    );
    assert!(response.get("result").is_none());
    assert_eq!(response["error"]["kind"], "binary_content");
    assert_eq!(response["error"]["class"], "invalid_request");

    let latin1 = root.path().join("latin1.txt");
    fs::write(&latin1, b"na\xefve r\xe9sum\xe9").unwrap();
    let response = send_request(
        &service,
        json!({"id": 2, "tool": "read_file", "arguments": {"file_path": path_str(&latin1)}}),
    );
    assert!(response.get("result").is_none());
    assert_eq!(response["error"]["kind"], "encoding_error");
}

#[test]
fn test_null_byte_path_is_invalid_params() {
    let (service, _) = setup_service(ServerConfig::default());
    let response = send_request(
        &service,
        json!({"id": 9, "tool": "read_file", "arguments": {"file_path": "/tmp/evil\u{0}.txt"}}),
    );
    assert_eq!(response["error"]["kind"], "invalid_path");
    assert_eq!(response["error"]["class"], "invalid_params");
    assert_eq!(response["error"]["code"], -32602);
}

#[test]
fn test_traversal_logged_and_rejected_by_default() {
    let (service, log) = setup_service(ServerConfig::default());
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("secret.txt"), "top secret").unwrap();
    let raw = format!("{}/public/../secret.txt", root.path().display());

    let err = service.read_file(&raw).unwrap_err();
    assert_eq!(failure_kind(err), FailureKind::InvalidPath);

    let warnings = log.messages_at(Level::Warn);
    assert!(warnings.iter().any(|w| w.contains("traversal") && w.contains(&raw)));
    assert!(log.events().iter().all(|(_, m)| !m.contains("top secret")));
}

#[test]
fn test_traversal_logged_and_allowed_under_warn_policy() {
    let (service, log) = setup_service(ServerConfig {
        traversal_policy: TraversalPolicy::Warn,
        ..ServerConfig::default()
    });
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("secret.txt"), "visible").unwrap();
    let raw = format!("{}/public/../secret.txt", root.path().display());

    assert_eq!(service.read_file(&raw).unwrap(), "visible");
    assert_eq!(log.messages_at(Level::Warn).len(), 1);
}

#[test]
fn test_relative_paths_resolve_against_working_directory() {
    let (service, _) = setup_service(ServerConfig::default());
    let validated = service.validator().validate("Cargo.toml").unwrap();
    assert_eq!(
        validated.as_path(),
        std::env::current_dir().unwrap().join("Cargo.toml")
    );
    assert!(service.read_file("Cargo.toml").unwrap().contains("[package]"));
}

#[test]
fn test_parameter_and_request_errors() {
    let (service, _) = setup_service(ServerConfig::default());

    let response = send_request(&service, json!({"id": 1, "tool": "write_file", "arguments": {"file_path": "/tmp/a.txt"}}));
    assert_eq!(response["error"]["class"], "invalid_params");

    let response = send_request(&service, json!({"id": 2, "tool": "format_disk", "arguments": {}}));
    assert_eq!(response["error"]["class"], "invalid_request");

    let response = send_request(&service, json!({"id": 3, "tool": "read_file", "arguments": {"file_path": ""}}));
    assert_eq!(response["error"]["kind"], "invalid_path");
}

#[test]
fn test_tool_catalog() {
    let (service, _) = setup_service(ServerConfig::default());
    let content = service.handle_call(&ToolCall::ListTools).unwrap();
    let tools: Value = serde_json::from_str(&content).unwrap();
    let names: Vec<_> = tools
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["read_file", "write_file", "list_directory"]);
}

#[cfg(unix)]
#[test]
fn test_overwrite_keeps_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (service, _) = setup_service(ServerConfig::default());
    let root = TempDir::new().unwrap();
    let target = root.path().join("script.sh");
    fs::write(&target, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();

    service
        .write_file(&path_str(&target), "#!/bin/sh\necho hi\n")
        .unwrap();
    let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o755);
}

// Root ignores mode bits, so permission scenarios are skipped there
#[cfg(unix)]
fn permissions_enforced(scratch: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let locked = scratch.join("locked-check");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
    let denied = fs::write(locked.join("f"), "").is_err();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    fs::remove_dir_all(&locked).unwrap();
    denied
}

#[cfg(unix)]
#[test]
fn test_permission_denied_is_internal_error_class() {
    use std::os::unix::fs::PermissionsExt;

    let (service, log) = setup_service(ServerConfig::default());
    let root = TempDir::new().unwrap();
    if !permissions_enforced(root.path()) {
        return;
    }

    let private = root.path().join("private.txt");
    fs::write(&private, "secret").unwrap();
    fs::set_permissions(&private, fs::Permissions::from_mode(0o000)).unwrap();
    let sealed = root.path().join("sealed");
    fs::create_dir(&sealed).unwrap();
    fs::set_permissions(&sealed, fs::Permissions::from_mode(0o000)).unwrap();
    let locked = root.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    let responses = [
        send_request(
            &service,
            json!({"id": 1, "tool": "read_file", "arguments": {"file_path": path_str(&private)}}),
        ),
        send_request(
            &service,
            json!({"id": 2, "tool": "list_directory", "arguments": {"directory_path": path_str(&sealed)}}),
        ),
        send_request(
            &service,
            json!({"id": 3, "tool": "write_file", "arguments": {
                "file_path": path_str(&locked.join("new.txt")),
                "content": "x"
            }}),
        ),
    ];

    fs::set_permissions(&private, fs::Permissions::from_mode(0o644)).unwrap();
    fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    for response in &responses {
        assert!(response.get("result").is_none());
        assert_eq!(response["error"]["kind"], "permission_denied");
        assert_eq!(response["error"]["class"], "internal_error");
        assert_eq!(response["error"]["code"], -32603);
    }
    assert_eq!(log.messages_at(Level::Error).len(), 3);
    assert!(!locked.join("new.txt").exists());
}
