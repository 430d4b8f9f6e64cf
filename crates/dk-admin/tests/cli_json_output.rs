//! Integration tests for `--json` output and write commands against a
//! local stub backend.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// Request line and headers of one request the stub received.
struct Recorded {
    head: String,
}

/// Serve `responses` in order, one per connection, and report every
/// request head received. Returns the base URL to point the CLI at.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, Receiver<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub backend");
    let addr = listener.local_addr().expect("Failed to read stub address");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let head = answer(stream, status, body);
            if tx.send(Recorded { head }).is_err() {
                return;
            }
        }
    });

    (format!("http://{}/api/v1", addr), rx)
}

fn answer(mut stream: TcpStream, status: u16, body: &str) -> String {
    let mut reader = BufReader::new(stream.try_clone().expect("Failed to clone stream"));
    let mut head = String::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
            break;
        }
        if let Some((name, value)) = line.split_once(':')
            && name.eq_ignore_ascii_case("content-length")
        {
            content_length = value.trim().parse().unwrap_or(0);
        }
        head.push_str(&line);
    }
    let mut request_body = vec![0u8; content_length];
    let _ = reader.read_exact(&mut request_body);

    let reason = match status {
        200 => "OK",
        204 => "No Content",
        _ => "Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
    head
}

fn run_dk_admin(home: &Path, base_url: &str, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dk-admin"));
    cmd.current_dir(home)
        .env("HOME", home)
        .env("DK_ADMIN_TOKEN", "test-admin-token")
        .env_remove("DK_ADMIN_SESSION_TOKEN")
        .env_remove("DK_ADMIN_API_BASE_URL")
        .env("NO_PROXY", "127.0.0.1")
        .args(["--base-url", base_url])
        .args(args);
    for proxy in ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"] {
        cmd.env_remove(proxy);
    }
    cmd.output().expect("Failed to execute dk-admin")
}

const CPUS: &str = r#"[
  {"id": 1, "brand": "AMD", "model": "Ryzen 7 7800X3D", "slug": "amd-ryzen-7-7800x3d", "cores": 8, "threads": 16, "releaseYear": 2023},
  {"id": 2, "brand": "Intel", "model": "Core i9-14900K", "slug": "intel-core-i9-14900k", "cores": 24, "threads": 32, "releaseYear": 2023},
  {"id": 3, "brand": "AMD", "model": "Ryzen 5 7600", "slug": "amd-ryzen-5-7600", "cores": 6, "threads": 12, "releaseYear": 2023}
]"#;

const NOTIFICATIONS: &str = r#"[
  {"id": 5, "title": "Maintenance", "message": "Backend restarts at 03:00", "category": "system_recommendation", "isActive": true},
  {"id": 6, "title": "New GPUs", "message": "RTX 50 series added", "category": "new_hardware", "isActive": true}
]"#;

const NOTIFICATIONS_AFTER_DELETE: &str = r#"[
  {"id": 6, "title": "New GPUs", "message": "RTX 50 series added", "category": "new_hardware", "isActive": true}
]"#;

#[test]
fn test_cpu_list_json_outputs_valid_json() {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let (base_url, requests) = serve(vec![(200, CPUS)]);

    let output = run_dk_admin(home.path(), &base_url, &["cpu", "list", "--json"]);
    assert!(
        output.status.success(),
        "cpu list --json failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(value["page"], 1);
    assert_eq!(value["pageCount"], 1);
    assert_eq!(value["total"], 3);
    let items = value["items"].as_array().expect("items should be an array");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["model"], "Ryzen 7 7800X3D");

    let request = requests.recv().expect("stub should record the list request");
    let head = request.head.to_lowercase();
    assert!(head.starts_with("get /api/v1/cpus?"), "got: {}", request.head);
    assert!(head.contains("limit=200"), "got: {}", request.head);
    assert!(head.contains("sort=year"), "got: {}", request.head);
    assert!(
        head.contains("x-admin-token: test-admin-token"),
        "got: {}",
        request.head
    );
}

#[test]
fn test_cpu_list_search_narrows_locally() {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let (base_url, _requests) = serve(vec![(200, CPUS)]);

    let output = run_dk_admin(
        home.path(),
        &base_url,
        &["cpu", "list", "--search", "ryzen", "--json"],
    );
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON");
    assert_eq!(value["total"], 2);
    let models: Vec<&str> = value["items"]
        .as_array()
        .expect("items should be an array")
        .iter()
        .filter_map(|item| item["model"].as_str())
        .collect();
    assert!(models.iter().all(|model| model.contains("Ryzen")));
}

#[test]
fn test_notification_delete_with_force() {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let (base_url, requests) = serve(vec![
        (200, NOTIFICATIONS),
        (204, ""),
        (200, NOTIFICATIONS_AFTER_DELETE),
    ]);

    let output = run_dk_admin(
        home.path(),
        &base_url,
        &["notification", "delete", "5", "--force"],
    );
    assert!(
        output.status.success(),
        "notification delete failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("deleted"));

    let heads: Vec<String> = requests.iter().take(3).map(|r| r.head).collect();
    assert_eq!(heads.len(), 3);
    assert!(heads[0].starts_with("GET /api/v1/admin/notifications"));
    assert!(
        heads[1].starts_with("DELETE /api/v1/admin/notifications/5 "),
        "got: {}",
        heads[1]
    );
    assert!(heads[2].starts_with("GET /api/v1/admin/notifications"));
}

#[test]
fn test_delete_unknown_key_fails_without_request() {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let (base_url, requests) = serve(vec![(200, NOTIFICATIONS), (204, "")]);

    let output = run_dk_admin(
        home.path(),
        &base_url,
        &["notification", "delete", "99", "--force"],
    );
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("Failed to delete notification"),
        "got: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let list = requests.recv().expect("stub should record the list request");
    assert!(list.head.starts_with("GET /api/v1/admin/notifications"));
    assert!(
        requests.try_recv().is_err(),
        "no DELETE should reach the backend for an unknown id"
    );
}
