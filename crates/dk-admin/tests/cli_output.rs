//! Integration tests for CLI output behavior
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.

use std::path::Path;
use std::process::Command;

/// Nothing listens on the discard port, so connections are refused at once.
const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9/api/v1";

/// `dk-admin` isolated from the developer's config files and environment.
fn dk_admin(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dk-admin"));
    cmd.current_dir(home)
        .env("HOME", home)
        .env_remove("DK_ADMIN_API_BASE_URL")
        .env_remove("DK_ADMIN_TOKEN")
        .env_remove("DK_ADMIN_SESSION_TOKEN")
        .env_remove("RUST_LOG");
    for proxy in ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"] {
        cmd.env_remove(proxy);
    }
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dk_admin(home.path())
        .arg("--help")
        .output()
        .expect("Failed to execute 'dk-admin --help'");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["cpu", "gpu", "ranking", "push", "settings", "dashboard", "monitor"] {
        assert!(
            stdout.contains(command),
            "help should mention '{}', got: {}",
            command,
            stdout
        );
    }
}

/// Verify that stdout contains only user-facing output (no JSON logs)
/// and that stderr carries no INFO logs by default (quiet mode)
#[test]
fn test_config_stdout_is_clean() {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dk_admin(home.path())
        .arg("config")
        .output()
        .expect("Failed to execute 'dk-admin config'");

    assert!(
        output.status.success(),
        "dk-admin config failed with exit code {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );
    assert!(stdout.contains("base_url = "), "got: {}", stdout);
    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should not emit INFO logs, got: {}",
        stderr
    );
}

#[test]
fn test_verbose_emits_json_logs_on_stderr() {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dk_admin(home.path())
        .args(["-v", "config"])
        .output()
        .expect("Failed to execute 'dk-admin -v config'");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains("core.app.startup_completed"),
        "verbose mode should log startup, got: {}",
        stderr
    );
    assert!(!stdout.contains(r#""event":"#));
}

#[test]
fn test_config_redacts_admin_token() {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dk_admin(home.path())
        .env("DK_ADMIN_TOKEN", "very-secret-token")
        .arg("config")
        .output()
        .expect("Failed to execute 'dk-admin config'");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("very-secret-token"), "got: {}", stdout);
    assert!(stdout.contains("<redacted>"), "got: {}", stdout);
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dk_admin(home.path())
        .args(["completions", "bash"])
        .output()
        .expect("Failed to execute 'dk-admin completions bash'");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dk-admin"), "got: {}", stdout);
}

/// An unreachable backend fails the command without polluting stdout.
#[test]
fn test_unreachable_backend_fails_cleanly() {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dk_admin(home.path())
        .args(["--base-url", UNREACHABLE_BASE_URL, "cpu", "list"])
        .output()
        .expect("Failed to execute 'dk-admin cpu list'");

    assert!(
        !output.status.success(),
        "cpu list against an unreachable backend should fail"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.trim().is_empty(), "stdout should be empty, got: {}", stdout);
    assert!(
        stderr.contains("Failed to list cpu records"),
        "stderr should explain the failure, got: {}",
        stderr
    );
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let home = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dk_admin(home.path())
        .args(["--base-url", "ftp://example.com", "dashboard"])
        .output()
        .expect("Failed to execute 'dk-admin dashboard'");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).trim().is_empty());
}
