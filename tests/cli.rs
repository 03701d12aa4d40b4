use std::io::Write;
use std::process::{Command, Stdio};

fn sentry_mcp(home: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sentry-mcp"));
    cmd.env("HOME", home)
        .env_remove("SENTRY_AUTH_TOKEN")
        .env_remove("SENTRY_ORG")
        .env_remove("SENTRY_HOST")
        .env_remove("SENTRY_PROTOCOL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn no_args_shows_help_and_exits_zero() {
    let home = tempfile::tempdir().unwrap();
    let output = sentry_mcp(home.path()).output().expect("failed to execute");

    assert!(output.status.success(), "expected exit code 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: sentry-mcp"));
    assert!(stdout.contains("Commands:"));
}

#[test]
fn help_lists_every_command() {
    let home = tempfile::tempdir().unwrap();
    let output = sentry_mcp(home.path())
        .arg("--help")
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for cmd in [
        "serve", "config", "auth", "projects", "issues", "issue", "events", "event", "extract",
    ] {
        assert!(stdout.contains(cmd), "help missing {}", cmd);
    }
}

#[test]
fn version_flag_shows_version() {
    let home = tempfile::tempdir().unwrap();
    let output = sentry_mcp(home.path())
        .arg("--version")
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sentry-mcp "));
}

#[test]
fn report_without_token_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = sentry_mcp(home.path())
        .args(["issue", "DEMO-1"])
        .output()
        .expect("failed to execute");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not configured"));
}

#[test]
fn config_reports_env_overrides() {
    let home = tempfile::tempdir().unwrap();
    let output = sentry_mcp(home.path())
        .arg("config")
        .env("SENTRY_ORG", "acme")
        .env("SENTRY_HOST", "sentry.example.com")
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Auth token:   No"));
    assert!(stdout.contains("Organization: acme"));
    assert!(stdout.contains("https://sentry.example.com/api/0"));
}

#[test]
fn auth_writes_settings_file() {
    let home = tempfile::tempdir().unwrap();
    let output = sentry_mcp(home.path())
        .args(["auth", "secret-token", "--org", "acme"])
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    let path = home.path().join(".config/sentry-mcp/settings.toml");
    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.contains("[sentry]"));
    assert!(contents.contains("secret-token"));
    assert!(contents.contains("acme"));
}

#[test]
fn invalid_format_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let output = sentry_mcp(home.path())
        .args(["projects", "--format", "html"])
        .output()
        .expect("failed to execute");

    assert!(!output.status.success());
}

#[test]
fn serve_answers_initialize_on_stdout() {
    let home = tempfile::tempdir().unwrap();
    let mut child = sentry_mcp(home.path())
        .arg("serve")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn");

    let request = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"cli-test","version":"0.0.0"}}}"#;
    {
        let mut stdin = child.stdin.take().unwrap();
        writeln!(stdin, "{}", request).unwrap();
    }

    let output = child.wait_with_output().expect("failed to wait");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let response: serde_json::Value =
        serde_json::from_str(stdout.lines().next().expect("no response")).unwrap();
    assert_eq!(response["id"], serde_json::json!(1));
    assert_eq!(response["result"]["serverInfo"]["name"], "sentry-mcp");
    assert!(response["result"]["capabilities"]["tools"].is_object());
}
