//! Integration tests for CLI output behavior
//!
//! Every run gets its own HOME, working directory and cache directory so no
//! user or project config leaks in. The default behavior is quiet (no logs).

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{Value, json};
use tempfile::TempDir;

struct Sandbox {
    home: TempDir,
    cache: TempDir,
    fixtures: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            cache: TempDir::new().unwrap(),
            fixtures: TempDir::new().unwrap(),
        }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_ladderview"))
            .args(args)
            .current_dir(self.home.path())
            .env("HOME", self.home.path())
            .env("LADDERVIEW_CACHE_DIR", self.cache.path())
            .env_remove("LADDERVIEW_UPDATE_INTERVAL")
            .env_remove("LADDERVIEW_ENABLE_CACHE")
            .env_remove("LADDERVIEW_CACHE_ID")
            .output()
            .expect("Failed to execute ladderview")
    }

    fn write_fixture(&self, channel: &str, response: Value) {
        std::fs::write(
            self.fixtures.path().join(format!("{}.json", channel)),
            response.to_string(),
        )
        .unwrap();
    }

    fn fixtures_dir(&self) -> &str {
        path_str(self.fixtures.path())
    }

    fn watch_once(&self, channel: &str) -> Output {
        self.run(&[
            "watch",
            "--channel",
            channel,
            "--token",
            "test-token",
            "--fixtures",
            self.fixtures_dir(),
            "--interval-ms",
            "1000",
            "--ticks",
            "0",
            "--json",
        ])
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is valid UTF-8")
}

fn player_body() -> Value {
    json!({
        "player": {
            "server": "KR",
            "name": "Maru",
            "clan": { "name": "Team NV", "tag": "NV" },
            "rank": "Grandmaster",
            "portrait": "https://static.example/portraits/12.jpg"
        },
        "ladders": {
            "1v1": { "totalLadders": 1, "topRankId": 6, "topRank": "Grandmaster",
                     "topMMR": 7100, "wins": 200, "losses": 60, "ties": 0 }
        }
    })
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "ladderview failed with exit code {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("stdout line is JSON"))
        .collect()
}

#[test]
fn test_watch_prints_ready_view() {
    let sandbox = Sandbox::new();
    sandbox.write_fixture("42", json!({ "status": 200, "body": player_body() }));

    let output = sandbox.watch_once("42");
    assert_success(&output);

    let views = json_lines(&output);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["status"], "ready");
    assert_eq!(views[0]["snapshot"]["player"]["name"], "Maru");
}

#[test]
fn test_watch_not_found_and_missing_fixture() {
    let sandbox = Sandbox::new();
    sandbox.write_fixture("7", json!({ "status": 404 }));

    let views = json_lines(&sandbox.watch_once("7"));
    assert_eq!(views, vec![json!({ "status": "not_found" })]);

    // No fixture and nothing cached: transient failure keeps loading
    let views = json_lines(&sandbox.watch_once("8"));
    assert_eq!(views, vec![json!({ "status": "loading" })]);
}

#[test]
fn test_watch_falls_back_to_cache_on_transient_failure() {
    let sandbox = Sandbox::new();
    sandbox.write_fixture("42", json!({ "status": 200, "body": player_body() }));
    assert_success(&sandbox.watch_once("42"));

    sandbox.write_fixture("42", json!({ "status": 503 }));
    let output = sandbox.watch_once("42");
    assert_success(&output);

    let views = json_lines(&output);
    assert_eq!(views[0]["status"], "ready");
    assert_eq!(views[0]["snapshot"]["player"]["name"], "Maru");
}

#[test]
fn test_watch_protocol_error_shows_error() {
    let sandbox = Sandbox::new();
    sandbox.write_fixture("42", json!({ "status": 200, "body": { "player": {} } }));

    let views = json_lines(&sandbox.watch_once("42"));
    assert_eq!(views, vec![json!({ "status": "error" })]);
}

#[test]
fn test_watch_rejects_missing_fixtures_dir() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&[
        "watch",
        "--channel",
        "42",
        "--token",
        "t",
        "--fixtures",
        "/nonexistent/ladderview-fixtures",
        "--ticks",
        "0",
    ]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cache_show_and_clear() {
    let sandbox = Sandbox::new();
    sandbox.write_fixture("42", json!({ "status": 200, "body": player_body() }));
    assert_success(&sandbox.watch_once("42"));

    let output = sandbox.run(&["cache", "show", "--channel", "42", "--json"]);
    assert_success(&output);
    let entry: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entry["isLoaded"], true);
    assert_eq!(entry["status"], "ready");
    assert_eq!(entry["snapshot"]["player"]["name"], "Maru");

    let output = sandbox.run(&["cache", "clear", "--channel", "42"]);
    assert_success(&output);

    let output = sandbox.run(&["cache", "show", "--channel", "42"]);
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("No cached view for channel 42"));
}

#[test]
fn test_profile_parse() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&[
        "profile",
        "parse",
        "https://starcraft2.com/en-us/profile/2/1/4567890",
        "--json",
    ]);
    assert_success(&output);
    let ids: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(ids, json!({ "regionId": 2, "realmId": 1, "playerId": 4567890 }));

    let output = sandbox.run(&["profile", "parse", "https://example.com/profile/2/1/1"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

/// Default mode keeps stdout clean and emits no INFO logs
#[test]
fn test_default_output_is_quiet() {
    let sandbox = Sandbox::new();
    sandbox.write_fixture("42", json!({ "status": 200, "body": player_body() }));

    let output = sandbox.watch_once("42");
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );
    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Default mode should not emit INFO logs, got: {}",
        stderr
    );
}

#[test]
fn test_verbose_mode_logs_to_stderr() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["-v", "cache", "show", "--channel", "42"]);
    assert_success(&output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(r#""event":"core.app.startup_completed""#),
        "Verbose mode should emit startup event, got: {}",
        stderr
    );
    assert!(!String::from_utf8_lossy(&output.stdout).contains(r#""event":"#));
}

#[test]
fn test_verbose_watch_logs_viewer_lifecycle() {
    let sandbox = Sandbox::new();
    sandbox.write_fixture("42", json!({ "status": 200, "body": player_body() }));

    let output = sandbox.run(&[
        "-v",
        "watch",
        "--channel",
        "42",
        "--token",
        "test-token",
        "--fixtures",
        sandbox.fixtures_dir(),
        "--ticks",
        "0",
        "--json",
    ]);
    assert_success(&output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    for event in [
        "core.panel.settings_resolved",
        "core.viewer.mount_completed",
        "core.viewer.unmount_completed",
        "core.app.shutdown_started",
    ] {
        assert!(
            stderr.contains(&format!(r#""event":"{}""#, event)),
            "Expected {} in stderr, got: {}",
            event,
            stderr
        );
    }
    assert_eq!(json_lines(&output).len(), 1);
}
