//! CLI integration tests for skillswapctl
//!
//! Each test runs the binary against its own temporary data directory and
//! config path, so runs never touch the user's real state.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn config_path(&self) -> std::path::PathBuf {
        self.dir.path().join("config.toml")
    }

    fn data_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("data")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_skillswapctl"))
            .arg("--data-dir")
            .arg(self.data_dir())
            .args(args)
            .env("SKILLSWAP_CONFIG", self.config_path())
            .env("SKILLSWAP_LOG", "off")
            .env("NO_COLOR", "1")
            .output()
            .expect("failed to run skillswapctl")
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    fn status_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout(&["status", "--json"])).unwrap()
    }
}

fn file_exists(dir: &Path, name: &str) -> bool {
    dir.join(name).exists()
}

#[test]
fn test_version_flag() {
    let sandbox = Sandbox::new();
    let out = sandbox.stdout(&["--version"]);
    assert!(out.starts_with("skillswapctl "));
}

#[test]
fn test_fresh_status() {
    let sandbox = Sandbox::new();
    let status = sandbox.status_json();
    assert_eq!(status["user_id"], "alex");
    assert_eq!(status["points"], 0);
    assert_eq!(status["level"], 1);
    assert_eq!(status["title"], "Newcomer");
}

#[test]
fn test_login_persists_between_runs() {
    let sandbox = Sandbox::new();
    let out = sandbox.stdout(&["login", "--date", "2026-03-02"]);
    assert!(out.contains("streak 1"));

    let out = sandbox.stdout(&["login", "--date", "2026-03-02"]);
    assert!(out.contains("Already logged in"));

    sandbox.stdout(&["login", "--date", "2026-03-03"]);
    let status = sandbox.status_json();
    assert_eq!(status["streak"], 2);
    let alex_dir = sandbox.data_dir().join("alex");
    assert!(file_exists(&alex_dir, "points.json"));
    assert!(file_exists(&alex_dir, "last_login.json"));
}

#[test]
fn test_activity_xp() {
    let sandbox = Sandbox::new();
    let out = sandbox.stdout(&["activity", "session_completed", "--quality", "5", "--date", "2026-03-02"]);
    assert!(out.contains("+70 XP"));
    assert!(out.contains("First Session"));
}

#[test]
fn test_unknown_activity_exit_code() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["activity", "juggling"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("juggling"));
}

#[test]
fn test_unknown_achievement_exit_code() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["unlock", "moonwalker"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn test_claim_without_points_is_not_an_error() {
    let sandbox = Sandbox::new();
    let out = sandbox.stdout(&["claim", "profile_badge"]);
    assert!(out.contains("Not enough points"));

    sandbox.stdout(&["points", "150"]);
    let out = sandbox.stdout(&["claim", "profile_badge"]);
    assert!(out.contains("Claimed profile_badge"));
    assert_eq!(sandbox.status_json()["points"], 50);
}

#[test]
fn test_level_up_notification() {
    let sandbox = Sandbox::new();
    let out = sandbox.stdout(&["points", "200"]);
    assert!(out.contains("[LEVEL UP]"));

    let out = sandbox.stdout(&["notifications"]);
    assert!(out.contains("Level up!"));

    sandbox.stdout(&["notifications", "--read-all"]);
    assert_eq!(sandbox.status_json()["unread_notifications"], 0);
}

#[test]
fn test_levels_table() {
    let sandbox = Sandbox::new();
    let out = sandbox.stdout(&["levels", "--max", "3"]);
    assert!(out.contains("150 XP"));
    assert!(out.contains("225 XP"));
    assert!(!out.contains("338 XP"));
}

#[test]
fn test_match_and_suggest() {
    let sandbox = Sandbox::new();
    let out = sandbox.stdout(&["match", "alex", "sam"]);
    assert!(out.contains("alex -> sam"));

    let out = sandbox.stdout(&["suggest", "--limit", "2"]);
    assert!(out.contains("Sam Rivera"));
    assert!(!out.contains("Anonymous"));
}

#[test]
fn test_blocked_send() {
    let sandbox = Sandbox::new();
    let out = sandbox.stdout(&["send", "troll", "hello"]);
    assert!(out.contains("blocked"));
    assert_eq!(sandbox.status_json()["points"], 0);
}

#[test]
fn test_join_and_leave() {
    let sandbox = Sandbox::new();
    assert!(sandbox.stdout(&["join", "music-makers"]).contains("Joined"));
    assert!(sandbox.stdout(&["communities"]).contains("[joined]"));
    assert!(sandbox.stdout(&["leave", "music-makers"]).contains("Left"));

    let output = sandbox.run(&["join", "knitting"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn test_config_set_writes_file() {
    let sandbox = Sandbox::new();
    let out = sandbox.stdout(&["config", "--set", "user_id=sam"]);
    assert!(out.contains("user_id = \"sam\""));

    let written = std::fs::read_to_string(sandbox.config_path()).unwrap();
    assert!(written.contains("sam"));
    assert_eq!(sandbox.status_json()["user_id"], "sam");
}

#[test]
fn test_users_have_separate_state() {
    let sandbox = Sandbox::new();
    sandbox.stdout(&["points", "500"]);
    assert_eq!(sandbox.status_json()["points"], 500);

    let out = sandbox.stdout(&["--user", "sam", "status", "--json"]);
    let sam: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(sam["user_id"], "sam");
    assert_eq!(sam["points"], 0);
    assert_eq!(sam["level"], 1);
    assert_eq!(sam["unread_notifications"], 0);

    assert!(file_exists(&sandbox.data_dir().join("alex"), "points.json"));
    assert!(!file_exists(&sandbox.data_dir().join("sam"), "points.json"));
}
