//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data
//! directory, so tests never see each other's groups.

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

struct Cli {
    data_dir: TempDir,
}

impl Cli {
    fn new() -> Self {
        let cli = Self {
            data_dir: tempfile::tempdir().expect("temp data dir"),
        };
        cli.run_success(&["config", "set", "audio.enabled", "false"]);
        cli
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_shotclock"));
        cmd.args(args)
            .env("SHOTCLOCK_DATA_DIR", self.data_dir.path())
            .env("SHOTCLOCK_LOG", "off");
        cmd
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        self.run_with_input(args, "")
    }

    fn run_with_input(&self, args: &[&str], input: &str) -> (String, String, i32) {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute CLI command");
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("write stdin");
        let output = child.wait_with_output().expect("wait for CLI");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        (stdout, stderr, code)
    }

    fn run_success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
        stdout
    }

    fn create(&self, args: &[&str]) -> serde_json::Value {
        let mut full = vec!["group", "create"];
        full.extend_from_slice(args);
        serde_json::from_str(&self.run_success(&full)).expect("group JSON")
    }
}

#[test]
fn test_group_list_empty() {
    let cli = Cli::new();
    let out = cli.run_success(&["group", "list"]);
    assert!(out.contains("No groups yet"));
}

#[test]
fn test_group_create_and_list() {
    let cli = Cli::new();
    let group = cli.create(&[
        "--name", "Friday", "--member", "A", "--member", "B", "--timer", "30", "--alarm", "sound2",
    ]);
    assert_eq!(group["name"], "Friday");
    assert_eq!(group["timerSeconds"], 30);
    assert_eq!(group["alarmSound"], "sound2");

    let out = cli.run_success(&["group", "list"]);
    assert!(out.contains("Friday"));
    assert!(out.contains("members: 2"));
    assert!(out.contains("⏱ 30s • sound2"));

    let json: serde_json::Value =
        serde_json::from_str(&cli.run_success(&["group", "list", "--json"])).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_group_create_without_timer_stores_null() {
    let cli = Cli::new();
    let group = cli.create(&["--name", "Chill", "--member", "A"]);
    assert_eq!(group["timerEnabled"], false);
    assert!(group["timerSeconds"].is_null());
}

#[test]
fn test_group_create_blank_name_saves_nothing() {
    let cli = Cli::new();
    let (stdout, stderr, code) = cli.run(&["group", "create", "--name", "  ", "--member", "A"]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("nothing saved"));
    assert!(cli.run_success(&["group", "list"]).contains("No groups yet"));
}

#[test]
fn test_group_create_without_members_fails() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["group", "create", "--name", "Ghosts"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no members"));
}

#[test]
fn test_group_create_rejects_unknown_sound() {
    let cli = Cli::new();
    let (_, _, code) = cli.run(&["group", "create", "--name", "G", "--member", "A", "--alarm", "bell"]);
    assert_ne!(code, 0);
}

#[test]
fn test_group_show_and_delete() {
    let cli = Cli::new();
    let group = cli.create(&["--name", "Temp", "--member", "A"]);
    let id = group["id"].as_str().unwrap();

    let shown: serde_json::Value =
        serde_json::from_str(&cli.run_success(&["group", "show", id])).unwrap();
    assert_eq!(shown, group);

    assert!(cli.run_success(&["group", "delete", id]).contains("Deleted"));
    assert!(cli.run_success(&["group", "delete", id]).contains("nothing deleted"));
    let (_, _, code) = cli.run(&["group", "show", id]);
    assert_eq!(code, 1);
}

#[test]
fn test_play_rotates_turns() {
    let cli = Cli::new();
    let group = cli.create(&["--name", "Duo", "--member", "A", "--member", "B"]);
    let id = group["id"].as_str().unwrap();

    let (stdout, stderr, code) = cli.run_with_input(&["play", id], "shot\nskip\nquit\n");
    assert_eq!(code, 0, "{stderr}");
    assert!(stdout.contains("[--:--] Round 1 · Turn: A"));
    assert!(stdout.contains("Round 1 · Turn: B"));
    assert!(stdout.contains("Round 2 · Turn: A"));
}

#[test]
fn test_play_json_lines() {
    let cli = Cli::new();
    let group = cli.create(&["--name", "Timed", "--member", "A", "--member", "B", "--timer", "65"]);
    let id = group["id"].as_str().unwrap();

    let (stdout, _, code) = cli.run_with_input(&["play", id, "--json"], "s\n");
    assert_eq!(code, 0);
    let frames: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(frames[0]["event"]["type"], "StateSnapshot");
    assert_eq!(frames[0]["event"]["state"], "in_turn");
    assert_eq!(frames[0]["event"]["time_left"], 65);
    assert_eq!(frames[0]["view"]["clock"], "01:05");
    assert_eq!(frames[0]["view"]["current_player"], "A");
    let advanced = frames
        .iter()
        .find(|f| f["event"]["type"] == "TurnAdvanced")
        .expect("turn advanced frame");
    assert_eq!(advanced["view"]["current_player"], "B");
    assert_eq!(advanced["event"]["action"], "take_shot");
}

#[test]
fn test_play_unknown_group_stays_idle() {
    let cli = Cli::new();
    let (stdout, stderr, code) = cli.run(&["play", "missing"]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("not found"));
}

#[test]
fn test_sound_list() {
    let cli = Cli::new();
    let out = cli.run_success(&["sound", "list"]);
    for sound in ["sound1", "sound2", "sound3"] {
        assert!(out.contains(sound));
    }
    assert!(out.contains("missing"));
}

#[test]
fn test_config_get_set() {
    let cli = Cli::new();
    assert_eq!(cli.run_success(&["config", "get", "audio.enabled"]).trim(), "false");
    cli.run_success(&["config", "set", "play.tick_ms", "500"]);
    assert_eq!(cli.run_success(&["config", "get", "play.tick_ms"]).trim(), "500");
    let (_, _, code) = cli.run(&["config", "get", "audio.volume"]);
    assert_eq!(code, 1);
    assert!(cli.run_success(&["config", "list"]).contains("[audio]"));
}

#[test]
fn test_completions() {
    let cli = Cli::new();
    assert!(cli.run_success(&["completions", "bash"]).contains("shotclock"));
}
