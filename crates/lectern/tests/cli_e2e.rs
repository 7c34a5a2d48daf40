#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A `lectern` invocation isolated to `temp`: shared data under `data/`, user config
/// under `config/`.
fn lectern_cmd(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("lectern"));
    cmd.env("LECTERN_DATA", temp.path().join("data"))
        .env("XDG_CONFIG_HOME", temp.path().join("config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_note_published_from_control_shows_up_everywhere() {
    let temp = TempDir::new().unwrap();

    // 1. Project a note from the control panel (stdin is not a terminal: no prompt)
    lectern_cmd(&temp)
        .arg("control")
        .write_stdin("note-live Opening | **Welcome**\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Live:"));

    // 2. The snapshot is on disk for other processes
    let raw = fs::read_to_string(temp.path().join("data").join("snapshot.json")).unwrap();
    assert!(raw.contains("**Welcome**"));

    // 3. `show` renders it the way a slideshow would
    lectern_cmd(&temp)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Opening"))
        .stdout(predicate::str::contains("Welcome"))
        .stdout(predicate::str::contains("**").not());

    // 4. History keeps the raw text
    lectern_cmd(&temp)
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1."))
        .stdout(predicate::str::contains("Opening"))
        .stdout(predicate::str::contains("**Welcome**"));
}

#[test]
fn test_naked_invocation_runs_control() {
    let temp = TempDir::new().unwrap();
    lectern_cmd(&temp)
        .write_stdin("status\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing selected"));
}

#[test]
fn test_show_before_anything_is_live() {
    let temp = TempDir::new().unwrap();
    lectern_cmd(&temp)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Waiting for verse..."));
}

#[test]
fn test_history_replay_and_clear() {
    let temp = TempDir::new().unwrap();
    lectern_cmd(&temp)
        .arg("control")
        .write_stdin("note-live First | one\nnote-live Second | two\n")
        .assert()
        .success();

    // Replay the older entry (position 2)
    lectern_cmd(&temp)
        .args(["history", "replay", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Replayed: First"));
    lectern_cmd(&temp)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("one"))
        .stdout(predicate::str::contains("Second").not());

    // Replays are not recorded again
    lectern_cmd(&temp)
        .args(["history", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2 history entries"));
    lectern_cmd(&temp)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("History is empty"));
}

#[test]
fn test_out_of_range_replay_is_a_warning() {
    let temp = TempDir::new().unwrap();
    lectern_cmd(&temp)
        .args(["history", "replay", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No history entry 4"));
}

#[test]
fn test_background_override_reaches_show() {
    let temp = TempDir::new().unwrap();
    lectern_cmd(&temp)
        .arg("control")
        .write_stdin("note-live Opening | hello\nbg #112233\nbg red\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Background color: #112233"));

    lectern_cmd(&temp)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("#112233"));
}

#[test]
fn test_repl_survives_bad_input() {
    let temp = TempDir::new().unwrap();
    lectern_cmd(&temp)
        .arg("control")
        .write_stdin("dance\nverse x\nchapter 3\nlive\nqueue-list\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command 'dance'"))
        .stdout(predicate::str::contains("Usage: verse <n>"))
        .stdout(predicate::str::contains("Choose a book first"))
        .stdout(predicate::str::contains("Nothing to project"))
        .stdout(predicate::str::contains("Queue is empty"));
}

#[test]
fn test_queue_notes_then_go_live_together() {
    let temp = TempDir::new().unwrap();
    lectern_cmd(&temp)
        .arg("control")
        .write_stdin("note-queue A | alpha\nnote-queue B | beta\nqueue-list\nlive\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 in queue)"));

    lectern_cmd(&temp)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("beta"));
}

#[test]
fn test_books_search() {
    let temp = TempDir::new().unwrap();
    lectern_cmd(&temp)
        .args(["books", "john"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New Testament"))
        .stdout(predicate::str::contains("1 John"))
        .stdout(predicate::str::contains("Old Testament").not());
}

#[test]
fn test_config_reads_data_dir_file_and_env() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("lectern.toml"), "default_version = \"ESV\"\n").unwrap();

    lectern_cmd(&temp)
        .env("LECTERN_POLL_INTERVAL_MS", "125")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("poll_interval_ms = 125"))
        .stdout(predicate::str::contains("default_version = \"ESV\""));
}

#[test]
fn test_invalid_config_fails_with_error() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("lectern.toml"), "poll_interval_ms = \"soon\"\n").unwrap();

    lectern_cmd(&temp)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    lectern_cmd(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!("v", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_open_without_command_leaves_terminal_alone() {
    let temp = TempDir::new().unwrap();
    lectern_cmd(&temp)
        .arg("control")
        .env_remove("LECTERN_SLIDESHOW_COMMAND")
        .write_stdin("open\nstatus\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("No slideshow_command configured"))
        .stderr(predicate::str::contains("slideshow` in another terminal"))
        .stdout(predicate::str::contains("Slideshow started").not());
}

#[cfg(target_os = "linux")]
#[test]
fn test_quit_stops_opened_slideshows() {
    let temp = TempDir::new().unwrap();
    let output = lectern_cmd(&temp)
        .arg("control")
        .env("LECTERN_SLIDESHOW_COMMAND", "sleep 30")
        .write_stdin("open\nquit\n")
        .timeout(std::time::Duration::from_secs(20))
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let pid: u32 = stdout
        .split("(pid ")
        .nth(1)
        .and_then(|rest| rest.split(')').next())
        .and_then(|pid| pid.parse().ok())
        .unwrap_or_else(|| panic!("no pid in {stdout:?}"));
    assert!(
        !std::path::Path::new(&format!("/proc/{pid}")).exists(),
        "slideshow {pid} outlived the control panel"
    );
}
