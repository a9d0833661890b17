//! Integration tests for top-level CLI behavior.

use std::path::{Path, PathBuf};
use std::process::Command;

fn run_greenid(store: &Path, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_greenid");
    Command::new(bin)
        .arg("--store-dir")
        .arg(store)
        .args(args)
        .env_remove("GREENID_RECORD")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run greenid binary")
}

fn fresh_store(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("greenid_cli_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn resolve_creates_then_reuses_identity() {
    let store = fresh_store("resolve");

    let first = run_greenid(&store, &["resolve"]);
    assert!(first.status.success());
    let payload: serde_json::Value = serde_json::from_str(&stdout(&first)).unwrap();
    let player_id = payload["player_id"].as_str().unwrap();
    assert_eq!(player_id.split('-').count(), 4);
    assert!(payload["name"].as_str().unwrap().starts_with("Guest "));

    let second = run_greenid(&store, &["resolve"]);
    assert!(second.status.success());
    assert_eq!(stdout(&first), stdout(&second));

    let file = std::fs::read_to_string(store.join("localhost.json")).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&file).unwrap();
    assert_eq!(entries["user"], stdout(&first));

    let _ = std::fs::remove_dir_all(&store);
}

#[test]
fn resolve_replaces_corrupt_record() {
    let store = fresh_store("corrupt");
    std::fs::create_dir_all(&store).unwrap();
    std::fs::write(store.join("localhost.json"), r#"{"user":"{\"player_id\":\"1-2-3-4\"}"}"#)
        .unwrap();

    let output = run_greenid(&store, &["resolve"]);
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_ne!(payload["player_id"], "1-2-3-4");
    assert!(payload["name"].is_string());

    let _ = std::fs::remove_dir_all(&store);
}

#[test]
fn show_does_not_create_identity() {
    let store = fresh_store("show");

    let output = run_greenid(&store, &["show"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("no stored identity"));
    assert!(!store.join("localhost.json").exists());

    let _ = std::fs::remove_dir_all(&store);
}

#[test]
fn launch_without_program_prints_startup_call() {
    let store = fresh_store("launch_stdout");

    let output = run_greenid(&store, &["launch", "--mount", "app"]);
    assert!(output.status.success());
    let call: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(call["node"], "app");
    let flags = call["flags"].as_str().unwrap();

    let resolved = run_greenid(&store, &["resolve"]);
    assert_eq!(stdout(&resolved), flags);

    let _ = std::fs::remove_dir_all(&store);
}

#[test]
fn launch_passes_identity_to_program() {
    let store = fresh_store("launch_program");

    let output = run_greenid(
        &store,
        &["launch", "--", "sh", "-c", "printf '%s|%s' \"$GREENID_MOUNT\" \"$GREENID_FLAGS\""],
    );
    assert!(output.status.success());
    let printed = stdout(&output);
    let (mount, flags) = printed.split_once('|').unwrap();
    assert_eq!(mount, "root");
    assert!(flags.contains("player_id"));

    let _ = std::fs::remove_dir_all(&store);
}

#[test]
fn strict_mode_fails_on_corrupt_store_file() {
    let store = fresh_store("strict");
    std::fs::create_dir_all(&store).unwrap();
    std::fs::write(store.join("localhost.json"), "not a map").unwrap();

    let strict = run_greenid(&store, &["--strict", "resolve"]);
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("Storage unavailable"));

    let lenient = run_greenid(&store, &["resolve"]);
    assert!(lenient.status.success());
    assert!(stdout(&lenient).contains("player_id"));
    assert_eq!(std::fs::read_to_string(store.join("localhost.json")).unwrap(), "not a map");

    let _ = std::fs::remove_dir_all(&store);
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let store = fresh_store("invalid");
    let output = run_greenid(&store, &["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn ping_tracks_resolved_player() {
    let store = fresh_store("ping");

    let first = run_greenid(&store, &["ping", "--team", "1"]);
    assert!(first.status.success());
    let resolved = run_greenid(&store, &["resolve"]);
    let payload: serde_json::Value = serde_json::from_str(&stdout(&resolved)).unwrap();
    let player_id = payload["player_id"].as_str().unwrap();
    assert_eq!(stdout(&first), format!("join_side {player_id} team=1\nplayers: 1"));

    let again = run_greenid(&store, &["ping"]);
    assert!(again.status.success());
    assert_eq!(stdout(&again), "players: 1");

    let file = std::fs::read_to_string(store.join("localhost.json")).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&file).unwrap();
    let roster: serde_json::Value = serde_json::from_str(entries["presence"].as_str().unwrap()).unwrap();
    assert_eq!(roster[player_id]["team"], 1);

    let _ = std::fs::remove_dir_all(&store);
}

#[test]
fn invalid_log_level_is_reported() {
    let store = fresh_store("log_level");
    let output = run_greenid(&store, &["--log-level", "greenid=loud", "resolve"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid log level 'greenid=loud'"));
    assert!(!store.join("localhost.json").exists());
}
