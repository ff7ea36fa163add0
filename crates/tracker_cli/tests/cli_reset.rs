use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const DAY_MS: i64 = 86_400_000;

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tracker-{nanos}-{file_name}"))
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64
}

fn run(store_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tracker"))
        .args(args)
        .env("TRACKER_STORE_PATH", store_path)
        .env("TRACKER_CONFIG_PATH", temp_path("missing-config.json"))
        .env("TRACKER_DISABLE_NOTIFICATIONS", "1")
        .output()
        .expect("failed to run tracker")
}

fn write_state(path: &Path, last_reset: i64) {
    let state = serde_json::json!({
        "completedTasks": [
            { "taskId": "daily-login", "completedAt": last_reset + 1_000 }
        ],
        "selectedEvents": ["lost-kingdom"],
        "selectedSubEvents": { "lost-kingdom": "lk-day-3" },
        "taskCounts": { "arena-challenges": 4 },
        "lastReset": last_reset
    });
    std::fs::write(path, serde_json::to_string_pretty(&state).unwrap()).unwrap();
}

fn read_store(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn reset_clears_progress_after_a_day_and_keeps_selection() {
    let store_path = temp_path("cli-reset.json");
    let before = now_millis();
    write_state(&store_path, before - DAY_MS - 1_000);

    let output = run(&store_path, &["reset", "--json"]);
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["reset"], true);
    assert_eq!(payload["outcome"]["clearedCompletions"], 1);
    assert_eq!(payload["outcome"]["clearedCounts"], 1);

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();
    assert_eq!(stored["completedTasks"].as_array().unwrap().len(), 0);
    assert_eq!(stored["taskCounts"].as_object().unwrap().len(), 0);
    assert_eq!(stored["selectedEvents"], serde_json::json!(["lost-kingdom"]));
    assert_eq!(stored["selectedSubEvents"]["lost-kingdom"], "lk-day-3");
    assert!(stored["lastReset"].as_i64().unwrap() >= before);
}

#[test]
fn reset_within_the_window_changes_nothing() {
    let store_path = temp_path("cli-reset-early.json");
    let last_reset = now_millis() - DAY_MS + 60_000;
    write_state(&store_path, last_reset);

    let output = run(&store_path, &["reset"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "No reset due.");

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();
    assert_eq!(stored["lastReset"], last_reset);
    assert_eq!(stored["taskCounts"]["arena-challenges"], 4);
}

#[test]
fn reading_tasks_applies_an_overdue_reset() {
    let store_path = temp_path("cli-reset-auto.json");
    write_state(&store_path, now_millis() - 2 * DAY_MS);

    let output = run(&store_path, &["tasks", "--json"]);
    assert!(output.status.success());
    let tasks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let login = tasks
        .as_array()
        .unwrap()
        .iter()
        .find(|task| task["type"] == "daily-login")
        .expect("daily-login task");
    assert_eq!(login["completed"], false);

    let stored = read_store(&store_path);
    std::fs::remove_file(&store_path).ok();
    assert_eq!(stored["completedTasks"].as_array().unwrap().len(), 0);
}

#[test]
fn watch_once_reports_reset() {
    let store_path = temp_path("cli-reset-watch.json");
    write_state(&store_path, now_millis() - DAY_MS - 1);

    let output = run(&store_path, &["watch", "--once"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Daily tasks reset: 1 completed and 1 in-progress cleared"));
}
