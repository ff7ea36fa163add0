use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

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

#[test]
fn count_is_clamped_to_required_count() {
    let store_path = temp_path("cli-count.json");

    let output = run(&store_path, &["count", "arena-challenges", "50", "--json"]);
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["current"], 5);
    assert_eq!(payload["required"], 5);

    let output = run(&store_path, &["count", "arena-challenges", "-3"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        "Updated count: arena-challenges 0/5"
    );

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();
    assert_eq!(stored["taskCounts"]["arena-challenges"], 0);
}

#[test]
fn count_rejects_non_numeric_value() {
    let store_path = temp_path("cli-count-nan.json");

    let output = run(&store_path, &["count", "arena-challenges", "many"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("ERROR: invalid_input - "));
}

#[test]
fn milestones_report_partial_credit_per_source() {
    let store_path = temp_path("cli-count-milestones.json");
    let state = serde_json::json!({
        "selectedEvents": ["lost-kingdom"],
        "selectedSubEvents": { "lost-kingdom": "lk-day-2" },
        "taskCounts": { "hunt-beasts": 12 },
        "lastReset": now_millis()
    });
    std::fs::write(&store_path, state.to_string()).unwrap();

    let output = run(&store_path, &["milestones", "hunt-beasts", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let milestones: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(milestones[0]["eventId"], "daily");
    assert_eq!(milestones[0]["achieved"], 10);
    assert_eq!(milestones[0]["reached"], true);
    assert_eq!(milestones[1]["required"], 25);
    assert_eq!(milestones[1]["achieved"], 12);
    assert_eq!(milestones[1]["reached"], false);
}
