//! Basic CLI E2E tests.
//!
//! Tests invoke the built `weekplan` binary against a throwaway data
//! directory and verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command with `dir` as the data directory and return output.
fn run_cli(dir: &Path, args: &[&str], stdin: Option<&str>) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_weekplan"))
        .args(args)
        .env("WEEKPLAN_DATA_DIR", dir)
        .env_remove("WEEKPLAN_LOG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    if let Some(input) = stdin {
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
    } else {
        drop(child.stdin.take());
    }

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

fn run_json(dir: &Path, args: &[&str], stdin: Option<&str>) -> serde_json::Value {
    let (code, stdout, stderr) = run_cli(dir, args, stdin);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

const INCOMPLETE_DRAFT: &str = r#"```json
{
  "meetings": [
    {"id": "exam", "description": "CS201 exam", "day": "Thursday", "type": "exam"}
  ],
  "tasks": [
    {"id": "prep", "description": "Study for CS201", "priority": "high",
     "category": "preparation", "related_event": "CS201 exam"}
  ]
}
```"#;

#[test]
fn test_config_defaults_and_set() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "scheduler.work_start"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "09:00");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "scheduler.work_end", "18:00"], None);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "scheduler.work_end"], None);
    assert_eq!(stdout.trim(), "18:00");

    let (_, stdout, _) = run_cli(dir.path(), &["config", "list"], None);
    assert!(stdout.contains("storage.draft_file = latest_schedule.json"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "scheduler.nope", "1"], None);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_draft_show_without_draft_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["draft", "show"], None);
    assert_ne!(code, 0);
    assert!(stderr.contains("weekplan draft import"));
}

#[test]
fn test_import_answer_plan_flow() {
    let dir = TempDir::new().unwrap();

    let summary = run_json(dir.path(), &["draft", "import"], Some(INCOMPLETE_DRAFT));
    assert_eq!(summary["questions"], 3);
    assert_eq!(summary["complete"], false);

    let questions = run_json(dir.path(), &["draft", "questions", "--all"], None);
    assert_eq!(questions.as_array().unwrap().len(), 3);

    let (code, _, stderr) = run_cli(dir.path(), &["plan"], None);
    assert_ne!(code, 0);
    assert!(stderr.contains("open question"));

    run_json(dir.path(), &["draft", "answer", "time", "10am"], None);
    run_json(dir.path(), &["draft", "answer", "duration", "120"], None);
    let done = run_json(dir.path(), &["draft", "answer", "course_code", "CS201"], None);
    assert_eq!(done["complete"], true);
    assert!(done["next_question"].is_null());

    let plan = run_json(dir.path(), &["plan"], None);
    let thursday = plan["generated_calendar"]["Thursday"].as_array().unwrap();
    assert_eq!(thursday[0]["id"], "exam");
    assert_eq!(thursday[0]["start_time"], "10:00");

    let wednesday = plan["generated_calendar"]["Wednesday"].as_array().unwrap();
    let ids: Vec<_> = wednesday.iter().map(|e| e["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["prep-part1", "prep-part2"]);
    assert_eq!(plan["unplaced"].as_array().unwrap().len(), 0);
}

#[test]
fn test_answer_rejects_bad_value() {
    let dir = TempDir::new().unwrap();
    run_json(dir.path(), &["draft", "import"], Some(INCOMPLETE_DRAFT));
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["draft", "answer", "duration_minutes", "soon", "--target-id", "exam"],
        None,
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid value"));

    let questions = run_json(dir.path(), &["draft", "questions", "--all"], None);
    assert_eq!(questions.as_array().unwrap().len(), 3);
}

#[test]
fn test_calendar_validate_and_import() {
    let dir = TempDir::new().unwrap();
    let calendar = r#"{
        "Monday": [
            {"id": "lec", "type": "regular", "description": "Lecture",
             "start_time": "09:00", "end_time": "10:30", "duration": 90}
        ]
    }"#;

    let report = run_json(dir.path(), &["calendar", "validate"], Some(calendar));
    assert_eq!(report["valid"], true);
    assert_eq!(report["entries"], 1);

    let (code, _, _) = run_cli(dir.path(), &["calendar", "validate"], Some(r#"{"Funday": []}"#));
    assert_ne!(code, 0);

    let summary = run_json(dir.path(), &["calendar", "import"], Some(calendar));
    assert_eq!(summary["meetings"], 1);
    assert_eq!(summary["complete"], true);

    let draft = run_json(dir.path(), &["draft", "show"], None);
    assert_eq!(draft["meetings"][0]["time"], "09:00");
    assert_eq!(draft["meetings"][0]["duration_minutes"], 90);
}

#[test]
fn test_plan_text_output() {
    let dir = TempDir::new().unwrap();
    let draft = r#"{"meetings": [{"id": "m", "description": "Standup", "day": "Monday",
                    "time": "09:00", "duration_minutes": 15}]}"#;
    run_json(dir.path(), &["draft", "import"], Some(draft));
    let (code, stdout, _) = run_cli(dir.path(), &["plan", "--text", "--weekend"], None);
    assert_eq!(code, 0);
    assert!(stdout.contains("Monday"));
    assert!(stdout.contains("09:00-09:15  Standup"));
    assert!(stdout.contains("Sunday"));
}
