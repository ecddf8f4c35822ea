use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

const EVENTS: &str = concat!(
    "{\"type\":\"session_start\",\"session\":\"s1\"}\n",
    "{\"type\":\"notification\",\"session\":\"s1\",\"app\":\"Msg\",\"title\":\"Hi\",\"content\":\"Hello there friend\"}\n",
    "{\"type\":\"mode\",\"session\":\"s1\",\"mode\":\"main\"}\n",
    "{\"type\":\"mode\",\"session\":\"s1\",\"mode\":\"none\"}\n",
    "{\"type\":\"session_end\",\"session\":\"s1\"}\n",
);

#[test]
fn test_run_prints_one_json_line_per_push() {
    let dir = tempdir().unwrap();

    let output = cargo_bin_cmd!("glance")
        .env("GLANCE_HOME", dir.path())
        .env_remove("GLANCE_WEBHOOK_URL")
        .arg("run")
        .write_stdin(EVENTS)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    // 2 pre-populated + 2 on notification + 1 on look-up
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|line| line.contains("\"session\":\"s1\"")));
    assert!(lines[2].contains("\"surface\":\"main\""));
    assert!(lines[2].contains("Hello there friend"));
    assert!(lines[4].contains("\"surface\":\"main\""));
}

#[test]
fn test_run_skips_malformed_lines() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("glance")
        .env("GLANCE_HOME", dir.path())
        .env_remove("GLANCE_WEBHOOK_URL")
        .env("GLANCE_LOG", "warn")
        .arg("run")
        .write_stdin("not json\n{\"type\":\"session_start\",\"session\":\"s9\"}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"session\":\"s9\""))
        .stderr(predicate::str::contains("Skipping malformed event"));
}
