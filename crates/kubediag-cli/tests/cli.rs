//! End-to-end CLI smoke tests driven through the compiled binary.

use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;

fn write_snapshot(contents: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("kubediag-cli-test-{}-{}.json", std::process::id(), contents.len()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn rules_list_exits_successfully_and_prints_rule_names() {
    let mut cmd = Command::cargo_bin("kubediag").unwrap();
    cmd.arg("rules").arg("list");
    let output = cmd.assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("OOMKilled") || stdout.contains("priority="));
}

#[test]
fn rules_show_unknown_name_still_exits_zero() {
    let mut cmd = Command::cargo_bin("kubediag").unwrap();
    cmd.arg("rules").arg("show").arg("NotARealRule");
    cmd.assert().success().stdout(contains("no rule named"));
}

#[test]
fn diagnose_missing_file_exits_nonzero() {
    let mut cmd = Command::cargo_bin("kubediag").unwrap();
    cmd.arg("diagnose").arg("/nonexistent/kubediag-cli-test-missing.json");
    cmd.assert().failure();
}

#[test]
fn diagnose_oom_snapshot_exits_zero_and_prints_root_cause() {
    let path = write_snapshot(
        r#"{
            "pod": {
                "metadata": {"name": "worker-2"},
                "spec": {"containers": [{"name": "worker"}]},
                "status": {
                    "phase": "Running",
                    "container_statuses": [{
                        "name": "worker",
                        "last_state": {"terminated": {"exit_code": 137, "reason": "OOMKilled"}}
                    }]
                }
            },
            "events": []
        }"#,
    );

    let mut cmd = Command::cargo_bin("kubediag").unwrap();
    cmd.arg("diagnose").arg(&path);
    let output = cmd.assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("OOMKilled"));

    let _ = std::fs::remove_file(path);
}
