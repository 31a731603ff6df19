// CLI integration tests for the schema conversion flows.
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

const ROBOT: &str = r#"{
    "id": "robot_arm",
    "records": {
        "Robot": {
            "speed": "text",
            "joints": "list",
            "status": { "mode": "text" }
        }
    }
}"#;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_schemite");
    Command::new(exe)
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn schema_dir(temp: &tempfile::TempDir) -> PathBuf {
    let dir = temp.path().join("schemas");
    fs::create_dir_all(&dir).expect("schema dir");
    fs::write(dir.join("robot_arm.schema.json"), ROBOT).expect("write schema");
    dir
}

fn stdout_text(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stderr_json(output: &std::process::Output) -> Value {
    let text = String::from_utf8_lossy(&output.stderr);
    let line = text.lines().next().expect("error line");
    parse_json(line)
}

#[test]
fn id_config_check_canon_flow() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = schema_dir(&temp);
    let dir_arg = dir.to_str().unwrap();

    let id = cmd()
        .args(["--dir", dir_arg, "id", "robot_arm"])
        .output()
        .expect("id");
    assert!(id.status.success());
    let id_json = parse_json(&stdout_text(&id));
    assert_eq!(id_json["id"], "robot_arm");

    let config = cmd()
        .args(["--dir", dir_arg, "config", "robot_arm"])
        .output()
        .expect("config");
    assert!(config.status.success());
    let skeleton_text = stdout_text(&config);
    let skeleton = parse_json(&skeleton_text);
    assert_eq!(skeleton["format"], 1);
    assert_eq!(skeleton["meta"]["model"], "robot_arm");
    assert_eq!(skeleton["data"]["Robot"]["speed"], "");
    assert_eq!(skeleton["data"]["Robot"]["joints"], serde_json::json!([]));
    assert_eq!(skeleton["data"]["Robot"]["status"]["mode"], "");

    // the skeleton the tool emits must pass its own check
    let doc_path = temp.path().join("skeleton.json");
    fs::write(&doc_path, &skeleton_text).expect("write doc");
    let check = cmd()
        .args([
            "--dir",
            dir_arg,
            "check",
            "robot_arm",
            "--file",
            doc_path.to_str().unwrap(),
        ])
        .output()
        .expect("check");
    assert!(check.status.success());
    let check_json = parse_json(&stdout_text(&check));
    assert_eq!(check_json["valid"], true);
    assert_eq!(check_json["id"], "robot_arm");
    assert_eq!(check_json["records"], serde_json::json!(["Robot"]));

    // canon re-emits scrambled input as the sorted compact envelope
    let scrambled = r#"{"meta":{"stamp":"t0","model":"robot_arm","device":"edge-01","ident":"run-7"},"format":1,"data":{"Robot":{"status":{"mode":"auto"},"speed":"2.5","joints":["j1","j2"]}}}"#;
    let canon = cmd()
        .args(["--dir", dir_arg, "canon", "robot_arm", scrambled])
        .output()
        .expect("canon");
    assert!(canon.status.success());
    let canonical = stdout_text(&canon);
    assert_eq!(
        canonical,
        r#"{"data":{"Robot":{"joints":["j1","j2"],"speed":"2.5","status":{"mode":"auto"}}},"format":1,"meta":{"device":"edge-01","ident":"run-7","model":"robot_arm","stamp":"t0"}}"#
    );
    assert_eq!(parse_json(&canonical), parse_json(scrambled));
}

#[test]
fn missing_schema_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = schema_dir(&temp);

    let id = cmd()
        .args(["--dir", dir.to_str().unwrap(), "id", "ghost"])
        .output()
        .expect("id");
    assert_eq!(id.status.code().unwrap(), 3);
    let error = stderr_json(&id);
    assert_eq!(error["error"]["kind"], "InvalidFilePath");
    assert!(error["error"]["hint"].is_string());
}

#[test]
fn malformed_document_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = schema_dir(&temp);

    let check = cmd()
        .args(["--dir", dir.to_str().unwrap(), "check", "robot_arm", "{not json"])
        .output()
        .expect("check");
    assert_eq!(check.status.code().unwrap(), 5);
    assert_eq!(stderr_json(&check)["error"]["kind"], "InvalidDoc");
}

#[test]
fn field_kind_mismatch_reports_key() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = schema_dir(&temp);

    let doc = r#"{"format":1,"meta":{"model":"robot_arm","device":"edge-01","stamp":"t0"},"data":{"Robot":{"speed":2.5,"joints":["j1"],"status":{"mode":"auto"}}}}"#;
    let check = cmd()
        .args(["--dir", dir.to_str().unwrap(), "check", "robot_arm", doc])
        .output()
        .expect("check");
    assert_eq!(check.status.code().unwrap(), 7);
    let error = stderr_json(&check);
    assert_eq!(error["error"]["kind"], "InvalidDataType");
    assert_eq!(error["error"]["key"], "Robot.speed");
}

#[test]
fn usage_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = schema_dir(&temp);

    let id = cmd()
        .args(["--dir", dir.to_str().unwrap(), "id", "robot_arm", "--bogus"])
        .output()
        .expect("id");
    assert_eq!(id.status.code().unwrap(), 2);
}

#[test]
fn completion_script_mentions_binary() {
    let completion = cmd()
        .args(["completion", "bash"])
        .output()
        .expect("completion");
    assert!(completion.status.success());
    assert!(String::from_utf8_lossy(&completion.stdout).contains("schemite"));
}

#[test]
fn conflicting_document_inputs_are_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = schema_dir(&temp);
    let doc_path = temp.path().join("doc.json");
    fs::write(&doc_path, "{}").expect("write doc");

    let check = cmd()
        .args([
            "--dir",
            dir.to_str().unwrap(),
            "check",
            "robot_arm",
            "{}",
            "--file",
            doc_path.to_str().unwrap(),
        ])
        .output()
        .expect("check");
    assert_eq!(check.status.code().unwrap(), 2);
    assert_eq!(stderr_json(&check)["error"]["kind"], "InvalidParam");
}

#[test]
fn schema_path_ref_bypasses_schema_dir() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("direct.schema.json");
    fs::write(&path, ROBOT).expect("write schema");

    let id = cmd()
        .args(["id", path.to_str().unwrap()])
        .output()
        .expect("id");
    assert!(id.status.success());
    assert_eq!(parse_json(&stdout_text(&id))["id"], "robot_arm");
}
