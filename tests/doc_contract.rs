//! Purpose: Regression coverage for the engine error taxonomy.
//! Exports: Integration tests only.
//! Role: Verify every error kind stays reachable through the public API.
//! Invariants: Kind assignments for representative failures remain stable.
//! Notes: `Internal` is raised only for serialization or clock faults and
//! has no deterministic trigger here; the translator tests pin its mapping.

use std::io::Write;

use schemite::api::{DataObject, ErrorKind, MAX_DOC_LEN, Record, Representation};

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

fn rep() -> Representation {
    Representation::from_schema_text(ROBOT).expect("schema")
}

fn robot_object() -> DataObject {
    let mut record = Record::new();
    record.put_text("speed", "2.5").expect("speed");
    record
        .put_list("joints", vec!["j1".to_string(), "j2".to_string()])
        .expect("joints");
    let mut status = Record::new();
    status.put_text("mode", "auto").expect("mode");
    record.put_record("status", status).expect("status");
    let mut object = DataObject::new("edge-01", "20260823T100000Z").expect("object");
    object.add_record("Robot", record).expect("record");
    object
}

#[test]
fn unreadable_schema_file_is_invalid_file_path() {
    let err = Representation::from_file("/no/such/schema.json").expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::InvalidFilePath);
    assert!(err.path().is_some());
}

#[test]
fn malformed_schema_is_invalid_schema() {
    for text in [
        "{not json",
        r#"{"id": "", "records": {"R": {"f": "text"}}}"#,
        r#"{"id": "x", "records": {}}"#,
        r#"{"id": "x", "records": {"R": {}}}"#,
        r#"{"id": "x", "records": {"R": {"f": "float"}}}"#,
    ] {
        let err = Representation::from_schema_text(text).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::InvalidSchema, "input: {text}");
    }
}

#[test]
fn schema_file_round_trips_through_representation() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(ROBOT.as_bytes()).expect("write");
    let rep = Representation::from_file(file.path()).expect("representation");
    assert_eq!(rep.id(), "robot_arm");

    let doc = rep.encode(&robot_object()).expect("encode");
    let back = rep.decode(&doc).expect("decode");
    assert_eq!(back, robot_object());
}

#[test]
fn undeclared_record_is_invalid_record_name() {
    let mut object = robot_object();
    object.add_record("Ghost", Record::new()).expect("record");
    let err = rep().encode(&object).expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::InvalidRecordName);
    assert_eq!(err.key(), Some("Ghost"));
}

#[test]
fn missing_record_is_key_value_mismatch() {
    let object = DataObject::new("edge-01", "t0").expect("object");
    let err = rep().encode(&object).expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::KeyValueMismatch);
}

#[test]
fn field_kind_mismatch_is_invalid_data_type() {
    let rep = rep();
    let doc = rep.encode(&robot_object()).expect("encode");
    let retyped = doc.replacen("\"speed\":\"2.5\"", "\"speed\":false", 1);
    let err = rep.decode(&retyped).expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::InvalidDataType);
    assert_eq!(err.key(), Some("Robot.speed"));
}

#[test]
fn malformed_document_is_invalid_doc() {
    for text in ["{not json", "[]", r#"{"format":1,"meta":{},"data":{}}"#] {
        let err = rep().decode(text).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::InvalidDoc, "input: {text}");
    }
}

#[test]
fn future_format_is_not_implemented() {
    let rep = rep();
    let doc = rep.encode(&robot_object()).expect("encode");
    let bumped = doc.replacen("\"format\":1", "\"format\":3", 1);
    let err = rep.decode(&bumped).expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::NotImplemented);
}

#[test]
fn oversized_document_is_no_memory() {
    let mut huge = String::with_capacity(MAX_DOC_LEN + 2);
    huge.push('{');
    while huge.len() <= MAX_DOC_LEN {
        huge.push(' ');
    }
    let err = rep().decode(&huge).expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::NoMemory);
}

#[test]
fn object_accessors_report_key_kinds() {
    let mut record = Record::new();
    record.put_text("speed", "2.5").expect("speed");

    let dup = record.put_text("speed", "3.0").expect_err("should fail");
    assert_eq!(dup.kind(), ErrorKind::KeyAlreadyExist);

    let missing = record.text("absent").expect_err("should fail");
    assert_eq!(missing.kind(), ErrorKind::KeyNotExist);

    let wrong = record.list("speed").expect_err("should fail");
    assert_eq!(wrong.kind(), ErrorKind::InvalidDataType);
}

#[test]
fn empty_identity_is_invalid_param() {
    let err = DataObject::new("", "t0").expect_err("should fail");
    assert_eq!(err.kind(), ErrorKind::InvalidParam);
}
