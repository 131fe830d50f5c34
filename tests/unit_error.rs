use std::path::PathBuf;

use habit::error::{exit_codes, Error, ErrorKind, JsonError};

#[test]
fn exit_codes_map_correctly() {
    let validation = Error::InvalidTitle("empty".to_string());
    assert_eq!(validation.exit_code(), exit_codes::VALIDATION_ERROR);
    assert_eq!(validation.kind(), ErrorKind::Validation);

    let missing = Error::TaskNotFound("01abc".to_string());
    assert_eq!(missing.exit_code(), exit_codes::NOT_FOUND);

    let lock = Error::LockFailed(PathBuf::from("habits.json.lock"));
    assert_eq!(lock.exit_code(), exit_codes::STORAGE_FAILED);
    assert_eq!(lock.kind(), ErrorKind::Storage);
}

#[test]
fn json_error_includes_code_and_details() {
    let err = Error::TaskNotFound("01abc".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::NOT_FOUND);
    assert_eq!(json.kind, ErrorKind::NotFound);
    assert!(json.error.contains("Task not found"));

    let value = serde_json::to_value(&json).expect("serialize");
    assert_eq!(value["kind"], "not_found");
    assert_eq!(value["details"]["task_id"], "01abc");
}

#[test]
fn date_errors_echo_input() {
    let err = habit::day::parse_day("yesterday").unwrap_err();
    assert!(matches!(err, Error::InvalidDate(ref raw) if raw == "yesterday"));
    assert!(err.to_string().contains("YYYY-MM-DD"));
}
