//! Error message quality tests
//!
//! Errors end up in operator logs; make sure they name the failing piece.

use kaco_exporter::error::ExporterError;

#[test]
fn test_status_error_names_path_and_status() {
    let err = ExporterError::Status {
        status: reqwest::StatusCode::NOT_FOUND,
        path: "getdev.cgi?device=2".to_string(),
    };

    let message = err.to_string();
    assert!(message.contains("404"), "missing status code: {message}");
    assert!(
        message.contains("getdev.cgi?device=2"),
        "missing path: {message}"
    );
}

#[test]
fn test_json_error_is_wrapped() {
    let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let err = ExporterError::from(json_err);
    assert!(err.to_string().starts_with("JSON error"));
}

#[test]
fn test_timestamp_error_is_wrapped() {
    let parse_err =
        chrono::NaiveDateTime::parse_from_str("garbage", "%Y%m%d%H%M%S").unwrap_err();
    let err = ExporterError::from(parse_err);
    assert!(err.to_string().contains("invalid device timestamp"));
}

#[test]
fn test_io_error_is_wrapped() {
    let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address already in use");
    let err = ExporterError::from(io_err);

    let message = err.to_string();
    assert!(message.starts_with("IO error"), "unexpected: {message}");
    assert!(message.contains("address already in use"));
}
