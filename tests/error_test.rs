use eir::{EirError, Result};

#[test]
fn test_error_display() {
    let err = EirError::Encoding("tokenizer produced no tokens".to_string());
    assert_eq!(err.to_string(), "encoding error: tokenizer produced no tokens");
}

#[test]
fn test_resource_load_display() {
    let err = EirError::resource_load("classifier", "file not found");
    assert_eq!(err.to_string(), "failed to load classifier: file not found");
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(EirError::Configuration("width mismatch".to_string()))
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Client error classification
// ============================================================================

#[test]
fn client_errors() {
    assert!(EirError::Encoding("empty".into()).is_client_error());
}

#[test]
fn server_errors() {
    assert!(!EirError::Inference("session lock poisoned".into()).is_client_error());
    assert!(!EirError::Classification("nan".into()).is_client_error());
    assert!(!EirError::Configuration("width".into()).is_client_error());
    assert!(!EirError::resource_load("labels", "missing").is_client_error());
    assert!(
        !EirError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")).is_client_error()
    );
}

#[test]
fn conversions_from_source_errors() {
    let json_err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
    assert!(matches!(EirError::from(json_err), EirError::Json(_)));

    let io_err = std::io::Error::other("disk");
    assert!(matches!(EirError::from(io_err), EirError::Io(_)));
}
