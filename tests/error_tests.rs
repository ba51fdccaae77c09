// Error handling tests

use agent2gemini::error::AdapterError;

#[test]
fn test_error_display_messages() {
    let errors = vec![
        AdapterError::Configuration("No credentials".to_string()),
        AdapterError::UnsupportedRole("narrator".to_string()),
        AdapterError::InvalidRole("function".to_string()),
        AdapterError::Api("API error".to_string()),
        AdapterError::StreamProcessing("Stream failed".to_string()),
        AdapterError::NotImplemented("structured-object generation".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_configuration_error() {
    let error = AdapterError::Configuration("Missing API key".to_string());
    assert!(format!("{}", error).contains("Missing API key"));
}

#[test]
fn test_unsupported_role_error() {
    let error = AdapterError::UnsupportedRole("narrator".to_string());
    assert!(format!("{}", error).contains("narrator"));
}

#[test]
fn test_api_error() {
    let error = AdapterError::Api("Connection refused".to_string());
    assert!(format!("{}", error).contains("Connection refused"));
}

#[test]
fn test_stream_processing_error() {
    let error = AdapterError::StreamProcessing("connection reset".to_string());
    assert!(format!("{}", error).contains("connection reset"));
}

#[test]
fn test_not_implemented_error() {
    let error = AdapterError::NotImplemented("stream_object".to_string());
    assert!(format!("{}", error).contains("stream_object"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let error: AdapterError = json_error.into();
    assert!(matches!(error, AdapterError::Json(_)));
}
