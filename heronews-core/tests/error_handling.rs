use heronews_core::{ConfigError, CoreError, ErrorExt, ErrorReporter, HnApiError};

#[test]
fn test_error_codes() {
    let remote_error = CoreError::HnApi(HnApiError::Remote {
        status: 503,
        endpoint: "/newstories.json".to_string(),
    });
    assert_eq!(remote_error.error_code(), "HN_API");

    let config_error = CoreError::Config(ConfigError::FileNotFound {
        path: "heronews.toml".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");

    let invalid = CoreError::InvalidInput {
        message: "bad id".to_string(),
    };
    assert_eq!(invalid.error_code(), "INVALID_INPUT");

    let io = CoreError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin"));
    assert_eq!(io.error_code(), "IO");
    assert!(io.user_friendly_message().contains("input/output"));
}

#[test]
fn test_api_error_codes() {
    assert_eq!(
        HnApiError::Remote {
            status: 404,
            endpoint: "/item/1.json".to_string()
        }
        .error_code(),
        "HN_REMOTE_ERROR"
    );
    assert_eq!(
        HnApiError::MalformedResponse {
            details: "null item".to_string()
        }
        .error_code(),
        "HN_MALFORMED_RESPONSE"
    );
    assert_eq!(HnApiError::RequestTimeout.error_code(), "HN_TIMEOUT");
    assert_eq!(
        HnApiError::ItemNotFound { id: 404 }.error_code(),
        "HN_ITEM_NOT_FOUND"
    );
}

#[test]
fn test_user_friendly_messages() {
    let server_error = CoreError::HnApi(HnApiError::Remote {
        status: 502,
        endpoint: "/topstories.json".to_string(),
    });
    let message = server_error.user_friendly_message();
    assert!(message.contains("having trouble"));

    let client_error = CoreError::HnApi(HnApiError::Remote {
        status: 404,
        endpoint: "/item/1.json".to_string(),
    });
    assert!(client_error.user_friendly_message().contains("HTTP 404"));
    assert_eq!(
        HnApiError::ItemNotFound { id: 8863 }.user_friendly_message(),
        "Item 8863 could not be found."
    );

    let config_error = CoreError::Config(ConfigError::InvalidValue {
        field: "base_url".to_string(),
        value: "nope".to_string(),
    });
    assert!(config_error.user_friendly_message().contains("base_url"));
}

#[test]
fn test_error_display_carries_status() {
    let error = HnApiError::Remote {
        status: 500,
        endpoint: "/jobstories.json".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Remote returned HTTP status 500 for /jobstories.json"
    );
}

#[test]
fn test_error_reporter() {
    let reporter = ErrorReporter::new();
    let error = CoreError::HnApi(HnApiError::RequestTimeout);

    // This test just ensures the methods don't panic
    reporter.report_error(&error);
    reporter.report_warning(&error);
}
