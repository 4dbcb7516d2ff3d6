use crate::error::*;
use tracing::{debug, error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::HnApi(e) => {
                error!("Hacker News API error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::HnApi(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
            CoreError::Io(_) => "A local input/output error occurred.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::HnApi(_) => "HN_API".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
        }
    }
}

impl ErrorExt for HnApiError {
    fn log_error(&self) -> &Self {
        error!("HnApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("HnApiError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            HnApiError::Remote { status, .. } if *status >= 500 => {
                "Hacker News is having trouble right now. Please try again later.".to_string()
            }
            HnApiError::Remote { status, .. } => {
                format!("Hacker News rejected the request (HTTP {}).", status)
            }
            HnApiError::MalformedResponse { .. } => {
                "Hacker News sent a response that could not be read.".to_string()
            }
            HnApiError::ItemNotFound { id } => format!("Item {} could not be found.", id),
            HnApiError::RequestTimeout => {
                "Request to Hacker News timed out. Please try again.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            HnApiError::Remote { .. } => "HN_REMOTE_ERROR".to_string(),
            HnApiError::MalformedResponse { .. } => "HN_MALFORMED_RESPONSE".to_string(),
            HnApiError::RequestTimeout => "HN_TIMEOUT".to_string(),
            HnApiError::ItemNotFound { .. } => "HN_ITEM_NOT_FOUND".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::PermissionDenied { .. } => {
                "Permission denied accessing configuration. Please check file permissions."
                    .to_string()
            }
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::PermissionDenied { .. } => "CONFIG_PERMISSION_DENIED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

/// Logs errors that stop at a task boundary instead of propagating.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!("Error code: {}", error.error_code());
        info!("User message: {}", error.user_friendly_message());
    }

    /// For recoverable failures, such as a background check that will run again.
    pub fn report_warning(&self, error: &CoreError) {
        error.log_warn();
        debug!("Error code: {}", error.error_code());
    }
}
