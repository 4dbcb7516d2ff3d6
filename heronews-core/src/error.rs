use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Hacker News API error: {0}")]
    HnApi(#[from] HnApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HnApiError {
    #[error("Remote returned HTTP status {status} for {endpoint}")]
    Remote { status: u16, endpoint: String },

    #[error("Malformed response: {details}")]
    MalformedResponse { details: String },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Item {id} does not exist")]
    ItemNotFound { id: u64 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Permission denied accessing config: {path}")]
    PermissionDenied { path: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
