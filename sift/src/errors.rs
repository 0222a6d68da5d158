use thiserror::Error;

/// Top-level error type returned by the fallible edges of sift.
///
/// Query composition itself never fails: criteria that cannot be honoured
/// contribute no predicate. Errors only come from loading configuration,
/// parsing criteria documents, or naming something that does not exist.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Reading a configuration or criteria file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`crate::config::SiftConfig`].
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A criteria document is not a JSON object of criterion values.
    #[error("invalid criteria document: {0}")]
    Criteria(#[from] serde_json::Error),

    /// Invalid input supplied by the caller (unknown domain, unknown engine, ...).
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl SearchError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}
