//! Error types for the reqwest-based identity client.

use std::borrow::Cow;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The provider answered with a non-success status.
    #[error("Unexpected status {status} from identity provider")]
    Status { status: StatusCode },
    /// The configured API URL cannot be parsed.
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
    /// The configuration is unusable.
    #[error("Invalid configuration: {0}")]
    Config(Cow<'static, str>),
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) if e.is_timeout() => crate::Error::timeout()
                .with_message("Identity provider request timed out")
                .with_source(e),
            Error::Reqwest(e) if e.is_connect() => crate::Error::network_error()
                .with_message("Connection to identity provider failed")
                .with_source(e),
            Error::Reqwest(e) => crate::Error::network_error()
                .with_message(e.to_string())
                .with_source(e),
            Error::Serde(e) => crate::Error::serialization()
                .with_message("Malformed profile payload")
                .with_source(e),
            Error::Status { status } => {
                let kind = match status {
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                        crate::ErrorKind::Authentication
                    }
                    StatusCode::TOO_MANY_REQUESTS => crate::ErrorKind::RateLimited,
                    s if s.is_server_error() => crate::ErrorKind::ServiceUnavailable,
                    _ => crate::ErrorKind::ExternalError,
                };
                crate::Error::new(kind).with_message(format!("Identity provider returned {status}"))
            }
            Error::Url(e) => crate::Error::configuration()
                .with_message("Invalid identity API URL")
                .with_source(e),
            Error::Config(message) => crate::Error::configuration().with_message(message),
        }
    }
}
