//! Internal error types for formsmith-reqwest.

use formsmith_core::ErrorKind;
use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for formsmith-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for formsmith-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Endpoint path could not be joined onto the base URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl From<Error> for formsmith_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    formsmith_core::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    formsmith_core::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_decode() {
                    formsmith_core::Error::serialization()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    formsmith_core::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => formsmith_core::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Url(e) => formsmith_core::Error::invalid_input()
                .with_message(e.to_string())
                .with_source(e),
        }
    }
}

/// Classifies a non-success HTTP status.
pub(crate) fn status_kind(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
        StatusCode::FORBIDDEN => ErrorKind::Authorization,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimited,
        StatusCode::SERVICE_UNAVAILABLE => ErrorKind::ServiceUnavailable,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ErrorKind::Timeout,
        s if s.is_client_error() => ErrorKind::InvalidInput,
        _ => ErrorKind::ExternalError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_kind() {
        assert_eq!(status_kind(StatusCode::UNAUTHORIZED), ErrorKind::Authentication);
        assert_eq!(status_kind(StatusCode::FORBIDDEN), ErrorKind::Authorization);
        assert_eq!(status_kind(StatusCode::NOT_FOUND), ErrorKind::NotFound);
        assert_eq!(status_kind(StatusCode::TOO_MANY_REQUESTS), ErrorKind::RateLimited);
        assert_eq!(status_kind(StatusCode::BAD_REQUEST), ErrorKind::InvalidInput);
        assert_eq!(status_kind(StatusCode::INTERNAL_SERVER_ERROR), ErrorKind::ExternalError);
        assert_eq!(
            status_kind(StatusCode::SERVICE_UNAVAILABLE),
            ErrorKind::ServiceUnavailable
        );
    }

    #[test]
    fn test_serde_error_conversion() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let error: formsmith_core::Error = Error::from(source).into();
        assert_eq!(error.kind(), ErrorKind::Serialization);
    }
}
