//! Failure taxonomy for calls against the events API

use reqwest::header::{HeaderMap, WWW_AUTHENTICATE};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Login call failed; the app carries on unauthenticated
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// 401 or rejected credentials; the stored token has been cleared
    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("Access forbidden. Insufficient permissions.")]
    Forbidden,

    /// 5xx; only a user action retries
    #[error("Server error ({0}). Please try again later.")]
    Server(u16),

    #[error("Unexpected response status: {0}")]
    Unexpected(u16),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Token store error: {0}")]
    Store(String),
}

impl ApiError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Store(format!("{err:#}"))
    }
}

/// Map a response status onto the taxonomy. `Ok` for 2xx.
pub fn classify(status: StatusCode, headers: &HeaderMap) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::SessionExpired),
        StatusCode::BAD_REQUEST if has_invalid_credential(headers) => {
            Err(ApiError::SessionExpired)
        }
        StatusCode::FORBIDDEN => Err(ApiError::Forbidden),
        s if s.is_server_error() => Err(ApiError::Server(s.as_u16())),
        s => Err(ApiError::Unexpected(s.as_u16())),
    }
}

fn has_invalid_credential(headers: &HeaderMap) -> bool {
    headers
        .get_all(WWW_AUTHENTICATE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| {
            let value = value.to_ascii_lowercase();
            value.contains("invalid_token") || value.contains("invalid_client")
        })
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn test_classify_statuses() {
        let headers = HeaderMap::new();
        assert_eq!(classify(StatusCode::OK, &headers), Ok(()));
        assert_eq!(classify(StatusCode::CREATED, &headers), Ok(()));
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, &headers),
            Err(ApiError::SessionExpired)
        );
        assert_eq!(
            classify(StatusCode::FORBIDDEN, &headers),
            Err(ApiError::Forbidden)
        );
        assert_eq!(
            classify(StatusCode::BAD_GATEWAY, &headers),
            Err(ApiError::Server(502))
        );
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, &headers),
            Err(ApiError::Unexpected(400))
        );
    }

    #[test]
    fn test_bad_request_with_invalid_token_expires_session() {
        let mut headers = HeaderMap::new();
        headers.insert(
            WWW_AUTHENTICATE,
            HeaderValue::from_static("Bearer error=\"invalid_token\""),
        );
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, &headers),
            Err(ApiError::SessionExpired)
        );
    }
}
