//! Errors surfaced by the fetch path.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure: DNS, connect, TLS, body read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. `reason` comes from the error body when it has one.
    #[error("{reason}")]
    Http { status: u16, reason: String },

    /// Response parsed but violates the result shape (missing fields,
    /// misaligned channel arrays, bad dates).
    #[error("Malformed archive response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    reason: Option<String>,
}

impl FetchError {
    /// Build an [`FetchError::Http`] from a failed response, preferring the
    /// archive's own `reason` text over a generic message.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let reason = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.reason)
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| format!("Failed to fetch weather data: {}", status.as_u16()));

        FetchError::Http { status: status.as_u16(), reason }
    }

    /// Dashboard-level message for the error banner and notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Http { reason, .. } => reason.clone(),
            Self::MalformedResponse(_) => {
                "The weather archive returned data in an unexpected format.".to_string()
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_uses_reason_from_body() {
        let err = FetchError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"error":true,"reason":"Parameter 'start_date' is out of allowed range"}"#,
        );
        assert_eq!(err.to_string(), "Parameter 'start_date' is out of allowed range");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn http_error_falls_back_to_status_message() {
        let err = FetchError::from_status(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Failed to fetch weather data: 502");

        let err = FetchError::from_status(StatusCode::NOT_FOUND, r#"{"error":true}"#);
        assert_eq!(err.user_message(), "Failed to fetch weather data: 404");
    }

    #[test]
    fn malformed_has_friendly_message() {
        let err = FetchError::MalformedResponse("time has 3 values".into());
        assert!(err.to_string().contains("time has 3 values"));
        assert!(err.user_message().contains("unexpected format"));
        assert_eq!(err.status(), None);
    }
}
