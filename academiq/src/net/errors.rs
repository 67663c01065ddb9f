//! Error types for requests against the AcademIQ backend.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not complete within its timeout
    #[error("Request to {path} timed out after {timeout:?}")]
    Timeout { path: String, timeout: Duration },

    /// The server could not be reached
    #[error("Could not connect to the server: {0}")]
    Connect(String),

    /// The server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The server rejected the bearer token; the session has been cleared
    #[error("Session expired or token rejected")]
    Unauthorized,

    /// The request needs a logged-in user and there is none
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The request was rejected before being sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Reading a local file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other transport failure
    #[error("Request failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// Map a transport error raised by reqwest.
    pub(crate) fn from_reqwest(path: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                path: path.to_string(),
                timeout,
            }
        } else if err.is_connect() {
            ApiError::Connect(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }

    /// Whether the server reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Failures worth repeating against the same endpoint.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Timeout { .. } | ApiError::Connect(_) | ApiError::Transport(_)
        )
    }

    /// Failures after which an alternate endpoint may succeed.
    pub fn allows_fallback(&self) -> bool {
        self.is_transient() || matches!(self.status(), Some(404) | Some(405))
    }

    /// Get a message suitable for showing to the user
    ///
    /// Transport details are replaced by a plain explanation; server messages
    /// are passed through since the backend writes them for end users.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Timeout { .. } => "The connection to the server timed out".to_string(),
            ApiError::Connect(_) | ApiError::Transport(_) => {
                "Could not connect to the server. Check that the backend is running.".to_string()
            }
            ApiError::Status { status, message } if message.is_empty() => {
                format!("The server returned an error ({status})")
            }
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Unauthorized => "Your session has expired, please log in again".to_string(),
            ApiError::NotAuthenticated => "You need to log in first".to_string(),
            ApiError::Decode(_) => "The server sent an unexpected response".to_string(),
            ApiError::InvalidRequest(reason) => reason.clone(),
            ApiError::Io(err) => format!("Could not read file: {err}"),
        }
    }
}

/// Result type for backend operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Extract the human-readable message from an error response body.
///
/// JSON bodies are searched for `message`, `title` and `error` fields (in that
/// order); anything else is returned as trimmed text.
pub(crate) fn error_message_from_body(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for field in ["message", "title", "error"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
        if let Some(text) = value.as_str() {
            return text.to_string();
        }
    }
    String::from_utf8_lossy(body).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_json_body() {
        let body = br#"{"message": "Course not found", "title": "ignored"}"#;
        assert_eq!(error_message_from_body(body), "Course not found");

        let body = br#"{"title": "One or more validation errors occurred."}"#;
        assert_eq!(
            error_message_from_body(body),
            "One or more validation errors occurred."
        );
    }

    #[test]
    fn test_message_from_text_body() {
        assert_eq!(error_message_from_body(b"  Invalid credentials \n"), "Invalid credentials");
        assert_eq!(error_message_from_body(b""), "");
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let err = ApiError::Connect("tcp connect error: Connection refused (os error 111)".into());
        assert!(!err.user_message().contains("os error"));

        let err = ApiError::Timeout {
            path: "/Curso".into(),
            timeout: Duration::from_secs(10),
        };
        assert!(err.user_message().contains("timed out"));
        assert!(err.to_string().contains("10s"));
    }

    #[test]
    fn test_status_message_passthrough() {
        let err = ApiError::Status {
            status: 400,
            message: "Title is required".into(),
        };
        assert_eq!(err.user_message(), "Title is required");

        let err = ApiError::Status {
            status: 500,
            message: String::new(),
        };
        assert!(err.user_message().contains("500"));
    }

    #[test]
    fn test_fallback_classification() {
        let not_found = ApiError::Status {
            status: 404,
            message: String::new(),
        };
        assert!(not_found.allows_fallback());
        assert!(!not_found.is_transient());

        let bad_request = ApiError::Status {
            status: 400,
            message: String::new(),
        };
        assert!(!bad_request.allows_fallback());

        assert!(ApiError::Connect("refused".into()).is_transient());
        assert!(!ApiError::Unauthorized.allows_fallback());
    }
}
