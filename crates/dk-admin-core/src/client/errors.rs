use crate::client::types::Method;
use crate::errors::AdminError;

/// Errors from the Remote Resource Client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RequestError {
    /// The HTTP client could not be constructed.
    #[error("Failed to set up HTTP client: {message}")]
    Setup { message: String },

    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("Network error on {method} {path}: {message}")]
    Network {
        method: Method,
        path: String,
        message: String,
    },

    /// The backend answered with a non-2xx status.
    #[error("Backend returned {status} for {method} {path}: {message}")]
    Status {
        method: Method,
        path: String,
        status: u16,
        /// Backend-supplied message when present, otherwise the status reason.
        message: String,
    },

    /// The response body did not match the expected schema.
    #[error("Malformed response from {path}: {message}")]
    MalformedResponse { path: String, message: String },

    /// The request body could not be serialized.
    #[error("Failed to encode request body for {path}: {message}")]
    Encode { path: String, message: String },
}

impl RequestError {
    /// HTTP status of a `Status` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The message best suited for showing to an operator.
    pub fn user_message(&self) -> String {
        match self {
            RequestError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl AdminError for RequestError {
    fn error_code(&self) -> &'static str {
        match self {
            RequestError::Setup { .. } => "CLIENT_SETUP_FAILED",
            RequestError::Network { .. } => "NETWORK_ERROR",
            RequestError::Status { .. } => "BACKEND_STATUS_ERROR",
            RequestError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            RequestError::Encode { .. } => "REQUEST_ENCODE_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        // 4xx means the backend rejected what the operator submitted
        matches!(self, RequestError::Status { status, .. } if (400..500).contains(status))
    }
}

/// Extract the backend-supplied message from an error response body.
///
/// Looks for a JSON `error` or `message` string, then falls back to the raw
/// body, then to the canonical reason phrase for `status`.
pub fn backend_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["error", "message"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str())
                && !text.trim().is_empty()
            {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') {
        return trimmed.chars().take(200).collect();
    }

    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_prefers_error_field() {
        let body = r#"{"error":"Slug already exists","message":"ignored"}"#;
        assert_eq!(backend_message(409, body), "Slug already exists");
    }

    #[test]
    fn test_backend_message_uses_message_field() {
        assert_eq!(
            backend_message(400, r#"{"message":"vramGB is required"}"#),
            "vramGB is required"
        );
    }

    #[test]
    fn test_backend_message_falls_back_to_plain_body() {
        assert_eq!(backend_message(502, "Bad gateway upstream"), "Bad gateway upstream");
    }

    #[test]
    fn test_backend_message_falls_back_to_reason() {
        assert_eq!(backend_message(404, ""), "Not Found");
        assert_eq!(backend_message(500, r#"{"detail":1}"#), "Internal Server Error");
    }

    #[test]
    fn test_status_error_codes() {
        let err = RequestError::Status {
            method: Method::Put,
            path: "/admin/cpus/x".to_string(),
            status: 422,
            message: "bad".to_string(),
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.error_code(), "BACKEND_STATUS_ERROR");
        assert!(err.is_user_error());
        assert_eq!(err.user_message(), "bad");
        assert_eq!(
            err.to_string(),
            "Backend returned 422 for PUT /admin/cpus/x: bad"
        );
    }

    #[test]
    fn test_server_and_network_errors_are_not_user_errors() {
        let server = RequestError::Status {
            method: Method::Get,
            path: "/cpus".to_string(),
            status: 503,
            message: "down".to_string(),
        };
        assert!(!server.is_user_error());

        let network = RequestError::Network {
            method: Method::Get,
            path: "/cpus".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(!network.is_user_error());
        assert_eq!(network.status(), None);
    }
}
